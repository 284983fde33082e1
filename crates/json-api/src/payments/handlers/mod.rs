//! Payment Handlers

pub(crate) mod initiate;
pub(crate) mod verify;
