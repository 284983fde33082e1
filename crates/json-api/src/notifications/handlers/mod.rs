//! Notification Handlers

pub(crate) mod index;
pub(crate) mod mark_read;
