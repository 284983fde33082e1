//! Order Handlers

pub(crate) mod cancel;
pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod index_all;
pub(crate) mod request_return;
pub(crate) mod update_status;
