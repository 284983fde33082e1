//! Carts

pub mod errors;
pub mod records;
mod repositories;
pub mod service;

pub(crate) use repositories::{PgCartItemsRepository, PgCartsRepository};

pub use errors::CartsServiceError;
pub use service::*;
