//! Orders

pub mod data;
pub mod errors;
pub mod pricing;
pub mod records;
mod repository;
pub mod service;

pub(crate) use repository::PgOrdersRepository;

pub use errors::OrdersServiceError;
pub use service::*;
