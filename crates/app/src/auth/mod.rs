//! Bearer token authentication.

pub mod errors;
pub mod records;
mod repository;
pub mod service;
mod token;

pub use errors::AuthServiceError;
pub use service::*;
