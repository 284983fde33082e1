//! Store Settings

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub(crate) use repository::PgSettingsRepository;

pub use errors::SettingsServiceError;
pub use service::*;
