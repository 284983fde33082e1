//! Payments

pub mod data;
pub mod errors;
pub mod gateway;
mod signature;
pub mod service;

pub use errors::PaymentsServiceError;
pub use gateway::*;
pub use service::*;
