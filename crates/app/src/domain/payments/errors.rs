//! Payments service errors.

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    #[error("order not found")]
    OrderNotFound,

    #[error("order is already paid")]
    AlreadyPaid,

    #[error("payment signature did not verify")]
    SignatureMismatch,

    #[error("payment gateway request failed")]
    Gateway(#[source] reqwest::Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for PaymentsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::OrderNotFound;
        }

        Self::Sql(error)
    }
}

impl From<reqwest::Error> for PaymentsServiceError {
    fn from(error: reqwest::Error) -> Self {
        Self::Gateway(error)
    }
}
