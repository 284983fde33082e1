//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{
    coupons::errors::CouponsServiceError,
    orders::records::OrderStatus,
    products::records::ProductUuid,
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("shipping address not found")]
    InvalidAddress,

    #[error("insufficient stock for product {product}")]
    InsufficientStock { product: ProductUuid },

    #[error("coupon rejected")]
    Coupon(#[source] CouponsServiceError),

    #[error("cash on delivery is not available")]
    CodDisabled,

    #[error("order not found")]
    NotFound,

    #[error("order cannot move from {from:?} to {to:?}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}

impl From<CouponsServiceError> for OrdersServiceError {
    fn from(error: CouponsServiceError) -> Self {
        match error {
            CouponsServiceError::Sql(source) => Self::Sql(source),
            other => Self::Coupon(other),
        }
    }
}
