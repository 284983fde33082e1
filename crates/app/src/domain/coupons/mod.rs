//! Coupons

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub(crate) use repository::PgCouponsRepository;
pub(crate) use service::redeem_coupon;

pub use errors::CouponsServiceError;
pub use service::*;
