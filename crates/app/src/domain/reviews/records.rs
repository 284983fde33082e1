//! Review Records

use jiff::Timestamp;

use crate::{
    domain::{products::records::ProductUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Review UUID
pub type ReviewUuid = TypedUuid<Review>;

/// A product review. One per user per product.
#[derive(Debug, Clone)]
pub struct Review {
    pub uuid: ReviewUuid,
    pub product_uuid: ProductUuid,
    pub user_uuid: UserUuid,
    pub rating: u8,
    pub comment: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Aggregate rating for a product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductRating {
    pub average: Option<f64>,
    pub count: u64,
}
