//! Wishlist Records

use jiff::Timestamp;

use crate::domain::products::records::{ProductStatus, ProductUuid};

/// A wishlisted product with its current listing details.
#[derive(Debug, Clone)]
pub struct WishlistItem {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub final_price: u64,
    pub status: ProductStatus,
    pub added_at: Timestamp,
}
