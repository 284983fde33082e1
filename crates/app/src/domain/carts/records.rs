//! Cart Records

use jiff::Timestamp;

use crate::{domain::products::records::ProductUuid, uuids::TypedUuid};

/// Internal cart row marker. One cart per user; callers address carts by
/// their owner, never by this identifier.
#[derive(Debug)]
pub struct CartRecord;

pub(crate) type CartUuid = TypedUuid<CartRecord>;

/// A user's cart, priced against the current catalog.
#[derive(Debug, Clone)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub subtotal: u64,
}

impl Cart {
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let subtotal = items.iter().map(CartItem::line_total).sum();

        Self { items, subtotal }
    }
}

/// Cart line item. `unit_price` is the product's current final price.
#[derive(Debug, Clone)]
pub struct CartItem {
    pub product_uuid: ProductUuid,
    pub name: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartItem {
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}
