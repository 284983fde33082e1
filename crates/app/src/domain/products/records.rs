//! Product Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Product availability state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStatus {
    Available,
    OutOfStock,
    Discontinued,
}

impl ProductStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::OutOfStock => "out-of-stock",
            Self::Discontinued => "discontinued",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(Self::Available),
            "out-of-stock" => Some(Self::OutOfStock),
            "discontinued" => Some(Self::Discontinued),
            _ => None,
        }
    }
}

/// Product Record
///
/// Prices are in minor currency units. `final_price` is always the price
/// after the product's own percentage discount and is recomputed on every
/// price or discount change.
#[derive(Debug, Clone)]
pub struct Product {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub discount_percent: u8,
    pub final_price: u64,
    pub stock: u32,
    pub status: ProductStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Price after the product's own percentage discount, rounded half-up.
#[must_use]
pub fn final_price(price: u64, discount_percent: u8) -> u64 {
    let rebate = (u128::from(price) * u128::from(discount_percent) + 50) / 100;

    price.saturating_sub(u64::try_from(rebate).unwrap_or(price))
}
