//! Products Data

use crate::domain::products::records::{ProductStatus, ProductUuid};

/// New Product Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub discount_percent: u8,
    pub stock: u32,
}

/// Product Update Data
///
/// Absent fields keep their stored values. Changing `price` or
/// `discount_percent` recomputes the stored final price.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub discount_percent: Option<u8>,
    pub stock: Option<u32>,
    pub status: Option<ProductStatus>,
}
