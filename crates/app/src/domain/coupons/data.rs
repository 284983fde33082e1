//! Coupons Data

use jiff::Timestamp;

use crate::domain::coupons::records::{CouponUuid, DiscountType};

/// New Coupon Data
#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub discount_type: DiscountType,
    pub value: u64,
    pub min_order_value: u64,
    pub max_discount: Option<u64>,
    pub usage_limit: Option<u64>,
    pub expires_at: Option<Timestamp>,
}

/// Coupon Update Data
#[derive(Debug, Clone, Default)]
pub struct CouponUpdate {
    pub value: Option<u64>,
    pub min_order_value: Option<u64>,
    pub max_discount: Option<Option<u64>>,
    pub usage_limit: Option<Option<u64>>,
    pub expires_at: Option<Option<Timestamp>>,
    pub is_active: Option<bool>,
}

/// Outcome of applying a coupon code to a cart subtotal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponPreview {
    pub code: String,
    pub discount: u64,
    pub payable: u64,
}
