//! Coupon Records

use jiff::Timestamp;

use crate::{domain::coupons::errors::CouponRejection, uuids::TypedUuid};

/// Coupon UUID
pub type CouponUuid = TypedUuid<Coupon>;

/// How a coupon's value is applied to the cart subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountType {
    /// `value` is a percentage of the subtotal, 0 to 100.
    Percentage,
    /// `value` is a fixed amount in minor units.
    Fixed,
}

impl DiscountType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "percentage" => Some(Self::Percentage),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }
}

/// Discount Coupon
#[derive(Debug, Clone)]
pub struct Coupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub discount_type: DiscountType,
    pub value: u64,
    pub min_order_value: u64,
    pub max_discount: Option<u64>,
    pub usage_limit: Option<u64>,
    pub used_count: u64,
    pub expires_at: Option<Timestamp>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Coupon {
    /// Whether the coupon can be offered at all. Inactive and expired
    /// codes are indistinguishable from unknown ones to callers.
    #[must_use]
    pub fn is_live(&self, now: Timestamp) -> bool {
        self.is_active && self.expires_at.is_none_or(|expiry| expiry > now)
    }

    /// Validates the coupon against a cart subtotal and computes the
    /// discount it would grant. The discount never exceeds the subtotal.
    pub fn discount_for(&self, subtotal: u64) -> Result<u64, CouponRejection> {
        if self.usage_limit.is_some_and(|limit| self.used_count >= limit) {
            return Err(CouponRejection::UsageExceeded);
        }

        if subtotal < self.min_order_value {
            return Err(CouponRejection::MinimumNotMet {
                minimum: self.min_order_value,
            });
        }

        let discount = match self.discount_type {
            DiscountType::Percentage => {
                // Round half up, matching price arithmetic elsewhere.
                let exact = u128::from(subtotal) * u128::from(self.value);
                let percentage = u64::try_from((exact + 50) / 100).unwrap_or(u64::MAX);

                match self.max_discount {
                    Some(cap) => percentage.min(cap),
                    None => percentage,
                }
            }
            DiscountType::Fixed => self.value,
        };

        Ok(discount.min(subtotal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupon(discount_type: DiscountType, value: u64) -> Coupon {
        Coupon {
            uuid: CouponUuid::new(),
            code: "SAVE10".to_string(),
            discount_type,
            value,
            min_order_value: 0,
            max_discount: None,
            usage_limit: None,
            used_count: 0,
            expires_at: None,
            is_active: true,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn percentage_discount_rounds_half_up() {
        let coupon = coupon(DiscountType::Percentage, 10);

        assert_eq!(coupon.discount_for(200), Ok(20));
        assert_eq!(coupon.discount_for(5), Ok(1));
        assert_eq!(coupon.discount_for(4), Ok(0));
    }

    #[test]
    fn percentage_discount_respects_the_cap() {
        let mut coupon = coupon(DiscountType::Percentage, 50);
        coupon.max_discount = Some(100);

        assert_eq!(coupon.discount_for(150), Ok(75));
        assert_eq!(coupon.discount_for(400), Ok(100));
    }

    #[test]
    fn fixed_discount_is_capped_at_subtotal() {
        let coupon = coupon(DiscountType::Fixed, 500);

        assert_eq!(coupon.discount_for(300), Ok(300));
        assert_eq!(coupon.discount_for(700), Ok(500));
    }

    #[test]
    fn inactive_coupon_is_not_live() {
        let mut coupon = coupon(DiscountType::Fixed, 10);
        coupon.is_active = false;

        assert!(!coupon.is_live(Timestamp::UNIX_EPOCH));
    }

    #[test]
    fn expired_coupon_is_not_live() {
        let mut coupon = coupon(DiscountType::Fixed, 10);
        assert!(coupon.is_live(Timestamp::UNIX_EPOCH));

        coupon.expires_at = Some(Timestamp::UNIX_EPOCH);
        assert!(!coupon.is_live(Timestamp::UNIX_EPOCH));
    }

    #[test]
    fn exhausted_coupon_is_rejected() {
        let mut coupon = coupon(DiscountType::Fixed, 10);
        coupon.usage_limit = Some(3);
        coupon.used_count = 3;

        assert_eq!(
            coupon.discount_for(100),
            Err(CouponRejection::UsageExceeded)
        );
    }

    #[test]
    fn subtotal_below_minimum_is_rejected() {
        let mut coupon = coupon(DiscountType::Percentage, 10);
        coupon.min_order_value = 150;

        assert_eq!(
            coupon.discount_for(100),
            Err(CouponRejection::MinimumNotMet { minimum: 150 })
        );
        assert_eq!(coupon.discount_for(150), Ok(15));
    }
}
