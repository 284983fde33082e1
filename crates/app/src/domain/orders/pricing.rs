//! Order pricing.
//!
//! All amounts are integer minor units. The invariant
//! `total = subtotal - discount + delivery_charge` also holds as a
//! CHECK constraint on the orders table.

use crate::domain::settings::records::StoreSettings;

/// Delivery charge for an order whose payable goods amount is
/// `payable_subtotal` (subtotal less any coupon discount). Orders at or
/// above the free shipping threshold ship free.
#[must_use]
pub fn delivery_charge(payable_subtotal: u64, settings: &StoreSettings) -> u64 {
    if payable_subtotal >= settings.free_shipping_threshold {
        0
    } else {
        settings.flat_shipping_rate
    }
}

/// Grand total for the order.
#[must_use]
pub fn order_total(subtotal: u64, discount: u64, delivery_charge: u64) -> u64 {
    subtotal.saturating_sub(discount) + delivery_charge
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;

    fn settings(flat_shipping_rate: u64, free_shipping_threshold: u64) -> StoreSettings {
        StoreSettings {
            flat_shipping_rate,
            free_shipping_threshold,
            cod_enabled: true,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn discounted_order_below_threshold_pays_flat_rate() {
        // Subtotal 200, 10% coupon, flat rate 50: the buyer pays 230.
        let settings = settings(50, 999);

        let subtotal = 200;
        let discount = 20;
        let delivery = delivery_charge(subtotal - discount, &settings);

        assert_eq!(delivery, 50);
        assert_eq!(order_total(subtotal, discount, delivery), 230);
    }

    #[test]
    fn threshold_is_checked_against_the_discounted_amount() {
        let settings = settings(50, 1000);

        // 1050 gross but 950 after discount, so shipping still applies.
        assert_eq!(delivery_charge(950, &settings), 50);
        assert_eq!(delivery_charge(1000, &settings), 0);
    }

    #[test]
    fn discount_never_drives_the_total_negative() {
        assert_eq!(order_total(100, 150, 0), 0);
    }
}
