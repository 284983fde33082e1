//! Orders Data

use crate::domain::{
    addresses::records::AddressUuid,
    orders::records::{AddressSnapshot, OrderUuid},
};

/// Where the order should ship to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShippingInput {
    /// One of the user's saved addresses.
    ByReference(AddressUuid),
    /// A one-off address supplied with the order.
    Inline(AddressSnapshot),
}

/// How the buyer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Cod,
    Prepaid,
}

impl PaymentMethod {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cod => "cod",
            Self::Prepaid => "prepaid",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cod" => Some(Self::Cod),
            "prepaid" => Some(Self::Prepaid),
            _ => None,
        }
    }
}

/// Checkout request. The order's lines come from the user's cart.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub uuid: OrderUuid,
    pub shipping: ShippingInput,
    pub coupon_code: Option<String>,
    pub payment_method: PaymentMethod,
}
