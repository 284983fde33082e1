//! Order Records

use jiff::Timestamp;

use crate::{
    domain::{products::records::ProductUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// Order fulfilment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    OutForDelivery,
    Delivered,
    Cancelled,
    ReturnRequested,
    Returned,
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::OutForDelivery => "out-for-delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::ReturnRequested => "return-requested",
            Self::Returned => "returned",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "shipped" => Some(Self::Shipped),
            "out-for-delivery" => Some(Self::OutForDelivery),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            "return-requested" => Some(Self::ReturnRequested),
            "returned" => Some(Self::Returned),
            _ => None,
        }
    }

    /// States an order must currently be in for a transition into `self`
    /// to be legal. `Pending` is the initial state and unreachable.
    #[must_use]
    pub fn predecessors(&self) -> &'static [OrderStatus] {
        match self {
            Self::Pending => &[],
            Self::Processing => &[Self::Pending],
            Self::Shipped => &[Self::Processing],
            Self::OutForDelivery => &[Self::Shipped],
            Self::Delivered => &[Self::Shipped, Self::OutForDelivery],
            Self::Cancelled => &[Self::Pending, Self::Processing],
            Self::ReturnRequested => &[Self::Delivered],
            Self::Returned => &[Self::ReturnRequested],
        }
    }
}

/// Payment state, tracked separately from fulfilment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Shipping address captured at order time. Deleting the saved address
/// later does not touch this copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSnapshot {
    pub line1: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// A placed order with its immutable price breakdown.
#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub status: OrderStatus,
    pub subtotal: u64,
    pub discount: u64,
    pub coupon_code: Option<String>,
    pub delivery_charge: u64,
    pub total: u64,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub is_paid: bool,
    pub paid_at: Option<Timestamp>,
    pub provider_order_id: Option<String>,
    pub provider_payment_id: Option<String>,
    pub is_delivered: bool,
    pub delivered_at: Option<Timestamp>,
    pub shipping: AddressSnapshot,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub items: Vec<OrderItem>,
}

/// A line on an order, priced as it was at order time.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub unit_price: u64,
    pub quantity: u32,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}
