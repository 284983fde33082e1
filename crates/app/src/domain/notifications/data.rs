//! Notifications Data

use crate::domain::orders::records::{OrderStatus, OrderUuid};

/// Order lifecycle moments that produce notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEvent {
    Placed { order: OrderUuid },
    Cancelled { order: OrderUuid },
    StatusChanged { order: OrderUuid, status: OrderStatus },
    PaymentConfirmed { order: OrderUuid },
}

impl OrderEvent {
    #[must_use]
    pub(crate) fn title(&self) -> &'static str {
        match self {
            Self::Placed { .. } => "Order placed",
            Self::Cancelled { .. } => "Order cancelled",
            Self::StatusChanged { .. } => "Order updated",
            Self::PaymentConfirmed { .. } => "Payment received",
        }
    }

    #[must_use]
    pub(crate) fn body(&self) -> String {
        match self {
            Self::Placed { order } => format!("Order {order} has been placed."),
            Self::Cancelled { order } => format!("Order {order} has been cancelled."),
            Self::StatusChanged { order, status } => {
                format!("Order {order} is now {}.", status.as_str())
            }
            Self::PaymentConfirmed { order } => {
                format!("Payment for order {order} has been confirmed.")
            }
        }
    }
}
