//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::records::{AddressSnapshot, Order, OrderItem};

use crate::{extensions::*, orders::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub product_uuid: Uuid,

    /// Product name at order time
    pub name: String,

    /// Unit price at order time, in minor currency units
    pub unit_price: u64,

    pub quantity: u32,

    pub line_total: u64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        let line_total = item.line_total();

        OrderItemResponse {
            product_uuid: item.product_uuid.into_uuid(),
            name: item.name,
            unit_price: item.unit_price,
            quantity: item.quantity,
            line_total,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShippingResponse {
    pub line1: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl From<AddressSnapshot> for ShippingResponse {
    fn from(shipping: AddressSnapshot) -> Self {
        ShippingResponse {
            line1: shipping.line1,
            city: shipping.city,
            postal_code: shipping.postal_code,
            country: shipping.country,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,

    /// Fulfilment state
    pub status: String,

    pub subtotal: u64,
    pub discount: u64,
    pub coupon_code: Option<String>,
    pub delivery_charge: u64,
    pub total: u64,

    /// `cod` or `prepaid`
    pub payment_method: String,

    pub payment_status: String,
    pub is_paid: bool,
    pub paid_at: Option<String>,
    pub is_delivered: bool,
    pub delivered_at: Option<String>,

    /// Address snapshot taken when the order was placed
    pub shipping: ShippingResponse,

    pub items: Vec<OrderItemResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            uuid: order.uuid.into_uuid(),
            status: order.status.as_str().to_string(),
            subtotal: order.subtotal,
            discount: order.discount,
            coupon_code: order.coupon_code,
            delivery_charge: order.delivery_charge,
            total: order.total,
            payment_method: order.payment_method,
            payment_status: order.payment_status.as_str().to_string(),
            is_paid: order.is_paid,
            paid_at: order.paid_at.as_ref().map(ToString::to_string),
            is_delivered: order.is_delivered,
            delivered_at: order.delivered_at.as_ref().map(ToString::to_string),
            shipping: order.shipping.into(),
            items: order.items.into_iter().map(Into::into).collect(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Get Order Handler
///
/// Returns one order. Non-admin callers only see their own.
#[endpoint(tags("orders"), summary = "Get Order", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let scope = if user.is_admin { None } else { Some(user.uuid) };

    let order = state
        .app
        .orders
        .get_order(scope, uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
