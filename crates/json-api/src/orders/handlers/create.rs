//! Place Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::{
    data::{PaymentMethod, PlaceOrder, ShippingInput},
    records::{AddressSnapshot, OrderUuid},
};

use crate::{extensions::*, orders::errors::into_status_error, state::State};

use super::get::OrderResponse;

/// Inline shipping address, captured verbatim onto the order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShippingAddressRequest {
    pub line1: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Place Order Request. Ships either to a saved address or to an
/// inline one, never both.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PlaceOrderRequest {
    /// A saved address to ship to
    pub address_uuid: Option<Uuid>,

    /// A one-off address to ship to
    pub shipping: Option<ShippingAddressRequest>,

    pub coupon_code: Option<String>,

    /// `cod` or `prepaid`
    pub payment_method: String,
}

/// Place Order Handler
///
/// Turns the caller's cart into an order. Stock is reserved, any
/// coupon is redeemed and the cart is cleared in one transaction.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::CONFLICT, description = "Out of stock or payment method unavailable"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<PlaceOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;
    let request = json.into_inner();

    let payment_method = PaymentMethod::parse(&request.payment_method)
        .ok_or_else(|| StatusError::bad_request().brief("Unknown payment method"))?;

    let shipping = match (request.address_uuid, request.shipping) {
        (Some(address), None) => ShippingInput::ByReference(address.into()),
        (None, Some(address)) => ShippingInput::Inline(AddressSnapshot {
            line1: address.line1,
            city: address.city,
            postal_code: address.postal_code,
            country: address.country,
        }),
        _ => {
            return Err(StatusError::bad_request()
                .brief("Provide exactly one of address_uuid or shipping"));
        }
    };

    let order = state
        .app
        .orders
        .place_order(
            user.uuid,
            PlaceOrder {
                uuid: OrderUuid::new(),
                shipping,
                coupon_code: request.coupon_code,
                payment_method,
            },
        )
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use storefront_app::domain::orders::{
        MockOrdersService, OrdersServiceError, records::OrderUuid,
    };
    use testresult::TestResult;

    use crate::test_helpers::{MockApp, TEST_USER, make_order, user_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        user_service(
            MockApp {
                orders,
                ..MockApp::default()
            },
            Router::with_path("orders").post(handler),
        )
    }

    #[tokio::test]
    async fn test_place_order_with_inline_address_returns_201() -> TestResult {
        let uuid = OrderUuid::new();
        let order = make_order(uuid, TEST_USER.uuid);

        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .withf(|user, request| {
                *user == TEST_USER.uuid
                    && request.payment_method == PaymentMethod::Cod
                    && matches!(&request.shipping, ShippingInput::Inline(address)
                        if address.city == "London")
            })
            .return_once(move |_, _| Ok(order));

        let mut res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "shipping": {
                    "line1": "1 High Street",
                    "city": "London",
                    "postal_code": "N1 1AA",
                    "country": "GB",
                },
                "payment_method": "cod",
            }))
            .send(&make_service(orders))
            .await;

        let body: OrderResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/orders/{uuid}").as_str()));
        assert_eq!(body.total, 250);

        Ok(())
    }

    #[tokio::test]
    async fn test_place_order_with_saved_address_forwards_reference() -> TestResult {
        let uuid = OrderUuid::new();
        let address = Uuid::now_v7();
        let order = make_order(uuid, TEST_USER.uuid);

        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .withf(move |_, request| {
                matches!(request.shipping, ShippingInput::ByReference(a)
                    if a == address.into())
            })
            .return_once(move |_, _| Ok(order));

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({ "address_uuid": address, "payment_method": "prepaid" }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        Ok(())
    }

    #[tokio::test]
    async fn test_place_order_with_both_addresses_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_place_order().never();

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "address_uuid": Uuid::now_v7(),
                "shipping": {
                    "line1": "1 High Street",
                    "city": "London",
                    "postal_code": "N1 1AA",
                    "country": "GB",
                },
                "payment_method": "cod",
            }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_place_order_unknown_payment_method_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_place_order().never();

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "shipping": {
                    "line1": "1 High Street",
                    "city": "London",
                    "postal_code": "N1 1AA",
                    "country": "GB",
                },
                "payment_method": "barter",
            }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_place_order_empty_cart_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::EmptyCart));

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "shipping": {
                    "line1": "1 High Street",
                    "city": "London",
                    "postal_code": "N1 1AA",
                    "country": "GB",
                },
                "payment_method": "cod",
            }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_place_order_cod_disabled_returns_409() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::CodDisabled));

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "shipping": {
                    "line1": "1 High Street",
                    "city": "London",
                    "postal_code": "N1 1AA",
                    "country": "GB",
                },
                "payment_method": "cod",
            }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
