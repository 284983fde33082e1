//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::records::{Cart, CartItem};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    pub product_uuid: Uuid,

    /// Product name at the time of listing
    pub name: String,

    /// Unit price the line was added at, in minor currency units
    pub unit_price: u64,

    pub quantity: u32,

    /// `unit_price * quantity`
    pub line_total: u64,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        let line_total = item.line_total();

        CartItemResponse {
            product_uuid: item.product_uuid.into_uuid(),
            name: item.name,
            unit_price: item.unit_price,
            quantity: item.quantity,
            line_total,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    pub items: Vec<CartItemResponse>,

    /// Sum of all line totals, in minor currency units
    pub subtotal: u64,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        CartResponse {
            subtotal: cart.subtotal,
            items: cart.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Get Cart Handler
///
/// Returns the caller's cart. Users without a cart see an empty one.
#[endpoint(tags("cart"), summary = "Get Cart", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(user.uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::domain::carts::{MockCartsService, records::Cart};
    use testresult::TestResult;

    use crate::test_helpers::{MockApp, TEST_USER, user_service};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        user_service(
            MockApp {
                carts,
                ..MockApp::default()
            },
            Router::with_path("cart").get(handler),
        )
    }

    #[tokio::test]
    async fn test_get_cart_scopes_to_caller() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .withf(|user| *user == TEST_USER.uuid)
            .return_once(|_| Ok(Cart::from_items(Vec::new())));

        let mut res = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.items.is_empty());
        assert_eq!(body.subtotal, 0);

        Ok(())
    }
}
