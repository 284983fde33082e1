//! Add Wishlist Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, state::State, wishlist::errors::into_status_error};

/// Add Wishlist Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddWishlistItemRequest {
    pub product_uuid: Uuid,
}

/// Add Wishlist Item Handler
///
/// Puts a product on the current user's wishlist. Adding it again is a no-op.
#[endpoint(
    tags("wishlist"),
    summary = "Add Wishlist Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Item added"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddWishlistItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    state
        .app
        .wishlists
        .add_item(user.uuid, json.into_inner().product_uuid.into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use storefront_app::domain::{
        products::records::ProductUuid,
        wishlists::{MockWishlistsService, WishlistsServiceError},
    };
    use testresult::TestResult;

    use crate::test_helpers::{MockApp, TEST_USER, user_service};

    use super::*;

    fn make_service(wishlists: MockWishlistsService) -> Service {
        user_service(
            MockApp {
                wishlists,
                ..MockApp::default()
            },
            Router::with_path("wishlist").post(handler),
        )
    }

    #[tokio::test]
    async fn test_add_item_returns_204() -> TestResult {
        let product = ProductUuid::new();

        let mut wishlists = MockWishlistsService::new();

        wishlists
            .expect_add_item()
            .once()
            .withf(move |user, p| *user == TEST_USER.uuid && *p == product)
            .return_once(|_, _| Ok(()));

        let res = TestClient::post("http://example.com/wishlist")
            .json(&json!({ "product_uuid": product.into_uuid() }))
            .send(&make_service(wishlists))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_product_returns_404() -> TestResult {
        let mut wishlists = MockWishlistsService::new();

        wishlists
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(WishlistsServiceError::ProductNotFound));

        let res = TestClient::post("http://example.com/wishlist")
            .json(&json!({ "product_uuid": ProductUuid::new().into_uuid() }))
            .send(&make_service(wishlists))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
