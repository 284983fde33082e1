//! List Wishlist Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::wishlists::records::WishlistItem;

use crate::{extensions::*, state::State, wishlist::errors::into_status_error};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WishlistItemResponse {
    pub product_uuid: Uuid,
    pub name: String,

    /// Current price after the product's discount
    pub final_price: u64,

    pub status: String,
    pub added_at: String,
}

impl From<WishlistItem> for WishlistItemResponse {
    fn from(item: WishlistItem) -> Self {
        WishlistItemResponse {
            product_uuid: item.product_uuid.into_uuid(),
            name: item.name,
            final_price: item.final_price,
            status: item.status.as_str().to_string(),
            added_at: item.added_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WishlistResponse {
    pub items: Vec<WishlistItemResponse>,
}

/// List Wishlist Handler
///
/// Returns the current user's wishlist with live pricing.
#[endpoint(
    tags("wishlist"),
    summary = "List Wishlist",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<WishlistResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let items = state
        .app
        .wishlists
        .list_items(user.uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(WishlistResponse {
        items: items.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::domain::{
        products::records::{ProductStatus, ProductUuid},
        wishlists::MockWishlistsService,
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
            Router::with_path("wishlist").get(handler),
        )
    }

    #[tokio::test]
    async fn test_index_returns_current_pricing() -> TestResult {
        let product = ProductUuid::new();

        let mut wishlists = MockWishlistsService::new();

        wishlists
            .expect_list_items()
            .once()
            .withf(|user| *user == TEST_USER.uuid)
            .return_once(move |_| {
                Ok(vec![WishlistItem {
                    product_uuid: product,
                    name: "Widget".to_string(),
                    final_price: 150,
                    status: ProductStatus::Available,
                    added_at: Timestamp::UNIX_EPOCH,
                }])
            });

        let mut res = TestClient::get("http://example.com/wishlist")
            .send(&make_service(wishlists))
            .await;

        let body: WishlistResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.items.len(), 1);
        assert_eq!(body.items[0].final_price, 150);
        assert_eq!(body.items[0].status, "available");

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_wishlist_returns_no_items() -> TestResult {
        let mut wishlists = MockWishlistsService::new();

        wishlists
            .expect_list_items()
            .once()
            .return_once(|_| Ok(Vec::new()));

        let mut res = TestClient::get("http://example.com/wishlist")
            .send(&make_service(wishlists))
            .await;

        let body: WishlistResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.items.is_empty());

        Ok(())
    }
}
