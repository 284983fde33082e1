//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Clear Cart Handler
///
/// Empties the caller's cart. Idempotent.
#[endpoint(tags("cart"), summary = "Clear Cart", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    state
        .app
        .carts
        .clear_cart(user.uuid)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use storefront_app::domain::carts::MockCartsService;
    use testresult::TestResult;

    use crate::test_helpers::{MockApp, TEST_USER, user_service};

    use super::*;

    #[tokio::test]
    async fn test_clear_cart_returns_200() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_clear_cart()
            .once()
            .withf(|user| *user == TEST_USER.uuid)
            .return_once(|_| Ok(()));

        let service = user_service(
            MockApp {
                carts,
                ..MockApp::default()
            },
            Router::with_path("cart").delete(handler),
        );

        let res = TestClient::delete("http://example.com/cart")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
