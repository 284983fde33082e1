//! List All Orders Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{extensions::*, orders::errors::into_status_error, state::State};

use super::index::OrdersResponse;

/// List All Orders Handler
///
/// Every order in the store, newest first. Admin only.
#[endpoint(
    tags("orders"),
    summary = "List All Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Orders listed"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let _admin = depot.admin_or_403()?;

    let orders = state
        .app
        .orders
        .list_all_orders()
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrdersResponse {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::domain::orders::{MockOrdersService, records::OrderUuid};
    use testresult::TestResult;

    use crate::test_helpers::{MockApp, TEST_USER, admin_service, make_order, user_service};

    use super::*;

    fn route() -> Router {
        Router::with_path("admin/orders").get(handler)
    }

    #[tokio::test]
    async fn test_admin_sees_every_order() -> TestResult {
        let first = OrderUuid::new();
        let second = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders.expect_list_all_orders().once().return_once(move || {
            Ok(vec![
                make_order(first, TEST_USER.uuid),
                make_order(second, TEST_USER.uuid),
            ])
        });

        let service = admin_service(
            MockApp {
                orders,
                ..MockApp::default()
            },
            route(),
        );

        let mut res = TestClient::get("http://example.com/admin/orders")
            .send(&service)
            .await;

        let body: OrdersResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.orders.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_non_admin_gets_403() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_list_all_orders().never();

        let service = user_service(
            MockApp {
                orders,
                ..MockApp::default()
            },
            route(),
        );

        let res = TestClient::get("http://example.com/admin/orders")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
