//! List Coupons Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{coupons::errors::into_status_error, extensions::*, state::State};

use super::get::CouponResponse;

/// Coupon listing response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponsResponse {
    pub coupons: Vec<CouponResponse>,
}

/// List Coupons Handler
///
/// Returns every coupon. Admin only.
#[endpoint(
    tags("coupons"),
    summary = "List Coupons",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CouponsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let _admin = depot.admin_or_403()?;

    let coupons = state
        .app
        .coupons
        .list_coupons()
        .await
        .map_err(into_status_error)?;

    Ok(Json(CouponsResponse {
        coupons: coupons.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::domain::coupons::{MockCouponsService, records::CouponUuid};
    use testresult::TestResult;

    use crate::test_helpers::{MockApp, admin_service, make_coupon, user_service};

    use super::*;

    fn route() -> Router {
        Router::with_path("coupons").get(handler)
    }

    #[tokio::test]
    async fn test_index_returns_coupons() -> TestResult {
        let uuid = CouponUuid::new();

        let mut coupons = MockCouponsService::new();

        coupons
            .expect_list_coupons()
            .once()
            .return_once(move || Ok(vec![make_coupon(uuid, "SAVE10")]));

        let service = admin_service(
            MockApp {
                coupons,
                ..MockApp::default()
            },
            route(),
        );

        let mut res = TestClient::get("http://example.com/coupons")
            .send(&service)
            .await;

        let body: CouponsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.coupons.len(), 1);
        assert_eq!(body.coupons[0].code, "SAVE10");

        Ok(())
    }

    #[tokio::test]
    async fn test_non_admin_gets_403() -> TestResult {
        let mut coupons = MockCouponsService::new();

        coupons.expect_list_coupons().never();

        let service = user_service(
            MockApp {
                coupons,
                ..MockApp::default()
            },
            route(),
        );

        let res = TestClient::get("http://example.com/coupons")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
