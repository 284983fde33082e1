//! Initiate Payment Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{extensions::*, payments::errors::into_status_error, state::State};

/// Everything the browser needs to open the provider's checkout.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentInitiationResponse {
    /// Provider-side order identifier
    pub provider_order_id: String,

    /// Amount due, in minor currency units
    pub amount: u64,

    /// Public key id for the provider's checkout widget
    pub key_id: String,
}

/// Initiate Payment Handler
///
/// Creates (or reuses) a provider-side order for a prepaid checkout.
#[endpoint(
    tags("payments"),
    summary = "Initiate Payment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Checkout parameters"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order is already paid"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment gateway unavailable"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<PaymentInitiationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let initiation = state
        .app
        .payments
        .initiate_payment(user.uuid, uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(PaymentInitiationResponse {
        provider_order_id: initiation.provider_order_id,
        amount: initiation.amount,
        key_id: initiation.key_id,
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::domain::{
        orders::records::OrderUuid,
        payments::{MockPaymentsService, PaymentsServiceError, data::PaymentInitiation},
    };
    use testresult::TestResult;

    use crate::test_helpers::{MockApp, TEST_USER, user_service};

    use super::*;

    fn make_service(payments: MockPaymentsService) -> Service {
        user_service(
            MockApp {
                payments,
                ..MockApp::default()
            },
            Router::with_path("orders/{uuid}/payment").post(handler),
        )
    }

    #[tokio::test]
    async fn test_initiate_returns_checkout_parameters() -> TestResult {
        let uuid = OrderUuid::new();

        let mut payments = MockPaymentsService::new();

        payments
            .expect_initiate_payment()
            .once()
            .withf(move |user, order| *user == TEST_USER.uuid && *order == uuid)
            .return_once(|_, _| {
                Ok(PaymentInitiation {
                    provider_order_id: "order_123".to_string(),
                    amount: 250,
                    key_id: "rzp_test_key".to_string(),
                })
            });

        let mut res = TestClient::post(format!("http://example.com/orders/{uuid}/payment"))
            .send(&make_service(payments))
            .await;

        let body: PaymentInitiationResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.provider_order_id, "order_123");
        assert_eq!(body.amount, 250);
        assert_eq!(body.key_id, "rzp_test_key");

        Ok(())
    }

    #[tokio::test]
    async fn test_initiate_on_paid_order_returns_409() -> TestResult {
        let uuid = OrderUuid::new();

        let mut payments = MockPaymentsService::new();

        payments
            .expect_initiate_payment()
            .once()
            .return_once(|_, _| Err(PaymentsServiceError::AlreadyPaid));

        let res = TestClient::post(format!("http://example.com/orders/{uuid}/payment"))
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_gateway_failure_returns_502() -> TestResult {
        let uuid = OrderUuid::new();

        let mut payments = MockPaymentsService::new();

        payments
            .expect_initiate_payment()
            .once()
            .return_once(|_, _| Err(PaymentsServiceError::OrderNotFound));

        let res = TestClient::post(format!("http://example.com/orders/{uuid}/payment"))
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
