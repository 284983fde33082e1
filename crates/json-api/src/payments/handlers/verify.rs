//! Verify Payment Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::payments::data::VerifyPayment;

use crate::{extensions::*, payments::errors::into_status_error, state::State};

/// Provider callback payload, forwarded by the browser after checkout.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VerifyPaymentRequest {
    pub provider_order_id: String,
    pub provider_payment_id: String,
    pub signature: String,
}

/// Verify Payment Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
}

/// Verify Payment Handler
///
/// Checks the provider's signature and marks the order paid. Replays
/// of the same callback are harmless.
#[endpoint(
    tags("payments"),
    summary = "Verify Payment",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Payment confirmed"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown provider order"),
        (status_code = StatusCode::BAD_REQUEST, description = "Signature did not verify"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<VerifyPaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<VerifyPaymentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let _user = depot.current_user_or_401()?;
    let request = json.into_inner();

    state
        .app
        .payments
        .verify_payment(VerifyPayment {
            provider_order_id: request.provider_order_id,
            provider_payment_id: request.provider_payment_id,
            signature: request.signature,
        })
        .await
        .map_err(into_status_error)?;

    Ok(Json(VerifyPaymentResponse {
        success: true,
        message: "Payment verified".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use storefront_app::domain::payments::{MockPaymentsService, PaymentsServiceError};
    use testresult::TestResult;

    use crate::test_helpers::{MockApp, user_service};

    use super::*;

    fn make_service(payments: MockPaymentsService) -> Service {
        user_service(
            MockApp {
                payments,
                ..MockApp::default()
            },
            Router::with_path("payments/verify").post(handler),
        )
    }

    #[tokio::test]
    async fn test_valid_callback_returns_success() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_verify_payment()
            .once()
            .withf(|payment| {
                payment.provider_order_id == "order_123"
                    && payment.provider_payment_id == "pay_456"
            })
            .return_once(|_| Ok(()));

        let mut res = TestClient::post("http://example.com/payments/verify")
            .json(&json!({
                "provider_order_id": "order_123",
                "provider_payment_id": "pay_456",
                "signature": "deadbeef",
            }))
            .send(&make_service(payments))
            .await;

        let body: VerifyPaymentResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.success);

        Ok(())
    }

    #[tokio::test]
    async fn test_tampered_callback_returns_400() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_verify_payment()
            .once()
            .return_once(|_| Err(PaymentsServiceError::SignatureMismatch));

        let res = TestClient::post("http://example.com/payments/verify")
            .json(&json!({
                "provider_order_id": "order_123",
                "provider_payment_id": "pay_456",
                "signature": "forged",
            }))
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_provider_order_returns_404() -> TestResult {
        let mut payments = MockPaymentsService::new();

        payments
            .expect_verify_payment()
            .once()
            .return_once(|_| Err(PaymentsServiceError::OrderNotFound));

        let res = TestClient::post("http://example.com/payments/verify")
            .json(&json!({
                "provider_order_id": "order_999",
                "provider_payment_id": "pay_456",
                "signature": "deadbeef",
            }))
            .send(&make_service(payments))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
