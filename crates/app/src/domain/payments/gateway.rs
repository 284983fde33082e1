//! Payment provider client.

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;
use serde_json::json;

use crate::domain::payments::{data::PaymentCredentials, errors::PaymentsServiceError};

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an order on the provider's side for `amount` minor units.
    /// Returns the provider's order id.
    async fn create_order(
        &self,
        amount: u64,
        receipt: &str,
    ) -> Result<String, PaymentsServiceError>;
}

/// Razorpay Orders API client.
#[derive(Debug, Clone)]
pub struct RazorpayClient {
    http: reqwest::Client,
    credentials: PaymentCredentials,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ProviderOrderResponse {
    id: String,
}

impl RazorpayClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.razorpay.com";

    #[must_use]
    pub fn new(credentials: PaymentCredentials) -> Self {
        Self::with_base_url(credentials, Self::DEFAULT_BASE_URL.to_string())
    }

    #[must_use]
    pub fn with_base_url(credentials: PaymentCredentials, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
            base_url,
        }
    }
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(
        &self,
        amount: u64,
        receipt: &str,
    ) -> Result<String, PaymentsServiceError> {
        let response = self
            .http
            .post(format!("{}/v1/orders", self.base_url))
            .basic_auth(
                &self.credentials.key_id,
                Some(self.credentials.key_secret.as_str()),
            )
            .json(&json!({
                "amount": amount,
                "currency": "INR",
                "receipt": receipt,
            }))
            .send()
            .await?
            .error_for_status()?;

        let order: ProviderOrderResponse = response.json().await?;

        Ok(order.id)
    }
}
