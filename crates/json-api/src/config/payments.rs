//! Payment Gateway Config

use clap::Args;
use storefront_app::domain::payments::data::PaymentCredentials;

/// Payment gateway settings.
#[derive(Debug, Args)]
pub struct PaymentGatewayConfig {
    /// Razorpay key id, shared with the browser checkout
    #[arg(long, env = "RAZORPAY_KEY_ID")]
    pub razorpay_key_id: String,

    /// Razorpay key secret, used to verify payment callbacks
    #[arg(long, env = "RAZORPAY_KEY_SECRET", hide_env_values = true)]
    pub razorpay_key_secret: String,
}

impl PaymentGatewayConfig {
    #[must_use]
    pub fn credentials(&self) -> PaymentCredentials {
        PaymentCredentials::new(self.razorpay_key_id.clone(), self.razorpay_key_secret.clone())
    }
}
