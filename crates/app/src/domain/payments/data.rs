//! Payments Data

use zeroize::Zeroizing;

/// Gateway credentials. The secret signs callback verification and
/// authenticates API calls; it never reaches the database.
#[derive(Clone)]
pub struct PaymentCredentials {
    pub key_id: String,
    pub key_secret: Zeroizing<String>,
}

impl PaymentCredentials {
    #[must_use]
    pub fn new(key_id: String, key_secret: String) -> Self {
        Self {
            key_id,
            key_secret: Zeroizing::new(key_secret),
        }
    }
}

impl std::fmt::Debug for PaymentCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentCredentials")
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .finish()
    }
}

/// Data handed to the browser to open the provider's checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInitiation {
    pub provider_order_id: String,
    pub amount: u64,
    pub key_id: String,
}

/// Callback payload from the provider after the buyer pays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyPayment {
    pub provider_order_id: String,
    pub provider_payment_id: String,
    pub signature: String,
}
