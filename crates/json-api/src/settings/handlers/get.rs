//! Get Settings Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use storefront_app::domain::settings::records::StoreSettings;

use crate::{extensions::*, settings::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SettingsResponse {
    /// Delivery charge below the free-shipping threshold, minor units
    pub flat_shipping_rate: u64,

    /// Payable subtotal at or above which delivery is free
    pub free_shipping_threshold: u64,

    /// Whether cash on delivery is accepted
    pub cod_enabled: bool,

    pub updated_at: String,
}

impl From<StoreSettings> for SettingsResponse {
    fn from(settings: StoreSettings) -> Self {
        SettingsResponse {
            flat_shipping_rate: settings.flat_shipping_rate,
            free_shipping_threshold: settings.free_shipping_threshold,
            cod_enabled: settings.cod_enabled,
            updated_at: settings.updated_at.to_string(),
        }
    }
}

/// Get Settings Handler
///
/// Current store configuration, as used by checkout.
#[endpoint(
    tags("settings"),
    summary = "Get Settings",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<SettingsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let _user = depot.current_user_or_401()?;

    let settings = state
        .app
        .settings
        .get_settings()
        .await
        .map_err(into_status_error)?;

    Ok(Json(settings.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use storefront_app::domain::settings::MockSettingsService;
    use testresult::TestResult;

    use crate::test_helpers::{MockApp, user_service};

    use super::*;

    #[tokio::test]
    async fn test_get_settings_returns_rates() -> TestResult {
        let mut settings = MockSettingsService::new();

        settings.expect_get_settings().once().return_once(|| {
            Ok(StoreSettings {
                flat_shipping_rate: 50,
                free_shipping_threshold: 999,
                cod_enabled: true,
                updated_at: Timestamp::UNIX_EPOCH,
            })
        });

        let service = user_service(
            MockApp {
                settings,
                ..MockApp::default()
            },
            Router::with_path("settings").get(handler),
        );

        let mut res = TestClient::get("http://example.com/settings")
            .send(&service)
            .await;

        let body: SettingsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.flat_shipping_rate, 50);
        assert_eq!(body.free_shipping_threshold, 999);
        assert!(body.cod_enabled);

        Ok(())
    }
}
