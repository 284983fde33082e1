//! Update Settings Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::settings::data::SettingsUpdate;

use crate::{extensions::*, settings::errors::into_status_error, state::State};

use super::get::SettingsResponse;

/// Update Settings Request. Absent fields keep their current value.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateSettingsRequest {
    pub flat_shipping_rate: Option<u64>,
    pub free_shipping_threshold: Option<u64>,
    pub cod_enabled: Option<bool>,
}

/// Update Settings Handler
///
/// Partially updates store configuration. Admin only.
#[endpoint(
    tags("settings"),
    summary = "Update Settings",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Settings updated"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateSettingsRequest>,
    depot: &mut Depot,
) -> Result<Json<SettingsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let _admin = depot.admin_or_403()?;
    let request = json.into_inner();

    let settings = state
        .app
        .settings
        .update_settings(SettingsUpdate {
            flat_shipping_rate: request.flat_shipping_rate,
            free_shipping_threshold: request.free_shipping_threshold,
            cod_enabled: request.cod_enabled,
        })
        .await
        .map_err(into_status_error)?;

    Ok(Json(settings.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use storefront_app::domain::settings::{MockSettingsService, records::StoreSettings};
    use testresult::TestResult;

    use crate::test_helpers::{MockApp, admin_service, user_service};

    use super::*;

    fn route() -> Router {
        Router::with_path("settings").put(handler)
    }

    #[tokio::test]
    async fn test_update_flips_cod_flag() -> TestResult {
        let mut settings = MockSettingsService::new();

        settings
            .expect_update_settings()
            .once()
            .withf(|update| {
                update.cod_enabled == Some(true) && update.flat_shipping_rate.is_none()
            })
            .return_once(|_| {
                Ok(StoreSettings {
                    flat_shipping_rate: 50,
                    free_shipping_threshold: 999,
                    cod_enabled: true,
                    updated_at: Timestamp::UNIX_EPOCH,
                })
            });

        let service = admin_service(
            MockApp {
                settings,
                ..MockApp::default()
            },
            route(),
        );

        let mut res = TestClient::put("http://example.com/settings")
            .json(&json!({ "cod_enabled": true }))
            .send(&service)
            .await;

        let body: SettingsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.cod_enabled);

        Ok(())
    }

    #[tokio::test]
    async fn test_non_admin_gets_403() -> TestResult {
        let mut settings = MockSettingsService::new();

        settings.expect_update_settings().never();

        let service = user_service(
            MockApp {
                settings,
                ..MockApp::default()
            },
            route(),
        );

        let res = TestClient::put("http://example.com/settings")
            .json(&json!({ "cod_enabled": true }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
