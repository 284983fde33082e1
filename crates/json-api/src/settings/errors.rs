//! Settings Errors

use salvo::http::StatusError;
use storefront_app::domain::settings::SettingsServiceError;
use tracing::error;

pub(crate) fn into_status_error(error: SettingsServiceError) -> StatusError {
    match error {
        SettingsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid settings payload")
        }
        SettingsServiceError::Sql(source) => {
            error!("settings storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
