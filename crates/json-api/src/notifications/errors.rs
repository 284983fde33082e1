//! Notification Errors

use salvo::http::StatusError;
use storefront_app::domain::notifications::NotificationsServiceError;
use tracing::error;

pub(crate) fn into_status_error(error: NotificationsServiceError) -> StatusError {
    match error {
        NotificationsServiceError::NotFound => {
            StatusError::not_found().brief("Notification not found")
        }
        NotificationsServiceError::InvalidRecipient => {
            StatusError::bad_request().brief("Invalid recipient")
        }
        NotificationsServiceError::Sql(source) => {
            error!("notification storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
