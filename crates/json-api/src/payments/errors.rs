//! Payment Errors

use salvo::http::StatusError;
use storefront_app::domain::payments::PaymentsServiceError;
use tracing::error;

pub(crate) fn into_status_error(error: PaymentsServiceError) -> StatusError {
    match error {
        PaymentsServiceError::OrderNotFound => StatusError::not_found().brief("Order not found"),
        PaymentsServiceError::AlreadyPaid => {
            StatusError::conflict().brief("Order is already paid")
        }
        PaymentsServiceError::SignatureMismatch => {
            StatusError::bad_request().brief("Payment signature did not verify")
        }
        PaymentsServiceError::Gateway(source) => {
            error!("payment gateway request failed: {source}");

            StatusError::bad_gateway().brief("Payment gateway unavailable")
        }
        PaymentsServiceError::Sql(source) => {
            error!("payment storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
