//! Cart Errors

use salvo::http::StatusError;
use storefront_app::domain::carts::CartsServiceError;
use tracing::error;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::ProductNotFound => StatusError::not_found().brief("Product not found"),
        CartsServiceError::ItemNotFound => StatusError::not_found().brief("Item not in cart"),
        CartsServiceError::ProductUnavailable => {
            StatusError::conflict().brief("Product is not available for purchase")
        }
        CartsServiceError::InsufficientStock => {
            StatusError::conflict().brief("Not enough stock available")
        }
        CartsServiceError::InvalidQuantity => {
            StatusError::bad_request().brief("Quantity must be greater than zero")
        }
        CartsServiceError::MissingRequiredData | CartsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid cart payload")
        }
        CartsServiceError::Sql(source) => {
            error!("cart storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
