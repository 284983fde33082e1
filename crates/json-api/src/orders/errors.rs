//! Order Errors

use salvo::http::StatusError;
use storefront_app::domain::orders::OrdersServiceError;
use tracing::error;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::EmptyCart => StatusError::bad_request().brief("Cart is empty"),
        OrdersServiceError::InvalidAddress => {
            StatusError::bad_request().brief("Unknown shipping address")
        }
        OrdersServiceError::InsufficientStock { product } => {
            StatusError::conflict().brief(format!("Not enough stock for product {product}"))
        }
        OrdersServiceError::Coupon(source) => {
            StatusError::bad_request().brief(format!("Coupon cannot be applied: {source}"))
        }
        OrdersServiceError::CodDisabled => {
            StatusError::conflict().brief("Cash on delivery is not available")
        }
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::InvalidTransition { from, to } => StatusError::conflict()
            .brief(format!("Order cannot move from {from:?} to {to:?}")),
        OrdersServiceError::MissingRequiredData | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
