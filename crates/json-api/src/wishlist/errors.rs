//! Wishlist Errors

use salvo::http::StatusError;
use storefront_app::domain::wishlists::WishlistsServiceError;
use tracing::error;

pub(crate) fn into_status_error(error: WishlistsServiceError) -> StatusError {
    match error {
        WishlistsServiceError::ProductNotFound => {
            StatusError::not_found().brief("Product not found")
        }
        WishlistsServiceError::ItemNotFound => {
            StatusError::not_found().brief("Item not on the wishlist")
        }
        WishlistsServiceError::Sql(source) => {
            error!("wishlist storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
