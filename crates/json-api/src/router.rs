//! App Router

use salvo::Router;

use crate::{
    addresses, auth, carts, coupons, notifications, orders, payments, products, reviews, settings,
    wishlist,
};

/// Authenticated API routes.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{uuid}")
                        .get(products::get::handler)
                        .put(products::update::handler)
                        .delete(products::delete::handler)
                        .push(
                            Router::with_path("reviews")
                                .get(reviews::index::handler)
                                .post(reviews::create::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .delete(carts::clear::handler)
                .push(
                    Router::with_path("items")
                        .post(carts::add_item::handler)
                        .push(
                            Router::with_path("{product}")
                                .put(carts::update_item::handler)
                                .delete(carts::remove_item::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(
                    Router::with_path("{uuid}")
                        .get(orders::get::handler)
                        .push(Router::with_path("cancel").post(orders::cancel::handler))
                        .push(Router::with_path("return").post(orders::request_return::handler))
                        .push(Router::with_path("payment").post(payments::initiate::handler)),
                ),
        )
        .push(
            Router::with_path("admin/orders")
                .get(orders::index_all::handler)
                .push(Router::with_path("{uuid}/status").put(orders::update_status::handler)),
        )
        .push(
            Router::with_path("coupons")
                .get(coupons::index::handler)
                .post(coupons::create::handler)
                .push(Router::with_path("preview").post(coupons::preview::handler))
                .push(
                    Router::with_path("{uuid}")
                        .get(coupons::get::handler)
                        .put(coupons::update::handler)
                        .delete(coupons::delete::handler),
                ),
        )
        .push(Router::with_path("payments/verify").post(payments::verify::handler))
        .push(
            Router::with_path("addresses")
                .get(addresses::index::handler)
                .post(addresses::create::handler)
                .push(Router::with_path("{uuid}").delete(addresses::delete::handler)),
        )
        .push(
            Router::with_path("settings")
                .get(settings::get::handler)
                .put(settings::update::handler),
        )
        .push(
            Router::with_path("notifications")
                .get(notifications::index::handler)
                .push(Router::with_path("{uuid}/read").post(notifications::mark_read::handler)),
        )
        .push(
            Router::with_path("wishlist")
                .get(wishlist::index::handler)
                .post(wishlist::add::handler)
                .push(Router::with_path("{product}").delete(wishlist::remove::handler)),
        )
}
