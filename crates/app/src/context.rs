//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        addresses::{AddressesService, PgAddressesService},
        carts::{CartsService, PgCartsService},
        coupons::{CouponsService, PgCouponsService},
        notifications::{NotificationsService, PgNotificationsService},
        orders::{OrdersService, PgOrdersService},
        payments::{PaymentsService, PgPaymentsService, RazorpayClient, data::PaymentCredentials},
        products::{PgProductsService, ProductsService},
        reviews::{PgReviewsService, ReviewsService},
        settings::{PgSettingsService, SettingsService},
        users::{PgUsersService, UsersService},
        wishlists::{PgWishlistsService, WishlistsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub addresses: Arc<dyn AddressesService>,
    pub auth: Arc<dyn AuthService>,
    pub carts: Arc<dyn CartsService>,
    pub coupons: Arc<dyn CouponsService>,
    pub notifications: Arc<dyn NotificationsService>,
    pub orders: Arc<dyn OrdersService>,
    pub payments: Arc<dyn PaymentsService>,
    pub products: Arc<dyn ProductsService>,
    pub reviews: Arc<dyn ReviewsService>,
    pub settings: Arc<dyn SettingsService>,
    pub users: Arc<dyn UsersService>,
    pub wishlists: Arc<dyn WishlistsService>,
}

impl AppContext {
    /// Build application context from a database URL and payment
    /// gateway credentials.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        payment_credentials: PaymentCredentials,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        let notifications = Arc::new(PgNotificationsService::new(db.clone()));
        let gateway = Arc::new(RazorpayClient::new(payment_credentials.clone()));

        Ok(Self {
            addresses: Arc::new(PgAddressesService::new(db.clone())),
            auth: Arc::new(PgAuthService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            coupons: Arc::new(PgCouponsService::new(db.clone())),
            notifications: notifications.clone(),
            orders: Arc::new(PgOrdersService::new(db.clone(), notifications.clone())),
            payments: Arc::new(PgPaymentsService::new(
                db.clone(),
                gateway,
                payment_credentials,
                notifications,
            )),
            products: Arc::new(PgProductsService::new(db.clone())),
            reviews: Arc::new(PgReviewsService::new(db.clone())),
            settings: Arc::new(PgSettingsService::new(db.clone())),
            users: Arc::new(PgUsersService::new(db.clone())),
            wishlists: Arc::new(PgWishlistsService::new(db)),
        })
    }
}
