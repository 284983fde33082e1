//! Orders service.
//!
//! Checkout runs inside one transaction: stock reservation, coupon
//! redemption, the order insert and the cart clear commit or roll back
//! together.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::warn;

use crate::{
    database::Db,
    domain::{
        addresses::PgAddressesRepository,
        carts::{PgCartItemsRepository, PgCartsRepository},
        coupons::{PgCouponsRepository, redeem_coupon},
        notifications::{NotificationDispatcher, data::OrderEvent},
        orders::{
            data::{PaymentMethod, PlaceOrder, ShippingInput},
            errors::OrdersServiceError,
            pricing,
            records::{AddressSnapshot, Order, OrderStatus, OrderUuid},
            repository::{NewOrderRow, PgOrdersRepository},
        },
        products::PgProductsRepository,
        settings::PgSettingsRepository,
        users::records::UserUuid,
    },
};

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
    addresses_repository: PgAddressesRepository,
    coupons_repository: PgCouponsRepository,
    settings_repository: PgSettingsRepository,
    dispatcher: Arc<dyn NotificationDispatcher>,
}

impl std::fmt::Debug for PgOrdersService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgOrdersService").finish_non_exhaustive()
    }
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
            addresses_repository: PgAddressesRepository::new(),
            coupons_repository: PgCouponsRepository::new(),
            settings_repository: PgSettingsRepository::new(),
            dispatcher,
        }
    }

    async fn notify(&self, user: UserUuid, event: OrderEvent) {
        if let Err(error) = self.dispatcher.order_event(user, event).await {
            warn!(%error, "failed to record order notification");
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn place_order(
        &self,
        user: UserUuid,
        request: PlaceOrder,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let cart_items = self.items_repository.list_items(&mut tx, user).await?;

        if cart_items.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let subtotal: u64 = cart_items.iter().map(|item| item.line_total()).sum();

        let shipping = match &request.shipping {
            ShippingInput::ByReference(address) => self
                .addresses_repository
                .get_address(&mut tx, user, *address)
                .await?
                .map(|address| AddressSnapshot {
                    line1: address.line1,
                    city: address.city,
                    postal_code: address.postal_code,
                    country: address.country,
                })
                .ok_or(OrdersServiceError::InvalidAddress)?,
            ShippingInput::Inline(snapshot) => snapshot.clone(),
        };

        let discount = match &request.coupon_code {
            Some(code) => redeem_coupon(&mut tx, &self.coupons_repository, code, subtotal).await?,
            None => 0,
        };

        let settings = self.settings_repository.get_settings(&mut tx).await?;

        if request.payment_method == PaymentMethod::Cod && !settings.cod_enabled {
            return Err(OrdersServiceError::CodDisabled);
        }

        let delivery_charge = pricing::delivery_charge(subtotal - discount, &settings);
        let total = pricing::order_total(subtotal, discount, delivery_charge);

        for item in &cart_items {
            let reserved = self
                .products_repository
                .reserve_stock(&mut tx, item.product_uuid, item.quantity)
                .await?;

            if !reserved {
                return Err(OrdersServiceError::InsufficientStock {
                    product: item.product_uuid,
                });
            }
        }

        let mut order = self
            .repository
            .insert_order(
                &mut tx,
                NewOrderRow {
                    uuid: request.uuid,
                    user,
                    subtotal,
                    discount,
                    coupon_code: request.coupon_code.as_deref(),
                    delivery_charge,
                    total,
                    payment_method: request.payment_method.as_str(),
                    shipping: &shipping,
                },
            )
            .await?;

        for item in &cart_items {
            self.repository
                .insert_item(
                    &mut tx,
                    order.uuid,
                    item.product_uuid,
                    &item.name,
                    item.unit_price,
                    item.quantity,
                )
                .await?;
        }

        self.carts_repository.clear_cart(&mut tx, user).await?;

        order.items = self.repository.list_items(&mut tx, order.uuid).await?;

        tx.commit().await?;

        self.notify(user, OrderEvent::Placed { order: order.uuid })
            .await;

        Ok(order)
    }

    async fn get_order(
        &self,
        scope: Option<UserUuid>,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut order = self.repository.get_order(&mut tx, order, scope).await?;
        order.items = self.repository.list_items(&mut tx, order.uuid).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut orders = self.repository.list_orders(&mut tx, user).await?;
        self.repository.attach_items(&mut tx, &mut orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn list_all_orders(&self) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut orders = self.repository.list_all_orders(&mut tx).await?;
        self.repository.attach_items(&mut tx, &mut orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn cancel_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .transition_status(&mut tx, order, OrderStatus::Cancelled, Some(user))
            .await?;

        if rows_affected == 0 {
            let current = self.repository.get_order(&mut tx, order, Some(user)).await?;

            // A repeated cancel is a no-op, not an error.
            if current.status == OrderStatus::Cancelled {
                return Ok(());
            }

            return Err(OrdersServiceError::InvalidTransition {
                from: current.status,
                to: OrderStatus::Cancelled,
            });
        }

        let items = self.repository.list_items(&mut tx, order).await?;

        for item in &items {
            self.products_repository
                .release_stock(&mut tx, item.product_uuid, item.quantity)
                .await?;
        }

        tx.commit().await?;

        self.notify(user, OrderEvent::Cancelled { order }).await;

        Ok(())
    }

    async fn update_status(
        &self,
        order: OrderUuid,
        to: OrderStatus,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .transition_status(&mut tx, order, to, None)
            .await?;

        if rows_affected == 0 {
            let current = self.repository.get_order(&mut tx, order, None).await?;

            return Err(OrdersServiceError::InvalidTransition {
                from: current.status,
                to,
            });
        }

        if to == OrderStatus::Cancelled {
            let items = self.repository.list_items(&mut tx, order).await?;

            for item in &items {
                self.products_repository
                    .release_stock(&mut tx, item.product_uuid, item.quantity)
                    .await?;
            }
        }

        let mut updated = self.repository.get_order(&mut tx, order, None).await?;
        updated.items = self.repository.list_items(&mut tx, order).await?;

        tx.commit().await?;

        let event = match to {
            OrderStatus::Cancelled => OrderEvent::Cancelled { order },
            status => OrderEvent::StatusChanged { order, status },
        };
        self.notify(updated.user_uuid, event).await;

        Ok(updated)
    }

    async fn request_return(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .transition_status(&mut tx, order, OrderStatus::ReturnRequested, Some(user))
            .await?;

        if rows_affected == 0 {
            let current = self.repository.get_order(&mut tx, order, Some(user)).await?;

            return Err(OrdersServiceError::InvalidTransition {
                from: current.status,
                to: OrderStatus::ReturnRequested,
            });
        }

        tx.commit().await?;

        self.notify(
            user,
            OrderEvent::StatusChanged {
                order,
                status: OrderStatus::ReturnRequested,
            },
        )
        .await;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turn the user's cart into an order. Reserves stock, redeems any
    /// coupon and clears the cart atomically.
    async fn place_order(
        &self,
        user: UserUuid,
        request: PlaceOrder,
    ) -> Result<Order, OrdersServiceError>;

    /// Fetch one order. `scope` restricts the read to that user's own
    /// orders; `None` is the admin view.
    async fn get_order(
        &self,
        scope: Option<UserUuid>,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError>;

    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError>;

    /// Every order in the store. Admin only.
    async fn list_all_orders(&self) -> Result<Vec<Order>, OrdersServiceError>;

    /// Buyer-initiated cancellation. Legal until the order ships;
    /// reserved stock goes back on the shelf.
    async fn cancel_order(&self, user: UserUuid, order: OrderUuid)
    -> Result<(), OrdersServiceError>;

    /// Admin fulfilment transition. Moving to `Cancelled` releases
    /// stock; moving to `Delivered` stamps the delivery time.
    async fn update_status(
        &self,
        order: OrderUuid,
        to: OrderStatus,
    ) -> Result<Order, OrdersServiceError>;

    /// Buyer asks to return a delivered order.
    async fn request_return(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<(), OrdersServiceError>;
}
