//! Payments service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::warn;
use zeroize::Zeroizing;

use crate::{
    database::Db,
    domain::{
        notifications::{NotificationDispatcher, data::OrderEvent},
        orders::{
            PgOrdersRepository,
            records::{OrderUuid, PaymentStatus},
        },
        payments::{
            data::{PaymentCredentials, PaymentInitiation, VerifyPayment},
            errors::PaymentsServiceError,
            gateway::PaymentGateway,
            signature,
        },
        users::records::UserUuid,
    },
};

#[derive(Clone)]
pub struct PgPaymentsService {
    db: Db,
    orders_repository: PgOrdersRepository,
    gateway: Arc<dyn PaymentGateway>,
    key_id: String,
    key_secret: Zeroizing<String>,
    dispatcher: Arc<dyn NotificationDispatcher>,
}

impl std::fmt::Debug for PgPaymentsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgPaymentsService")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl PgPaymentsService {
    #[must_use]
    pub fn new(
        db: Db,
        gateway: Arc<dyn PaymentGateway>,
        credentials: PaymentCredentials,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            gateway,
            key_id: credentials.key_id,
            key_secret: credentials.key_secret,
            dispatcher,
        }
    }
}

#[async_trait]
impl PaymentsService for PgPaymentsService {
    async fn initiate_payment(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<PaymentInitiation, PaymentsServiceError> {
        let mut tx = self.db.begin().await?;
        let existing = self
            .orders_repository
            .get_order(&mut tx, order, Some(user))
            .await?;
        tx.commit().await?;

        if existing.payment_status == PaymentStatus::Paid {
            return Err(PaymentsServiceError::AlreadyPaid);
        }

        // Re-initiating reuses the provider order already on file.
        if let Some(provider_order_id) = existing.provider_order_id {
            return Ok(PaymentInitiation {
                provider_order_id,
                amount: existing.total,
                key_id: self.key_id.clone(),
            });
        }

        let provider_order_id = self
            .gateway
            .create_order(existing.total, &existing.uuid.to_string())
            .await?;

        let mut tx = self.db.begin().await?;
        self.orders_repository
            .set_provider_order(&mut tx, order, &provider_order_id)
            .await?;
        tx.commit().await?;

        Ok(PaymentInitiation {
            provider_order_id,
            amount: existing.total,
            key_id: self.key_id.clone(),
        })
    }

    async fn verify_payment(&self, payment: VerifyPayment) -> Result<(), PaymentsServiceError> {
        let mut tx = self.db.begin().await?;

        self.orders_repository
            .find_by_provider_order(&mut tx, &payment.provider_order_id)
            .await?
            .ok_or(PaymentsServiceError::OrderNotFound)?;

        if !signature::verify(
            &self.key_secret,
            &payment.provider_order_id,
            &payment.provider_payment_id,
            &payment.signature,
        ) {
            return Err(PaymentsServiceError::SignatureMismatch);
        }

        let marked = self
            .orders_repository
            .mark_paid(
                &mut tx,
                &payment.provider_order_id,
                &payment.provider_payment_id,
            )
            .await?;

        tx.commit().await?;

        // A replayed valid callback finds the order already paid and
        // changes nothing.
        if let Some((order, user)) = marked {
            if let Err(error) = self
                .dispatcher
                .order_event(user, OrderEvent::PaymentConfirmed { order })
                .await
            {
                warn!(%error, "failed to record payment notification");
            }
        }

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Create (or reuse) a provider-side order for the checkout page.
    async fn initiate_payment(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<PaymentInitiation, PaymentsServiceError>;

    /// Verify a provider callback and mark the order paid. Safe to call
    /// more than once for the same payment.
    async fn verify_payment(&self, payment: VerifyPayment) -> Result<(), PaymentsServiceError>;
}

#[cfg(test)]
mod tests {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;
    use testresult::TestResult;

    use crate::{
        domain::{
            carts::CartsService,
            notifications::NotificationsService,
            orders::{
                OrdersService,
                data::{PaymentMethod, PlaceOrder, ShippingInput},
                records::AddressSnapshot,
            },
            payments::gateway::MockPaymentGateway,
        },
        test::TestContext,
    };

    use super::*;

    const SECRET: &str = "test_secret";

    fn sign(order: &str, payment: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(format!("{order}|{payment}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn credentials() -> PaymentCredentials {
        PaymentCredentials {
            key_id: "rzp_test_key".to_string(),
            key_secret: Zeroizing::new(SECRET.to_string()),
        }
    }

    fn payments_service(ctx: &TestContext, gateway: MockPaymentGateway) -> PgPaymentsService {
        PgPaymentsService::new(
            ctx.db.clone(),
            Arc::new(gateway),
            credentials(),
            ctx.dispatcher.clone(),
        )
    }

    async fn placed_order(ctx: &TestContext) -> OrderUuid {
        let product = ctx.create_product(100, 0, 5).await;
        ctx.carts.add_item(ctx.user, product, 2).await.unwrap();

        ctx.orders
            .place_order(
                ctx.user,
                PlaceOrder {
                    uuid: OrderUuid::new(),
                    shipping: ShippingInput::Inline(AddressSnapshot {
                        line1: "1 Main St".to_string(),
                        city: "Pune".to_string(),
                        postal_code: "411001".to_string(),
                        country: "IN".to_string(),
                    }),
                    coupon_code: None,
                    payment_method: PaymentMethod::Prepaid,
                },
            )
            .await
            .unwrap()
            .uuid
    }

    #[tokio::test]
    async fn initiating_creates_one_provider_order_and_reuses_it() -> TestResult {
        let ctx = TestContext::new().await;
        let order = placed_order(&ctx).await;

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_order()
            .times(1)
            .returning(|_, _| Ok("order_prov_1".to_string()));

        let payments = payments_service(&ctx, gateway);

        let first = payments.initiate_payment(ctx.user, order).await?;
        let second = payments.initiate_payment(ctx.user, order).await?;

        assert_eq!(first.provider_order_id, "order_prov_1");
        assert_eq!(first.amount, 250);
        assert_eq!(first.key_id, "rzp_test_key");
        assert_eq!(second, first);

        Ok(())
    }

    #[tokio::test]
    async fn a_valid_callback_marks_the_order_paid() -> TestResult {
        let ctx = TestContext::new().await;
        let order = placed_order(&ctx).await;

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_order()
            .returning(|_, _| Ok("order_prov_2".to_string()));

        let payments = payments_service(&ctx, gateway);
        payments.initiate_payment(ctx.user, order).await?;

        payments
            .verify_payment(VerifyPayment {
                provider_order_id: "order_prov_2".to_string(),
                provider_payment_id: "pay_1".to_string(),
                signature: sign("order_prov_2", "pay_1"),
            })
            .await?;

        let paid = ctx.orders.get_order(Some(ctx.user), order).await?;
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert!(paid.is_paid);
        assert!(paid.paid_at.is_some());
        assert_eq!(paid.provider_payment_id.as_deref(), Some("pay_1"));

        let inbox = ctx.notifications.list_notifications(ctx.user, false).await?;
        assert!(inbox.iter().any(|n| n.title == "Payment received"));

        Ok(())
    }

    #[tokio::test]
    async fn a_tampered_callback_changes_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let order = placed_order(&ctx).await;

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_order()
            .returning(|_, _| Ok("order_prov_3".to_string()));

        let payments = payments_service(&ctx, gateway);
        payments.initiate_payment(ctx.user, order).await?;

        let result = payments
            .verify_payment(VerifyPayment {
                provider_order_id: "order_prov_3".to_string(),
                provider_payment_id: "pay_1".to_string(),
                signature: sign("order_prov_3", "pay_other"),
            })
            .await;

        assert!(
            matches!(result, Err(PaymentsServiceError::SignatureMismatch)),
            "expected SignatureMismatch, got {result:?}"
        );

        let unpaid = ctx.orders.get_order(Some(ctx.user), order).await?;
        assert_eq!(unpaid.payment_status, PaymentStatus::Pending);
        assert!(unpaid.provider_payment_id.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn replayed_callbacks_are_idempotent() -> TestResult {
        let ctx = TestContext::new().await;
        let order = placed_order(&ctx).await;

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_order()
            .returning(|_, _| Ok("order_prov_4".to_string()));

        let payments = payments_service(&ctx, gateway);
        payments.initiate_payment(ctx.user, order).await?;

        let callback = VerifyPayment {
            provider_order_id: "order_prov_4".to_string(),
            provider_payment_id: "pay_1".to_string(),
            signature: sign("order_prov_4", "pay_1"),
        };

        payments.verify_payment(callback.clone()).await?;
        payments.verify_payment(callback).await?;

        let paid = ctx.orders.get_order(Some(ctx.user), order).await?;
        assert_eq!(paid.payment_status, PaymentStatus::Paid);

        // Only the first verification notified anyone.
        let inbox = ctx.notifications.list_notifications(ctx.user, false).await?;
        let confirmations = inbox.iter().filter(|n| n.title == "Payment received").count();
        assert_eq!(confirmations, 1);

        Ok(())
    }

    #[tokio::test]
    async fn callbacks_for_unknown_provider_orders_are_rejected() {
        let ctx = TestContext::new().await;

        let payments = payments_service(&ctx, MockPaymentGateway::new());

        let result = payments
            .verify_payment(VerifyPayment {
                provider_order_id: "order_unknown".to_string(),
                provider_payment_id: "pay_1".to_string(),
                signature: sign("order_unknown", "pay_1"),
            })
            .await;

        assert!(
            matches!(result, Err(PaymentsServiceError::OrderNotFound)),
            "expected OrderNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn paid_orders_cannot_be_reinitiated() -> TestResult {
        let ctx = TestContext::new().await;
        let order = placed_order(&ctx).await;

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_order()
            .returning(|_, _| Ok("order_prov_5".to_string()));

        let payments = payments_service(&ctx, gateway);
        payments.initiate_payment(ctx.user, order).await?;
        payments
            .verify_payment(VerifyPayment {
                provider_order_id: "order_prov_5".to_string(),
                provider_payment_id: "pay_1".to_string(),
                signature: sign("order_prov_5", "pay_1"),
            })
            .await?;

        let result = payments.initiate_payment(ctx.user, order).await;

        assert!(
            matches!(result, Err(PaymentsServiceError::AlreadyPaid)),
            "expected AlreadyPaid, got {result:?}"
        );

        Ok(())
    }
}
