//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    orders::records::{
        AddressSnapshot, Order, OrderItem, OrderItemUuid, OrderStatus, OrderUuid, PaymentStatus,
    },
    products::records::ProductUuid,
    users::records::UserUuid,
};

const INSERT_ORDER_SQL: &str = "\
INSERT INTO orders (\
    uuid, user_uuid, subtotal, discount, coupon_code, delivery_charge, total, \
    payment_method, ship_line1, ship_city, ship_postal_code, ship_country\
) \
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
RETURNING *";

const INSERT_ITEM_SQL: &str = "\
INSERT INTO order_items (uuid, order_uuid, product_uuid, name, unit_price, quantity) \
VALUES ($1, $2, $3, $4, $5, $6)";

// The optional user binding scopes reads to the order's owner; admins
// pass NULL and see everything.
const GET_ORDER_SQL: &str = "\
SELECT * FROM orders \
WHERE uuid = $1 AND ($2::uuid IS NULL OR user_uuid = $2)";

const LIST_ORDERS_SQL: &str = "\
SELECT * FROM orders \
WHERE user_uuid = $1 \
ORDER BY created_at DESC";

const LIST_ALL_ORDERS_SQL: &str = "SELECT * FROM orders ORDER BY created_at DESC";

const LIST_ITEMS_SQL: &str = "\
SELECT * FROM order_items WHERE order_uuid = $1 ORDER BY name";

const LIST_ITEMS_FOR_ORDERS_SQL: &str = "\
SELECT * FROM order_items WHERE order_uuid = ANY($1) ORDER BY name";

// Conditioned on the current status so that racing transitions cannot
// both win. Delivery stamps ride along when the target is 'delivered'.
const TRANSITION_STATUS_SQL: &str = "\
UPDATE orders SET \
    status = $2, \
    is_delivered = CASE WHEN $2 = 'delivered' THEN TRUE ELSE is_delivered END, \
    delivered_at = CASE WHEN $2 = 'delivered' THEN now() ELSE delivered_at END, \
    updated_at = now() \
WHERE uuid = $1 AND status = ANY($3) AND ($4::uuid IS NULL OR user_uuid = $4)";

const SET_PROVIDER_ORDER_SQL: &str = "\
UPDATE orders SET provider_order_id = $2, updated_at = now() \
WHERE uuid = $1 AND payment_status = 'pending'";

// Idempotent: a second callback for an already-paid order changes nothing.
const MARK_PAID_SQL: &str = "\
UPDATE orders SET \
    payment_status = 'paid', \
    is_paid = TRUE, \
    paid_at = now(), \
    provider_payment_id = $2, \
    updated_at = now() \
WHERE provider_order_id = $1 AND payment_status <> 'paid' \
RETURNING uuid, user_uuid";

const FIND_BY_PROVIDER_ORDER_SQL: &str = "\
SELECT * FROM orders WHERE provider_order_id = $1";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

pub(crate) struct NewOrderRow<'a> {
    pub(crate) uuid: OrderUuid,
    pub(crate) user: UserUuid,
    pub(crate) subtotal: u64,
    pub(crate) discount: u64,
    pub(crate) coupon_code: Option<&'a str>,
    pub(crate) delivery_charge: u64,
    pub(crate) total: u64,
    pub(crate) payment_method: &'a str,
    pub(crate) shipping: &'a AddressSnapshot,
}

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn insert_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: NewOrderRow<'_>,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(INSERT_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user.into_uuid())
            .bind(try_to_i64(order.subtotal)?)
            .bind(try_to_i64(order.discount)?)
            .bind(order.coupon_code)
            .bind(try_to_i64(order.delivery_charge)?)
            .bind(try_to_i64(order.total)?)
            .bind(order.payment_method)
            .bind(&order.shipping.line1)
            .bind(&order.shipping.city)
            .bind(&order.shipping.postal_code)
            .bind(&order.shipping.country)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn insert_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        product: ProductUuid,
        name: &str,
        unit_price: u64,
        quantity: u32,
    ) -> Result<(), sqlx::Error> {
        query(INSERT_ITEM_SQL)
            .bind(OrderItemUuid::new().into_uuid())
            .bind(order.into_uuid())
            .bind(product.into_uuid())
            .bind(name)
            .bind(try_to_i64(unit_price)?)
            .bind(i64::from(quantity))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        scope: Option<UserUuid>,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(scope.map(UserUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_all_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ALL_ORDERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        query_as::<Postgres, OrderItem>(LIST_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Attach items to each order in one round trip.
    pub(crate) async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &mut [Order],
    ) -> Result<(), sqlx::Error> {
        let uuids: Vec<Uuid> = orders.iter().map(|order| order.uuid.into_uuid()).collect();

        let items = query_as::<Postgres, OrderItem>(LIST_ITEMS_FOR_ORDERS_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut by_order: FxHashMap<OrderUuid, Vec<OrderItem>> = FxHashMap::default();

        for item in items {
            by_order.entry(item.order_uuid).or_default().push(item);
        }

        for order in orders {
            order.items = by_order.remove(&order.uuid).unwrap_or_default();
        }

        Ok(())
    }

    pub(crate) async fn transition_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        to: OrderStatus,
        scope: Option<UserUuid>,
    ) -> Result<u64, sqlx::Error> {
        let predecessors: Vec<String> = to
            .predecessors()
            .iter()
            .map(|status| status.as_str().to_string())
            .collect();

        let rows_affected = query(TRANSITION_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(to.as_str())
            .bind(&predecessors)
            .bind(scope.map(UserUuid::into_uuid))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn set_provider_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        provider_order_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_PROVIDER_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(provider_order_id)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Marks the order behind a provider order paid. Returns the order
    /// and buyer when this call made the change, `None` when the order
    /// was already paid.
    pub(crate) async fn mark_paid(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        provider_order_id: &str,
        provider_payment_id: &str,
    ) -> Result<Option<(OrderUuid, UserUuid)>, sqlx::Error> {
        let row = query(MARK_PAID_SQL)
            .bind(provider_order_id)
            .bind(provider_payment_id)
            .fetch_optional(&mut **tx)
            .await?;

        row.map(|row| {
            Ok((
                OrderUuid::from_uuid(row.try_get("uuid")?),
                UserUuid::from_uuid(row.try_get("user_uuid")?),
            ))
        })
        .transpose()
    }

    pub(crate) async fn find_by_provider_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        provider_order_id: &str,
    ) -> Result<Option<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(FIND_BY_PROVIDER_ORDER_SQL)
            .bind(provider_order_id)
            .fetch_optional(&mut **tx)
            .await
    }
}

fn try_to_i64(amount: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|source| sqlx::Error::Encode(Box::new(source)))
}

fn try_get_amount(row: &PgRow, column: &str) -> sqlx::Result<u64> {
    let amount: i64 = row.try_get(column)?;

    u64::try_from(amount).map_err(|source| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    })
}

fn try_get_status(row: &PgRow) -> sqlx::Result<OrderStatus> {
    let status: String = row.try_get("status")?;

    OrderStatus::parse(&status).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: format!("unknown order status {status:?}").into(),
    })
}

fn try_get_payment_status(row: &PgRow) -> sqlx::Result<PaymentStatus> {
    let status: String = row.try_get("payment_status")?;

    PaymentStatus::parse(&status).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: "payment_status".to_string(),
        source: format!("unknown payment status {status:?}").into(),
    })
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            status: try_get_status(row)?,
            subtotal: try_get_amount(row, "subtotal")?,
            discount: try_get_amount(row, "discount")?,
            coupon_code: row.try_get("coupon_code")?,
            delivery_charge: try_get_amount(row, "delivery_charge")?,
            total: try_get_amount(row, "total")?,
            payment_method: row.try_get("payment_method")?,
            payment_status: try_get_payment_status(row)?,
            is_paid: row.try_get("is_paid")?,
            paid_at: row
                .try_get::<Option<SqlxTimestamp>, _>("paid_at")?
                .map(SqlxTimestamp::to_jiff),
            provider_order_id: row.try_get("provider_order_id")?,
            provider_payment_id: row.try_get("provider_payment_id")?,
            is_delivered: row.try_get("is_delivered")?,
            delivered_at: row
                .try_get::<Option<SqlxTimestamp>, _>("delivered_at")?
                .map(SqlxTimestamp::to_jiff),
            shipping: AddressSnapshot {
                line1: row.try_get("ship_line1")?,
                city: row.try_get("ship_city")?,
                postal_code: row.try_get("ship_postal_code")?,
                country: row.try_get("ship_country")?,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            items: Vec::new(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity: i64 = row.try_get("quantity")?;
        let quantity = u32::try_from(quantity).map_err(|source| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(source),
        })?;

        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            name: row.try_get("name")?,
            unit_price: try_get_amount(row, "unit_price")?,
            quantity,
        })
    }
}
