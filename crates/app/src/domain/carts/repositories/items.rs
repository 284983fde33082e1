//! Cart Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    carts::records::{CartItem, CartUuid},
    products::records::ProductUuid,
    users::records::UserUuid,
};

const LIST_ITEMS_SQL: &str = "\
SELECT ci.product_uuid, p.name, p.final_price AS unit_price, ci.quantity, \
       ci.created_at, ci.updated_at \
FROM cart_items ci \
JOIN carts c ON c.uuid = ci.cart_uuid \
JOIN products p ON p.uuid = ci.product_uuid \
WHERE c.user_uuid = $1 \
ORDER BY ci.created_at";

const GET_QUANTITY_SQL: &str = "\
SELECT ci.quantity \
FROM cart_items ci \
JOIN carts c ON c.uuid = ci.cart_uuid \
WHERE c.user_uuid = $1 AND ci.product_uuid = $2";

const ADD_ITEM_SQL: &str = "\
INSERT INTO cart_items (uuid, cart_uuid, product_uuid, quantity) \
VALUES ($1, $2, $3, $4) \
ON CONFLICT (cart_uuid, product_uuid) \
DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity, updated_at = now()";

const SET_QUANTITY_SQL: &str = "\
UPDATE cart_items ci \
SET quantity = $3, updated_at = now() \
FROM carts c \
WHERE ci.cart_uuid = c.uuid AND c.user_uuid = $1 AND ci.product_uuid = $2";

const REMOVE_ITEM_SQL: &str = "\
DELETE FROM cart_items ci \
USING carts c \
WHERE ci.cart_uuid = c.uuid AND c.user_uuid = $1 AND ci.product_uuid = $2";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<CartItem>, sqlx::Error> {
        query_as::<Postgres, CartItem>(LIST_ITEMS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<Option<u32>, sqlx::Error> {
        let quantity: Option<i64> = query_scalar(GET_QUANTITY_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        quantity
            .map(|q| {
                u32::try_from(q).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "quantity".to_string(),
                    source: Box::new(e),
                })
            })
            .transpose()
    }

    pub(crate) async fn add_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<(), sqlx::Error> {
        query(ADD_ITEM_SQL)
            .bind(Uuid::now_v7())
            .bind(cart.into_uuid())
            .bind(product.into_uuid())
            .bind(i64::from(quantity))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn set_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_QUANTITY_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .bind(i64::from(quantity))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn remove_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(REMOVE_ITEM_SQL)
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let unit_price_i64: i64 = row.try_get("unit_price")?;

        let unit_price = u64::try_from(unit_price_i64).map_err(|e| sqlx::Error::ColumnDecode {
            index: "unit_price".to_string(),
            source: Box::new(e),
        })?;

        let quantity_i64: i64 = row.try_get("quantity")?;

        let quantity = u32::try_from(quantity_i64).map_err(|e| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            name: row.try_get("name")?,
            unit_price,
            quantity,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
