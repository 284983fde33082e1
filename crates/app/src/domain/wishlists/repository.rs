//! Wishlists Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    products::records::{ProductStatus, ProductUuid},
    users::records::UserUuid,
    wishlists::records::WishlistItem,
};

// Re-adding an item keeps the original entry.
const ADD_ITEM_SQL: &str = "\
INSERT INTO wishlist_items (uuid, user_uuid, product_uuid) \
VALUES ($1, $2, $3) \
ON CONFLICT (user_uuid, product_uuid) DO NOTHING";

const LIST_ITEMS_SQL: &str = "\
SELECT w.product_uuid, p.name, p.final_price, p.status, w.created_at AS added_at \
FROM wishlist_items w \
JOIN products p ON p.uuid = w.product_uuid \
WHERE w.user_uuid = $1 \
ORDER BY w.created_at DESC";

const REMOVE_ITEM_SQL: &str = "\
DELETE FROM wishlist_items WHERE user_uuid = $1 AND product_uuid = $2";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgWishlistsRepository;

impl PgWishlistsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn add_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<(), sqlx::Error> {
        query(ADD_ITEM_SQL)
            .bind(Uuid::now_v7())
            .bind(user.into_uuid())
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn list_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<WishlistItem>, sqlx::Error> {
        query_as::<Postgres, WishlistItem>(LIST_ITEMS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
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

fn try_get_amount(row: &PgRow, column: &str) -> sqlx::Result<u64> {
    let amount: i64 = row.try_get(column)?;

    u64::try_from(amount).map_err(|source| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    })
}

impl<'r> FromRow<'r, PgRow> for WishlistItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let status = ProductStatus::parse(&status).ok_or_else(|| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: format!("unknown product status {status:?}").into(),
        })?;

        Ok(Self {
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            name: row.try_get("name")?,
            final_price: try_get_amount(row, "final_price")?,
            status,
            added_at: row.try_get::<SqlxTimestamp, _>("added_at")?.to_jiff(),
        })
    }
}
