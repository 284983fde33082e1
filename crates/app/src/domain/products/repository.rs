//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::products::{
    data::{NewProduct, ProductUpdate},
    records::{self, Product, ProductStatus, ProductUuid},
};

const LIST_PRODUCTS_SQL: &str = "SELECT * FROM products ORDER BY created_at DESC";

const GET_PRODUCT_SQL: &str = "SELECT * FROM products WHERE uuid = $1";

const CREATE_PRODUCT_SQL: &str = "\
INSERT INTO products (uuid, name, description, price, discount_percent, final_price, stock, status) \
VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
RETURNING *";

// The final price is recomputed from whichever price/discount values the
// update leaves in place, so it can never go stale.
const UPDATE_PRODUCT_SQL: &str = "\
UPDATE products SET \
    name = COALESCE($2, name), \
    description = COALESCE($3, description), \
    price = COALESCE($4, price), \
    discount_percent = COALESCE($5, discount_percent), \
    stock = COALESCE($6, stock), \
    status = COALESCE($7, status), \
    final_price = COALESCE($4, price) \
        - (COALESCE($4, price) * COALESCE($5, discount_percent)::BIGINT + 50) / 100, \
    updated_at = now() \
WHERE uuid = $1 \
RETURNING *";

const DELETE_PRODUCT_SQL: &str = "DELETE FROM products WHERE uuid = $1";

// Single conditional write: the decrement only happens when enough stock is
// on hand, which closes the read-then-write window under concurrent orders.
const RESERVE_STOCK_SQL: &str = "\
UPDATE products \
SET stock = stock - $2, \
    status = CASE WHEN stock - $2 = 0 AND status = 'available' \
        THEN 'out-of-stock' ELSE status END, \
    updated_at = now() \
WHERE uuid = $1 AND stock >= $2 AND status <> 'discontinued'";

const RELEASE_STOCK_SQL: &str = "\
UPDATE products \
SET stock = stock + $2, \
    status = CASE WHEN status = 'out-of-stock' THEN 'available' ELSE status END, \
    updated_at = now() \
WHERE uuid = $1";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &NewProduct,
    ) -> Result<Product, sqlx::Error> {
        let final_price = records::final_price(product.price, product.discount_percent);

        query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(&product.name)
            .bind(&product.description)
            .bind(try_to_i64(product.price, "price")?)
            .bind(i16::from(product.discount_percent))
            .bind(try_to_i64(final_price, "final_price")?)
            .bind(i64::from(product.stock))
            .bind(ProductStatus::Available.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: &ProductUpdate,
    ) -> Result<Product, sqlx::Error> {
        let price = update.price.map(|p| try_to_i64(p, "price")).transpose()?;

        query_as::<Postgres, Product>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(update.name.as_deref())
            .bind(update.description.as_deref())
            .bind(price)
            .bind(update.discount_percent.map(i16::from))
            .bind(update.stock.map(i64::from))
            .bind(update.status.map(ProductStatus::as_str))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Atomically decrement stock; `false` means the line could not be
    /// satisfied and the caller must abandon the enclosing transaction.
    pub(crate) async fn reserve_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(RESERVE_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(i64::from(quantity))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }

    pub(crate) async fn release_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<(), sqlx::Error> {
        query(RELEASE_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(i64::from(quantity))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount_percent_i16: i16 = row.try_get("discount_percent")?;

        let discount_percent =
            u8::try_from(discount_percent_i16).map_err(|e| sqlx::Error::ColumnDecode {
                index: "discount_percent".to_string(),
                source: Box::new(e),
            })?;

        let status_str: String = row.try_get("status")?;

        let status =
            ProductStatus::parse(&status_str).ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: format!("unknown product status: {status_str}").into(),
            })?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: try_get_amount(row, "price")?,
            discount_percent,
            final_price: try_get_amount(row, "final_price")?,
            stock: try_get_quantity(row, "stock")?,
            status,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

pub(super) fn try_get_amount(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let amount_i64: i64 = row.try_get(col)?;

    u64::try_from(amount_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

pub(super) fn try_get_quantity(row: &PgRow, col: &str) -> Result<u32, sqlx::Error> {
    let quantity_i64: i64 = row.try_get(col)?;

    u32::try_from(quantity_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

fn try_to_i64(amount: u64, col: &str) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
