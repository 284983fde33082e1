//! Coupons Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::coupons::{
    data::{CouponUpdate, NewCoupon},
    records::{Coupon, CouponUuid, DiscountType},
};

const CREATE_COUPON_SQL: &str = "\
INSERT INTO coupons \
    (uuid, code, discount_type, value, min_order_value, max_discount, usage_limit, expires_at) \
VALUES ($1, upper($2), $3, $4, $5, $6, $7, $8) \
RETURNING *";

const GET_COUPON_SQL: &str = "SELECT * FROM coupons WHERE uuid = $1";

const LIST_COUPONS_SQL: &str = "SELECT * FROM coupons ORDER BY created_at";

const FIND_BY_CODE_SQL: &str = "SELECT * FROM coupons WHERE code = upper($1)";

// Locked so that concurrent redemptions of the same code serialize on the
// usage counter.
const FIND_BY_CODE_FOR_UPDATE_SQL: &str = "\
SELECT * FROM coupons WHERE code = upper($1) FOR UPDATE";

const UPDATE_COUPON_SQL: &str = "\
UPDATE coupons SET \
    value = COALESCE($2, value), \
    min_order_value = COALESCE($3, min_order_value), \
    max_discount = CASE WHEN $4 THEN $5 ELSE max_discount END, \
    usage_limit = CASE WHEN $6 THEN $7 ELSE usage_limit END, \
    expires_at = CASE WHEN $8 THEN $9 ELSE expires_at END, \
    is_active = COALESCE($10, is_active), \
    updated_at = now() \
WHERE uuid = $1 \
RETURNING *";

const INCREMENT_USED_COUNT_SQL: &str = "\
UPDATE coupons SET used_count = used_count + 1, updated_at = now() \
WHERE uuid = $1";

const DELETE_COUPON_SQL: &str = "DELETE FROM coupons WHERE uuid = $1";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: &NewCoupon,
    ) -> Result<Coupon, sqlx::Error> {
        query_as::<Postgres, Coupon>(CREATE_COUPON_SQL)
            .bind(coupon.uuid.into_uuid())
            .bind(&coupon.code)
            .bind(coupon.discount_type.as_str())
            .bind(try_to_i64(coupon.value)?)
            .bind(try_to_i64(coupon.min_order_value)?)
            .bind(coupon.max_discount.map(try_to_i64).transpose()?)
            .bind(coupon.usage_limit.map(try_to_i64).transpose()?)
            .bind(coupon.expires_at.map(SqlxTimestamp::from))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<Coupon, sqlx::Error> {
        query_as::<Postgres, Coupon>(GET_COUPON_SQL)
            .bind(coupon.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_coupons(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Coupon>, sqlx::Error> {
        query_as::<Postgres, Coupon>(LIST_COUPONS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn find_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<Coupon>, sqlx::Error> {
        query_as::<Postgres, Coupon>(FIND_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn find_by_code_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<Coupon>, sqlx::Error> {
        query_as::<Postgres, Coupon>(FIND_BY_CODE_FOR_UPDATE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn update_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
        update: &CouponUpdate,
    ) -> Result<Coupon, sqlx::Error> {
        query_as::<Postgres, Coupon>(UPDATE_COUPON_SQL)
            .bind(coupon.into_uuid())
            .bind(update.value.map(try_to_i64).transpose()?)
            .bind(update.min_order_value.map(try_to_i64).transpose()?)
            .bind(update.max_discount.is_some())
            .bind(
                update
                    .max_discount
                    .flatten()
                    .map(try_to_i64)
                    .transpose()?,
            )
            .bind(update.usage_limit.is_some())
            .bind(
                update
                    .usage_limit
                    .flatten()
                    .map(try_to_i64)
                    .transpose()?,
            )
            .bind(update.expires_at.is_some())
            .bind(update.expires_at.flatten().map(SqlxTimestamp::from))
            .bind(update.is_active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn increment_used_count(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<(), sqlx::Error> {
        query(INCREMENT_USED_COUNT_SQL)
            .bind(coupon.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_COUPON_SQL)
            .bind(coupon.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
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

impl<'r> FromRow<'r, PgRow> for Coupon {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount_type: String = row.try_get("discount_type")?;
        let discount_type = DiscountType::parse(&discount_type).ok_or_else(|| {
            sqlx::Error::ColumnDecode {
                index: "discount_type".to_string(),
                source: format!("unknown discount type {discount_type:?}").into(),
            }
        })?;

        Ok(Self {
            uuid: CouponUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            discount_type,
            value: try_get_amount(row, "value")?,
            min_order_value: try_get_amount(row, "min_order_value")?,
            max_discount: row
                .try_get::<Option<i64>, _>("max_discount")?
                .map(|cap| {
                    u64::try_from(cap).map_err(|source| sqlx::Error::ColumnDecode {
                        index: "max_discount".to_string(),
                        source: Box::new(source),
                    })
                })
                .transpose()?,
            usage_limit: row
                .try_get::<Option<i64>, _>("usage_limit")?
                .map(|limit| {
                    u64::try_from(limit).map_err(|source| sqlx::Error::ColumnDecode {
                        index: "usage_limit".to_string(),
                        source: Box::new(source),
                    })
                })
                .transpose()?,
            used_count: try_get_amount(row, "used_count")?,
            expires_at: row
                .try_get::<Option<SqlxTimestamp>, _>("expires_at")?
                .map(SqlxTimestamp::to_jiff),
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
