//! Coupons service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};

use crate::{
    database::Db,
    domain::coupons::{
        data::{CouponPreview, CouponUpdate, NewCoupon},
        errors::CouponsServiceError,
        records::{Coupon, CouponUuid},
        repository::PgCouponsRepository,
    },
};

/// Validates a coupon code against a subtotal and consumes one use,
/// inside the caller's transaction. The row is locked first so that a
/// shared usage limit cannot be oversubscribed by concurrent orders.
pub(crate) async fn redeem_coupon(
    tx: &mut Transaction<'_, Postgres>,
    repository: &PgCouponsRepository,
    code: &str,
    subtotal: u64,
) -> Result<u64, CouponsServiceError> {
    let coupon = repository
        .find_by_code_for_update(tx, code)
        .await?
        .filter(|coupon| coupon.is_live(Timestamp::now()))
        .ok_or(CouponsServiceError::NotFound)?;

    let discount = coupon.discount_for(subtotal)?;

    repository.increment_used_count(tx, coupon.uuid).await?;

    Ok(discount)
}

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    repository: PgCouponsRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCouponsRepository::new(),
        }
    }
}

#[async_trait]
impl CouponsService for PgCouponsService {
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<Coupon, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_coupon(&mut tx, &coupon).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_coupon(&self, coupon: CouponUuid) -> Result<Coupon, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupon = self.repository.get_coupon(&mut tx, coupon).await?;

        tx.commit().await?;

        Ok(coupon)
    }

    async fn list_coupons(&self) -> Result<Vec<Coupon>, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupons = self.repository.list_coupons(&mut tx).await?;

        tx.commit().await?;

        Ok(coupons)
    }

    async fn update_coupon(
        &self,
        coupon: CouponUuid,
        update: CouponUpdate,
    ) -> Result<Coupon, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self.repository.update_coupon(&mut tx, coupon, &update).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_coupon(&self, coupon: CouponUuid) -> Result<(), CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_coupon(&mut tx, coupon).await?;

        if rows_affected == 0 {
            return Err(CouponsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn preview_coupon(
        &self,
        code: &str,
        subtotal: u64,
    ) -> Result<CouponPreview, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupon = self
            .repository
            .find_by_code(&mut tx, code)
            .await?
            .filter(|coupon| coupon.is_live(Timestamp::now()))
            .ok_or(CouponsServiceError::NotFound)?;

        tx.commit().await?;

        let discount = coupon.discount_for(subtotal)?;

        Ok(CouponPreview {
            code: coupon.code,
            discount,
            payable: subtotal - discount,
        })
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<Coupon, CouponsServiceError>;

    async fn get_coupon(&self, coupon: CouponUuid) -> Result<Coupon, CouponsServiceError>;

    async fn list_coupons(&self) -> Result<Vec<Coupon>, CouponsServiceError>;

    async fn update_coupon(
        &self,
        coupon: CouponUuid,
        update: CouponUpdate,
    ) -> Result<Coupon, CouponsServiceError>;

    async fn delete_coupon(&self, coupon: CouponUuid) -> Result<(), CouponsServiceError>;

    /// Checks a code against a subtotal without consuming a use.
    async fn preview_coupon(
        &self,
        code: &str,
        subtotal: u64,
    ) -> Result<CouponPreview, CouponsServiceError>;
}
