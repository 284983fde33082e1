//! Get Coupon Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::coupons::records::Coupon;

use crate::{coupons::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponResponse {
    pub uuid: Uuid,

    /// Case-insensitive redemption code
    pub code: String,

    /// `percentage` or `fixed`
    pub discount_type: String,

    /// Percent for `percentage`, minor units for `fixed`
    pub value: u64,

    /// Minimum cart subtotal for the coupon to apply
    pub min_order_value: u64,

    /// Ceiling for a percentage discount; uncapped when absent
    pub max_discount: Option<u64>,

    /// Total redemptions allowed; unlimited when absent
    pub usage_limit: Option<u64>,

    pub used_count: u64,
    pub expires_at: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Coupon> for CouponResponse {
    fn from(coupon: Coupon) -> Self {
        CouponResponse {
            uuid: coupon.uuid.into_uuid(),
            code: coupon.code,
            discount_type: coupon.discount_type.as_str().to_string(),
            value: coupon.value,
            min_order_value: coupon.min_order_value,
            max_discount: coupon.max_discount,
            usage_limit: coupon.usage_limit,
            used_count: coupon.used_count,
            expires_at: coupon.expires_at.as_ref().map(ToString::to_string),
            is_active: coupon.is_active,
            created_at: coupon.created_at.to_string(),
            updated_at: coupon.updated_at.to_string(),
        }
    }
}

/// Get Coupon Handler
///
/// Returns one coupon. Admin only.
#[endpoint(
    tags("coupons"),
    summary = "Get Coupon",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let _admin = depot.admin_or_403()?;

    let coupon = state
        .app
        .coupons
        .get_coupon(uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(coupon.into()))
}
