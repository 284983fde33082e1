//! Update Coupon Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::coupons::data::CouponUpdate;

use crate::{coupons::errors::into_status_error, extensions::*, state::State};

use super::get::CouponResponse;

/// Update Coupon Request. Absent fields keep their current value.
/// Caps, limits and expiry can be changed but not cleared over the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCouponRequest {
    pub value: Option<u64>,
    pub min_order_value: Option<u64>,
    pub max_discount: Option<u64>,
    pub usage_limit: Option<u64>,
    pub expires_at: Option<String>,
    pub is_active: Option<bool>,
}

/// Update Coupon Handler
///
/// Partially updates a coupon. Admin only.
#[endpoint(
    tags("coupons"),
    summary = "Update Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupon updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Coupon not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    json: JsonBody<UpdateCouponRequest>,
    depot: &mut Depot,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let _admin = depot.admin_or_403()?;
    let request = json.into_inner();

    let expires_at = match request.expires_at.as_deref() {
        None => None,
        Some(value) => Some(value.parse::<Timestamp>().map_err(|_error| {
            StatusError::bad_request().brief("expires_at must be an RFC 3339 timestamp")
        })?),
    };

    let coupon = state
        .app
        .coupons
        .update_coupon(
            uuid.into_inner().into(),
            CouponUpdate {
                value: request.value,
                min_order_value: request.min_order_value,
                max_discount: request.max_discount.map(Some),
                usage_limit: request.usage_limit.map(Some),
                expires_at: expires_at.map(Some),
                is_active: request.is_active,
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(coupon.into()))
}
