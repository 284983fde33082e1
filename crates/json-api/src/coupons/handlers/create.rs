//! Create Coupon Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::coupons::{
    data::NewCoupon,
    records::{CouponUuid, DiscountType},
};

use crate::{coupons::errors::into_status_error, extensions::*, state::State};

use super::get::CouponResponse;

/// Create Coupon Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCouponRequest {
    pub code: String,

    /// `percentage` or `fixed`
    pub discount_type: String,

    /// Percent for `percentage`, minor units for `fixed`
    pub value: u64,

    #[serde(default)]
    pub min_order_value: u64,

    /// Ceiling for a percentage discount, in minor units
    pub max_discount: Option<u64>,

    pub usage_limit: Option<u64>,

    /// RFC 3339 timestamp; the coupon never expires when absent
    pub expires_at: Option<String>,
}

/// Create Coupon Handler
///
/// Mints a new discount code. Admin only.
#[endpoint(
    tags("coupons"),
    summary = "Create Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Coupon created"),
        (status_code = StatusCode::CONFLICT, description = "Coupon code already exists"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCouponRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let _admin = depot.admin_or_403()?;
    let request = json.into_inner();

    let discount_type = DiscountType::parse(&request.discount_type)
        .ok_or_else(|| StatusError::bad_request().brief("Unknown discount type"))?;

    let expires_at = match request.expires_at.as_deref() {
        None => None,
        Some(value) => Some(value.parse::<Timestamp>().map_err(|_error| {
            StatusError::bad_request().brief("expires_at must be an RFC 3339 timestamp")
        })?),
    };

    let coupon = state
        .app
        .coupons
        .create_coupon(NewCoupon {
            uuid: CouponUuid::new(),
            code: request.code,
            discount_type,
            value: request.value,
            min_order_value: request.min_order_value,
            max_discount: request.max_discount,
            usage_limit: request.usage_limit,
            expires_at,
        })
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/coupons/{}", coupon.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(coupon.into()))
}
