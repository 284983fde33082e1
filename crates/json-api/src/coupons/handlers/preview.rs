//! Preview Coupon Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{coupons::errors::into_status_error, extensions::*, state::State};

/// Preview Coupon Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PreviewCouponRequest {
    pub code: String,

    /// Cart subtotal in minor currency units
    pub subtotal: u64,
}

/// Preview Coupon Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponPreviewResponse {
    pub code: String,

    /// Discount the coupon would grant, in minor currency units
    pub discount: u64,

    /// Subtotal after discount
    pub payable: u64,
}

/// Preview Coupon Handler
///
/// Checks a code against a subtotal without consuming a use.
#[endpoint(
    tags("coupons"),
    summary = "Preview Coupon",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Coupon applies"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown coupon code"),
        (status_code = StatusCode::CONFLICT, description = "Coupon does not apply"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<PreviewCouponRequest>,
    depot: &mut Depot,
) -> Result<Json<CouponPreviewResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let _user = depot.current_user_or_401()?;
    let request = json.into_inner();

    let preview = state
        .app
        .coupons
        .preview_coupon(&request.code, request.subtotal)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CouponPreviewResponse {
        code: preview.code,
        discount: preview.discount,
        payable: preview.payable,
    }))
}
