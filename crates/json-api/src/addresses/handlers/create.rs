//! Create Address Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::addresses::{data::NewAddress, records::AddressUuid};

use crate::{addresses::errors::into_status_error, extensions::*, state::State};

use super::index::AddressResponse;

/// Create Address Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateAddressRequest {
    pub line1: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Create Address Handler
///
/// Saves a shipping address for the caller.
#[endpoint(
    tags("addresses"),
    summary = "Create Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Address saved"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateAddressRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<AddressResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;
    let request = json.into_inner();

    let address = state
        .app
        .addresses
        .create_address(
            user.uuid,
            NewAddress {
                uuid: AddressUuid::new(),
                line1: request.line1,
                city: request.city,
                postal_code: request.postal_code,
                country: request.country,
            },
        )
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/addresses/{}", address.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(address.into()))
}
