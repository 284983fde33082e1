//! List Reviews Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::reviews::records::Review;

use crate::{extensions::*, reviews::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReviewResponse {
    pub uuid: Uuid,
    pub user_uuid: Uuid,

    /// Star rating, 1 to 5
    pub rating: u8,

    pub comment: String,
    pub created_at: String,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        ReviewResponse {
            uuid: review.uuid.into_uuid(),
            user_uuid: review.user_uuid.into_uuid(),
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at.to_string(),
        }
    }
}

/// Reviews with their aggregate rating.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReviewsResponse {
    pub reviews: Vec<ReviewResponse>,

    /// Mean rating; absent when the product has no reviews
    pub average_rating: Option<f64>,

    pub review_count: u64,
}

/// List Reviews Handler
///
/// Returns a product's reviews together with the aggregate rating.
#[endpoint(
    tags("reviews"),
    summary = "List Product Reviews",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ReviewsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let _user = depot.current_user_or_401()?;
    let product = uuid.into_inner().into();

    let reviews = state
        .app
        .reviews
        .list_reviews(product)
        .await
        .map_err(into_status_error)?;

    let rating = state
        .app
        .reviews
        .product_rating(product)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ReviewsResponse {
        reviews: reviews.into_iter().map(Into::into).collect(),
        average_rating: rating.average,
        review_count: rating.count,
    }))
}
