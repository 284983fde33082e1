//! Reviews service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        products::records::ProductUuid,
        reviews::{
            data::NewReview,
            errors::ReviewsServiceError,
            records::{ProductRating, Review},
            repository::PgReviewsRepository,
        },
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgReviewsService {
    db: Db,
    repository: PgReviewsRepository,
}

impl PgReviewsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgReviewsRepository::new(),
        }
    }
}

#[async_trait]
impl ReviewsService for PgReviewsService {
    async fn add_review(
        &self,
        user: UserUuid,
        product: ProductUuid,
        review: NewReview,
    ) -> Result<Review, ReviewsServiceError> {
        if !(1..=5).contains(&review.rating) {
            return Err(ReviewsServiceError::InvalidRating);
        }

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_review(&mut tx, user, product, &review)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn list_reviews(&self, product: ProductUuid) -> Result<Vec<Review>, ReviewsServiceError> {
        let mut tx = self.db.begin().await?;

        let reviews = self.repository.list_reviews(&mut tx, product).await?;

        tx.commit().await?;

        Ok(reviews)
    }

    async fn product_rating(
        &self,
        product: ProductUuid,
    ) -> Result<ProductRating, ReviewsServiceError> {
        let mut tx = self.db.begin().await?;

        let rating = self.repository.product_rating(&mut tx, product).await?;

        tx.commit().await?;

        Ok(rating)
    }
}

#[automock]
#[async_trait]
pub trait ReviewsService: Send + Sync {
    /// Leave a rating for a product. Each user gets one review per
    /// product.
    async fn add_review(
        &self,
        user: UserUuid,
        product: ProductUuid,
        review: NewReview,
    ) -> Result<Review, ReviewsServiceError>;

    async fn list_reviews(&self, product: ProductUuid) -> Result<Vec<Review>, ReviewsServiceError>;

    /// Average rating and review count for a product.
    async fn product_rating(
        &self,
        product: ProductUuid,
    ) -> Result<ProductRating, ReviewsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{domain::reviews::records::ReviewUuid, test::TestContext};

    use super::*;

    fn review(rating: u8, comment: &str) -> NewReview {
        NewReview {
            uuid: ReviewUuid::new(),
            rating,
            comment: comment.to_string(),
        }
    }

    #[tokio::test]
    async fn reviews_aggregate_into_a_product_rating() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.create_product(100, 0, 5).await;
        let second_user = ctx.create_user("second@example.com").await;

        ctx.reviews
            .add_review(ctx.user, product, review(5, "great"))
            .await?;
        ctx.reviews
            .add_review(second_user, product, review(2, ""))
            .await?;

        let rating = ctx.reviews.product_rating(product).await?;

        assert_eq!(rating.count, 2);
        assert_eq!(rating.average, Some(3.5));

        let listed = ctx.reviews.list_reviews(product).await?;
        assert_eq!(listed.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn a_user_can_only_review_a_product_once() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.create_product(100, 0, 5).await;

        ctx.reviews
            .add_review(ctx.user, product, review(4, "good"))
            .await?;

        let result = ctx
            .reviews
            .add_review(ctx.user, product, review(1, "changed my mind"))
            .await;

        assert!(
            matches!(result, Err(ReviewsServiceError::AlreadyReviewed)),
            "expected AlreadyReviewed, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn out_of_range_ratings_are_rejected() {
        let ctx = TestContext::new().await;

        let product = ctx.create_product(100, 0, 5).await;

        for rating in [0, 6] {
            let result = ctx
                .reviews
                .add_review(ctx.user, product, review(rating, ""))
                .await;

            assert!(
                matches!(result, Err(ReviewsServiceError::InvalidRating)),
                "expected InvalidRating for {rating}, got {result:?}"
            );
        }
    }

    #[tokio::test]
    async fn unreviewed_products_have_no_average() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx.create_product(100, 0, 5).await;

        let rating = ctx.reviews.product_rating(product).await?;

        assert_eq!(rating.count, 0);
        assert_eq!(rating.average, None);

        Ok(())
    }
}
