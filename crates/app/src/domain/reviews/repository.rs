//! Reviews Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    products::records::ProductUuid,
    reviews::{
        data::NewReview,
        records::{ProductRating, Review, ReviewUuid},
    },
    users::records::UserUuid,
};

const CREATE_REVIEW_SQL: &str = "\
INSERT INTO reviews (uuid, product_uuid, user_uuid, rating, comment) \
VALUES ($1, $2, $3, $4, $5) \
RETURNING *";

const LIST_REVIEWS_SQL: &str = "\
SELECT * FROM reviews WHERE product_uuid = $1 ORDER BY created_at DESC";

const PRODUCT_RATING_SQL: &str = "\
SELECT AVG(rating)::DOUBLE PRECISION AS average, COUNT(*) AS count \
FROM reviews WHERE product_uuid = $1";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReviewsRepository;

impl PgReviewsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        product: ProductUuid,
        review: &NewReview,
    ) -> Result<Review, sqlx::Error> {
        query_as::<Postgres, Review>(CREATE_REVIEW_SQL)
            .bind(review.uuid.into_uuid())
            .bind(product.into_uuid())
            .bind(user.into_uuid())
            .bind(i16::from(review.rating))
            .bind(&review.comment)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_reviews(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Vec<Review>, sqlx::Error> {
        query_as::<Postgres, Review>(LIST_REVIEWS_SQL)
            .bind(product.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn product_rating(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRating, sqlx::Error> {
        let row = query(PRODUCT_RATING_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        let count: i64 = row.try_get("count")?;
        let count = u64::try_from(count).map_err(|source| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(source),
        })?;

        Ok(ProductRating {
            average: row.try_get("average")?,
            count,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Review {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let rating: i16 = row.try_get("rating")?;
        let rating = u8::try_from(rating).map_err(|source| sqlx::Error::ColumnDecode {
            index: "rating".to_string(),
            source: Box::new(source),
        })?;

        Ok(Self {
            uuid: ReviewUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            rating,
            comment: row.try_get("comment")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
