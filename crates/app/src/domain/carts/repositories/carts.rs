//! Carts Repository

use sqlx::{Postgres, Transaction, query, query_scalar};
use uuid::Uuid;

use crate::domain::{carts::records::CartUuid, users::records::UserUuid};

// Lazily materialises the user's single cart row.
const GET_OR_CREATE_CART_SQL: &str = "\
INSERT INTO carts (uuid, user_uuid) VALUES ($1, $2) \
ON CONFLICT (user_uuid) DO UPDATE SET updated_at = now() \
RETURNING uuid";

// Emptying a cart keeps the cart row; the cart itself is never deleted.
const CLEAR_CART_SQL: &str = "\
DELETE FROM cart_items \
USING carts \
WHERE cart_items.cart_uuid = carts.uuid AND carts.user_uuid = $1";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_or_create_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<CartUuid, sqlx::Error> {
        let uuid: Uuid = query_scalar(GET_OR_CREATE_CART_SQL)
            .bind(Uuid::now_v7())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(CartUuid::from_uuid(uuid))
    }

    pub(crate) async fn clear_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_CART_SQL)
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
