//! Auth Repository

use sqlx::{Postgres, Row, Transaction, postgres::PgRow, query};
use uuid::Uuid;

use crate::{
    auth::records::AuthenticatedUser,
    domain::users::records::UserUuid,
};

const INSERT_TOKEN_SQL: &str = "\
INSERT INTO api_tokens (uuid, user_uuid, token_hash) VALUES ($1, $2, $3)";

const FIND_USER_BY_TOKEN_HASH_SQL: &str = "\
SELECT u.uuid, u.is_admin \
FROM api_tokens t \
JOIN users u ON u.uuid = t.user_uuid \
WHERE t.token_hash = $1 AND t.revoked_at IS NULL";

const REVOKE_TOKENS_SQL: &str = "\
UPDATE api_tokens SET revoked_at = now() \
WHERE user_uuid = $1 AND revoked_at IS NULL";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAuthRepository;

impl PgAuthRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn insert_token(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        token_hash: &str,
    ) -> Result<(), sqlx::Error> {
        query(INSERT_TOKEN_SQL)
            .bind(Uuid::now_v7())
            .bind(user.into_uuid())
            .bind(token_hash)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn find_user_by_token_hash(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token_hash: &str,
    ) -> Result<Option<AuthenticatedUser>, sqlx::Error> {
        let row = query(FIND_USER_BY_TOKEN_HASH_SQL)
            .bind(token_hash)
            .fetch_optional(&mut **tx)
            .await?;

        row.map(|row: PgRow| {
            Ok(AuthenticatedUser {
                uuid: UserUuid::from_uuid(row.try_get("uuid")?),
                is_admin: row.try_get("is_admin")?,
            })
        })
        .transpose()
    }

    pub(crate) async fn revoke_tokens(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(REVOKE_TOKENS_SQL)
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
