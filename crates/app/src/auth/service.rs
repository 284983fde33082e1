//! Auth service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::{
        errors::AuthServiceError, records::AuthenticatedUser, repository::PgAuthRepository, token,
    },
    database::Db,
    domain::users::records::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAuthRepository::new(),
        }
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(
        &self,
        token: &str,
    ) -> Result<AuthenticatedUser, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self
            .repository
            .find_user_by_token_hash(&mut tx, &token::hash(token))
            .await?
            .ok_or(AuthServiceError::InvalidToken)?;

        tx.commit().await?;

        Ok(user)
    }

    async fn issue_token(&self, user: UserUuid) -> Result<String, AuthServiceError> {
        let token = token::generate();

        let mut tx = self.db.begin().await?;

        self.repository
            .insert_token(&mut tx, user, &token::hash(&token))
            .await
            .map_err(|error| match error {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    AuthServiceError::UserNotFound
                }
                other => AuthServiceError::from(other),
            })?;

        tx.commit().await?;

        Ok(token)
    }

    async fn revoke_tokens(&self, user: UserUuid) -> Result<u64, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let revoked = self.repository.revoke_tokens(&mut tx, user).await?;

        tx.commit().await?;

        Ok(revoked)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to its user.
    async fn authenticate_bearer(
        &self,
        token: &str,
    ) -> Result<AuthenticatedUser, AuthServiceError>;

    /// Mint a token for the user and return the plaintext, which is
    /// not stored and cannot be recovered later.
    async fn issue_token(&self, user: UserUuid) -> Result<String, AuthServiceError>;

    /// Revoke all of the user's live tokens. Returns how many died.
    async fn revoke_tokens(&self, user: UserUuid) -> Result<u64, AuthServiceError>;
}
