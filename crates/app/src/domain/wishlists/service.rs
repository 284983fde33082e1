//! Wishlists service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        products::records::ProductUuid,
        users::records::UserUuid,
        wishlists::{
            errors::WishlistsServiceError, records::WishlistItem,
            repository::PgWishlistsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgWishlistsService {
    db: Db,
    repository: PgWishlistsRepository,
}

impl PgWishlistsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgWishlistsRepository::new(),
        }
    }
}

#[async_trait]
impl WishlistsService for PgWishlistsService {
    async fn add_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<(), WishlistsServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository.add_item(&mut tx, user, product).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn list_items(&self, user: UserUuid) -> Result<Vec<WishlistItem>, WishlistsServiceError> {
        let mut tx = self.db.begin().await?;

        let items = self.repository.list_items(&mut tx, user).await?;

        tx.commit().await?;

        Ok(items)
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<(), WishlistsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.remove_item(&mut tx, user, product).await?;

        if rows_affected == 0 {
            return Err(WishlistsServiceError::ItemNotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait WishlistsService: Send + Sync {
    /// Put a product on the wishlist. Adding it again is a no-op.
    async fn add_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<(), WishlistsServiceError>;

    async fn list_items(&self, user: UserUuid) -> Result<Vec<WishlistItem>, WishlistsServiceError>;

    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<(), WishlistsServiceError>;
}
