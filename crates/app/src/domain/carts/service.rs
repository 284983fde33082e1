//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            records::Cart,
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        products::{
            PgProductsRepository,
            records::{Product, ProductStatus, ProductUuid},
        },
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    async fn load_purchasable_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Product, CartsServiceError> {
        let product = match self.products_repository.get_product(tx, product).await {
            Ok(product) => product,
            Err(sqlx::Error::RowNotFound) => return Err(CartsServiceError::ProductNotFound),
            Err(error) => return Err(error.into()),
        };

        if product.status == ProductStatus::Discontinued {
            return Err(CartsServiceError::ProductUnavailable);
        }

        Ok(product)
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let items = self.items_repository.list_items(&mut tx, user).await?;

        tx.commit().await?;

        Ok(Cart::from_items(items))
    }

    async fn add_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        let record = self.load_purchasable_product(&mut tx, product).await?;

        let already_in_cart = self
            .items_repository
            .get_quantity(&mut tx, user, product)
            .await?
            .unwrap_or(0);

        // Advisory check against the current stock level. The binding check
        // is the conditional decrement at order time.
        if u64::from(already_in_cart) + u64::from(quantity) > u64::from(record.stock) {
            return Err(CartsServiceError::InsufficientStock);
        }

        let cart = self.carts_repository.get_or_create_cart(&mut tx, user).await?;

        self.items_repository
            .add_item(&mut tx, cart, product, quantity)
            .await?;

        let items = self.items_repository.list_items(&mut tx, user).await?;

        tx.commit().await?;

        Ok(Cart::from_items(items))
    }

    async fn update_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        let record = self.load_purchasable_product(&mut tx, product).await?;

        if u64::from(quantity) > u64::from(record.stock) {
            return Err(CartsServiceError::InsufficientStock);
        }

        let rows_affected = self
            .items_repository
            .set_quantity(&mut tx, user, product, quantity)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::ItemNotFound);
        }

        let items = self.items_repository.list_items(&mut tx, user).await?;

        tx.commit().await?;

        Ok(Cart::from_items(items))
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .items_repository
            .remove_item(&mut tx, user, product)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::ItemNotFound);
        }

        let items = self.items_repository.list_items(&mut tx, user).await?;

        tx.commit().await?;

        Ok(Cart::from_items(items))
    }

    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.carts_repository.clear_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart. Users without a cart see an empty one.
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Add a product to the cart, merging with an existing line.
    async fn add_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError>;

    /// Replace the quantity of an existing cart line.
    async fn update_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove a cart line.
    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<Cart, CartsServiceError>;

    /// Empty the cart. Idempotent.
    async fn clear_cart(&self, user: UserUuid) -> Result<(), CartsServiceError>;
}
