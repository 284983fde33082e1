//! Notifications service.
//!
//! The dispatcher fans an order event out to the buyer's inbox and to the
//! admin audience. Delivery is best effort; order flows never fail because
//! a notification could not be written.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        notifications::{
            data::OrderEvent,
            errors::NotificationsServiceError,
            records::{Notification, NotificationUuid},
            repository::PgNotificationsRepository,
        },
        users::records::UserUuid,
    },
};

#[automock]
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Record an order event for the buyer and for admins.
    async fn order_event(
        &self,
        user: UserUuid,
        event: OrderEvent,
    ) -> Result<(), NotificationsServiceError>;
}

#[automock]
#[async_trait]
pub trait NotificationsService: Send + Sync {
    /// The caller's inbox. Admins also see the admin audience entries.
    async fn list_notifications(
        &self,
        user: UserUuid,
        is_admin: bool,
    ) -> Result<Vec<Notification>, NotificationsServiceError>;

    async fn mark_read(
        &self,
        user: UserUuid,
        is_admin: bool,
        notification: NotificationUuid,
    ) -> Result<(), NotificationsServiceError>;
}

#[derive(Debug, Clone)]
pub struct PgNotificationsService {
    db: Db,
    repository: PgNotificationsRepository,
}

impl PgNotificationsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgNotificationsRepository::new(),
        }
    }
}

#[async_trait]
impl NotificationDispatcher for PgNotificationsService {
    async fn order_event(
        &self,
        user: UserUuid,
        event: OrderEvent,
    ) -> Result<(), NotificationsServiceError> {
        let mut tx = self.db.begin().await?;

        let title = event.title();
        let body = event.body();

        self.repository
            .create_notification(&mut tx, Some(user), title, &body)
            .await?;

        self.repository
            .create_notification(&mut tx, None, title, &body)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

#[async_trait]
impl NotificationsService for PgNotificationsService {
    async fn list_notifications(
        &self,
        user: UserUuid,
        is_admin: bool,
    ) -> Result<Vec<Notification>, NotificationsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut notifications = self.repository.list_for_user(&mut tx, user).await?;

        if is_admin {
            notifications.extend(self.repository.list_for_admins(&mut tx).await?);
            notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }

        tx.commit().await?;

        Ok(notifications)
    }

    async fn mark_read(
        &self,
        user: UserUuid,
        is_admin: bool,
        notification: NotificationUuid,
    ) -> Result<(), NotificationsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .mark_read(&mut tx, notification, user, is_admin)
            .await?;

        if rows_affected == 0 {
            return Err(NotificationsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}
