//! Notifications Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    notifications::records::{Notification, NotificationUuid},
    users::records::UserUuid,
};

const CREATE_NOTIFICATION_SQL: &str = "\
INSERT INTO notifications (uuid, user_uuid, title, body) \
VALUES ($1, $2, $3, $4)";

const LIST_FOR_USER_SQL: &str = "\
SELECT * FROM notifications \
WHERE user_uuid = $1 \
ORDER BY created_at DESC";

const LIST_FOR_ADMINS_SQL: &str = "\
SELECT * FROM notifications \
WHERE user_uuid IS NULL \
ORDER BY created_at DESC";

const MARK_READ_SQL: &str = "\
UPDATE notifications SET is_read = TRUE \
WHERE uuid = $1 AND (user_uuid = $2 OR (user_uuid IS NULL AND $3))";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgNotificationsRepository;

impl PgNotificationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_notification(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        recipient: Option<UserUuid>,
        title: &str,
        body: &str,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_NOTIFICATION_SQL)
            .bind(NotificationUuid::new().into_uuid())
            .bind(recipient.map(UserUuid::into_uuid))
            .bind(title)
            .bind(body)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn list_for_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        query_as::<Postgres, Notification>(LIST_FOR_USER_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_for_admins(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        query_as::<Postgres, Notification>(LIST_FOR_ADMINS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn mark_read(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        notification: NotificationUuid,
        user: UserUuid,
        is_admin: bool,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_READ_SQL)
            .bind(notification.into_uuid())
            .bind(user.into_uuid())
            .bind(is_admin)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Notification {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: NotificationUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: row
                .try_get::<Option<uuid::Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            title: row.try_get("title")?,
            body: row.try_get("body")?,
            is_read: row.try_get("is_read")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
