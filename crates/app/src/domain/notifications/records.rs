//! Notification Records

use jiff::Timestamp;

use crate::{domain::users::records::UserUuid, uuids::TypedUuid};

/// Notification UUID
pub type NotificationUuid = TypedUuid<Notification>;

/// An inbox entry. A `None` recipient addresses the admin audience.
#[derive(Debug, Clone)]
pub struct Notification {
    pub uuid: NotificationUuid,
    pub user_uuid: Option<UserUuid>,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}
