//! List Notifications Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::notifications::records::Notification;

use crate::{extensions::*, notifications::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct NotificationResponse {
    pub uuid: Uuid,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        NotificationResponse {
            uuid: notification.uuid.into_uuid(),
            title: notification.title,
            body: notification.body,
            is_read: notification.is_read,
            created_at: notification.created_at.to_string(),
        }
    }
}

/// Notification listing response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct NotificationsResponse {
    pub notifications: Vec<NotificationResponse>,
}

/// List Notifications Handler
///
/// The caller's inbox, newest first. Admins also see store-wide
/// entries.
#[endpoint(
    tags("notifications"),
    summary = "List Notifications",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<NotificationsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let notifications = state
        .app
        .notifications
        .list_notifications(user.uuid, user.is_admin)
        .await
        .map_err(into_status_error)?;

    Ok(Json(NotificationsResponse {
        notifications: notifications.into_iter().map(Into::into).collect(),
    }))
}
