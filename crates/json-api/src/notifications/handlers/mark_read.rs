//! Mark Notification Read Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, notifications::errors::into_status_error, state::State};

/// Mark Notification Read Handler
///
/// Marks one of the caller's notifications as read.
#[endpoint(
    tags("notifications"),
    summary = "Mark Notification Read",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Notification marked read"),
        (status_code = StatusCode::NOT_FOUND, description = "Notification not found"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    state
        .app
        .notifications
        .mark_read(user.uuid, user.is_admin, uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use storefront_app::domain::notifications::{
        MockNotificationsService, NotificationsServiceError, records::NotificationUuid,
    };
    use testresult::TestResult;

    use crate::test_helpers::{MockApp, TEST_USER, user_service};

    use super::*;

    fn make_service(notifications: MockNotificationsService) -> Service {
        user_service(
            MockApp {
                notifications,
                ..MockApp::default()
            },
            Router::with_path("notifications/{uuid}/read").post(handler),
        )
    }

    #[tokio::test]
    async fn test_mark_read_returns_200() -> TestResult {
        let uuid = NotificationUuid::new();

        let mut notifications = MockNotificationsService::new();

        notifications
            .expect_mark_read()
            .once()
            .withf(move |user, is_admin, n| {
                *user == TEST_USER.uuid && !is_admin && *n == uuid
            })
            .return_once(|_, _, _| Ok(()));

        let res = TestClient::post(format!("http://example.com/notifications/{uuid}/read"))
            .send(&make_service(notifications))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_mark_read_of_foreign_notification_returns_404() -> TestResult {
        let uuid = NotificationUuid::new();

        let mut notifications = MockNotificationsService::new();

        notifications
            .expect_mark_read()
            .once()
            .return_once(|_, _, _| Err(NotificationsServiceError::NotFound));

        let res = TestClient::post(format!("http://example.com/notifications/{uuid}/read"))
            .send(&make_service(notifications))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
