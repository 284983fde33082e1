//! Auth Records

use crate::domain::users::records::UserUuid;

/// The caller a valid bearer token resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub uuid: UserUuid,
    pub is_admin: bool,
}
