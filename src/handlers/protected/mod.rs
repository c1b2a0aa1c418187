pub mod auth;
pub mod clients;
pub mod home;
pub mod profile;
pub mod projects;
pub mod uploads;
pub mod users;

use crate::auth::Identity;
use crate::error::ApiError;

/// Content curation is admin-only; everyone else gets a 403.
pub fn require_admin(identity: &Identity) -> Result<(), ApiError> {
    if identity.is_admin() {
        Ok(())
    } else {
        Err(ApiError::forbidden("Administrator role required"))
    }
}
