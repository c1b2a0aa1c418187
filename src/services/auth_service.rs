//! Credential verification: email + plaintext password against the stored
//! bcrypt hash.

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password;
use crate::database::models::user::{User, UserUpdate};
use crate::database::repository::{PortfolioRepository, RepositoryError};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email, wrong password, or inactive account. The HTTP layer
    /// collapses all of these into one generic message; logs keep the detail.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Look up the user by email and compare the submitted password against the
/// stored hash. Returns the full user record on success.
pub async fn verify_login(
    repo: &dyn PortfolioRepository,
    email: &str,
    plaintext: &str,
) -> Result<User, AuthError> {
    let user = match repo.get_user_by_email(email).await? {
        Some(user) => user,
        None => {
            warn!("Login failed for {}: no such account", email);
            return Err(AuthError::InvalidCredentials);
        }
    };

    let matched = password::verify_password(plaintext, &user.password_hash).unwrap_or_else(|e| {
        warn!("Stored password hash for {} is malformed: {}", email, e);
        false
    });

    if !matched {
        warn!("Login failed for {}: wrong password", email);
        return Err(AuthError::InvalidCredentials);
    }

    if !user.is_active() {
        warn!("Login refused for {}: account inactive", email);
        return Err(AuthError::InvalidCredentials);
    }

    info!("Login successful: {} ({})", email, user.role);
    Ok(user)
}

/// Change a user's password after re-verifying the current one.
pub async fn change_password(
    repo: &dyn PortfolioRepository,
    user_id: Uuid,
    role: &str,
    current: &str,
    new: &str,
) -> Result<(), AuthError> {
    let user = repo
        .get_user_by_id_role(user_id, role)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let matched = password::verify_password(current, &user.password_hash).unwrap_or(false);
    if !matched {
        warn!("Password change refused for {}: current password wrong", user.email);
        return Err(AuthError::InvalidCredentials);
    }

    let hash = password::hash_password(new)
        .map_err(|e| RepositoryError::QueryError(format!("password hashing failed: {}", e)))?;

    repo.update_user(
        user_id,
        UserUpdate {
            password_hash: Some(hash),
            ..Default::default()
        },
    )
    .await?;

    info!("Password changed for {}", user.email);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::user::User;
    use crate::testing::MemoryRepository;
    use chrono::Utc;

    async fn repo_with_user(status: &str) -> (MemoryRepository, Uuid) {
        let repo = MemoryRepository::new();
        let user = User {
            id: Uuid::new_v4(),
            name: "Dee".to_string(),
            email: "dee@example.com".to_string(),
            password_hash: password::hash_password("correct horse").unwrap(),
            role: "admin".to_string(),
            status: status.to_string(),
            client_id: None,
            updated_at: Utc::now(),
        };
        let id = user.id;
        repo.insert_user(user).await;
        (repo, id)
    }

    #[tokio::test]
    async fn valid_credentials_return_the_user() {
        let (repo, id) = repo_with_user("active").await;

        let user = verify_login(&repo, "dee@example.com", "correct horse")
            .await
            .unwrap();
        assert_eq!(user.id, id);
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_fail_the_same_way() {
        let (repo, _) = repo_with_user("active").await;

        let unknown = verify_login(&repo, "ghost@example.com", "correct horse").await;
        let wrong = verify_login(&repo, "dee@example.com", "battery staple").await;

        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn inactive_account_is_refused_even_with_the_right_password() {
        let (repo, _) = repo_with_user("inactive").await;

        let result = verify_login(&repo, "dee@example.com", "correct horse").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn change_password_reverifies_the_current_one() {
        let (repo, id) = repo_with_user("active").await;

        let refused = change_password(&repo, id, "admin", "battery staple", "new password").await;
        assert!(matches!(refused, Err(AuthError::InvalidCredentials)));

        change_password(&repo, id, "admin", "correct horse", "new password")
            .await
            .unwrap();

        assert!(verify_login(&repo, "dee@example.com", "correct horse").await.is_err());
        assert!(verify_login(&repo, "dee@example.com", "new password").await.is_ok());
    }
}
