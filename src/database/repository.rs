use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::client::{Client, ClientChanges, ClientInput};
use crate::database::models::project::Project;
use crate::database::models::user::{User, UserInput, UserUpdate};

/// Errors crossing the repository boundary. Internal query/connection detail
/// is logged where it is converted to an `ApiError`, never sent to clients.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// CRUD contract over the three entities (clients, users, projects).
///
/// A handle to this trait is passed into the router state rather than held as
/// a process-wide singleton, so tests can substitute the in-memory fake in
/// `crate::testing`. Single-row atomicity is all that is assumed of the
/// backing store.
#[async_trait]
pub trait PortfolioRepository: Send + Sync {
    /// Cheap connectivity probe for `/health`.
    async fn ping(&self) -> Result<(), RepositoryError>;

    // --- users ---

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Lookup by (id, role) pair. The session resolver uses this so that a
    /// role change invalidates outstanding sessions on their next request.
    async fn get_user_by_id_role(&self, id: Uuid, role: &str)
        -> Result<Option<User>, RepositoryError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;
    async fn create_user(&self, input: UserInput) -> Result<User, RepositoryError>;
    async fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<User, RepositoryError>;
    async fn delete_user(&self, id: Uuid) -> Result<(), RepositoryError>;

    // --- clients ---

    async fn list_clients(&self) -> Result<Vec<Client>, RepositoryError>;
    async fn get_client(&self, id: &str) -> Result<Option<Client>, RepositoryError>;
    async fn create_client(&self, input: ClientInput) -> Result<Client, RepositoryError>;
    async fn update_client(&self, id: &str, changes: ClientChanges)
        -> Result<Client, RepositoryError>;
    async fn delete_client(&self, id: &str) -> Result<(), RepositoryError>;

    /// How many projects still reference this client (delete-blocking policy).
    async fn count_projects_for_client(&self, id: &str) -> Result<i64, RepositoryError>;
    /// How many users still reference this client (delete-blocking policy).
    async fn count_users_for_client(&self, id: &str) -> Result<i64, RepositoryError>;

    /// Write-through refresh of the denormalized client name/logo on every
    /// project owned by `client_id`. Returns the number of rows touched.
    async fn sync_client_denorm(
        &self,
        client_id: &str,
        name: &str,
        logo_url: Option<&str>,
    ) -> Result<u64, RepositoryError>;

    // --- projects ---

    async fn list_projects(&self) -> Result<Vec<Project>, RepositoryError>;
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, RepositoryError>;
    async fn create_project(&self, project: Project) -> Result<Project, RepositoryError>;
    async fn update_project(&self, project: Project) -> Result<Project, RepositoryError>;
    async fn delete_project(&self, id: Uuid) -> Result<(), RepositoryError>;
}
