use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::config;
use crate::database::models::client::{Client, ClientChanges, ClientInput};
use crate::database::models::project::Project;
use crate::database::models::user::{User, UserInput, UserUpdate};
use crate::database::repository::{PortfolioRepository, RepositoryError};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, status, client_id, updated_at";
const CLIENT_COLUMNS: &str = "id, name, industry, logo_url, status, updated_at";
const PROJECT_COLUMNS: &str = "id, title, client_id, client_name, client_logo_url, category, \
     duration, description, status, gallery, products, squad, agency_squad, updated_at";

/// Postgres-backed repository. Schema lives in `sql/schema.sql`.
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub async fn connect(database_url: &str) -> Result<Self, RepositoryError> {
        let db_config = &config::config().database;

        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .acquire_timeout(Duration::from_secs(db_config.connect_timeout_secs))
            .connect(database_url)
            .await
            .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?;

        info!("Connected to portfolio database");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique-constraint violations surface as conflicts (duplicate email or
/// client slug); everything else stays a raw sqlx error.
fn map_insert_error(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return RepositoryError::Conflict(format!("{} already exists", what));
        }
    }
    RepositoryError::Sqlx(err)
}

#[async_trait]
impl PortfolioRepository for PgRepository {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user_by_id_role(
        &self,
        id: Uuid,
        role: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND role = $2"
        ))
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY updated_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn create_user(&self, input: UserInput) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash, role, status, client_id, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, now()) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(input.name)
        .bind(input.email)
        .bind(input.password_hash)
        .bind(input.role)
        .bind(input.status)
        .bind(input.client_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "user email"))?;

        Ok(user)
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<User, RepositoryError> {
        let set_client = update.client_id.is_some();
        let client_id = update.client_id.flatten();

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                email = COALESCE($3, email), \
                password_hash = COALESCE($4, password_hash), \
                role = COALESCE($5, role), \
                status = COALESCE($6, status), \
                client_id = CASE WHEN $7 THEN $8 ELSE client_id END, \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(update.name)
        .bind(update.email)
        .bind(update.password_hash)
        .bind(update.role)
        .bind(update.status)
        .bind(set_client)
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "user email"))?;

        user.ok_or_else(|| RepositoryError::NotFound(format!("user {} not found", id)))
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("user {} not found", id)));
        }
        Ok(())
    }

    async fn list_clients(&self) -> Result<Vec<Client>, RepositoryError> {
        let clients = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    async fn get_client(&self, id: &str) -> Result<Option<Client>, RepositoryError> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    async fn create_client(&self, input: ClientInput) -> Result<Client, RepositoryError> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "INSERT INTO clients (id, name, industry, logo_url, status, updated_at) \
             VALUES ($1, $2, $3, $4, $5, now()) \
             RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(input.id)
        .bind(input.name)
        .bind(input.industry)
        .bind(input.logo_url)
        .bind(input.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "client"))?;

        Ok(client)
    }

    async fn update_client(
        &self,
        id: &str,
        changes: ClientChanges,
    ) -> Result<Client, RepositoryError> {
        let client = sqlx::query_as::<_, Client>(&format!(
            "UPDATE clients SET name = $2, industry = $3, logo_url = $4, status = $5, \
             updated_at = now() WHERE id = $1 RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.industry)
        .bind(changes.logo_url)
        .bind(changes.status)
        .fetch_optional(&self.pool)
        .await?;

        client.ok_or_else(|| RepositoryError::NotFound(format!("client {} not found", id)))
    }

    async fn delete_client(&self, id: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("client {} not found", id)));
        }
        Ok(())
    }

    async fn count_projects_for_client(&self, id: &str) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE client_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_users_for_client(&self, id: &str) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE client_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn sync_client_denorm(
        &self,
        client_id: &str,
        name: &str,
        logo_url: Option<&str>,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE projects SET client_name = $2, client_logo_url = $3 WHERE client_id = $1",
        )
        .bind(client_id)
        .bind(name)
        .bind(logo_url)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, RepositoryError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY updated_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, RepositoryError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn create_project(&self, project: Project) -> Result<Project, RepositoryError> {
        let created = sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects (id, title, client_id, client_name, client_logo_url, category, \
             duration, description, status, gallery, products, squad, agency_squad, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, now()) \
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(project.id)
        .bind(project.title)
        .bind(project.client_id)
        .bind(project.client_name)
        .bind(project.client_logo_url)
        .bind(project.category)
        .bind(project.duration)
        .bind(project.description)
        .bind(project.status)
        .bind(project.gallery)
        .bind(project.products)
        .bind(project.squad)
        .bind(project.agency_squad)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "project"))?;

        Ok(created)
    }

    async fn update_project(&self, project: Project) -> Result<Project, RepositoryError> {
        let updated = sqlx::query_as::<_, Project>(&format!(
            "UPDATE projects SET title = $2, client_id = $3, client_name = $4, \
             client_logo_url = $5, category = $6, duration = $7, description = $8, status = $9, \
             gallery = $10, products = $11, squad = $12, agency_squad = $13, updated_at = now() \
             WHERE id = $1 RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(project.id)
        .bind(project.title)
        .bind(project.client_id)
        .bind(project.client_name)
        .bind(project.client_logo_url)
        .bind(project.category)
        .bind(project.duration)
        .bind(project.description)
        .bind(project.status)
        .bind(project.gallery)
        .bind(project.products)
        .bind(project.squad)
        .bind(project.agency_squad)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| RepositoryError::NotFound(format!("project {} not found", project.id)))
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("project {} not found", id)));
        }
        Ok(())
    }
}
