//! In-memory fakes for the repository and storage boundaries.
//!
//! Both the unit tests and the integration suites build the real router over
//! these, so auth, scoping and cleanup behavior can be exercised without a
//! Postgres instance or an object store.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::client::{Client, ClientChanges, ClientInput};
use crate::database::models::project::Project;
use crate::database::models::user::{User, UserInput, UserUpdate};
use crate::database::repository::{PortfolioRepository, RepositoryError};
use crate::storage::{object_key, ObjectStorage, StorageError};

#[derive(Default)]
pub struct MemoryRepository {
    users: RwLock<HashMap<Uuid, User>>,
    clients: RwLock<HashMap<String, Client>>,
    projects: RwLock<HashMap<Uuid, Project>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    pub async fn insert_client(&self, client: Client) {
        self.clients.write().await.insert(client.id.clone(), client);
    }

    pub async fn insert_project(&self, project: Project) {
        self.projects.write().await.insert(project.id, project);
    }
}

#[async_trait]
impl PortfolioRepository for MemoryRepository {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_id_role(
        &self,
        id: Uuid,
        role: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.get(&id).filter(|u| u.role == role).cloned())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(all)
    }

    async fn create_user(&self, input: UserInput) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == input.email) {
            return Err(RepositoryError::Conflict("user email already exists".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            password_hash: input.password_hash,
            role: input.role,
            status: input.status,
            client_id: input.client_id,
            updated_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;

        // Same unique-email behavior the database enforces with a constraint.
        if let Some(email) = &update.email {
            if users.values().any(|u| u.id != id && &u.email == email) {
                return Err(RepositoryError::Conflict("user email already exists".to_string()));
            }
        }

        let user = users
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(format!("user {} not found", id)))?;

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(hash) = update.password_hash {
            user.password_hash = hash;
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(status) = update.status {
            user.status = status;
        }
        if let Some(client_id) = update.client_id {
            user.client_id = client_id;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), RepositoryError> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(format!("user {} not found", id)))
    }

    async fn list_clients(&self) -> Result<Vec<Client>, RepositoryError> {
        let clients = self.clients.read().await;
        let mut all: Vec<Client> = clients.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn get_client(&self, id: &str) -> Result<Option<Client>, RepositoryError> {
        Ok(self.clients.read().await.get(id).cloned())
    }

    async fn create_client(&self, input: ClientInput) -> Result<Client, RepositoryError> {
        let mut clients = self.clients.write().await;
        if clients.contains_key(&input.id) {
            return Err(RepositoryError::Conflict("client already exists".to_string()));
        }

        let client = Client {
            id: input.id.clone(),
            name: input.name,
            industry: input.industry,
            logo_url: input.logo_url,
            status: input.status,
            updated_at: Utc::now(),
        };
        clients.insert(input.id, client.clone());
        Ok(client)
    }

    async fn update_client(
        &self,
        id: &str,
        changes: ClientChanges,
    ) -> Result<Client, RepositoryError> {
        let mut clients = self.clients.write().await;
        let client = clients
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(format!("client {} not found", id)))?;

        client.name = changes.name;
        client.industry = changes.industry;
        client.logo_url = changes.logo_url;
        client.status = changes.status;
        client.updated_at = Utc::now();
        Ok(client.clone())
    }

    async fn delete_client(&self, id: &str) -> Result<(), RepositoryError> {
        self.clients
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(format!("client {} not found", id)))
    }

    async fn count_projects_for_client(&self, id: &str) -> Result<i64, RepositoryError> {
        let projects = self.projects.read().await;
        Ok(projects
            .values()
            .filter(|p| p.client_id.as_deref() == Some(id))
            .count() as i64)
    }

    async fn count_users_for_client(&self, id: &str) -> Result<i64, RepositoryError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .filter(|u| u.client_id.as_deref() == Some(id))
            .count() as i64)
    }

    async fn sync_client_denorm(
        &self,
        client_id: &str,
        name: &str,
        logo_url: Option<&str>,
    ) -> Result<u64, RepositoryError> {
        let mut projects = self.projects.write().await;
        let mut touched = 0;
        for project in projects.values_mut() {
            if project.client_id.as_deref() == Some(client_id) {
                project.client_name = name.to_string();
                project.client_logo_url = logo_url.map(|s| s.to_string());
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, RepositoryError> {
        let projects = self.projects.read().await;
        let mut all: Vec<Project> = projects.values().cloned().collect();
        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(all)
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, RepositoryError> {
        Ok(self.projects.read().await.get(&id).cloned())
    }

    async fn create_project(&self, project: Project) -> Result<Project, RepositoryError> {
        let mut projects = self.projects.write().await;
        if projects.contains_key(&project.id) {
            return Err(RepositoryError::Conflict("project already exists".to_string()));
        }
        projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn update_project(&self, project: Project) -> Result<Project, RepositoryError> {
        let mut projects = self.projects.write().await;
        if !projects.contains_key(&project.id) {
            return Err(RepositoryError::NotFound(format!(
                "project {} not found",
                project.id
            )));
        }
        projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), RepositoryError> {
        self.projects
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(format!("project {} not found", id)))
    }
}

/// Object-store fake that remembers every call, so tests can assert on
/// upload/delete traffic (for example: a second project delete must not
/// touch storage again).
#[derive(Default)]
pub struct MemoryStorage {
    objects: RwLock<HashSet<String>>,
    uploads: RwLock<Vec<String>>,
    deletes: RwLock<Vec<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend `url` was uploaded earlier.
    pub async fn seed_object(&self, url: impl Into<String>) {
        self.objects.write().await.insert(url.into());
    }

    pub async fn contains(&self, url: &str) -> bool {
        self.objects.read().await.contains(url)
    }

    pub async fn upload_calls(&self) -> Vec<String> {
        self.uploads.read().await.clone()
    }

    pub async fn delete_calls(&self) -> Vec<String> {
        self.deletes.read().await.clone()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(
        &self,
        _bytes: Vec<u8>,
        content_type: &str,
        path_hint: &str,
    ) -> Result<String, StorageError> {
        let url = format!("memory://bucket/{}", object_key(path_hint, content_type));
        self.objects.write().await.insert(url.clone());
        self.uploads.write().await.push(url.clone());
        Ok(url)
    }

    async fn delete(&self, public_url: &str) -> Result<(), StorageError> {
        self.deletes.write().await.push(public_url.to_string());
        if self.objects.write().await.remove(public_url) {
            Ok(())
        } else {
            Err(StorageError::Delete(format!("no such object: {}", public_url)))
        }
    }
}
