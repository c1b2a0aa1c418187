//! Client (tenant) lifecycle. Admin-only; the handlers enforce the role
//! check before calling in here.

use tracing::info;

use crate::database::models::client::{Client, ClientChanges, ClientInput};
use crate::database::repository::PortfolioRepository;
use crate::error::ApiError;
use crate::services::release_objects;
use crate::storage::ObjectStorage;

pub async fn create_client(
    repo: &dyn PortfolioRepository,
    input: ClientInput,
) -> Result<Client, ApiError> {
    if input.id.trim().is_empty() {
        return Err(ApiError::bad_request("Client id must not be empty"));
    }

    let client = repo.create_client(input).await?;
    info!("Created client {}", client.id);
    Ok(client)
}

/// Update a client and write through to the denormalized copies on its
/// projects, so renamed or re-logo'd clients never drift from their case
/// studies. A replaced logo object is released after the writes succeed.
pub async fn update_client(
    repo: &dyn PortfolioRepository,
    storage: &dyn ObjectStorage,
    id: &str,
    changes: ClientChanges,
) -> Result<Client, ApiError> {
    let previous = repo
        .get_client(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("client {} not found", id)))?;

    let updated = repo.update_client(id, changes).await?;

    let touched = repo
        .sync_client_denorm(id, &updated.name, updated.logo_url.as_deref())
        .await?;
    if touched > 0 {
        info!("Refreshed denormalized client fields on {} projects", touched);
    }

    if let Some(old_logo) = &previous.logo_url {
        if previous.logo_url != updated.logo_url {
            release_objects(storage, std::slice::from_ref(old_logo)).await;
        }
    }

    Ok(updated)
}

/// Delete a client. Deletion is blocked while any project or user still
/// references the tenant; the caller gets a conflict and must reassign or
/// remove the dependents first. On success the logo object is released.
pub async fn delete_client(
    repo: &dyn PortfolioRepository,
    storage: &dyn ObjectStorage,
    id: &str,
) -> Result<(), ApiError> {
    let client = repo
        .get_client(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("client {} not found", id)))?;

    let projects = repo.count_projects_for_client(id).await?;
    let users = repo.count_users_for_client(id).await?;
    if projects > 0 || users > 0 {
        return Err(ApiError::conflict(format!(
            "Client {} is still referenced by {} project(s) and {} user(s)",
            id, projects, users
        )));
    }

    repo.delete_client(id).await?;
    info!("Deleted client {}", id);

    if let Some(logo) = &client.logo_url {
        release_objects(storage, std::slice::from_ref(logo)).await;
    }

    Ok(())
}
