//! Project (case study) lifecycle and the image-ordering contract: new
//! objects are uploaded before the row that references them is written, and
//! stale objects are released only after the authoritative write succeeds.

use chrono::Utc;
use sqlx::types::Json;
use tracing::info;
use uuid::Uuid;

use crate::database::models::project::{Project, ProjectInput};
use crate::database::repository::PortfolioRepository;
use crate::error::ApiError;
use crate::services::release_objects;
use crate::storage::ObjectStorage;

/// Resolve the denormalized client name/logo for a project being written.
/// The caller's input never supplies these; they always come from the
/// clients table so they cannot drift at write time.
async fn denormalized_client_fields(
    repo: &dyn PortfolioRepository,
    client_id: Option<&str>,
) -> Result<(String, Option<String>), ApiError> {
    match client_id {
        None => Ok((String::new(), None)),
        Some(id) => {
            let client = repo
                .get_client(id)
                .await?
                .ok_or_else(|| ApiError::bad_request(format!("unknown client: {}", id)))?;
            Ok((client.name, client.logo_url))
        }
    }
}

pub async fn create_project(
    repo: &dyn PortfolioRepository,
    input: ProjectInput,
) -> Result<Project, ApiError> {
    let (client_name, client_logo_url) =
        denormalized_client_fields(repo, input.client_id.as_deref()).await?;

    let project = Project {
        id: Uuid::new_v4(),
        title: input.title,
        client_id: input.client_id,
        client_name,
        client_logo_url,
        category: input.category,
        duration: input.duration,
        description: input.description,
        status: input.status,
        gallery: Json(input.gallery),
        products: Json(input.products),
        squad: Json(input.squad),
        agency_squad: Json(input.agency_squad),
        updated_at: Utc::now(),
    };

    let created = repo.create_project(project).await?;
    info!("Created project {} ({})", created.id, created.title);
    Ok(created)
}

/// Replace a project. Gallery images and avatars referenced by the incoming
/// input were uploaded beforehand; once the row write succeeds, objects the
/// old revision referenced but the new one does not are released.
pub async fn update_project(
    repo: &dyn PortfolioRepository,
    storage: &dyn ObjectStorage,
    id: Uuid,
    input: ProjectInput,
) -> Result<Project, ApiError> {
    let previous = repo
        .get_project(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("project {} not found", id)))?;

    let (client_name, client_logo_url) =
        denormalized_client_fields(repo, input.client_id.as_deref()).await?;

    let project = Project {
        id,
        title: input.title,
        client_id: input.client_id,
        client_name,
        client_logo_url,
        category: input.category,
        duration: input.duration,
        description: input.description,
        status: input.status,
        gallery: Json(input.gallery),
        products: Json(input.products),
        squad: Json(input.squad),
        agency_squad: Json(input.agency_squad),
        updated_at: Utc::now(),
    };

    let updated = repo.update_project(project).await?;

    let kept = updated.image_urls();
    let stale: Vec<String> = previous
        .image_urls()
        .into_iter()
        .filter(|url| !kept.contains(url))
        .collect();
    if !stale.is_empty() {
        release_objects(storage, &stale).await;
    }

    info!("Updated project {}", id);
    Ok(updated)
}

/// Delete a project and release every image it referenced. The row delete is
/// the authoritative step; a second call for the same id returns `NotFound`
/// from the initial fetch and never reaches storage again.
pub async fn delete_project(
    repo: &dyn PortfolioRepository,
    storage: &dyn ObjectStorage,
    id: Uuid,
) -> Result<(), ApiError> {
    let project = repo
        .get_project(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("project {} not found", id)))?;

    repo.delete_project(id).await?;
    info!("Deleted project {}", id);

    let urls = project.image_urls();
    if !urls.is_empty() {
        release_objects(storage, &urls).await;
    }

    Ok(())
}
