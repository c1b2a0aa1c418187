use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_ARCHIVED: &str = "archived";

/// Shown in list views when a project has no gallery images yet.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub url: String,
    pub alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// One coaching engagement record (case study).
///
/// `client_name` and `client_logo_url` are denormalized copies of the owning
/// client's fields, refreshed write-through whenever the client changes (see
/// `ClientService::update_client`). Gallery, products and the two squad
/// rosters live in JSONB columns; `sqlx::types::Json` keeps the
/// (de)serialization inside the repository so the rest of the code only ever
/// sees structured lists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub client_id: Option<String>,
    pub client_name: String,
    pub client_logo_url: Option<String>,
    pub category: String,
    pub duration: String,
    /// Sanitized HTML from the rich-text editor.
    pub description: String,
    pub status: String,
    pub gallery: Json<Vec<GalleryImage>>,
    pub products: Json<Vec<String>>,
    pub squad: Json<Vec<TeamMember>>,
    pub agency_squad: Json<Vec<TeamMember>>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// The single cover image exposed to list views: the first gallery image,
    /// or the placeholder when the gallery is empty.
    pub fn cover_image(&self) -> &str {
        self.gallery
            .0
            .first()
            .map(|image| image.url.as_str())
            .unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// Every uploaded object this project references: gallery images plus
    /// squad avatars, deduplicated. Used to release storage on delete.
    pub fn image_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        for image in &self.gallery.0 {
            urls.push(image.url.clone());
        }
        for member in self.squad.0.iter().chain(self.agency_squad.0.iter()) {
            if let Some(avatar) = &member.avatar_url {
                urls.push(avatar.clone());
            }
        }
        urls.sort();
        urls.dedup();
        // The placeholder is not a stored object
        urls.retain(|u| u != PLACEHOLDER_IMAGE);
        urls
    }
}

/// Fields accepted when creating or replacing a project. The denormalized
/// client fields are filled in from the clients table, not from the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInput {
    pub title: String,
    pub client_id: Option<String>,
    pub category: String,
    pub duration: String,
    pub description: String,
    pub status: String,
    #[serde(default)]
    pub gallery: Vec<GalleryImage>,
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub squad: Vec<TeamMember>,
    #[serde(default)]
    pub agency_squad: Vec<TeamMember>,
}
