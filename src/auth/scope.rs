//! Authorization scope filter: which projects a given identity may see.
//!
//! This runs server-side before any project data leaves a handler. Hiding
//! rows in the UI alone would let a client-role user read other tenants'
//! engagements straight from the repository.

use crate::auth::{Identity, Role};
use crate::database::models::project::{Project, STATUS_PUBLISHED};

/// Narrow `projects` to the subset visible to `identity`.
///
/// Rules, in order:
/// 1. anonymous: published projects only
/// 2. admin: everything, draft and archived included
/// 3. client: published projects of the client's own tenant; a client with
///    no tenant reference sees nothing
///
/// Unrecognized roles get anonymous-level visibility.
pub fn visible_projects(identity: Option<&Identity>, mut projects: Vec<Project>) -> Vec<Project> {
    projects.retain(|project| can_view(identity, project));
    projects
}

/// Single-record visibility check, same rules as [`visible_projects`].
pub fn can_view(identity: Option<&Identity>, project: &Project) -> bool {
    match identity.map(Identity::role) {
        Some(Role::Admin) => true,
        Some(Role::Client) => {
            let identity = identity.unwrap();
            match (&identity.client_id, &project.client_id) {
                (Some(own), Some(owner)) => {
                    project.status == STATUS_PUBLISHED && own == owner
                }
                _ => false,
            }
        }
        // Unknown roles and anonymous callers both see only released work.
        Some(Role::Unknown) | None => project.status == STATUS_PUBLISHED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn project(client_id: Option<&str>, status: &str) -> Project {
        Project {
            id: Uuid::new_v4(),
            title: "Agile Transformation".to_string(),
            client_id: client_id.map(|s| s.to_string()),
            client_name: "Acme".to_string(),
            client_logo_url: None,
            category: "Coaching".to_string(),
            duration: "6 months".to_string(),
            description: "<p>Engagement</p>".to_string(),
            status: status.to_string(),
            gallery: Json(vec![]),
            products: Json(vec![]),
            squad: Json(vec![]),
            agency_squad: Json(vec![]),
            updated_at: Utc::now(),
        }
    }

    fn identity(role: &str, client_id: Option<&str>) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            name: "Someone".to_string(),
            email: "someone@example.com".to_string(),
            role: role.to_string(),
            status: "active".to_string(),
            client_id: client_id.map(|s| s.to_string()),
        }
    }

    #[test]
    fn admin_sees_everything_regardless_of_status() {
        let all = vec![
            project(Some("acme"), "draft"),
            project(Some("other"), "published"),
            project(None, "archived"),
        ];
        let admin = identity("admin", None);

        let visible = visible_projects(Some(&admin), all.clone());
        assert_eq!(visible.len(), all.len());
    }

    #[test]
    fn client_sees_exactly_own_published_projects() {
        let own_published = project(Some("acme"), "published");
        let all = vec![
            own_published.clone(),
            project(Some("other"), "published"),
            project(Some("acme"), "draft"),
            project(Some("acme"), "archived"),
        ];
        let client = identity("client", Some("acme"));

        let visible = visible_projects(Some(&client), all);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, own_published.id);
    }

    #[test]
    fn client_without_tenant_reference_sees_nothing() {
        let all = vec![
            project(Some("acme"), "published"),
            project(None, "published"),
        ];
        let client = identity("client", None);

        assert!(visible_projects(Some(&client), all).is_empty());
    }

    #[test]
    fn anonymous_sees_only_published() {
        let all = vec![
            project(Some("acme"), "published"),
            project(Some("acme"), "draft"),
            project(None, "archived"),
        ];

        let visible = visible_projects(None, all);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].status, "published");
    }

    #[test]
    fn unrecognized_role_fails_closed_to_anonymous() {
        let all = vec![
            project(Some("acme"), "published"),
            project(Some("acme"), "draft"),
        ];
        // "superuser" is not a role this system defines
        let odd = identity("superuser", Some("acme"));

        let visible = visible_projects(Some(&odd), all);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].status, "published");
    }

    #[test]
    fn unowned_project_is_invisible_to_clients() {
        let all = vec![project(None, "published")];
        let client = identity("client", Some("acme"));

        assert!(visible_projects(Some(&client), all).is_empty());
    }
}
