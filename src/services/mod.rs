pub mod auth_service;
pub mod client_service;
pub mod project_service;

use futures::future::join_all;
use tracing::warn;

use crate::storage::ObjectStorage;

/// Best-effort cleanup of storage objects that are no longer referenced by
/// any record. The authoritative row write has already succeeded by the time
/// this runs; a failed delete leaves an orphaned object, which is logged and
/// otherwise tolerated.
pub async fn release_objects(storage: &dyn ObjectStorage, urls: &[String]) {
    let results = join_all(urls.iter().map(|url| storage.delete(url))).await;

    for (url, result) in urls.iter().zip(results) {
        if let Err(e) = result {
            warn!("Failed to release storage object {}: {}", url, e);
        }
    }
}
