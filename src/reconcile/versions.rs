//! Version publication and retention.
//!
//! After a successful update the new state is frozen as an immutable
//! version, and every older version is pruned. Pruning is best-effort end
//! to end: a listing failure skips it entirely, an individual deletion
//! failure skips only that version.

use crate::backend::LambdaBackend;
use crate::error::DeployError;
use crate::types::{DeployedResource, ResourceAction, ResourceKind, VersionInfo};

/// Publish a fresh version of the function and prune stale ones.
///
/// The caller wraps this whole operation in the retry executor; publication
/// is the call most exposed to rate limiting.
pub async fn publish_and_prune<B: LambdaBackend>(
    backend: &B,
    function_name: &str,
) -> Result<(VersionInfo, Vec<DeployedResource>), DeployError> {
    let published = backend.publish_version(function_name).await?;
    tracing::info!("published version {} of {}", published.version, function_name);

    let mut resources = vec![DeployedResource::new(
        ResourceKind::Version,
        &published.version,
        ResourceAction::Created,
    )];

    let versions = match backend.list_versions(function_name).await {
        Ok(versions) => versions,
        Err(err) => {
            tracing::warn!(
                "listing versions of {} failed, skipping prune: {}",
                function_name,
                err
            );
            Vec::new()
        }
    };

    for stale in stale_versions(&versions) {
        match backend.delete_version(function_name, &stale).await {
            Ok(()) => {
                tracing::info!("deleted stale version {} of {}", stale, function_name);
                resources.push(DeployedResource::new(
                    ResourceKind::Version,
                    &stale,
                    ResourceAction::Removed,
                ));
            }
            Err(err) => {
                tracing::warn!(
                    "deleting version {} of {} failed: {}",
                    stale,
                    function_name,
                    err
                );
            }
        }
    }

    Ok((published, resources))
}

/// Everything outside the keep set: `$LATEST` and the newest published
/// version. Listing order is not trusted; versions are compared numerically.
fn stale_versions(versions: &[VersionInfo]) -> Vec<String> {
    let newest = versions
        .iter()
        .filter_map(|v| v.version.parse::<u64>().ok())
        .max();

    versions
        .iter()
        .filter(|v| !v.is_latest())
        .filter(|v| match (v.version.parse::<u64>().ok(), newest) {
            (Some(number), Some(max)) => number != max,
            _ => true,
        })
        .map(|v| v.version.clone())
        .collect()
}
