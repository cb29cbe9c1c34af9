//! Pull-based event source bindings.

use crate::backend::LambdaBackend;
use crate::config::PullSourceSpec;
use crate::error::DeployError;
use crate::types::{DeployedResource, ResourceAction, ResourceKind};

/// Converge the function's pull-source bindings.
///
/// Per source: no existing binding means create one; otherwise every
/// matching binding gets the configured batch size, in sequence. The first
/// update failure aborts the rest. Extra bindings are never deleted.
pub async fn reconcile_event_sources<B: LambdaBackend>(
    backend: &B,
    function_name: &str,
    sources: &[PullSourceSpec],
) -> Result<Vec<DeployedResource>, DeployError> {
    if sources.is_empty() {
        tracing::debug!("no pull sources configured for {}", function_name);
        return Ok(Vec::new());
    }

    let mut resources = Vec::new();

    for source in sources {
        let existing = backend
            .list_event_source_mappings(function_name, &source.source_arn)
            .await?;

        if existing.is_empty() {
            tracing::info!(
                "creating event source mapping {} -> {}",
                source.source_arn,
                function_name
            );
            let mapping = backend
                .create_event_source_mapping(function_name, &source.source_arn, source.batch_size)
                .await?;
            resources.push(DeployedResource::new(
                ResourceKind::EventSourceMapping,
                &mapping.uuid,
                ResourceAction::Created,
            ));
        } else {
            for mapping in &existing {
                tracing::info!(
                    "updating event source mapping {} batch size to {}",
                    mapping.uuid,
                    source.batch_size
                );
                backend
                    .update_event_source_mapping(&mapping.uuid, source.batch_size)
                    .await?;
                resources.push(DeployedResource::new(
                    ResourceKind::EventSourceMapping,
                    &mapping.uuid,
                    ResourceAction::Updated,
                ));
            }
        }
    }

    Ok(resources)
}
