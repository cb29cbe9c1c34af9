//! Push-style topic subscriptions.
//!
//! For each configured topic: ensure the topic exists, subscribe the
//! function, swap the invoke grant (revoke stale, grant fresh). Topics are
//! processed one at a time, in input order — statement ids can collide
//! across topics that share a function, so this must stay serial.

use crate::backend::LambdaBackend;
use crate::config::PushSourceSpec;
use crate::error::DeployError;
use crate::reconcile::INVOKE_ACTION;
use crate::types::{DeployedResource, ResourceAction, ResourceKind};

const PUSH_PRINCIPAL: &str = "sns.amazonaws.com";
const SUBSCRIPTION_PROTOCOL: &str = "lambda";

/// Converge the function's push subscriptions.
pub async fn reconcile_push_subscriptions<B: LambdaBackend>(
    backend: &B,
    function_name: &str,
    function_arn: &str,
    sources: &[PushSourceSpec],
) -> Result<Vec<DeployedResource>, DeployError> {
    if sources.is_empty() {
        tracing::debug!("no push sources configured for {}", function_name);
        return Ok(Vec::new());
    }

    let mut resources = Vec::new();

    for (index, source) in sources.iter().enumerate() {
        tracing::info!(
            "push source {}/{}: {}",
            index + 1,
            sources.len(),
            source.topic_arn
        );

        // Lookup compares the full ARN; creation only has the short name.
        let topics = backend.list_topics().await?;
        if topics.iter().any(|arn| arn == &source.topic_arn) {
            resources.push(DeployedResource::new(
                ResourceKind::Topic,
                &source.topic_arn,
                ResourceAction::Found,
            ));
        } else {
            tracing::info!(
                "topic {} not listed, creating {}",
                source.topic_arn,
                source.short_name()
            );
            let created = backend.create_topic(source.short_name()).await?;
            resources.push(DeployedResource::new(
                ResourceKind::Topic,
                &created,
                ResourceAction::Created,
            ));
        }

        backend
            .subscribe(&source.topic_arn, SUBSCRIPTION_PROTOCOL, function_arn)
            .await?;
        resources.push(DeployedResource::new(
            ResourceKind::Subscription,
            &source.topic_arn,
            ResourceAction::Created,
        ));

        // Revoke the stale grant. Absence is expected on first deploys, and
        // no revoke failure may block the fresh grant below.
        match backend
            .remove_permission(function_name, &source.statement_id)
            .await
        {
            Ok(()) => {
                tracing::info!("removed stale permission {}", source.statement_id);
                resources.push(DeployedResource::new(
                    ResourceKind::Permission,
                    &source.statement_id,
                    ResourceAction::Removed,
                ));
            }
            Err(err) if err.is_not_found() => {
                tracing::info!("no existing permission {}: {}", source.statement_id, err);
            }
            Err(err) => {
                tracing::warn!("removing permission {} failed: {}", source.statement_id, err);
            }
        }

        match backend
            .add_permission(
                function_name,
                &source.statement_id,
                INVOKE_ACTION,
                PUSH_PRINCIPAL,
                Some(source.topic_arn.as_str()),
            )
            .await
        {
            Ok(()) => {
                resources.push(DeployedResource::new(
                    ResourceKind::Permission,
                    &source.statement_id,
                    ResourceAction::Created,
                ));
            }
            Err(err) if err.is_already_exists() => {
                tracing::info!(
                    "permission {} already in place: {}",
                    source.statement_id,
                    err
                );
            }
            Err(err) => {
                tracing::error!("granting permission {} failed: {}", source.statement_id, err);
                return Err(err.into());
            }
        }
    }

    Ok(resources)
}
