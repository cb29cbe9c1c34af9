//! Log delivery wiring.
//!
//! Grants the logging service permission to invoke a companion
//! log-processing function, then attaches a subscription filter on the
//! function's own log group. Two failures are benign: the grant already
//! existing, and the log group not existing yet (it appears lazily on first
//! invocation). Everything else, once retries are exhausted, becomes a
//! [`DeployError::Halted`] so no outer retry wrapper loops on a permanent
//! error.

use crate::backend::LambdaBackend;
use crate::config::LoggingSpec;
use crate::error::DeployError;
use crate::reconcile::INVOKE_ACTION;
use crate::retry::{with_retry, RetryPolicy};
use crate::types::{DeployedResource, ResourceAction, ResourceKind};

const LOG_GROUP_PREFIX: &str = "/functionlogs/";

/// Wire the function's logs to the configured log-processing function.
pub async fn attach_logging<B: LambdaBackend>(
    backend: &B,
    function_name: &str,
    logging: Option<&LoggingSpec>,
    retry: RetryPolicy,
) -> Result<Vec<DeployedResource>, DeployError> {
    let Some(spec) = logging else {
        tracing::debug!("no logging configured for {}", function_name);
        return Ok(Vec::new());
    };

    let mut resources = Vec::new();
    let statement_id = spec.statement_id();

    let grant = with_retry("logging-permission", retry, || {
        let fut = backend.add_permission(
            &spec.log_function_name,
            &statement_id,
            INVOKE_ACTION,
            &spec.principal,
            None,
        );
        async move { fut.await.map_err(DeployError::from) }
    })
    .await;

    match grant {
        Ok(()) => {
            resources.push(DeployedResource::new(
                ResourceKind::Permission,
                &statement_id,
                ResourceAction::Created,
            ));
        }
        Err(DeployError::Provider(err)) if err.is_already_exists() => {
            tracing::info!("logging permission {} already granted: {}", statement_id, err);
        }
        Err(DeployError::Provider(err)) => {
            tracing::error!(
                "granting logging permission {} failed permanently: {}",
                statement_id,
                err
            );
            return Err(DeployError::Halted {
                step: "logging-permission",
                source: err,
            });
        }
        Err(other) => return Err(other),
    }

    let log_group = format!("{LOG_GROUP_PREFIX}{function_name}");
    match backend
        .put_subscription_filter(&log_group, function_name, "", &spec.destination_arn)
        .await
    {
        Ok(()) => {
            tracing::info!("subscription filter on {} routed to {}", log_group, spec.destination_arn);
            resources.push(DeployedResource::new(
                ResourceKind::SubscriptionFilter,
                &log_group,
                ResourceAction::Updated,
            ));
        }
        Err(err) if err.is_not_found() => {
            // The group appears once the function first writes a log line.
            tracing::info!("log group {} not created yet: {}", log_group, err);
        }
        Err(err) if err.is_throttled() => {
            // Still transient; the caller's bounded retry owns this one.
            tracing::warn!("subscription filter on {} throttled: {}", log_group, err);
            return Err(err.into());
        }
        Err(err) => {
            tracing::error!("subscription filter on {} failed: {}", log_group, err);
            return Err(DeployError::Halted {
                step: "log-subscription-filter",
                source: err,
            });
        }
    }

    Ok(resources)
}
