//! Recurring schedule trigger.
//!
//! A stale rule or permission does not stop the function from working, so
//! everything here is log-and-continue — except attaching the function as
//! the rule's target, which is the point of the exercise and must propagate.

use crate::backend::LambdaBackend;
use crate::config::ScheduleSpec;
use crate::error::DeployError;
use crate::reconcile::INVOKE_ACTION;
use crate::types::{DeployedResource, ResourceAction, ResourceKind};

const SCHEDULE_PRINCIPAL: &str = "events.amazonaws.com";

/// Converge the function's schedule rule, permission, and target.
///
/// A spec missing any of rule name, description, or expression is treated
/// as "not configured": zero calls, no error.
pub async fn reconcile_schedule<B: LambdaBackend>(
    backend: &B,
    function_name: &str,
    function_arn: &str,
    environment: &str,
    schedule: Option<&ScheduleSpec>,
) -> Result<Vec<DeployedResource>, DeployError> {
    let Some(spec) = schedule else {
        return Ok(Vec::new());
    };
    let Some(rule) = spec.configured() else {
        tracing::debug!("schedule for {} incomplete, skipping", function_name);
        return Ok(Vec::new());
    };

    let mut resources = Vec::new();

    let rule_arn = match backend
        .put_rule(rule.rule_name, rule.expression, rule.description)
        .await
    {
        Ok(arn) => {
            tracing::info!("upserted rule {} ({})", rule.rule_name, arn);
            resources.push(DeployedResource::new(
                ResourceKind::Rule,
                &arn,
                ResourceAction::Updated,
            ));
            Some(arn)
        }
        Err(err) => {
            tracing::warn!("upserting rule {} failed: {}", rule.rule_name, err);
            None
        }
    };

    let statement_id = rule.statement_id(environment);
    match backend.remove_permission(function_name, &statement_id).await {
        Ok(()) => tracing::info!("removed stale permission {}", statement_id),
        Err(err) if err.is_not_found() => {
            tracing::info!("no existing permission {}: {}", statement_id, err);
        }
        Err(err) => tracing::warn!("removing permission {} failed: {}", statement_id, err),
    }

    match &rule_arn {
        Some(arn) => {
            match backend
                .add_permission(
                    function_name,
                    &statement_id,
                    INVOKE_ACTION,
                    SCHEDULE_PRINCIPAL,
                    Some(arn.as_str()),
                )
                .await
            {
                Ok(()) => {
                    resources.push(DeployedResource::new(
                        ResourceKind::Permission,
                        &statement_id,
                        ResourceAction::Created,
                    ));
                }
                Err(err) if err.is_already_exists() => {
                    tracing::info!("permission {} already in place: {}", statement_id, err);
                }
                Err(err) => {
                    tracing::warn!("granting permission {} failed: {}", statement_id, err);
                }
            }
        }
        None => {
            tracing::warn!("skipping permission grant {}: rule ARN unknown", statement_id);
        }
    }

    let target_id = format!("{function_name}-1");
    if let Err(err) = backend
        .put_rule_target(rule.rule_name, &target_id, function_arn)
        .await
    {
        tracing::error!(
            "attaching target {} to rule {} failed: {}",
            target_id,
            rule.rule_name,
            err
        );
        return Err(err.into());
    }
    resources.push(DeployedResource::new(
        ResourceKind::RuleTarget,
        &target_id,
        ResourceAction::Created,
    ));

    Ok(resources)
}
