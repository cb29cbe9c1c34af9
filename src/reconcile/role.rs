//! Execution role resolution.
//!
//! Ensures the function's execution role exists with the fixed trust
//! document and the caller's inline policies. A freshly created role is not
//! referenceable until the provider's identity plane has propagated it, so
//! creation is followed by an unconditional pause.

use crate::backend::LambdaBackend;
use crate::config::RoleSpec;
use crate::error::DeployError;
use crate::types::{DeployedResource, ResourceAction, ResourceKind, RoleDescriptor};
use std::time::Duration;

/// Trust document attached to every role this crate creates: the compute
/// service may assume it, nothing else.
pub const ASSUME_ROLE_POLICY: &str = r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Principal":{"Service":"lambda.amazonaws.com"},"Action":"sts:AssumeRole"}]}"#;

/// Resolve the execution role for a deploy.
///
/// An `Existing` spec short-circuits with zero network calls. A `Managed`
/// spec is looked up by name, created on absence (then paused for
/// propagation), and has its inline policies attached sequentially in input
/// order. Partial attachment on failure is possible and is not rolled back.
pub async fn resolve_role<B: LambdaBackend>(
    backend: &B,
    spec: &RoleSpec,
    propagation_delay: Duration,
) -> Result<(RoleDescriptor, Vec<DeployedResource>), DeployError> {
    let (name, policies) = match spec {
        RoleSpec::Existing { role_arn } => {
            tracing::debug!("using caller-supplied role {}", role_arn);
            let role = RoleDescriptor {
                name: role_name_from_arn(role_arn),
                arn: role_arn.clone(),
            };
            return Ok((role, Vec::new()));
        }
        RoleSpec::Managed { name, policies } => (name, policies),
    };

    let mut resources = Vec::new();

    let role = match backend.get_role(name).await {
        Ok(role) => {
            tracing::info!("role {} already exists", name);
            resources.push(DeployedResource::new(
                ResourceKind::Role,
                &role.arn,
                ResourceAction::Found,
            ));
            role
        }
        Err(err) if err.is_not_found() => {
            tracing::info!("role {} not found, creating", name);
            let role = backend.create_role(name, ASSUME_ROLE_POLICY).await?;
            resources.push(DeployedResource::new(
                ResourceKind::Role,
                &role.arn,
                ResourceAction::Created,
            ));
            // The new role is not usable by the compute plane until it has
            // propagated. Fixed pause, not polled.
            tracing::info!("pausing {:?} for role {} to propagate", propagation_delay, name);
            tokio::time::sleep(propagation_delay).await;
            role
        }
        Err(err) => {
            tracing::error!("looking up role {} failed: {}", name, err);
            return Err(err.into());
        }
    };

    for policy in policies {
        if let Err(err) = backend
            .put_role_policy(&role.name, &policy.name, &policy.document)
            .await
        {
            tracing::error!(
                "attaching policy {} to role {} failed: {}",
                policy.name,
                role.name,
                err
            );
            return Err(err.into());
        }
        resources.push(DeployedResource::new(
            ResourceKind::RolePolicy,
            &policy.name,
            ResourceAction::Created,
        ));
    }

    Ok((role, resources))
}

fn role_name_from_arn(arn: &str) -> String {
    arn.rsplit('/').next().unwrap_or(arn).to_string()
}
