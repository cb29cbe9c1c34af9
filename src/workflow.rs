//! The deployment workflow spine.
//!
//! One deploy is a strictly sequential pipeline: probe the function, resolve
//! the execution role, then branch on a single boolean — did the function
//! already exist. Each step suspends until its call resolves; there is no
//! fan-out, no cancellation, and no coordination between concurrent deploys
//! of the same function (the caller enforces at-most-one-in-flight).
//!
//! A deploy either fully completes in its defined order or aborts at the
//! first unrecovered failure; every step failure is logged with the step
//! name and the raw provider error before it propagates.

use crate::backend::LambdaBackend;
use crate::config::{DeployRequest, FunctionConfig, FunctionSpec};
use crate::error::DeployError;
use crate::reconcile::{events, logs, push, role, schedule, versions};
use crate::retry::{with_retry, RetryPolicy};
use crate::types::{
    DeployReport, DeployedResource, FunctionDescription, ResourceAction, ResourceKind,
};
use std::future::Future;
use std::time::Duration;

/// Workflow tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct WorkflowConfig {
    /// Unconditional pause after creating a fresh execution role, so the
    /// identity plane can catch up before the role is referenced.
    pub role_propagation_delay: Duration,
    /// Retry policy for the calls prone to provider-side throttling.
    pub retry: RetryPolicy,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            role_propagation_delay: Duration::from_secs(8),
            retry: RetryPolicy::default(),
        }
    }
}

/// The deployment orchestrator.
///
/// Parameterized by the backend — you provide the control-plane
/// implementation, the workflow provides the ordering, branching, and error
/// classification.
pub struct DeployWorkflow<'a, B: LambdaBackend> {
    backend: &'a B,
    config: WorkflowConfig,
}

impl<'a, B: LambdaBackend> DeployWorkflow<'a, B> {
    pub fn new(backend: &'a B, config: WorkflowConfig) -> Self {
        Self { backend, config }
    }

    /// Run one deploy to completion.
    ///
    /// Returns the report of every resource this run touched, or the first
    /// unrecovered failure labeled with its step.
    pub async fn deploy(
        &self,
        spec: &FunctionSpec,
        request: &DeployRequest,
    ) -> Result<DeployReport, DeployError> {
        if spec.base_name.is_empty() {
            return Err(DeployError::InvalidSpec("function base name is empty".into()));
        }
        if request.environment.is_empty() {
            return Err(DeployError::InvalidSpec("environment name is empty".into()));
        }

        let mut config = FunctionConfig::new(spec, request);
        let mut report = DeployReport::new(&config.function_name);

        let existing = self.probe_function(&config.function_name).await?;

        // Identity resolution comes first on both paths.
        let role_spec = spec.role_spec(&config.function_name);
        let (role, resources) = self
            .step(
                "resolve-role",
                role::resolve_role(self.backend, &role_spec, self.config.role_propagation_delay),
            )
            .await?;
        report.extend(resources);
        config.role_arn = Some(role.arn);

        let config = &config;
        match existing {
            Some(description) => {
                self.update_existing(spec, request, config, description, &mut report)
                    .await?;
            }
            None => {
                self.create_fresh(spec, request, config, &mut report).await?;
            }
        }

        tracing::info!(
            "deploy of {} finished, {} resource(s) touched",
            config.function_name,
            report.resources.len()
        );
        Ok(report)
    }

    /// Existence probe. Absence is not an error; anything else is fatal.
    async fn probe_function(
        &self,
        function_name: &str,
    ) -> Result<Option<FunctionDescription>, DeployError> {
        match self.backend.describe_function(function_name).await {
            Ok(description) => Ok(Some(description)),
            Err(err) if err.is_not_found() => {
                tracing::info!("function {} not found, will create", function_name);
                Ok(None)
            }
            Err(err) => {
                tracing::error!("probing function {} failed: {}", function_name, err);
                Err(DeployError::Step {
                    step: "probe-function",
                    source: err,
                })
            }
        }
    }

    /// First deploy of this function. Never publishes a version.
    async fn create_fresh(
        &self,
        spec: &FunctionSpec,
        request: &DeployRequest,
        config: &FunctionConfig,
        report: &mut DeployReport,
    ) -> Result<(), DeployError> {
        tracing::info!("creating function {}", config.function_name);

        let description = self
            .step("create-function", async {
                self.backend
                    .create_function(config, &request.code)
                    .await
                    .map_err(DeployError::from)
            })
            .await?;
        report.created = true;
        report.function_arn = Some(description.function_arn.clone());
        report.push(DeployedResource::new(
            ResourceKind::Function,
            &description.function_arn,
            ResourceAction::Created,
        ));

        let resources = self
            .step(
                "event-sources",
                events::reconcile_event_sources(
                    self.backend,
                    &config.function_name,
                    &spec.pull_sources,
                ),
            )
            .await?;
        report.extend(resources);

        let resources = self
            .step(
                "push-subscriptions",
                push::reconcile_push_subscriptions(
                    self.backend,
                    &config.function_name,
                    &description.function_arn,
                    &spec.push_sources,
                ),
            )
            .await?;
        report.extend(resources);

        let resources = self
            .step(
                "attach-logging",
                with_retry("attach-logging", self.config.retry, move || {
                    logs::attach_logging(
                        self.backend,
                        &config.function_name,
                        spec.logging.as_ref(),
                        self.config.retry,
                    )
                }),
            )
            .await?;
        report.extend(resources);

        let resources = self
            .step(
                "schedule",
                schedule::reconcile_schedule(
                    self.backend,
                    &config.function_name,
                    &description.function_arn,
                    &request.environment,
                    spec.schedule.as_ref(),
                ),
            )
            .await?;
        report.extend(resources);

        Ok(())
    }

    /// The function exists: replace code, re-apply configuration, converge
    /// the dependent resources, then freeze and prune versions.
    async fn update_existing(
        &self,
        spec: &FunctionSpec,
        request: &DeployRequest,
        config: &FunctionConfig,
        existing: FunctionDescription,
        report: &mut DeployReport,
    ) -> Result<(), DeployError> {
        tracing::info!("function {} already exists, updating", config.function_name);
        report.function_arn = Some(existing.function_arn.clone());

        self.step("update-code", async {
            self.backend
                .update_function_code(&config.function_name, &request.code)
                .await
                .map_err(DeployError::from)
        })
        .await?;

        // Configuration is re-applied after every code update, even though
        // the two calls are independent. This call is the most frequently
        // throttled one in the whole workflow.
        self.step(
            "update-configuration",
            with_retry("update-configuration", self.config.retry, move || {
                let fut = self.backend.update_function_configuration(config);
                async move { fut.await.map_err(DeployError::from) }
            }),
        )
        .await?;
        report.push(DeployedResource::new(
            ResourceKind::Function,
            &existing.function_arn,
            ResourceAction::Updated,
        ));

        let resources = self
            .step(
                "event-sources",
                with_retry("event-sources", self.config.retry, move || {
                    events::reconcile_event_sources(
                        self.backend,
                        &config.function_name,
                        &spec.pull_sources,
                    )
                }),
            )
            .await?;
        report.extend(resources);

        let resources = self
            .step(
                "push-subscriptions",
                push::reconcile_push_subscriptions(
                    self.backend,
                    &config.function_name,
                    &existing.function_arn,
                    &spec.push_sources,
                ),
            )
            .await?;
        report.extend(resources);

        let (published, resources) = self
            .step(
                "publish-version",
                with_retry("publish-version", self.config.retry, move || {
                    versions::publish_and_prune(self.backend, &config.function_name)
                }),
            )
            .await?;
        report.published_version = Some(published.version);
        report.extend(resources);

        let resources = self
            .step(
                "attach-logging",
                with_retry("attach-logging", self.config.retry, move || {
                    logs::attach_logging(
                        self.backend,
                        &config.function_name,
                        spec.logging.as_ref(),
                        self.config.retry,
                    )
                }),
            )
            .await?;
        report.extend(resources);

        let resources = self
            .step(
                "schedule",
                schedule::reconcile_schedule(
                    self.backend,
                    &config.function_name,
                    &existing.function_arn,
                    &request.environment,
                    spec.schedule.as_ref(),
                ),
            )
            .await?;
        report.extend(resources);

        Ok(())
    }

    /// Run one step, logging and labeling its failure.
    async fn step<T>(
        &self,
        name: &'static str,
        fut: impl Future<Output = Result<T, DeployError>>,
    ) -> Result<T, DeployError> {
        match fut.await {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::error!("deploy step {} failed: {}", name, err);
                Err(err.at_step(name))
            }
        }
    }
}
