//! Deployment orchestrator for cloud compute functions.
//!
//! Standalone, trait-based reconciliation workflow: given a function spec
//! and a deploy request, converge the function and every resource hanging
//! off it — execution role, pull event bindings, push topic subscriptions,
//! schedule trigger, log delivery, version retention — against an
//! eventually-consistent control plane that throttles and reports benign
//! errors indistinguishable from fatal ones without inspecting error kinds.
//!
//! # Design
//!
//! The crate contains no SDK, no credentials, no transport. You implement
//! the [`LambdaBackend`] trait with your infrastructure; the
//! [`DeployWorkflow`] drives the ordering, the create-vs-update branch, the
//! error classification, and the selective retries.
//!
//! # Usage
//!
//! ```ignore
//! use lambda_deploy_rs::{
//!     CodeArtifact, DeployRequest, DeployWorkflow, FunctionSpec, PullSourceSpec,
//!     WorkflowConfig,
//! };
//!
//! let backend = MyBackend::new(); // implements LambdaBackend
//! let workflow = DeployWorkflow::new(&backend, WorkflowConfig::default());
//!
//! let spec = FunctionSpec::new("svc", "index.handler", "nodejs18.x")
//!     .with_timeout(60)
//!     .with_memory(512)
//!     .with_pull_source(PullSourceSpec {
//!         source_arn: "arn:aws:sqs:us-east-1:123456789012:jobs".into(),
//!         batch_size: 10,
//!     });
//! let request = DeployRequest::new("dev", CodeArtifact::new("builds", "svc.zip"))
//!     .with_env_var("DB_HOST", "db.internal");
//!
//! let report = workflow.deploy(&spec, &request).await?;
//! println!("deployed {} ({} resources)", report.function_name, report.resources.len());
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod reconcile;
pub mod retry;
pub mod types;
pub mod workflow;

// Re-export the main types at crate root for convenience
pub use backend::LambdaBackend;
pub use config::{
    CodeArtifact, ConfiguredSchedule, DeployRequest, FunctionConfig, FunctionSpec, InlinePolicy,
    LoggingSpec, PullSourceSpec, PushSourceSpec, RoleSpec, ScheduleSpec,
};
pub use error::{DeployError, ErrorKind, ProviderError};
pub use retry::{with_retry, RetryPolicy};
pub use types::{
    DeployReport, DeployedResource, EventSourceMapping, FunctionDescription, ResourceAction,
    ResourceKind, RoleDescriptor, VersionInfo,
};
pub use workflow::{DeployWorkflow, WorkflowConfig};
