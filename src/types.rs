//! Minimal domain types for the deployment orchestrator.
//!
//! These are the shapes boundary calls return plus the per-deploy result
//! record. Nothing more. If you're adding types here, ask yourself whether
//! the orchestrator actually needs them.

use serde::{Deserialize, Serialize};

/// Description of a deployed function, as the control plane reports it.
///
/// Enough to support the create-vs-update branch and a later config diff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDescription {
    pub function_name: String,
    pub function_arn: String,
    pub runtime: String,
    pub handler: String,
    pub timeout_secs: u32,
    pub memory_mb: u32,
    pub role_arn: String,
}

/// A resolved execution role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDescriptor {
    pub name: String,
    pub arn: String,
}

/// One pull-based event source binding, keyed by `uuid` on the provider side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSourceMapping {
    pub uuid: String,
    pub function_name: String,
    pub source_arn: String,
    pub batch_size: u32,
}

/// One published function version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// `$LATEST` or a numeric version identifier.
    pub version: String,
}

impl VersionInfo {
    pub const LATEST: &'static str = "$LATEST";

    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    pub fn is_latest(&self) -> bool {
        self.version == Self::LATEST
    }
}

/// What category of resource a deploy touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    Function,
    Role,
    RolePolicy,
    EventSourceMapping,
    Topic,
    Subscription,
    Permission,
    Rule,
    RuleTarget,
    Version,
    SubscriptionFilter,
}

/// What the deploy did to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceAction {
    Created,
    Updated,
    Found,
    Removed,
}

/// One resource the deploy created, updated, found, or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployedResource {
    pub kind: ResourceKind,
    pub id: String,
    pub action: ResourceAction,
}

impl DeployedResource {
    pub fn new(kind: ResourceKind, id: impl Into<String>, action: ResourceAction) -> Self {
        Self {
            kind,
            id: id.into(),
            action,
        }
    }
}

/// The result record of a single deploy invocation.
///
/// Every deploy produces its own report; nothing accumulates across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployReport {
    pub function_name: String,
    /// Known once the function has been created or probed.
    pub function_arn: Option<String>,
    /// True on the create path, false on the update path.
    pub created: bool,
    /// Set only on the update path, after version publication.
    pub published_version: Option<String>,
    /// Every resource touched, in the order the deploy touched it.
    pub resources: Vec<DeployedResource>,
}

impl DeployReport {
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            function_arn: None,
            created: false,
            published_version: None,
            resources: Vec::new(),
        }
    }

    pub fn push(&mut self, resource: DeployedResource) {
        self.resources.push(resource);
    }

    pub fn extend(&mut self, resources: Vec<DeployedResource>) {
        self.resources.extend(resources);
    }

    /// All touched resources of one kind, in deploy order.
    pub fn of_kind(&self, kind: ResourceKind) -> Vec<&DeployedResource> {
        self.resources.iter().filter(|r| r.kind == kind).collect()
    }
}
