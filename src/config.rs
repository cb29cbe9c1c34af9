//! Caller-facing deployment configuration.
//!
//! A deploy is described by a [`FunctionSpec`] (what the function is and
//! which resources hang off it) plus a [`DeployRequest`] (which environment
//! this run targets, which env vars to inject, where the packaged code
//! lives). The orchestrator derives a [`FunctionConfig`] from the two and
//! fills in the role ARN once identity resolution completes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Immutable input of one deploy invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployRequest {
    /// Target environment name. Lowercased when suffixed onto function names.
    pub environment: String,
    /// Environment variables injected into the function configuration.
    pub env_vars: HashMap<String, String>,
    /// The packaged code artifact to deploy.
    pub code: CodeArtifact,
}

impl DeployRequest {
    pub fn new(environment: impl Into<String>, code: CodeArtifact) -> Self {
        Self {
            environment: environment.into(),
            env_vars: HashMap::new(),
            code,
        }
    }

    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }
}

/// Location of a packaged code artifact in object storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeArtifact {
    pub bucket: String,
    pub key: String,
}

impl CodeArtifact {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

/// An inline permission policy attached to a managed role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlinePolicy {
    pub name: String,
    /// Policy document, JSON.
    pub document: String,
}

/// How the function's execution role is obtained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RoleSpec {
    /// Bring your own role. Short-circuits resolution with zero network calls.
    Existing { role_arn: String },
    /// A role the orchestrator owns: looked up by name, created if absent,
    /// inline policies attached sequentially in the order given.
    Managed {
        name: String,
        policies: Vec<InlinePolicy>,
    },
}

/// A pull-based event source the function polls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullSourceSpec {
    pub source_arn: String,
    pub batch_size: u32,
}

/// A push-style topic that fans out to the function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushSourceSpec {
    pub topic_arn: String,
    /// Statement id scoping this topic's invoke grant. Collides across
    /// topics that reuse the same function, which is why topic processing
    /// is serial.
    pub statement_id: String,
}

impl PushSourceSpec {
    pub fn new(topic_arn: impl Into<String>, statement_id: impl Into<String>) -> Self {
        Self {
            topic_arn: topic_arn.into(),
            statement_id: statement_id.into(),
        }
    }

    /// Suffix of the topic ARN after the last colon.
    pub fn short_name(&self) -> &str {
        self.topic_arn
            .rsplit(':')
            .next()
            .unwrap_or(&self.topic_arn)
    }
}

/// A recurring schedule trigger. Only acted on when all three fields are
/// present; a partial spec is silently treated as "not configured".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleSpec {
    pub rule_name: Option<String>,
    pub description: Option<String>,
    pub expression: Option<String>,
}

impl ScheduleSpec {
    pub fn new(
        rule_name: impl Into<String>,
        description: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        Self {
            rule_name: Some(rule_name.into()),
            description: Some(description.into()),
            expression: Some(expression.into()),
        }
    }

    /// The complete triple, or `None` if any field is missing.
    pub fn configured(&self) -> Option<ConfiguredSchedule<'_>> {
        match (&self.rule_name, &self.description, &self.expression) {
            (Some(rule_name), Some(description), Some(expression)) => Some(ConfiguredSchedule {
                rule_name,
                description,
                expression,
            }),
            _ => None,
        }
    }
}

/// A [`ScheduleSpec`] proven complete.
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredSchedule<'a> {
    pub rule_name: &'a str,
    pub description: &'a str,
    pub expression: &'a str,
}

impl ConfiguredSchedule<'_> {
    /// Statement id for the rule's invoke grant.
    pub fn statement_id(&self, environment: &str) -> String {
        format!("{}-{}-CronId", self.rule_name, environment)
    }
}

/// Log delivery wiring: a companion function that consumes this function's
/// log stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSpec {
    /// Name of the log-processing function the logging service invokes.
    pub log_function_name: String,
    /// The logging service principal.
    pub principal: String,
    /// ARN the subscription filter routes to.
    pub destination_arn: String,
}

impl LoggingSpec {
    pub fn statement_id(&self) -> String {
        format!("{}LoggingId", self.log_function_name)
    }
}

/// Everything the orchestrator needs to know about one function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// Base name; the deployed name is suffixed with the environment.
    pub base_name: String,
    pub handler: String,
    pub runtime: String,
    pub timeout_secs: u32,
    pub memory_mb: u32,
    /// Absent means the orchestrator manages a role named after the function.
    pub role: Option<RoleSpec>,
    pub pull_sources: Vec<PullSourceSpec>,
    pub push_sources: Vec<PushSourceSpec>,
    pub schedule: Option<ScheduleSpec>,
    pub logging: Option<LoggingSpec>,
}

impl FunctionSpec {
    pub fn new(
        base_name: impl Into<String>,
        handler: impl Into<String>,
        runtime: impl Into<String>,
    ) -> Self {
        Self {
            base_name: base_name.into(),
            handler: handler.into(),
            runtime: runtime.into(),
            timeout_secs: 30,
            memory_mb: 128,
            role: None,
            pull_sources: Vec::new(),
            push_sources: Vec::new(),
            schedule: None,
            logging: None,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u32) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_memory(mut self, memory_mb: u32) -> Self {
        self.memory_mb = memory_mb;
        self
    }

    pub fn with_role(mut self, role: RoleSpec) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_pull_source(mut self, source: PullSourceSpec) -> Self {
        self.pull_sources.push(source);
        self
    }

    pub fn with_push_source(mut self, source: PushSourceSpec) -> Self {
        self.push_sources.push(source);
        self
    }

    pub fn with_schedule(mut self, schedule: ScheduleSpec) -> Self {
        self.schedule = Some(schedule);
        self
    }

    pub fn with_logging(mut self, logging: LoggingSpec) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Deployed function name: base name + "-" + lowercased environment.
    pub fn function_name(&self, environment: &str) -> String {
        format!("{}-{}", self.base_name, environment.to_lowercase())
    }

    /// The role spec to resolve, defaulting to a managed role named after
    /// the function with no inline policies.
    pub fn role_spec(&self, function_name: &str) -> RoleSpec {
        self.role.clone().unwrap_or_else(|| RoleSpec::Managed {
            name: format!("{function_name}-role"),
            policies: Vec::new(),
        })
    }
}

/// The mutable runtime view of a function's identity and configuration.
///
/// Built once per deploy. The role ARN starts empty and is filled after
/// identity resolution; it is never persisted outside the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionConfig {
    pub function_name: String,
    pub handler: String,
    pub runtime: String,
    pub timeout_secs: u32,
    pub memory_mb: u32,
    pub env_vars: HashMap<String, String>,
    pub role_arn: Option<String>,
}

impl FunctionConfig {
    pub fn new(spec: &FunctionSpec, request: &DeployRequest) -> Self {
        Self {
            function_name: spec.function_name(&request.environment),
            handler: spec.handler.clone(),
            runtime: spec.runtime.clone(),
            timeout_secs: spec.timeout_secs,
            memory_mb: spec.memory_mb,
            env_vars: request.env_vars.clone(),
            role_arn: None,
        }
    }
}
