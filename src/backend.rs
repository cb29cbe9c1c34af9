//! The One Trait: LambdaBackend
//!
//! Single abstraction point for the cloud control plane. The orchestrator is
//! pure logic — it doesn't know about SDKs, credentials, or transport. That's
//! YOUR problem when you implement this trait.
//!
//! Every method is one remote call. Implementations must translate their
//! SDK's error codes into [`ProviderError`] kinds; the orchestrator never
//! inspects message text.

use crate::config::{CodeArtifact, FunctionConfig};
use crate::error::ProviderError;
use crate::types::{EventSourceMapping, FunctionDescription, RoleDescriptor, VersionInfo};
use std::future::Future;

/// The single trait consumers implement to run deploys.
///
/// Abstracts:
/// - Function lookup, creation, code and configuration updates
/// - Version publish / list / delete
/// - Execution role lookup / creation and inline policy attachment
/// - Topic listing / creation / subscription
/// - Invoke-permission grant and revoke by statement id
/// - Schedule rule upsert and target attachment
/// - Log subscription-filter upsert
pub trait LambdaBackend: Send + Sync {
    // ═══════════════════════════════════════════════════════════════
    // FUNCTIONS
    // ═══════════════════════════════════════════════════════════════

    /// Describe a function. Absence surfaces as a `NotFound` error; the
    /// prober turns that into "does not exist".
    fn describe_function(
        &self,
        function_name: &str,
    ) -> impl Future<Output = Result<FunctionDescription, ProviderError>> + Send;

    /// Create a function with its code payload inlined at creation time.
    fn create_function(
        &self,
        config: &FunctionConfig,
        code: &CodeArtifact,
    ) -> impl Future<Output = Result<FunctionDescription, ProviderError>> + Send;

    /// Replace a function's code. Does not publish a version.
    fn update_function_code(
        &self,
        function_name: &str,
        code: &CodeArtifact,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Reconcile mutable configuration: runtime, handler, timeout, memory,
    /// environment variables.
    fn update_function_configuration(
        &self,
        config: &FunctionConfig,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    // ═══════════════════════════════════════════════════════════════
    // VERSIONS
    // ═══════════════════════════════════════════════════════════════

    /// Publish an immutable version from the current code and configuration.
    fn publish_version(
        &self,
        function_name: &str,
    ) -> impl Future<Output = Result<VersionInfo, ProviderError>> + Send;

    /// List all versions of a function, `$LATEST` included.
    fn list_versions(
        &self,
        function_name: &str,
    ) -> impl Future<Output = Result<Vec<VersionInfo>, ProviderError>> + Send;

    fn delete_version(
        &self,
        function_name: &str,
        version: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    // ═══════════════════════════════════════════════════════════════
    // EXECUTION IDENTITY
    // ═══════════════════════════════════════════════════════════════

    /// Look up a role by name. Absence surfaces as a `NotFound` error.
    fn get_role(
        &self,
        role_name: &str,
    ) -> impl Future<Output = Result<RoleDescriptor, ProviderError>> + Send;

    fn create_role(
        &self,
        role_name: &str,
        assume_role_policy: &str,
    ) -> impl Future<Output = Result<RoleDescriptor, ProviderError>> + Send;

    /// Attach one inline policy to a role.
    fn put_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    // ═══════════════════════════════════════════════════════════════
    // PULL EVENT SOURCES
    // ═══════════════════════════════════════════════════════════════

    /// List bindings filtered by function and source ARN.
    fn list_event_source_mappings(
        &self,
        function_name: &str,
        source_arn: &str,
    ) -> impl Future<Output = Result<Vec<EventSourceMapping>, ProviderError>> + Send;

    fn create_event_source_mapping(
        &self,
        function_name: &str,
        source_arn: &str,
        batch_size: u32,
    ) -> impl Future<Output = Result<EventSourceMapping, ProviderError>> + Send;

    /// Update an existing binding's batch size. Nothing else is mutable here.
    fn update_event_source_mapping(
        &self,
        uuid: &str,
        batch_size: u32,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    // ═══════════════════════════════════════════════════════════════
    // PUSH TOPICS
    // ═══════════════════════════════════════════════════════════════

    /// List all topic ARNs visible to the account.
    fn list_topics(&self) -> impl Future<Output = Result<Vec<String>, ProviderError>> + Send;

    /// Create a topic by short name. Idempotent on the provider side.
    /// Returns the topic ARN.
    fn create_topic(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;

    /// Subscribe an endpoint to a topic.
    fn subscribe(
        &self,
        topic_arn: &str,
        protocol: &str,
        endpoint: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    // ═══════════════════════════════════════════════════════════════
    // INVOKE PERMISSIONS
    // ═══════════════════════════════════════════════════════════════

    /// Grant `principal` permission to perform `action` on the function,
    /// optionally scoped to a source ARN, under a caller-chosen statement id.
    fn add_permission(
        &self,
        function_name: &str,
        statement_id: &str,
        action: &str,
        principal: &str,
        source_arn: Option<&str>,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Revoke the grant with the given statement id.
    fn remove_permission(
        &self,
        function_name: &str,
        statement_id: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    // ═══════════════════════════════════════════════════════════════
    // SCHEDULE RULES
    // ═══════════════════════════════════════════════════════════════

    /// Upsert a schedule rule (create-or-replace). Returns the rule ARN.
    fn put_rule(
        &self,
        rule_name: &str,
        schedule_expression: &str,
        description: &str,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;

    /// Attach a target to a rule under a deterministic target id.
    fn put_rule_target(
        &self,
        rule_name: &str,
        target_id: &str,
        target_arn: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    // ═══════════════════════════════════════════════════════════════
    // LOG DELIVERY
    // ═══════════════════════════════════════════════════════════════

    /// Create or replace a subscription filter on a log group.
    fn put_subscription_filter(
        &self,
        log_group: &str,
        filter_name: &str,
        filter_pattern: &str,
        destination_arn: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;
}
