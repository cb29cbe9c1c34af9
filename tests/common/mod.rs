//! In-memory fake control plane for workflow tests.
//!
//! Records every call in order, keeps just enough state to answer the
//! next one, and lets tests inject failures per method — once-off via a
//! queue, or persistently.

use lambda_deploy_rs::{
    CodeArtifact, EventSourceMapping, FunctionConfig, FunctionDescription, LambdaBackend,
    ProviderError, RoleDescriptor, VersionInfo,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

const ACCOUNT: &str = "123456789012";
const REGION: &str = "us-east-1";

pub fn function_arn(name: &str) -> String {
    format!("arn:aws:lambda:{REGION}:{ACCOUNT}:function:{name}")
}

pub fn role_arn(name: &str) -> String {
    format!("arn:aws:iam::{ACCOUNT}:role/{name}")
}

pub fn topic_arn(name: &str) -> String {
    format!("arn:aws:sns:{REGION}:{ACCOUNT}:{name}")
}

#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<String>>,
    functions: Mutex<HashMap<String, FunctionDescription>>,
    roles: Mutex<HashMap<String, RoleDescriptor>>,
    topics: Mutex<Vec<String>>,
    mappings: Mutex<Vec<EventSourceMapping>>,
    versions: Mutex<Vec<VersionInfo>>,
    permissions: Mutex<HashSet<(String, String)>>,
    rules: Mutex<HashMap<String, String>>,
    fail_once: Mutex<HashMap<&'static str, VecDeque<ProviderError>>>,
    fail_always: Mutex<HashMap<&'static str, ProviderError>>,
    mapping_counter: Mutex<u32>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    // ── seeding ────────────────────────────────────────────────────

    pub fn seed_function(&self, name: &str) {
        self.functions.lock().unwrap().insert(
            name.to_string(),
            FunctionDescription {
                function_name: name.to_string(),
                function_arn: function_arn(name),
                runtime: "nodejs18.x".into(),
                handler: "index.handler".into(),
                timeout_secs: 30,
                memory_mb: 128,
                role_arn: role_arn(&format!("{name}-role")),
            },
        );
        let mut versions = self.versions.lock().unwrap();
        if versions.is_empty() {
            versions.push(VersionInfo::new(VersionInfo::LATEST));
        }
    }

    pub fn seed_role(&self, name: &str) {
        self.roles.lock().unwrap().insert(
            name.to_string(),
            RoleDescriptor {
                name: name.to_string(),
                arn: role_arn(name),
            },
        );
    }

    pub fn seed_topic(&self, name: &str) {
        self.topics.lock().unwrap().push(topic_arn(name));
    }

    pub fn seed_mapping(&self, function_name: &str, source_arn: &str, batch_size: u32) {
        let mut counter = self.mapping_counter.lock().unwrap();
        *counter += 1;
        self.mappings.lock().unwrap().push(EventSourceMapping {
            uuid: format!("esm-{counter}"),
            function_name: function_name.to_string(),
            source_arn: source_arn.to_string(),
            batch_size,
        });
    }

    pub fn seed_version(&self, version: &str) {
        self.versions.lock().unwrap().push(VersionInfo::new(version));
    }

    pub fn seed_permission(&self, function_name: &str, statement_id: &str) {
        self.permissions
            .lock()
            .unwrap()
            .insert((function_name.to_string(), statement_id.to_string()));
    }

    // ── failure injection ──────────────────────────────────────────

    pub fn fail_once(&self, method: &'static str, err: ProviderError) {
        self.fail_once
            .lock()
            .unwrap()
            .entry(method)
            .or_default()
            .push_back(err);
    }

    pub fn fail_always(&self, method: &'static str, err: ProviderError) {
        self.fail_always.lock().unwrap().insert(method, err);
    }

    // ── inspection ─────────────────────────────────────────────────

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_named(&self, method: &str) -> Vec<String> {
        let prefix = format!("{method} ");
        self.calls()
            .into_iter()
            .filter(|call| call == method || call.starts_with(&prefix))
            .collect()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls_named(method).len()
    }

    pub fn remaining_versions(&self) -> Vec<String> {
        self.versions
            .lock()
            .unwrap()
            .iter()
            .map(|v| v.version.clone())
            .collect()
    }

    fn record(&self, method: &'static str, detail: String) -> Result<(), ProviderError> {
        self.calls.lock().unwrap().push(if detail.is_empty() {
            method.to_string()
        } else {
            format!("{method} {detail}")
        });
        if let Some(queue) = self.fail_once.lock().unwrap().get_mut(method) {
            if let Some(err) = queue.pop_front() {
                return Err(err);
            }
        }
        if let Some(err) = self.fail_always.lock().unwrap().get(method) {
            return Err(err.clone());
        }
        Ok(())
    }
}

impl LambdaBackend for FakeBackend {
    async fn describe_function(
        &self,
        function_name: &str,
    ) -> Result<FunctionDescription, ProviderError> {
        self.record("describe_function", function_name.to_string())?;
        self.functions
            .lock()
            .unwrap()
            .get(function_name)
            .cloned()
            .ok_or_else(|| {
                ProviderError::not_found(
                    "ResourceNotFoundException",
                    format!("function {function_name} not found"),
                )
            })
    }

    async fn create_function(
        &self,
        config: &FunctionConfig,
        _code: &CodeArtifact,
    ) -> Result<FunctionDescription, ProviderError> {
        self.record("create_function", config.function_name.clone())?;
        let description = FunctionDescription {
            function_name: config.function_name.clone(),
            function_arn: function_arn(&config.function_name),
            runtime: config.runtime.clone(),
            handler: config.handler.clone(),
            timeout_secs: config.timeout_secs,
            memory_mb: config.memory_mb,
            role_arn: config.role_arn.clone().unwrap_or_default(),
        };
        self.functions
            .lock()
            .unwrap()
            .insert(config.function_name.clone(), description.clone());
        let mut versions = self.versions.lock().unwrap();
        if versions.is_empty() {
            versions.push(VersionInfo::new(VersionInfo::LATEST));
        }
        Ok(description)
    }

    async fn update_function_code(
        &self,
        function_name: &str,
        _code: &CodeArtifact,
    ) -> Result<(), ProviderError> {
        self.record("update_function_code", function_name.to_string())
    }

    async fn update_function_configuration(
        &self,
        config: &FunctionConfig,
    ) -> Result<(), ProviderError> {
        self.record("update_function_configuration", config.function_name.clone())
    }

    async fn publish_version(&self, function_name: &str) -> Result<VersionInfo, ProviderError> {
        self.record("publish_version", function_name.to_string())?;
        let mut versions = self.versions.lock().unwrap();
        let next = versions
            .iter()
            .filter_map(|v| v.version.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let published = VersionInfo::new(next.to_string());
        versions.push(published.clone());
        Ok(published)
    }

    async fn list_versions(&self, function_name: &str) -> Result<Vec<VersionInfo>, ProviderError> {
        self.record("list_versions", function_name.to_string())?;
        Ok(self.versions.lock().unwrap().clone())
    }

    async fn delete_version(
        &self,
        function_name: &str,
        version: &str,
    ) -> Result<(), ProviderError> {
        self.record("delete_version", format!("{function_name} {version}"))?;
        let mut versions = self.versions.lock().unwrap();
        let before = versions.len();
        versions.retain(|v| v.version != version);
        if versions.len() == before {
            return Err(ProviderError::not_found(
                "ResourceNotFoundException",
                format!("version {version} not found"),
            ));
        }
        Ok(())
    }

    async fn get_role(&self, role_name: &str) -> Result<RoleDescriptor, ProviderError> {
        self.record("get_role", role_name.to_string())?;
        self.roles
            .lock()
            .unwrap()
            .get(role_name)
            .cloned()
            .ok_or_else(|| {
                ProviderError::not_found("NoSuchEntity", format!("role {role_name} not found"))
            })
    }

    async fn create_role(
        &self,
        role_name: &str,
        _assume_role_policy: &str,
    ) -> Result<RoleDescriptor, ProviderError> {
        self.record("create_role", role_name.to_string())?;
        let role = RoleDescriptor {
            name: role_name.to_string(),
            arn: role_arn(role_name),
        };
        self.roles
            .lock()
            .unwrap()
            .insert(role_name.to_string(), role.clone());
        Ok(role)
    }

    async fn put_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        _policy_document: &str,
    ) -> Result<(), ProviderError> {
        self.record("put_role_policy", format!("{role_name} {policy_name}"))
    }

    async fn list_event_source_mappings(
        &self,
        function_name: &str,
        source_arn: &str,
    ) -> Result<Vec<EventSourceMapping>, ProviderError> {
        self.record(
            "list_event_source_mappings",
            format!("{function_name} {source_arn}"),
        )?;
        Ok(self
            .mappings
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.function_name == function_name && m.source_arn == source_arn)
            .cloned()
            .collect())
    }

    async fn create_event_source_mapping(
        &self,
        function_name: &str,
        source_arn: &str,
        batch_size: u32,
    ) -> Result<EventSourceMapping, ProviderError> {
        self.record(
            "create_event_source_mapping",
            format!("{function_name} {source_arn}"),
        )?;
        let mut counter = self.mapping_counter.lock().unwrap();
        *counter += 1;
        let mapping = EventSourceMapping {
            uuid: format!("esm-{counter}"),
            function_name: function_name.to_string(),
            source_arn: source_arn.to_string(),
            batch_size,
        };
        self.mappings.lock().unwrap().push(mapping.clone());
        Ok(mapping)
    }

    async fn update_event_source_mapping(
        &self,
        uuid: &str,
        batch_size: u32,
    ) -> Result<(), ProviderError> {
        self.record("update_event_source_mapping", uuid.to_string())?;
        let mut mappings = self.mappings.lock().unwrap();
        match mappings.iter_mut().find(|m| m.uuid == uuid) {
            Some(mapping) => {
                mapping.batch_size = batch_size;
                Ok(())
            }
            None => Err(ProviderError::not_found(
                "ResourceNotFoundException",
                format!("mapping {uuid} not found"),
            )),
        }
    }

    async fn list_topics(&self) -> Result<Vec<String>, ProviderError> {
        self.record("list_topics", String::new())?;
        Ok(self.topics.lock().unwrap().clone())
    }

    async fn create_topic(&self, name: &str) -> Result<String, ProviderError> {
        self.record("create_topic", name.to_string())?;
        let arn = topic_arn(name);
        let mut topics = self.topics.lock().unwrap();
        if !topics.contains(&arn) {
            topics.push(arn.clone());
        }
        Ok(arn)
    }

    async fn subscribe(
        &self,
        topic_arn: &str,
        protocol: &str,
        _endpoint: &str,
    ) -> Result<(), ProviderError> {
        self.record("subscribe", format!("{topic_arn} {protocol}"))
    }

    async fn add_permission(
        &self,
        function_name: &str,
        statement_id: &str,
        _action: &str,
        _principal: &str,
        _source_arn: Option<&str>,
    ) -> Result<(), ProviderError> {
        self.record("add_permission", format!("{function_name} {statement_id}"))?;
        let mut permissions = self.permissions.lock().unwrap();
        let key = (function_name.to_string(), statement_id.to_string());
        if permissions.contains(&key) {
            return Err(ProviderError::already_exists(
                "ResourceConflictException",
                format!("statement {statement_id} already exists"),
            ));
        }
        permissions.insert(key);
        Ok(())
    }

    async fn remove_permission(
        &self,
        function_name: &str,
        statement_id: &str,
    ) -> Result<(), ProviderError> {
        self.record(
            "remove_permission",
            format!("{function_name} {statement_id}"),
        )?;
        let removed = self
            .permissions
            .lock()
            .unwrap()
            .remove(&(function_name.to_string(), statement_id.to_string()));
        if removed {
            Ok(())
        } else {
            Err(ProviderError::not_found(
                "ResourceNotFoundException",
                format!("statement {statement_id} not found"),
            ))
        }
    }

    async fn put_rule(
        &self,
        rule_name: &str,
        _schedule_expression: &str,
        _description: &str,
    ) -> Result<String, ProviderError> {
        self.record("put_rule", rule_name.to_string())?;
        let arn = format!("arn:aws:events:{REGION}:{ACCOUNT}:rule/{rule_name}");
        self.rules
            .lock()
            .unwrap()
            .insert(rule_name.to_string(), arn.clone());
        Ok(arn)
    }

    async fn put_rule_target(
        &self,
        rule_name: &str,
        target_id: &str,
        _target_arn: &str,
    ) -> Result<(), ProviderError> {
        self.record("put_rule_target", format!("{rule_name} {target_id}"))
    }

    async fn put_subscription_filter(
        &self,
        log_group: &str,
        _filter_name: &str,
        _filter_pattern: &str,
        _destination_arn: &str,
    ) -> Result<(), ProviderError> {
        self.record("put_subscription_filter", log_group.to_string())
    }
}
