//! Capability registry for discovering and managing entries
//!
//! The registry keeps four indexes: agents by id, services by type, plugins by
//! name, and capability name to owner. All four sit behind a single lock so a
//! registration or removal is atomic with respect to lookups.

use crate::entries::{AgentEntry, EntryType, PluginEntry, ServiceEntry};
use crate::error::{AgentError, Result};
use crate::executor::{FanOutConfig, FanOutExecutor};
use agentmesh_config::RegistrySettings;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owner of a capability name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityRecord {
    /// Capability name
    pub name: String,
    /// Kind of entry owning the capability
    pub owner_type: EntryType,
    /// Key of the owning entry
    pub owner_id: String,
}

/// An entry resolved through the capability index
#[derive(Clone)]
pub enum RegisteredEntry {
    /// Agent entry
    Agent(Arc<dyn AgentEntry>),
    /// Service entry
    Service(Arc<dyn ServiceEntry>),
    /// Plugin entry
    Plugin(Arc<dyn PluginEntry>),
}

impl RegisteredEntry {
    /// Kind of the entry
    pub fn entry_type(&self) -> EntryType {
        match self {
            RegisteredEntry::Agent(_) => EntryType::Agent,
            RegisteredEntry::Service(_) => EntryType::Service,
            RegisteredEntry::Plugin(_) => EntryType::Plugin,
        }
    }

    /// Identifying key of the entry
    pub fn key(&self) -> &str {
        match self {
            RegisteredEntry::Agent(agent) => agent.id(),
            RegisteredEntry::Service(service) => service.service_type(),
            RegisteredEntry::Plugin(plugin) => plugin.name(),
        }
    }

    /// Capabilities declared by the entry
    pub fn capabilities(&self) -> &[String] {
        match self {
            RegisteredEntry::Agent(agent) => agent.capabilities(),
            RegisteredEntry::Service(service) => service.capabilities(),
            RegisteredEntry::Plugin(plugin) => plugin.capabilities(),
        }
    }
}

impl std::fmt::Debug for RegisteredEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredEntry")
            .field("type", &self.entry_type())
            .field("key", &self.key())
            .finish()
    }
}

/// Registry size counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Registered agents
    pub agents: usize,
    /// Registered services
    pub services: usize,
    /// Registered plugins
    pub plugins: usize,
    /// Indexed capability names
    pub capabilities: usize,
}

/// A single agent that failed a lifecycle call
#[derive(Debug, Clone)]
pub struct LifecycleFailure {
    /// Agent identifier
    pub agent_id: String,
    /// What went wrong
    pub error: AgentError,
}

/// Result of a best-effort `initialize_all` or `shutdown_all`
#[derive(Debug, Clone, Default)]
pub struct LifecycleReport {
    /// Agents whose call succeeded
    pub succeeded: Vec<String>,
    /// Agents whose call failed
    pub failed: Vec<LifecycleFailure>,
}

impl LifecycleReport {
    /// Whether every agent succeeded
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of agents visited
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

#[derive(Default)]
struct RegistryState {
    agents: HashMap<String, Arc<dyn AgentEntry>>,
    services: HashMap<String, Arc<dyn ServiceEntry>>,
    plugins: HashMap<String, Arc<dyn PluginEntry>>,
    capabilities: HashMap<String, (EntryType, String)>,
}

impl RegistryState {
    /// Re-point the capability index after `key` was (re)registered.
    ///
    /// Names the previous entry held but the new one does not are dropped,
    /// unless another owner has since taken them.
    fn index(
        &mut self,
        owner_type: EntryType,
        key: &str,
        previous: Option<Vec<String>>,
        capabilities: &[String],
    ) {
        if let Some(previous) = previous {
            for stale in previous.iter().filter(|c| !capabilities.contains(c)) {
                let owned = matches!(
                    self.capabilities.get(stale),
                    Some((t, id)) if *t == owner_type && id == key
                );
                if owned {
                    self.capabilities.remove(stale);
                }
            }
        }

        for capability in capabilities.iter().filter(|c| !c.trim().is_empty()) {
            let owner = (owner_type, key.to_string());
            if let Some(prior) = self.capabilities.insert(capability.clone(), owner) {
                if prior.0 != owner_type || prior.1 != key {
                    debug!(
                        capability = %capability,
                        previous_owner = %prior.1,
                        new_owner = %key,
                        "Capability owner replaced"
                    );
                }
            }
        }
    }

    fn drop_owned(&mut self, owner_type: EntryType, key: &str) {
        self.capabilities
            .retain(|_, (t, id)| !(*t == owner_type && id == key));
    }

    fn owner_of(&self, capability: &str, owner_type: EntryType) -> Option<&str> {
        match self.capabilities.get(capability) {
            Some((t, id)) if *t == owner_type => Some(id.as_str()),
            _ => None,
        }
    }
}

/// Keys are stored exactly as the entry reports them
fn require_key(kind: &str, key: &str) -> Result<String> {
    if key.trim().is_empty() {
        return Err(AgentError::missing_identifier(kind));
    }
    Ok(key.to_string())
}

fn sorted_keys<V>(map: &HashMap<String, V>) -> Vec<String> {
    let mut keys: Vec<String> = map.keys().cloned().collect();
    keys.sort();
    keys
}

/// Registry of agents, services and plugins indexed by capability
///
/// One instance is created by the host and shared by reference; tests build
/// their own.
///
/// # Examples
///
/// ```ignore
/// use agentmesh_agents::CapabilityRegistry;
/// use std::sync::Arc;
///
/// let registry = CapabilityRegistry::new();
/// registry.register_agent(Arc::new(agent))?;
///
/// if let Some(entry) = registry.find_entry_by_capability("summarize") {
///     println!("{} provides summarize", entry.key());
/// }
/// ```
pub struct CapabilityRegistry {
    state: RwLock<RegistryState>,
    executor: FanOutExecutor,
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            executor: FanOutExecutor::new(),
        }
    }

    /// Create an empty registry whose lifecycle fan-out follows `settings`
    pub fn with_settings(settings: &RegistrySettings) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            executor: FanOutExecutor::with_config(FanOutConfig::from(settings)),
        }
    }

    /// Register an agent under its id
    ///
    /// An existing agent with the same id is replaced.
    pub fn register_agent(&self, agent: Arc<dyn AgentEntry>) -> Result<()> {
        let id = require_key("agent id", agent.id())?;
        let mut state = self.state.write();

        let previous = state.agents.insert(id.clone(), agent.clone());
        if previous.is_some() {
            warn!(agent_id = %id, "Agent already registered, overwriting");
        }
        let previous = previous.map(|p| p.capabilities().to_vec());
        state.index(EntryType::Agent, &id, previous, agent.capabilities());

        info!(
            agent_id = %id,
            capability_count = agent.capabilities().len(),
            "Agent registered"
        );
        Ok(())
    }

    /// Register a service under its service type
    pub fn register_service(&self, service: Arc<dyn ServiceEntry>) -> Result<()> {
        let service_type = require_key("service type", service.service_type())?;
        let mut state = self.state.write();

        let previous = state.services.insert(service_type.clone(), service.clone());
        if previous.is_some() {
            warn!(service_type = %service_type, "Service already registered, overwriting");
        }
        let previous = previous.map(|p| p.capabilities().to_vec());
        state.index(EntryType::Service, &service_type, previous, service.capabilities());

        info!(service_type = %service_type, "Service registered");
        Ok(())
    }

    /// Register a plugin under its name
    pub fn register_plugin(&self, plugin: Arc<dyn PluginEntry>) -> Result<()> {
        let name = require_key("plugin name", plugin.name())?;
        let mut state = self.state.write();

        let previous = state.plugins.insert(name.clone(), plugin.clone());
        if previous.is_some() {
            warn!(plugin = %name, "Plugin already registered, overwriting");
        }
        let previous = previous.map(|p| p.capabilities().to_vec());
        state.index(EntryType::Plugin, &name, previous, plugin.capabilities());

        info!(plugin = %name, version = %plugin.version(), "Plugin registered");
        Ok(())
    }

    /// Look up an agent by id
    pub fn get_agent(&self, id: &str) -> Option<Arc<dyn AgentEntry>> {
        self.state.read().agents.get(id).cloned()
    }

    /// Look up a service by type
    pub fn get_service(&self, service_type: &str) -> Option<Arc<dyn ServiceEntry>> {
        self.state.read().services.get(service_type).cloned()
    }

    /// Look up a plugin by name
    pub fn get_plugin(&self, name: &str) -> Option<Arc<dyn PluginEntry>> {
        self.state.read().plugins.get(name).cloned()
    }

    /// Resolve a capability to the agent owning it
    pub fn get_agent_by_capability(&self, capability: &str) -> Option<Arc<dyn AgentEntry>> {
        let state = self.state.read();
        let owner = state.owner_of(capability, EntryType::Agent)?;
        state.agents.get(owner).cloned()
    }

    /// Resolve a capability to the service owning it
    pub fn get_service_by_capability(&self, capability: &str) -> Option<Arc<dyn ServiceEntry>> {
        let state = self.state.read();
        let owner = state.owner_of(capability, EntryType::Service)?;
        state.services.get(owner).cloned()
    }

    /// Resolve a capability to the plugin owning it
    pub fn get_plugin_by_capability(&self, capability: &str) -> Option<Arc<dyn PluginEntry>> {
        let state = self.state.read();
        let owner = state.owner_of(capability, EntryType::Plugin)?;
        state.plugins.get(owner).cloned()
    }

    /// Resolve a capability to whichever entry owns it
    pub fn find_entry_by_capability(&self, capability: &str) -> Option<RegisteredEntry> {
        let state = self.state.read();
        let (owner_type, owner) = state.capabilities.get(capability)?;

        match owner_type {
            EntryType::Agent => state.agents.get(owner).cloned().map(RegisteredEntry::Agent),
            EntryType::Service => state
                .services
                .get(owner)
                .cloned()
                .map(RegisteredEntry::Service),
            EntryType::Plugin => state.plugins.get(owner).cloned().map(RegisteredEntry::Plugin),
        }
    }

    /// Remove an agent and every capability it owns
    ///
    /// Returns whether an agent was removed.
    pub fn unregister_agent(&self, id: &str) -> bool {
        let mut state = self.state.write();
        let removed = state.agents.remove(id).is_some();
        if removed {
            state.drop_owned(EntryType::Agent, id);
            info!(agent_id = %id, "Agent unregistered");
        }
        removed
    }

    /// Remove a service and every capability it owns
    pub fn unregister_service(&self, service_type: &str) -> bool {
        let mut state = self.state.write();
        let removed = state.services.remove(service_type).is_some();
        if removed {
            state.drop_owned(EntryType::Service, service_type);
            info!(service_type = %service_type, "Service unregistered");
        }
        removed
    }

    /// Remove a plugin and every capability it owns
    pub fn unregister_plugin(&self, name: &str) -> bool {
        let mut state = self.state.write();
        let removed = state.plugins.remove(name).is_some();
        if removed {
            state.drop_owned(EntryType::Plugin, name);
            info!(plugin = %name, "Plugin unregistered");
        }
        removed
    }

    /// Remove a single capability name from the index
    ///
    /// The owning entry stays registered under its own key.
    pub fn unregister_capability(&self, capability: &str) -> bool {
        let removed = self.state.write().capabilities.remove(capability).is_some();
        if removed {
            debug!(capability = %capability, "Capability unregistered");
        }
        removed
    }

    /// Remove all agents and their capabilities
    pub fn clear_agents(&self) {
        let mut state = self.state.write();
        state.agents.clear();
        state.capabilities.retain(|_, (t, _)| *t != EntryType::Agent);
    }

    /// Remove all services and their capabilities
    pub fn clear_services(&self) {
        let mut state = self.state.write();
        state.services.clear();
        state.capabilities.retain(|_, (t, _)| *t != EntryType::Service);
    }

    /// Remove all plugins and their capabilities
    pub fn clear_plugins(&self) {
        let mut state = self.state.write();
        state.plugins.clear();
        state.capabilities.retain(|_, (t, _)| *t != EntryType::Plugin);
    }

    /// Empty every index
    pub fn clear_all(&self) {
        *self.state.write() = RegistryState::default();
        info!("Registry cleared");
    }

    /// Whether any entry owns the capability
    pub fn has_capability(&self, capability: &str) -> bool {
        self.state.read().capabilities.contains_key(capability)
    }

    /// Every indexed capability, sorted by name
    pub fn all_capabilities(&self) -> Vec<CapabilityRecord> {
        let state = self.state.read();
        let mut records: Vec<CapabilityRecord> = state
            .capabilities
            .iter()
            .map(|(name, (owner_type, owner_id))| CapabilityRecord {
                name: name.clone(),
                owner_type: *owner_type,
                owner_id: owner_id.clone(),
            })
            .collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    /// Registered agent ids, sorted
    pub fn agent_ids(&self) -> Vec<String> {
        sorted_keys(&self.state.read().agents)
    }

    /// Registered service types, sorted
    pub fn service_types(&self) -> Vec<String> {
        sorted_keys(&self.state.read().services)
    }

    /// Registered plugin names, sorted
    pub fn plugin_names(&self) -> Vec<String> {
        sorted_keys(&self.state.read().plugins)
    }

    /// Registry size counters
    pub fn stats(&self) -> RegistryStats {
        let state = self.state.read();
        RegistryStats {
            agents: state.agents.len(),
            services: state.services.len(),
            plugins: state.plugins.len(),
            capabilities: state.capabilities.len(),
        }
    }

    fn agent_snapshot(&self) -> Vec<(String, Arc<dyn AgentEntry>)> {
        let state = self.state.read();
        let mut agents: Vec<(String, Arc<dyn AgentEntry>)> = state
            .agents
            .iter()
            .map(|(id, agent)| (id.clone(), agent.clone()))
            .collect();
        agents.sort_by(|a, b| a.0.cmp(&b.0));
        agents
    }

    /// Initialize every registered agent
    ///
    /// A failing agent is logged and reported; the others still run.
    /// Services and plugins initialize lazily on first use and are skipped.
    pub async fn initialize_all(&self) -> LifecycleReport {
        let jobs: Vec<_> = self
            .agent_snapshot()
            .into_iter()
            .map(|(id, agent)| (id, async move { agent.initialize().await }))
            .collect();

        let report = collect_report(self.executor.run(jobs).await);
        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Agent initialization finished"
        );
        report
    }

    /// Shut down every registered agent, best effort
    pub async fn shutdown_all(&self) -> LifecycleReport {
        let jobs: Vec<_> = self
            .agent_snapshot()
            .into_iter()
            .map(|(id, agent)| (id, async move { agent.shutdown().await }))
            .collect();

        let report = collect_report(self.executor.run(jobs).await);
        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Agent shutdown finished"
        );
        report
    }
}

fn collect_report(outcomes: Vec<crate::executor::FanOutOutcome<()>>) -> LifecycleReport {
    let mut report = LifecycleReport::default();
    for outcome in outcomes {
        match outcome.result {
            Ok(()) => report.succeeded.push(outcome.key),
            Err(error) => report.failed.push(LifecycleFailure {
                agent_id: outcome.key,
                error,
            }),
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::{ActionResult, AgentStatus};
    use crate::runtime::{ServiceRequest, ServiceResponse};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct TestAgent {
        id: String,
        capabilities: Vec<String>,
        fail_init: bool,
        initialized: AtomicBool,
    }

    impl TestAgent {
        fn new(id: &str, capabilities: &[&str]) -> Self {
            Self {
                id: id.to_string(),
                capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
                fail_init: false,
                initialized: AtomicBool::new(false),
            }
        }

        fn failing(mut self) -> Self {
            self.fail_init = true;
            self
        }
    }

    #[async_trait]
    impl AgentEntry for TestAgent {
        fn id(&self) -> &str {
            &self.id
        }

        fn name(&self) -> &str {
            &self.id
        }

        fn capabilities(&self) -> &[String] {
            &self.capabilities
        }

        async fn initialize(&self) -> Result<()> {
            if self.fail_init {
                return Err(AgentError::initialization_failed("model missing"));
            }
            self.initialized.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn shutdown(&self) -> Result<()> {
            self.initialized.store(false, Ordering::SeqCst);
            Ok(())
        }

        async fn handle_message(&self, content: &str) -> Result<ActionResult> {
            Ok(ActionResult {
                success: true,
                text: content.to_string(),
                data: serde_json::Value::Null,
            })
        }

        async fn generate_response(&self, text: &str) -> Result<String> {
            Ok(text.to_string())
        }

        fn status(&self) -> AgentStatus {
            AgentStatus {
                is_initialized: self.initialized.load(Ordering::SeqCst),
                ..AgentStatus::default()
            }
        }
    }

    struct TestService {
        service_type: String,
        capabilities: Vec<String>,
    }

    impl TestService {
        fn new(service_type: &str, capabilities: &[&str]) -> Self {
            Self {
                service_type: service_type.to_string(),
                capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl ServiceEntry for TestService {
        fn service_type(&self) -> &str {
            &self.service_type
        }

        fn name(&self) -> &str {
            &self.service_type
        }

        fn capabilities(&self) -> &[String] {
            &self.capabilities
        }

        fn is_initialized(&self) -> bool {
            false
        }

        async fn invoke(&self, _request: ServiceRequest) -> Result<ServiceResponse> {
            Ok(ServiceResponse::text(self.service_type.clone()))
        }
    }

    #[test]
    fn test_register_and_get_agent() {
        let registry = CapabilityRegistry::new();
        registry
            .register_agent(Arc::new(TestAgent::new("scout", &["search"])))
            .unwrap();

        assert_eq!(registry.get_agent("scout").unwrap().id(), "scout");
        assert!(registry.get_agent("missing").is_none());
        assert_eq!(registry.get_agent_by_capability("search").unwrap().id(), "scout");
    }

    #[test]
    fn test_register_rejects_blank_key() {
        let registry = CapabilityRegistry::new();
        let err = registry
            .register_agent(Arc::new(TestAgent::new("  ", &[])))
            .unwrap_err();
        assert!(matches!(err, AgentError::MissingIdentifier(_)));
        assert_eq!(registry.stats(), RegistryStats::default());
    }

    #[test]
    fn test_key_is_stored_as_reported() {
        let registry = CapabilityRegistry::new();
        registry
            .register_agent(Arc::new(TestAgent::new(" scout ", &["search"])))
            .unwrap();

        assert_eq!(registry.get_agent(" scout ").unwrap().id(), " scout ");
        assert!(registry.get_agent("scout").is_none());
        assert!(registry.unregister_agent(" scout "));
        assert_eq!(registry.stats(), RegistryStats::default());
    }

    #[test]
    fn test_last_write_wins_drops_stale_capabilities() {
        let registry = CapabilityRegistry::new();
        registry
            .register_agent(Arc::new(TestAgent::new("scout", &["search", "summarize"])))
            .unwrap();
        registry
            .register_agent(Arc::new(TestAgent::new("scout", &["search"])))
            .unwrap();

        assert_eq!(registry.stats().agents, 1);
        assert!(registry.has_capability("search"));
        assert!(!registry.has_capability("summarize"));
    }

    #[test]
    fn test_overwrite_keeps_capability_taken_by_other_owner() {
        let registry = CapabilityRegistry::new();
        registry
            .register_agent(Arc::new(TestAgent::new("a", &["search"])))
            .unwrap();
        registry
            .register_service(Arc::new(TestService::new("index", &["search"])))
            .unwrap();
        registry
            .register_agent(Arc::new(TestAgent::new("a", &[])))
            .unwrap();

        let entry = registry.find_entry_by_capability("search").unwrap();
        assert_eq!(entry.entry_type(), EntryType::Service);
        assert_eq!(entry.key(), "index");
    }

    #[test]
    fn test_capability_resolution_is_type_scoped() {
        let registry = CapabilityRegistry::new();
        registry
            .register_service(Arc::new(TestService::new("vector", &["retrieve"])))
            .unwrap();

        assert!(registry.get_service_by_capability("retrieve").is_some());
        assert!(registry.get_agent_by_capability("retrieve").is_none());
        assert!(registry.get_plugin_by_capability("retrieve").is_none());
    }

    #[test]
    fn test_unregister_agent_removes_capabilities() {
        let registry = CapabilityRegistry::new();
        registry
            .register_agent(Arc::new(TestAgent::new("scout", &["search", "plan"])))
            .unwrap();

        assert!(registry.unregister_agent("scout"));
        assert!(!registry.unregister_agent("scout"));
        assert!(registry.find_entry_by_capability("search").is_none());
        assert_eq!(registry.stats().capabilities, 0);
    }

    #[test]
    fn test_unregister_capability_keeps_entry() {
        let registry = CapabilityRegistry::new();
        registry
            .register_agent(Arc::new(TestAgent::new("scout", &["search"])))
            .unwrap();

        assert!(registry.unregister_capability("search"));
        assert!(registry.find_entry_by_capability("search").is_none());
        assert!(registry.get_agent("scout").is_some());
    }

    #[test]
    fn test_clear_services_leaves_agents() {
        let registry = CapabilityRegistry::new();
        registry
            .register_agent(Arc::new(TestAgent::new("scout", &["search"])))
            .unwrap();
        registry
            .register_service(Arc::new(TestService::new("vector", &["retrieve"])))
            .unwrap();

        registry.clear_services();
        assert_eq!(
            registry.stats(),
            RegistryStats {
                agents: 1,
                services: 0,
                plugins: 0,
                capabilities: 1,
            }
        );

        registry.clear_all();
        assert_eq!(registry.stats(), RegistryStats::default());
    }

    #[test]
    fn test_all_capabilities_sorted() {
        let registry = CapabilityRegistry::new();
        registry
            .register_agent(Arc::new(TestAgent::new("scout", &["zeta", "alpha"])))
            .unwrap();
        registry
            .register_service(Arc::new(TestService::new("vector", &["middle"])))
            .unwrap();

        let names: Vec<String> = registry
            .all_capabilities()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["alpha", "middle", "zeta"]);
        assert_eq!(registry.agent_ids(), vec!["scout"]);
        assert_eq!(registry.service_types(), vec!["vector"]);
        assert!(registry.plugin_names().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_all_isolates_failures() {
        let registry = CapabilityRegistry::new();
        let good = Arc::new(TestAgent::new("good", &[]));
        registry.register_agent(good.clone()).unwrap();
        registry
            .register_agent(Arc::new(TestAgent::new("bad", &[]).failing()))
            .unwrap();

        let report = registry.initialize_all().await;
        assert_eq!(report.total(), 2);
        assert_eq!(report.succeeded, vec!["good"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].agent_id, "bad");
        assert!(!report.is_success());
        assert!(good.status().is_initialized);

        let report = registry.shutdown_all().await;
        assert!(report.is_success());
        assert!(!good.status().is_initialized);
    }

    #[tokio::test]
    async fn test_initialize_all_empty_registry() {
        let registry = CapabilityRegistry::with_settings(&RegistrySettings::default());
        let report = registry.initialize_all().await;
        assert!(report.is_success());
        assert_eq!(report.total(), 0);
    }
}
