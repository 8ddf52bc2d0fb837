//! Cascade removal.
//!
//! Planning is pure: [`plan_removal`] takes the loaded documents and returns
//! the next state of every document plus a preview, without touching disk or
//! the deployment toolkit. [`apply_plan`] then tears down the stack (target
//! removal only), writes the changed documents and deletes tool directories.

mod preview;
mod references;
mod reset;
mod teardown;

pub use preview::{diff_lines, DiffLine, RemovalPreview, SchemaChange};
pub use reset::plan_reset;
pub use teardown::Teardown;

use crate::builders::tool_code_dir;
use crate::error::{AgentCoreError, ResourceKind, Result};
use crate::naming;
use crate::store::{ConfigStore, ConfigKind, DocumentSet};
use crate::toolkit::StackToolkit;
use std::io;
use std::path::{Path, PathBuf};

/// Shown after every successful removal
pub const REMOVAL_NOTE: &str =
    "Source code has not been modified. Run `agentcore deploy` to apply changes.";

/// Reference documents are written in this order; the removed resource's own
/// document always goes last.
const WRITE_ORDER: &[ConfigKind] = &[
    ConfigKind::DeployedState,
    ConfigKind::McpDefs,
    ConfigKind::Mcp,
    ConfigKind::Project,
    ConfigKind::Targets,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalRequest {
    Agent(String),
    Memory(String),
    /// Simple or qualified identity name
    Identity(String),
    Gateway(String),
    McpTool(String),
    Target(String),
    All,
}

#[derive(Debug, Clone)]
pub struct RemovalPlan {
    pub kind: ResourceKind,
    /// Stored name of the removed resource
    pub name: String,
    pub next: DocumentSet,
    pub preview: RemovalPreview,
    pub write_order: Vec<ConfigKind>,
    pub directories: Vec<PathBuf>,
    pub teardown: Option<Teardown>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemovalOutcome {
    pub message: String,
    pub note: &'static str,
    pub written: Vec<ConfigKind>,
    pub destroyed_stack: Option<String>,
}

/// A plan before its preview and write order are derived
pub(crate) struct Draft {
    pub kind: ResourceKind,
    pub name: String,
    pub authoritative: ConfigKind,
    pub next: DocumentSet,
    pub summary: Vec<String>,
    /// (relative display path, absolute path)
    pub directories: Vec<(String, PathBuf)>,
    pub teardown: Option<Teardown>,
}

impl Draft {
    pub(crate) fn finish(self, before: &DocumentSet) -> Result<RemovalPlan> {
        let changes = preview::changed_documents(before, &self.next)?;
        let changed: Vec<ConfigKind> = changes.iter().map(|(kind, _)| *kind).collect();

        let mut write_order: Vec<ConfigKind> = WRITE_ORDER
            .iter()
            .copied()
            .filter(|k| *k != self.authoritative && changed.contains(k))
            .collect();
        if changed.contains(&self.authoritative) {
            write_order.push(self.authoritative);
        }

        let mut summary = self.summary;
        if let Some(teardown) = &self.teardown {
            summary.push(format!(
                "Destroy the deployed stack of target '{}' in {}",
                teardown.target, teardown.region
            ));
        }

        let schema_changes = write_order
            .iter()
            .filter_map(|k| changes.iter().find(|(kind, _)| kind == k))
            .map(|(_, change)| change.clone())
            .collect();

        let (relative, directories): (Vec<String>, Vec<PathBuf>) =
            self.directories.into_iter().unzip();

        Ok(RemovalPlan {
            kind: self.kind,
            name: self.name,
            next: self.next,
            preview: RemovalPreview {
                summary,
                directories_to_delete: relative,
                schema_changes,
            },
            write_order,
            directories,
            teardown: self.teardown,
        })
    }
}

/// Compute the removal of one resource and everything that references it.
pub fn plan_removal(
    docs: &DocumentSet,
    request: &RemovalRequest,
    project_root: &Path,
) -> Result<RemovalPlan> {
    let mut next = docs.clone();
    let mut directories = Vec::new();
    let mut teardown = None;

    let (kind, name, authoritative) = match request {
        RemovalRequest::All => return plan_reset(docs),
        RemovalRequest::Agent(name) => {
            require(docs.project.agent(name).is_some(), ResourceKind::Agent, name)?;
            (ResourceKind::Agent, name.clone(), ConfigKind::Project)
        }
        RemovalRequest::Memory(name) => {
            require(docs.project.memory(name).is_some(), ResourceKind::Memory, name)?;
            (ResourceKind::Memory, name.clone(), ConfigKind::Project)
        }
        RemovalRequest::Identity(input) => {
            let qualified = naming::resolve_qualified(&docs.project.name, input, |n| {
                docs.project.credential(n).is_some()
            })
            .ok_or_else(|| AgentCoreError::not_found(ResourceKind::Identity, input))?;
            (ResourceKind::Identity, qualified, ConfigKind::Project)
        }
        RemovalRequest::Gateway(name) => {
            let found = docs.mcp.as_ref().is_some_and(|m| m.gateway(name).is_some());
            require(found, ResourceKind::Gateway, name)?;
            (ResourceKind::Gateway, name.clone(), ConfigKind::Mcp)
        }
        RemovalRequest::McpTool(name) => {
            let found = docs.mcp.as_ref().is_some_and(|m| m.has_tool(name))
                || docs
                    .mcp_defs
                    .as_ref()
                    .is_some_and(|d| d.tools.contains_key(name));
            require(found, ResourceKind::McpTool, name)?;
            (ResourceKind::McpTool, name.clone(), ConfigKind::Mcp)
        }
        RemovalRequest::Target(name) => {
            let target = docs
                .targets()
                .iter()
                .find(|t| &t.name == name)
                .ok_or_else(|| AgentCoreError::not_found(ResourceKind::Target, name))?;
            teardown = Teardown::for_target(docs, name, target.region);
            (ResourceKind::Target, name.clone(), ConfigKind::Targets)
        }
    };

    let mut summary = vec![format!("Remove {} '{}'", kind.as_str(), name)];
    match kind {
        ResourceKind::Agent => references::strip_agent(&mut next, &name, &mut summary),
        ResourceKind::Memory => references::strip_memory(&mut next.project, &name, &mut summary),
        ResourceKind::Identity => {
            references::strip_identity(&mut next.project, &name, &mut summary)
        }
        ResourceKind::Gateway => {
            let tools = references::strip_gateway(&mut next, &name, &mut summary);
            directories = existing_tool_dirs(project_root, &tools);
        }
        ResourceKind::McpTool => {
            references::strip_mcp_tool(&mut next, &name, &mut summary);
            directories = existing_tool_dirs(project_root, std::slice::from_ref(&name));
        }
        ResourceKind::Target => {
            if let Some(targets) = next.targets.as_mut() {
                targets.retain(|t| t.name != name);
            }
            if let Some(state) = next.deployed.as_mut() {
                if state.targets.remove(&name).is_some() {
                    summary.push(format!("Remove deployed state of target '{}'", name));
                }
            }
        }
        ResourceKind::Project => {}
    }

    Draft {
        kind,
        name,
        authoritative,
        next,
        summary,
        directories,
        teardown,
    }
    .finish(docs)
}

/// Carry out a plan: teardown, document writes, then directory deletion.
pub fn apply_plan(
    store: &ConfigStore,
    plan: &RemovalPlan,
    toolkit: &dyn StackToolkit,
) -> Result<RemovalOutcome> {
    let destroyed_stack = match &plan.teardown {
        Some(teardown) => teardown.run(toolkit)?,
        None => None,
    };

    let mut written = Vec::new();
    for kind in &plan.write_order {
        if let Err(e) = store.write_document(*kind, &plan.next) {
            if written.is_empty() {
                return Err(e);
            }
            return Err(partial_failure(plan, &written, &e.to_string()));
        }
        tracing::debug!(file = kind.relative_path(), "document written");
        written.push(*kind);
    }

    for dir in &plan.directories {
        match std::fs::remove_dir_all(dir) {
            Ok(()) => tracing::info!(path = %dir.display(), "deleted tool directory"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(partial_failure(
                    plan,
                    &written,
                    &format!("failed to delete {}: {}", dir.display(), e),
                ))
            }
        }
    }

    let message = match plan.kind {
        ResourceKind::Project => format!("Reset project '{}'", plan.name),
        kind => format!("Removed {} '{}'", kind.as_str(), plan.name),
    };

    Ok(RemovalOutcome {
        message,
        note: REMOVAL_NOTE,
        written,
        destroyed_stack,
    })
}

fn require(found: bool, kind: ResourceKind, name: &str) -> Result<()> {
    if found {
        Ok(())
    } else {
        Err(AgentCoreError::not_found(kind, name))
    }
}

fn existing_tool_dirs(project_root: &Path, tools: &[String]) -> Vec<(String, PathBuf)> {
    tools
        .iter()
        .map(|tool| (format!("app/mcp/{}", tool), tool_code_dir(project_root, tool)))
        .filter(|(_, path)| path.exists())
        .collect()
}

fn partial_failure(plan: &RemovalPlan, written: &[ConfigKind], cause: &str) -> AgentCoreError {
    let files: Vec<&str> = written.iter().map(|k| k.relative_path()).collect();
    AgentCoreError::PartialRemoval(format!(
        "Removal of {} '{}' was only partly applied: {}. Already written: {}. Fix the remaining files manually.",
        plan.kind.as_str(),
        plan.name,
        cause,
        if files.is_empty() {
            "none".to_string()
        } else {
            files.join(", ")
        }
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures::project_with_agents;
    use crate::schema::{
        Access, DeployedState, DeploymentRecord, DeploymentTarget, McpDefs, McpSpec, MemoryProvider,
        Region, Relation,
    };
    use crate::toolkit::DeployedStack;
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeToolkit {
        stack: Option<DeployedStack>,
        fail_destroy: bool,
        calls: RefCell<Vec<String>>,
    }

    impl StackToolkit for FakeToolkit {
        fn discover(
            &self,
            region: Region,
            project: &str,
            target: &str,
        ) -> Result<Option<DeployedStack>> {
            self.calls
                .borrow_mut()
                .push(format!("discover {} {} {}", region, project, target));
            Ok(self.stack.clone())
        }

        fn destroy(&self, stack_pattern: &str) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("destroy {}", stack_pattern));
            if self.fail_destroy {
                return Err(AgentCoreError::Toolkit("boom".to_string()));
            }
            Ok(())
        }
    }

    fn docs_with_memory() -> DocumentSet {
        let mut project = project_with_agents("Acme", &["A", "B"]);
        project.memories.push(crate::schema::Memory {
            name: "M1".to_string(),
            event_expiry_duration: 30,
            strategies: vec![],
        });
        for (agent, relation) in [("A", Relation::Own), ("B", Relation::Use)] {
            project
                .agent_mut(agent)
                .unwrap()
                .memory_providers
                .push(MemoryProvider {
                    relation,
                    name: "M1".to_string(),
                    access: Access::ReadWrite,
                    env_var_name: "AGENTCORE_MEMORY_M1_ID".to_string(),
                });
        }
        let mut docs = DocumentSet::new(project);
        docs.mcp = Some(McpSpec::default());
        docs.mcp_defs = Some(McpDefs::default());
        docs
    }

    fn docs_with_target(deployed: bool) -> DocumentSet {
        let mut docs = DocumentSet::new(project_with_agents("Acme", &[]));
        docs.targets = Some(vec![DeploymentTarget {
            name: "dev".to_string(),
            description: None,
            account: "123456789012".to_string(),
            region: Region::UsEast1,
        }]);
        if deployed {
            let mut state = DeployedState::default();
            state.targets.insert(
                "dev".to_string(),
                DeploymentRecord {
                    stack_name: Some("AgentCore-Acme-dev".to_string()),
                    extra: Default::default(),
                },
            );
            docs.deployed = Some(state);
        }
        docs
    }

    #[test]
    fn test_remove_memory_strips_all_references() {
        let docs = docs_with_memory();
        let plan = plan_removal(
            &docs,
            &RemovalRequest::Memory("M1".to_string()),
            Path::new("/nonexistent"),
        )
        .unwrap();

        assert!(plan.next.project.memories.is_empty());
        assert!(plan
            .next
            .project
            .agents
            .iter()
            .all(|a| a.memory_providers.is_empty()));
        // Only agentcore.json changed.
        assert_eq!(plan.write_order, vec![ConfigKind::Project]);
        assert_eq!(plan.preview.schema_changes.len(), 1);
        assert_eq!(plan.preview.schema_changes[0].file, "agentcore.json");
    }

    #[test]
    fn test_remove_agent_cascades_owned_memory() {
        let docs = docs_with_memory();
        let plan = plan_removal(
            &docs,
            &RemovalRequest::Agent("A".to_string()),
            Path::new("/nonexistent"),
        )
        .unwrap();

        assert!(plan.next.project.agent("A").is_none());
        assert!(plan.next.project.memories.is_empty());
        assert!(plan.next.project.agent("B").unwrap().memory_providers.is_empty());
    }

    #[test]
    fn test_not_found() {
        let docs = docs_with_memory();
        let err = plan_removal(
            &docs,
            &RemovalRequest::Gateway("G".to_string()),
            Path::new("/nonexistent"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_target_without_deployed_state_skips_teardown() {
        let docs = docs_with_target(false);
        let plan = plan_removal(
            &docs,
            &RemovalRequest::Target("dev".to_string()),
            Path::new("/nonexistent"),
        )
        .unwrap();
        assert!(plan.teardown.is_none());
        assert_eq!(plan.write_order, vec![ConfigKind::Targets]);

        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path());
        let toolkit = FakeToolkit::default();
        apply_plan(&store, &plan, &toolkit).unwrap();
        assert!(toolkit.calls.borrow().is_empty());
    }

    #[test]
    fn test_target_teardown_then_state_then_targets() {
        let docs = docs_with_target(true);
        let plan = plan_removal(
            &docs,
            &RemovalRequest::Target("dev".to_string()),
            Path::new("/nonexistent"),
        )
        .unwrap();
        assert_eq!(
            plan.write_order,
            vec![ConfigKind::DeployedState, ConfigKind::Targets]
        );

        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path());
        let toolkit = FakeToolkit {
            stack: Some(DeployedStack {
                stack_name: "AgentCore-Acme-dev".to_string(),
                status: "CREATE_COMPLETE".to_string(),
            }),
            ..Default::default()
        };
        let outcome = apply_plan(&store, &plan, &toolkit).unwrap();

        assert_eq!(
            *toolkit.calls.borrow(),
            vec![
                "discover us-east-1 Acme dev".to_string(),
                "destroy AgentCore-Acme-dev".to_string()
            ]
        );
        assert_eq!(outcome.destroyed_stack.as_deref(), Some("AgentCore-Acme-dev"));
        assert!(store.load_all().unwrap().deployed.unwrap().targets.is_empty());
        assert!(store.read_targets_or_default().unwrap().is_empty());
    }

    #[test]
    fn test_teardown_failure_writes_nothing() {
        let docs = docs_with_target(true);
        let plan = plan_removal(
            &docs,
            &RemovalRequest::Target("dev".to_string()),
            Path::new("/nonexistent"),
        )
        .unwrap();

        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path());
        let toolkit = FakeToolkit {
            stack: Some(DeployedStack {
                stack_name: "AgentCore-Acme-dev".to_string(),
                status: "CREATE_COMPLETE".to_string(),
            }),
            fail_destroy: true,
            ..Default::default()
        };
        let err = apply_plan(&store, &plan, &toolkit).unwrap_err();
        assert!(matches!(err, AgentCoreError::Toolkit(_)));
        assert!(!store.exists(ConfigKind::Targets));
        assert!(!store.exists(ConfigKind::DeployedState));
    }

    #[test]
    fn test_partial_write_names_written_files() {
        let docs = docs_with_target(true);
        let plan = plan_removal(
            &docs,
            &RemovalRequest::Target("dev".to_string()),
            Path::new("/nonexistent"),
        )
        .unwrap();

        let dir = TempDir::new().unwrap();
        // A directory where aws-targets.json should go makes the second write fail.
        std::fs::create_dir_all(dir.path().join("aws-targets.json")).unwrap();
        let store = ConfigStore::new(dir.path());
        let err = apply_plan(&store, &plan, &FakeToolkit::default()).unwrap_err();

        assert!(matches!(err, AgentCoreError::PartialRemoval(_)));
        assert!(err.to_string().contains(".cli/deployed-state.json"));
    }
}
