//! Typed shapes of the persisted project documents.
//!
//! Every document implements [`Validate`], which the config store runs after a
//! successful parse. Parse errors and validation errors are both reported as
//! schema errors against the offending file.

pub mod deployed;
pub mod mcp;
pub mod project;
pub mod targets;

pub use deployed::{DeployedState, DeploymentRecord};
pub use mcp::{
    AuthorizerConfiguration, AuthorizerType, Binding, CustomJwtAuthorizer, Gateway,
    GatewayTarget, McpDefs, McpRuntimeTool, McpSpec, TargetType, ToolCompute, ToolDefinition,
    ToolHost, ToolImplementation,
};
pub use project::{
    Access, AgentSource, AgentSpec, Credential, CredentialVariant, Framework, IdentityProvider,
    Language, McpProvider, Memory, MemoryProvider, MemoryStrategy, ModelProvider, ProjectSpec,
    Relation, RemoteTool, StrategyType,
};
pub use targets::{check_account, DeploymentTarget, Region};

use std::collections::HashSet;

/// Structural invariants that serde alone cannot express.
pub trait Validate {
    fn validate(&self) -> std::result::Result<(), String>;
}

/// Fail on the first name that appears twice.
pub(crate) fn check_unique<'a, I>(what: &str, names: I) -> std::result::Result<(), String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(format!("duplicate {} name '{}'", what, name));
        }
    }
    Ok(())
}
