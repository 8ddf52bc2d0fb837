use crate::schema::{Access, CustomJwtAuthorizer};
use clap::{Parser, ValueEnum};

/// Flags shared by every `remove` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct RemoveFlags {
    /// Skip confirmation prompt
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Show what would be removed without making changes
    #[arg(long)]
    pub dry_run: bool,
}

/// JWT authorizer settings for `add gateway --authorizer-type custom-jwt`.
#[derive(Parser, Debug, Clone, Default)]
pub struct JwtFlags {
    /// OpenID discovery URL (must end with /.well-known/openid-configuration)
    #[arg(long)]
    pub discovery_url: Option<String>,

    /// Allowed audiences (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub allowed_audience: Vec<String>,

    /// Allowed client ids (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub allowed_clients: Vec<String>,
}

impl JwtFlags {
    /// `None` when no JWT flag was given at all
    pub fn to_authorizer(&self) -> Option<CustomJwtAuthorizer> {
        if self.discovery_url.is_none()
            && self.allowed_audience.is_empty()
            && self.allowed_clients.is_empty()
        {
            return None;
        }
        Some(CustomJwtAuthorizer {
            discovery_url: self.discovery_url.clone().unwrap_or_default(),
            allowed_audience: self.allowed_audience.clone(),
            allowed_clients: self.allowed_clients.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AgentType {
    /// Generate the agent from a template
    #[default]
    Generated,
    /// Bring your own code
    Byo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExposureMode {
    /// Deploy as a standalone MCP runtime
    #[default]
    #[value(name = "mcp-runtime")]
    McpRuntime,
    /// Add as a target behind an existing gateway
    #[value(name = "behind-gateway")]
    BehindGateway,
}

/// A memory user: `name` or `name:read` / `name:readwrite`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSpec {
    pub agent: String,
    pub access: Access,
}

pub fn parse_user_spec(s: &str) -> Result<UserSpec, String> {
    let (agent, access) = match s.split_once(':') {
        Some((agent, "read")) => (agent, Access::Read),
        Some((agent, "readwrite")) => (agent, Access::ReadWrite),
        Some((_, other)) => {
            return Err(format!(
                "invalid access '{}', expected 'read' or 'readwrite'",
                other
            ))
        }
        None => (s, Access::ReadWrite),
    };
    if agent.is_empty() {
        return Err("agent name cannot be empty".to_string());
    }
    Ok(UserSpec {
        agent: agent.to_string(),
        access,
    })
}
