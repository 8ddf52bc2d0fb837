use crate::builders::MemoryOption;
use crate::schema::{
    Access, AuthorizerType, CredentialVariant, Framework, Language, ModelProvider, StrategyType,
    ToolHost,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod flags;
pub use flags::{AgentType, ExposureMode, JwtFlags, RemoveFlags, UserSpec};

#[derive(Parser, Debug)]
#[command(name = "agentcore")]
#[command(about = "Create, configure and deploy AgentCore agent projects", long_about = None)]
#[command(version = env!("AGENTCORE_VERSION"))]
#[command(after_help = "\
EXAMPLES:
  agentcore create --name Acme
  agentcore add agent --name Bot --model-provider anthropic --memory short-term
  agentcore add memory --name Notes --owner Bot --users Helper:read
  agentcore attach identity --agent Helper --identity Key
  agentcore remove memory --name Notes --dry-run
  agentcore --json remove target --name dev --force

For details about a specific command, use:
  agentcore <command> --help")]
pub struct Cli {
    /// Show debug logs on stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Print the result as a single JSON object
    #[arg(long, global = true)]
    pub json: bool,

    /// Project directory (defaults to the nearest parent containing agentcore/agentcore.json)
    #[arg(long = "project-dir", global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new project
    Create {
        /// Project name (letters and digits, starting with a letter)
        #[arg(long)]
        name: String,

        /// Parent directory of the new project (default: current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Add a resource to the project
    Add {
        #[command(subcommand)]
        command: AddCommands,
    },

    /// Link an agent to an existing resource
    Attach {
        #[command(subcommand)]
        command: AttachCommands,
    },

    /// Remove a resource and every reference to it
    #[command(alias = "rm")]
    Remove {
        #[command(subcommand)]
        command: RemoveCommands,
    },

    /// Check every project document against its schema
    Validate,
}

#[derive(Subcommand, Debug)]
pub enum AddCommands {
    /// Add an agent
    Agent(AddAgentCmd),

    /// Add an AgentCore gateway
    Gateway(AddGatewayCmd),

    /// Add an MCP tool
    #[command(name = "mcp-tool")]
    McpTool(AddMcpToolCmd),

    /// Add a memory owned by an agent
    Memory(AddMemoryCmd),

    /// Add an identity (credential provider) owned by an agent
    Identity(AddIdentityCmd),

    /// Add a deployment target
    Target(AddTargetCmd),
}

#[derive(Parser, Debug)]
pub struct AddAgentCmd {
    #[arg(long)]
    pub name: String,

    /// Generate from a template or bring your own code
    #[arg(long = "type", value_enum, default_value_t)]
    pub agent_type: AgentType,

    #[arg(long, value_enum, default_value = "strands")]
    pub framework: Framework,

    #[arg(long, value_enum, default_value = "python")]
    pub language: Language,

    #[arg(long, value_enum, default_value = "bedrock")]
    pub model_provider: ModelProvider,

    /// Code directory (bring-your-own agents)
    #[arg(long)]
    pub code_location: Option<String>,

    /// Entrypoint file (bring-your-own agents)
    #[arg(long)]
    pub entrypoint: Option<String>,

    #[arg(long, value_enum, default_value_t)]
    pub memory: MemoryOption,

    /// Model provider API key, stored in the project env file
    #[arg(long)]
    pub api_key: Option<String>,
}

#[derive(Parser, Debug)]
pub struct AddGatewayCmd {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_enum, default_value_t)]
    pub authorizer_type: AuthorizerType,

    #[command(flatten)]
    pub jwt: JwtFlags,

    /// Agents that use this gateway (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub agents: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct AddMcpToolCmd {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_enum, default_value = "python")]
    pub language: Language,

    #[arg(long, value_enum, default_value_t)]
    pub exposure: ExposureMode,

    /// Gateway to place the tool behind (with --exposure behind-gateway)
    #[arg(long)]
    pub gateway: Option<String>,

    #[arg(long, value_enum)]
    pub host: Option<ToolHost>,

    /// Agents bound to the runtime tool (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub agents: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct AddMemoryCmd {
    #[arg(long)]
    pub name: String,

    /// Agent that owns the memory
    #[arg(long)]
    pub owner: String,

    /// Agents that use the memory: name[:read|readwrite], comma-separated
    #[arg(long, value_delimiter = ',', value_parser = flags::parse_user_spec)]
    pub users: Vec<UserSpec>,

    /// Extraction strategies (comma-separated)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub strategies: Vec<StrategyType>,

    /// Days before short-term events expire (7-365)
    #[arg(long)]
    pub expiry: Option<u32>,
}

#[derive(Parser, Debug)]
pub struct AddIdentityCmd {
    /// Simple name; stored qualified with the project name
    #[arg(long)]
    pub name: String,

    /// Agent that owns the credential
    #[arg(long)]
    pub owner: String,

    /// Agents that use the credential (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub users: Vec<String>,

    #[arg(long = "type", value_enum, default_value = "api-key")]
    pub variant: CredentialVariant,

    #[arg(long)]
    pub description: Option<String>,

    /// Secret value, stored in the project env file
    #[arg(long)]
    pub api_key: Option<String>,
}

#[derive(Parser, Debug)]
pub struct AddTargetCmd {
    #[arg(long)]
    pub name: String,

    /// 12-digit AWS account id
    #[arg(long)]
    pub account: String,

    #[arg(long)]
    pub region: String,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum AttachCommands {
    /// Let one agent invoke another
    Agent {
        /// Agent that gets the remote tool
        #[arg(long)]
        source: String,

        /// Agent being invoked
        #[arg(long)]
        target: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Give an agent access to a gateway
    Gateway {
        #[arg(long)]
        agent: String,

        #[arg(long)]
        gateway: String,
    },

    /// Share a memory with an agent
    Memory {
        #[arg(long)]
        agent: String,

        #[arg(long)]
        memory: String,

        #[arg(long, value_enum, default_value_t)]
        access: Access,
    },

    /// Share an identity with an agent
    Identity {
        #[arg(long)]
        agent: String,

        /// Simple or qualified identity name
        #[arg(long)]
        identity: String,
    },

    /// Bind an agent to an MCP runtime tool
    #[command(name = "mcp-runtime")]
    McpRuntime {
        #[arg(long)]
        agent: String,

        #[arg(long)]
        tool: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum RemoveCommands {
    /// Remove an agent, the memories and identities it owns, and references to it
    Agent {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        flags: RemoveFlags,
    },

    /// Remove a gateway, its tools and references to it
    Gateway {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        flags: RemoveFlags,
    },

    /// Remove an MCP tool and its code directory
    #[command(name = "mcp-tool")]
    McpTool {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        flags: RemoveFlags,
    },

    /// Remove a memory and references to it
    Memory {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        flags: RemoveFlags,
    },

    /// Remove an identity and references to it
    Identity {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        flags: RemoveFlags,
    },

    /// Remove a deployment target, destroying its stack if deployed
    Target {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        flags: RemoveFlags,
    },

    /// Remove every resource, keeping targets and deployed state
    All {
        #[command(flatten)]
        flags: RemoveFlags,
    },
}

impl RemoveCommands {
    pub fn flags(&self) -> &RemoveFlags {
        match self {
            RemoveCommands::Agent { flags, .. }
            | RemoveCommands::Gateway { flags, .. }
            | RemoveCommands::McpTool { flags, .. }
            | RemoveCommands::Memory { flags, .. }
            | RemoveCommands::Identity { flags, .. }
            | RemoveCommands::Target { flags, .. }
            | RemoveCommands::All { flags } => flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_remove_with_flags() {
        let cli = Cli::try_parse_from([
            "agentcore", "--json", "remove", "memory", "--name", "M1", "--dry-run",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Remove { command } => {
                assert!(command.flags().dry_run);
                assert!(!command.flags().force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_memory_users() {
        let cli = Cli::try_parse_from([
            "agentcore",
            "add",
            "memory",
            "--name",
            "M1",
            "--owner",
            "A",
            "--users",
            "B:read,C",
            "--strategies",
            "semantic,user-preference",
        ])
        .unwrap();
        match cli.command {
            Commands::Add {
                command: AddCommands::Memory(cmd),
            } => {
                assert_eq!(cmd.users.len(), 2);
                assert_eq!(cmd.users[0].access, Access::Read);
                assert_eq!(
                    cmd.strategies,
                    vec![StrategyType::Semantic, StrategyType::UserPreference]
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
