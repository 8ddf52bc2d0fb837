use crate::cli::Cli;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the CLI settings, both in `$HOME` and in the project root
pub const SETTINGS_FILE: &str = ".agentcore-cli.toml";

/// Settings for the CLI itself. Project resources live in the JSON documents
/// under `agentcore/`; this only controls how the tool behaves.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub toolkit: ToolkitSettings,

    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub env: EnvSettings,

    /// Debug logging (not stored in settings file)
    #[serde(skip)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolkitSettings {
    /// Program that runs the CDK CLI
    #[serde(default = "default_cdk_command")]
    pub cdk_command: String,

    /// Arguments placed before `destroy`
    #[serde(default = "default_cdk_args")]
    pub cdk_args: Vec<String>,

    #[serde(default = "default_aws_command")]
    pub aws_command: String,
}

impl Default for ToolkitSettings {
    fn default() -> Self {
        Self {
            cdk_command: default_cdk_command(),
            cdk_args: default_cdk_args(),
            aws_command: default_aws_command(),
        }
    }
}

fn default_cdk_command() -> String {
    "npx".to_string()
}

fn default_cdk_args() -> Vec<String> {
    vec!["cdk".to_string()]
}

fn default_aws_command() -> String {
    "aws".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    /// Print JSON results even without `--json`
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvSettings {
    /// Env file, relative to the config directory, that receives API keys
    #[serde(default = "default_env_file")]
    pub file: String,
}

impl Default for EnvSettings {
    fn default() -> Self {
        Self {
            file: default_env_file(),
        }
    }
}

fn default_env_file() -> String {
    ".env.local".to_string()
}

impl Settings {
    /// Load settings with precedence:
    /// 1. CLI flags (applied later via with_cli_overrides)
    /// 2. Environment variables
    /// 3. Project settings (.agentcore-cli.toml in project root)
    /// 4. Global settings (~/.agentcore-cli.toml)
    /// 5. Built-in defaults
    pub fn load(project_root: Option<&Path>) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(home) = home_dir() {
            let global = home.join(SETTINGS_FILE);
            if global.exists() {
                settings = settings.merge(Self::from_file(&global)?);
            }
        }

        if let Some(root) = project_root {
            let project = root.join(SETTINGS_FILE);
            if project.exists() {
                settings = settings.merge(Self::from_file(&project)?);
            }
        }

        Ok(settings.merge_env())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Merge another settings layer into this one (other takes precedence)
    fn merge(mut self, other: Self) -> Self {
        if other.toolkit.cdk_command != default_cdk_command() {
            self.toolkit.cdk_command = other.toolkit.cdk_command;
        }
        if other.toolkit.cdk_args != default_cdk_args() {
            self.toolkit.cdk_args = other.toolkit.cdk_args;
        }
        if other.toolkit.aws_command != default_aws_command() {
            self.toolkit.aws_command = other.toolkit.aws_command;
        }

        self.output.json = self.output.json || other.output.json;

        if other.env.file != default_env_file() {
            self.env.file = other.env.file;
        }

        self
    }

    fn merge_env(mut self) -> Self {
        if let Ok(command) = std::env::var("AGENTCORE_CDK_COMMAND") {
            if !command.is_empty() {
                self.toolkit.cdk_command = command;
            }
        }

        if let Ok(command) = std::env::var("AGENTCORE_AWS_COMMAND") {
            if !command.is_empty() {
                self.toolkit.aws_command = command;
            }
        }

        if let Ok(json) = std::env::var("AGENTCORE_JSON") {
            self.output.json = matches!(json.as_str(), "1" | "true" | "yes");
        }

        if let Ok(file) = std::env::var("AGENTCORE_ENV_FILE") {
            if !file.is_empty() {
                self.env.file = file;
            }
        }

        self
    }

    /// Apply CLI overrides (highest precedence)
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        self.verbose = cli.verbose;
        if cli.json {
            self.output.json = true;
        }
        self
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
