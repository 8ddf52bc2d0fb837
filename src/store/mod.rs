//! Reads and writes the persisted project documents.
//!
//! The store is the only code that touches the JSON files. Reads parse and
//! validate; a document that fails either step is a schema error and is never
//! repaired automatically. Writes go through a temp file and a rename so a
//! crash never leaves a half-written document behind.

mod documents;

pub use documents::DocumentSet;

use crate::error::{AgentCoreError, Result};
use crate::schema::{DeployedState, DeploymentTarget, McpDefs, McpSpec, ProjectSpec, Validate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One of the persisted documents, relative to the config directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKind {
    Project,
    Targets,
    DeployedState,
    Mcp,
    McpDefs,
}

impl ConfigKind {
    pub const ALL: &'static [ConfigKind] = &[
        ConfigKind::Project,
        ConfigKind::Targets,
        ConfigKind::DeployedState,
        ConfigKind::Mcp,
        ConfigKind::McpDefs,
    ];

    pub fn relative_path(&self) -> &'static str {
        match self {
            ConfigKind::Project => "agentcore.json",
            ConfigKind::Targets => "aws-targets.json",
            ConfigKind::DeployedState => ".cli/deployed-state.json",
            ConfigKind::Mcp => "mcp.json",
            ConfigKind::McpDefs => "mcp-defs.json",
        }
    }
}

/// Serialize a document the way it is stored on disk
pub fn to_document_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    base_dir: PathBuf,
}

impl ConfigStore {
    /// Store rooted at a resolved config directory (`<project>/agentcore`)
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn path(&self, kind: ConfigKind) -> PathBuf {
        self.base_dir.join(kind.relative_path())
    }

    pub fn exists(&self, kind: ConfigKind) -> bool {
        self.path(kind).is_file()
    }

    pub fn read_project_spec(&self) -> Result<ProjectSpec> {
        self.read(ConfigKind::Project)
    }

    pub fn write_project_spec(&self, spec: &ProjectSpec) -> Result<()> {
        self.write(ConfigKind::Project, spec)
    }

    pub fn read_targets_or_default(&self) -> Result<Vec<DeploymentTarget>> {
        Ok(self.read_optional(ConfigKind::Targets)?.unwrap_or_default())
    }

    pub fn write_targets(&self, targets: &[DeploymentTarget]) -> Result<()> {
        self.write(ConfigKind::Targets, targets)
    }

    pub fn write_deployed_state(&self, state: &DeployedState) -> Result<()> {
        self.write(ConfigKind::DeployedState, state)
    }

    pub fn read_mcp_spec_or_default(&self) -> Result<McpSpec> {
        Ok(self.read_optional(ConfigKind::Mcp)?.unwrap_or_default())
    }

    pub fn write_mcp_spec(&self, spec: &McpSpec) -> Result<()> {
        self.write(ConfigKind::Mcp, spec)
    }

    pub fn read_mcp_defs_or_default(&self) -> Result<McpDefs> {
        Ok(self.read_optional(ConfigKind::McpDefs)?.unwrap_or_default())
    }

    pub fn write_mcp_defs(&self, defs: &McpDefs) -> Result<()> {
        self.write(ConfigKind::McpDefs, defs)
    }

    /// Load every document; optional documents that do not exist are `None`.
    pub fn load_all(&self) -> Result<DocumentSet> {
        Ok(DocumentSet {
            project: self.read_project_spec()?,
            targets: self.read_optional(ConfigKind::Targets)?,
            deployed: self.read_optional(ConfigKind::DeployedState)?,
            mcp: self.read_optional(ConfigKind::Mcp)?,
            mcp_defs: self.read_optional(ConfigKind::McpDefs)?,
        })
    }

    /// Persist one document of a set. Absent documents are left alone.
    pub fn write_document(&self, kind: ConfigKind, docs: &DocumentSet) -> Result<()> {
        match kind {
            ConfigKind::Project => self.write_project_spec(&docs.project),
            ConfigKind::Targets => match &docs.targets {
                Some(targets) => self.write_targets(targets),
                None => Ok(()),
            },
            ConfigKind::DeployedState => match &docs.deployed {
                Some(state) => self.write_deployed_state(state),
                None => Ok(()),
            },
            ConfigKind::Mcp => match &docs.mcp {
                Some(spec) => self.write_mcp_spec(spec),
                None => Ok(()),
            },
            ConfigKind::McpDefs => match &docs.mcp_defs {
                Some(defs) => self.write_mcp_defs(defs),
                None => Ok(()),
            },
        }
    }

    fn read<T: DeserializeOwned + Validate>(&self, kind: ConfigKind) -> Result<T> {
        let path = self.path(kind);
        let contents = fs::read_to_string(&path)?;
        parse_document(&path, &contents)
    }

    fn read_optional<T: DeserializeOwned + Validate>(&self, kind: ConfigKind) -> Result<Option<T>> {
        let path = self.path(kind);
        match fs::read_to_string(&path) {
            Ok(contents) => parse_document(&path, &contents).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "optional document absent");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write<T: Serialize + ?Sized>(&self, kind: ConfigKind, value: &T) -> Result<()> {
        let path = self.path(kind);
        let contents = to_document_string(value)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| kind.relative_path().to_string());
        let tmp = path.with_file_name(format!("{}.tmp", file_name));

        fs::write(&tmp, contents)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::debug!(path = %path.display(), "wrote config document");
        Ok(())
    }
}

fn parse_document<T: DeserializeOwned + Validate>(path: &Path, contents: &str) -> Result<T> {
    let schema_error = |message: String| AgentCoreError::SchemaValidation {
        path: path.to_path_buf(),
        message,
    };

    let value: T = serde_json::from_str(contents).map_err(|e| {
        if e.is_syntax() || e.is_eof() {
            schema_error(format!("not valid JSON ({})", e))
        } else {
            schema_error(e.to_string())
        }
    })?;
    value.validate().map_err(schema_error)?;
    Ok(value)
}
