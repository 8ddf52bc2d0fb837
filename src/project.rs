use crate::error::{AgentCoreError, Result};
use std::path::{Path, PathBuf};

/// Directory under the project root that holds the documents
pub const CONFIG_DIR: &str = "agentcore";

/// File whose presence marks a project root
pub const PROJECT_FILE: &str = "agentcore.json";

#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Detect the project containing the current directory
    pub fn detect() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| {
            AgentCoreError::ProjectDetection(format!("Failed to get current directory: {}", e))
        })?;
        Self::detect_from(&cwd)
    }

    /// Walk up from `start` until a directory containing `agentcore/agentcore.json` is found
    pub fn detect_from(start: &Path) -> Result<Self> {
        let start = start.canonicalize().map_err(|e| {
            AgentCoreError::ProjectDetection(format!("{}: {}", start.display(), e))
        })?;

        for dir in start.ancestors() {
            if Self::is_project_root(dir) {
                tracing::debug!(root = %dir.display(), "project detected");
                return Ok(Self {
                    root: dir.to_path_buf(),
                });
            }
        }

        Err(AgentCoreError::ProjectDetection(format!(
            "no {}/{} found in {} or any parent directory. Run `agentcore create` first.",
            CONFIG_DIR,
            PROJECT_FILE,
            start.display()
        )))
    }

    /// Use `dir` as the project root, or the current directory when absent
    pub fn resolve(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::detect_from(dir),
            None => Self::detect(),
        }
    }

    fn is_project_root(dir: &Path) -> bool {
        dir.join(CONFIG_DIR).join(PROJECT_FILE).is_file()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/agentcore`, the base directory of the config store
    pub fn config_dir(&self) -> PathBuf {
        self.root.join(CONFIG_DIR)
    }

    /// `<root>/agentcore/cdk`, where the toolkit runs
    pub fn cdk_dir(&self) -> PathBuf {
        self.config_dir().join("cdk")
    }
}
