use super::{to_document_string, ConfigKind};
use crate::error::Result;
use crate::schema::{DeployedState, DeploymentTarget, McpDefs, McpSpec, ProjectSpec};

/// In-memory view of every project document for a single command.
///
/// Optional documents that were not on disk are `None`, which keeps "absent"
/// distinguishable from "present but empty" when diffing.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSet {
    pub project: ProjectSpec,
    pub targets: Option<Vec<DeploymentTarget>>,
    pub deployed: Option<DeployedState>,
    pub mcp: Option<McpSpec>,
    pub mcp_defs: Option<McpDefs>,
}

impl DocumentSet {
    pub fn new(project: ProjectSpec) -> Self {
        Self {
            project,
            targets: None,
            deployed: None,
            mcp: None,
            mcp_defs: None,
        }
    }

    /// Stored text of one document, `None` when absent
    pub fn render(&self, kind: ConfigKind) -> Result<Option<String>> {
        let rendered = match kind {
            ConfigKind::Project => Some(to_document_string(&self.project)?),
            ConfigKind::Targets => self.targets.as_ref().map(to_document_string).transpose()?,
            ConfigKind::DeployedState => {
                self.deployed.as_ref().map(to_document_string).transpose()?
            }
            ConfigKind::Mcp => self.mcp.as_ref().map(to_document_string).transpose()?,
            ConfigKind::McpDefs => self.mcp_defs.as_ref().map(to_document_string).transpose()?,
        };
        Ok(rendered)
    }

    pub fn targets(&self) -> &[DeploymentTarget] {
        self.targets.as_deref().unwrap_or_default()
    }
}
