use super::{stack_name, DeployedStack, StackToolkit};
use crate::config::ToolkitSettings;
use crate::error::{AgentCoreError, Result};
use crate::schema::Region;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

/// Toolkit backed by the AWS CLI (discovery) and the CDK CLI (destroy).
pub struct CdkToolkit {
    settings: ToolkitSettings,
    cdk_dir: PathBuf,
    verbose: bool,
    show_progress: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeStacksOutput {
    #[serde(default)]
    stacks: Vec<StackSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StackSummary {
    stack_name: String,
    stack_status: String,
}

impl CdkToolkit {
    /// `cdk_dir` is the CDK app of the project (`agentcore/cdk`).
    pub fn new(settings: ToolkitSettings, cdk_dir: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            cdk_dir: cdk_dir.into(),
            verbose: false,
            show_progress: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Show a spinner on stderr while destroying
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn require(program: &str) -> Result<()> {
        which::which(program).map(|_| ()).map_err(|_| {
            AgentCoreError::Toolkit(format!("'{}' is not installed or not on PATH", program))
        })
    }

    fn spinner(&self, message: String) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    }
}

impl StackToolkit for CdkToolkit {
    fn discover(
        &self,
        region: Region,
        project: &str,
        target: &str,
    ) -> Result<Option<DeployedStack>> {
        let aws = &self.settings.aws_command;
        Self::require(aws)?;

        let name = stack_name(project, target);
        tracing::debug!(stack = %name, region = %region, "describing stack");

        let output = Command::new(aws)
            .args(["cloudformation", "describe-stacks", "--stack-name"])
            .arg(&name)
            .args(["--region", region.as_str(), "--output", "json"])
            .output()
            .map_err(|e| AgentCoreError::Toolkit(format!("Failed to run {}: {}", aws, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("does not exist") {
                return Ok(None);
            }
            return Err(AgentCoreError::Toolkit(format!(
                "Failed to describe stack {}: {}",
                name,
                stderr.trim()
            )));
        }

        let parsed: DescribeStacksOutput = serde_json::from_slice(&output.stdout)?;
        Ok(parsed
            .stacks
            .into_iter()
            .find(|s| s.stack_status != "DELETE_COMPLETE")
            .map(|s| DeployedStack {
                stack_name: s.stack_name,
                status: s.stack_status,
            }))
    }

    fn destroy(&self, stack_pattern: &str) -> Result<()> {
        let cdk = &self.settings.cdk_command;
        Self::require(cdk)?;

        if !self.cdk_dir.is_dir() {
            return Err(AgentCoreError::Toolkit(format!(
                "CDK app not found at {}",
                self.cdk_dir.display()
            )));
        }

        let mut cmd = Command::new(cdk);
        cmd.args(&self.settings.cdk_args)
            .args(["destroy", stack_pattern, "--force"])
            .current_dir(&self.cdk_dir);

        if !self.verbose {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }

        tracing::info!(stack = %stack_pattern, "destroying stack");
        let spinner = self.spinner(format!("Destroying {}...", stack_pattern));

        let result = cmd.status();

        if let Some(pb) = &spinner {
            pb.finish_and_clear();
        }

        let status = result
            .map_err(|e| AgentCoreError::Toolkit(format!("Failed to run {}: {}", cdk, e)))?;

        if !status.success() {
            return Err(AgentCoreError::Toolkit(format!(
                "Failed to destroy stack {}",
                stack_pattern
            )));
        }

        Ok(())
    }
}
