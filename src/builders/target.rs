use crate::error::{AgentCoreError, ResourceKind, Result};
use crate::naming;
use crate::schema::{check_account, DeploymentTarget, Region};

#[derive(Debug, Clone)]
pub struct TargetOptions {
    pub name: String,
    pub account: String,
    pub region: String,
    pub description: Option<String>,
}

/// Build a deployment target. Account and region are re-checked here even
/// though the CLI validates them, since this is the last stop before disk.
pub fn build_target(existing: &[DeploymentTarget], opts: TargetOptions) -> Result<DeploymentTarget> {
    naming::validate_resource_name(ResourceKind::Target, &opts.name)?;

    if naming::is_taken(existing.iter().map(|t| t.name.as_str()), &opts.name) {
        return Err(AgentCoreError::duplicate(ResourceKind::Target, &opts.name));
    }

    check_account(&opts.account).map_err(AgentCoreError::Validation)?;

    let region = Region::parse(&opts.region).ok_or_else(|| {
        let supported: Vec<_> = Region::ALL.iter().map(|r| r.as_str()).collect();
        AgentCoreError::Validation(format!(
            "unsupported region '{}'. Supported regions: {}",
            opts.region,
            supported.join(", ")
        ))
    })?;

    Ok(DeploymentTarget {
        name: opts.name,
        description: opts.description,
        account: opts.account,
        region,
    })
}
