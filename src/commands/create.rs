use super::CommandResult;
use crate::config::Settings;
use crate::error::{AgentCoreError, ResourceKind, Result};
use crate::naming;
use crate::project::CONFIG_DIR;
use crate::schema::ProjectSpec;
use crate::store::ConfigStore;
use std::fs;
use std::path::Path;

const GITIGNORE: &str = "\
.env.local
.cli/
cdk/cdk.out/
";

/// Scaffold `<dir>/<name>/agentcore/` with empty documents.
pub fn execute(name: &str, dir: Option<&Path>, settings: &Settings) -> Result<CommandResult> {
    naming::validate_project_name(name)?;

    let parent = match dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let root = parent.join(name);
    if root.exists() {
        return Err(AgentCoreError::Validation(format!(
            "directory {} already exists",
            root.display()
        )));
    }

    let config_dir = root.join(CONFIG_DIR);
    let store = ConfigStore::new(&config_dir);
    store.write_project_spec(&ProjectSpec::new(name))?;
    store.write_targets(&[])?;

    fs::create_dir_all(config_dir.join(".cli"))?;
    fs::write(config_dir.join(&settings.env.file), "")?;
    fs::write(config_dir.join(".gitignore"), GITIGNORE)?;
    tracing::info!(root = %root.display(), "project created");

    Ok(CommandResult::ok(
        ResourceKind::Project,
        name,
        format!("Created project '{}' in {}", name, root.display()),
    )
    .with_note("Next: add a deployment target with `agentcore add target`."))
}
