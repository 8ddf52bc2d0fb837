//! Command handlers.
//!
//! Every handler turns parsed CLI options into one engine call and reports
//! back through a [`CommandResult`]. Errors are converted at this boundary so
//! `main` only has to print the result and pick an exit code.

pub mod add;
pub mod attach;
pub mod create;
pub mod remove;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::config::Settings;
use crate::error::{AgentCoreError, ResourceKind, Result};
use crate::project::Project;
use crate::removal::{DiffLine, RemovalPreview};
use crate::store::ConfigStore;
use serde::Serialize;
use std::io::{self, Write};

/// Outcome of one command, printed as JSON with `--json`
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<RemovalPreview>,
}

impl CommandResult {
    pub fn ok(kind: ResourceKind, name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            resource_type: Some(kind.as_str().to_string()),
            resource_name: Some(name.into()),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn failure(err: &AgentCoreError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            ..Default::default()
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_preview(mut self, preview: RemovalPreview) -> Self {
        self.preview = Some(preview);
        self
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Human-readable rendering. Errors are not included; `main` prints them
    /// to stderr.
    pub fn render_human(&self) -> String {
        let mut out = String::new();
        if let Some(preview) = &self.preview {
            out.push_str(&render_preview(preview));
        }
        if let Some(message) = &self.message {
            out.push_str(message);
            out.push('\n');
        }
        if let Some(note) = &self.note {
            out.push_str(note);
            out.push('\n');
        }
        out
    }
}

/// A command result together with how it should be printed
#[derive(Debug)]
pub struct Output {
    pub result: CommandResult,
    pub json: bool,
}

impl Output {
    pub fn print(&self) -> Result<()> {
        if self.json {
            println!("{}", self.result.to_json()?);
            return Ok(());
        }
        print!("{}", self.result.render_human());
        if let Some(error) = &self.result.error {
            eprintln!("Error: {}", error);
        }
        Ok(())
    }
}

/// Everything a handler needs about the project it runs in
#[derive(Debug)]
pub struct Context {
    pub project: Project,
    pub store: ConfigStore,
    pub settings: Settings,
}

impl Context {
    pub fn open(cli: &Cli) -> Result<Self> {
        let project = Project::resolve(cli.project_dir.as_deref())?;
        let settings = Settings::load(Some(project.root()))?.with_cli_overrides(cli);
        let store = ConfigStore::new(project.config_dir());
        Ok(Self {
            project,
            store,
            settings,
        })
    }

    pub fn json(&self) -> bool {
        self.settings.output.json
    }
}

/// Run the parsed command line. Never fails: errors become a failed result.
pub fn run(cli: &Cli) -> Output {
    // `create` runs outside any project.
    if let Commands::Create { name, dir } = &cli.command {
        let settings = match Settings::load(None) {
            Ok(settings) => settings.with_cli_overrides(cli),
            Err(e) => {
                return Output {
                    result: CommandResult::failure(&e),
                    json: cli.json,
                }
            }
        };
        return Output {
            result: into_result(create::execute(name, dir.as_deref(), &settings)),
            json: settings.output.json,
        };
    }

    let ctx = match Context::open(cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            return Output {
                result: CommandResult::failure(&e),
                json: cli.json,
            }
        }
    };

    Output {
        result: into_result(dispatch(&ctx, &cli.command)),
        json: ctx.json(),
    }
}

fn dispatch(ctx: &Context, command: &Commands) -> Result<CommandResult> {
    match command {
        Commands::Add { command } => add::execute(ctx, command),
        Commands::Attach { command } => attach::execute(ctx, command),
        Commands::Remove { command } => remove::execute(ctx, command),
        Commands::Validate => validate::execute(ctx),
        Commands::Create { name, dir } => create::execute(name, dir.as_deref(), &ctx.settings),
    }
}

fn into_result(result: Result<CommandResult>) -> CommandResult {
    result.unwrap_or_else(|e| {
        tracing::debug!(error = %e, "command failed");
        CommandResult::failure(&e)
    })
}

fn render_preview(preview: &RemovalPreview) -> String {
    let mut out = String::new();
    for line in &preview.summary {
        out.push_str(&format!("  - {}\n", line));
    }
    if !preview.directories_to_delete.is_empty() {
        out.push_str("\nDirectories to delete:\n");
        for dir in &preview.directories_to_delete {
            out.push_str(&format!("  {}\n", dir));
        }
    }
    for change in &preview.schema_changes {
        out.push_str(&format!("\n--- {}\n+++ {}\n", change.file, change.file));
        for line in change.diff() {
            match line {
                DiffLine::Same(_) => {}
                DiffLine::Removed(l) => out.push_str(&format!("-{}\n", l)),
                DiffLine::Added(l) => out.push_str(&format!("+{}\n", l)),
            }
        }
    }
    out.push('\n');
    out
}

/// Ask a yes/no question on the terminal; anything but y/yes is a no.
pub(crate) fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
