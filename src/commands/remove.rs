use super::{confirm, render_preview, CommandResult, Context};
use crate::cli::RemoveCommands;
use crate::error::{ResourceKind, Result};
use crate::removal::{apply_plan, plan_removal, RemovalPlan, RemovalRequest};
use crate::toolkit::CdkToolkit;

pub fn execute(ctx: &Context, command: &RemoveCommands) -> Result<CommandResult> {
    let flags = command.flags();
    let docs = ctx.store.load_all()?;
    let plan = plan_removal(&docs, &request_for(command), ctx.project.root())?;

    if flags.dry_run {
        tracing::debug!(kind = plan.kind.as_str(), name = %plan.name, "dry run");
        return Ok(
            CommandResult::ok(plan.kind, &plan.name, "[Dry run - no changes made]")
                .with_preview(plan.preview),
        );
    }

    // JSON output is for scripts; there is nobody to answer a prompt.
    if !flags.force && !ctx.json() {
        print!("{}", render_preview(&plan.preview));
        if !confirm(&question(&plan))? {
            return Ok(CommandResult {
                success: true,
                message: Some("Aborted.".to_string()),
                ..Default::default()
            });
        }
    }

    let toolkit = CdkToolkit::new(ctx.settings.toolkit.clone(), ctx.project.cdk_dir())
        .verbose(ctx.settings.verbose)
        .show_progress(!ctx.json());
    let outcome = apply_plan(&ctx.store, &plan, &toolkit)?;

    let message = match &outcome.destroyed_stack {
        Some(stack) => format!("{} (destroyed stack {})", outcome.message, stack),
        None => outcome.message,
    };
    Ok(CommandResult::ok(plan.kind, plan.name, message).with_note(outcome.note))
}

fn request_for(command: &RemoveCommands) -> RemovalRequest {
    match command {
        RemoveCommands::Agent { name, .. } => RemovalRequest::Agent(name.clone()),
        RemoveCommands::Gateway { name, .. } => RemovalRequest::Gateway(name.clone()),
        RemoveCommands::McpTool { name, .. } => RemovalRequest::McpTool(name.clone()),
        RemoveCommands::Memory { name, .. } => RemovalRequest::Memory(name.clone()),
        RemoveCommands::Identity { name, .. } => RemovalRequest::Identity(name.clone()),
        RemoveCommands::Target { name, .. } => RemovalRequest::Target(name.clone()),
        RemoveCommands::All { .. } => RemovalRequest::All,
    }
}

fn question(plan: &RemovalPlan) -> String {
    match plan.kind {
        ResourceKind::Project => format!("Remove all resources from project '{}'?", plan.name),
        kind => format!("Remove {} '{}'?", kind.as_str(), plan.name),
    }
}
