use super::{CommandResult, Context};
use crate::attach::{
    attach_agent, attach_gateway, attach_identity, attach_mcp_runtime, attach_memory, Attachment,
};
use crate::cli::AttachCommands;
use crate::error::Result;

pub fn execute(ctx: &Context, command: &AttachCommands) -> Result<CommandResult> {
    let attachment = match command {
        AttachCommands::Agent {
            source,
            target,
            description,
        } => {
            let mut spec = ctx.store.read_project_spec()?;
            let attachment = attach_agent(&mut spec, source, target, description.clone())?;
            ctx.store.write_project_spec(&spec)?;
            attachment
        }
        AttachCommands::Gateway { agent, gateway } => {
            let mut spec = ctx.store.read_project_spec()?;
            let mcp = ctx.store.read_mcp_spec_or_default()?;
            let attachment = attach_gateway(&mut spec, &mcp, agent, gateway)?;
            ctx.store.write_project_spec(&spec)?;
            attachment
        }
        AttachCommands::Memory {
            agent,
            memory,
            access,
        } => {
            let mut spec = ctx.store.read_project_spec()?;
            let attachment = attach_memory(&mut spec, agent, memory, *access)?;
            ctx.store.write_project_spec(&spec)?;
            attachment
        }
        AttachCommands::Identity { agent, identity } => {
            let mut spec = ctx.store.read_project_spec()?;
            let attachment = attach_identity(&mut spec, agent, identity)?;
            ctx.store.write_project_spec(&spec)?;
            attachment
        }
        AttachCommands::McpRuntime { agent, tool } => {
            let spec = ctx.store.read_project_spec()?;
            let mut mcp = ctx.store.read_mcp_spec_or_default()?;
            let attachment = attach_mcp_runtime(&spec, &mut mcp, agent, tool)?;
            ctx.store.write_mcp_spec(&mcp)?;
            attachment
        }
    };

    tracing::info!(
        kind = attachment.kind.as_str(),
        name = %attachment.name,
        agent = %attachment.agent,
        "attached"
    );
    Ok(report(attachment))
}

fn report(attachment: Attachment) -> CommandResult {
    let message = format!(
        "Attached {} '{}' to agent '{}'",
        attachment.kind.as_str(),
        attachment.name,
        attachment.agent
    );
    CommandResult::ok(attachment.kind, attachment.name, message)
        .with_note(format!("Available to the agent as {}", attachment.env_var_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResourceKind;

    #[test]
    fn test_report_names_env_var() {
        let result = report(Attachment {
            kind: ResourceKind::Memory,
            name: "Notes".to_string(),
            agent: "Helper".to_string(),
            env_var_name: "MEMORY_NOTES_ID".to_string(),
        });
        assert_eq!(
            result.message.as_deref(),
            Some("Attached memory 'Notes' to agent 'Helper'")
        );
        assert_eq!(result.resource_name.as_deref(), Some("Notes"));
        assert!(result.note.unwrap().contains("MEMORY_NOTES_ID"));
    }
}
