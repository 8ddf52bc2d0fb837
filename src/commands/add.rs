use super::{CommandResult, Context};
use crate::builders::{
    build_agent, build_gateway, build_identity, build_mcp_tool, build_memory, build_target,
    AgentKind, AgentOptions, GatewayOptions, IdentityOptions, McpToolOptions, MemoryOptions,
    TargetOptions, ToolExposure,
};
use crate::cli::{
    AddAgentCmd, AddCommands, AddGatewayCmd, AddIdentityCmd, AddMcpToolCmd, AddMemoryCmd,
    AddTargetCmd, AgentType, ExposureMode,
};
use crate::error::{AgentCoreError, ResourceKind, Result};
use crate::utils::env::{check_assignment, set_env_var};
use std::path::PathBuf;

pub fn execute(ctx: &Context, command: &AddCommands) -> Result<CommandResult> {
    match command {
        AddCommands::Agent(cmd) => add_agent(ctx, cmd),
        AddCommands::Gateway(cmd) => add_gateway(ctx, cmd),
        AddCommands::McpTool(cmd) => add_mcp_tool(ctx, cmd),
        AddCommands::Memory(cmd) => add_memory(ctx, cmd),
        AddCommands::Identity(cmd) => add_identity(ctx, cmd),
        AddCommands::Target(cmd) => add_target(ctx, cmd),
    }
}

fn add_agent(ctx: &Context, cmd: &AddAgentCmd) -> Result<CommandResult> {
    let kind = match cmd.agent_type {
        AgentType::Generated => AgentKind::Generated {
            framework: cmd.framework,
            language: cmd.language,
            model_provider: cmd.model_provider,
        },
        AgentType::Byo => AgentKind::Byo {
            code_location: required(&cmd.code_location, "--code-location", "--type byo")?,
            entrypoint: required(&cmd.entrypoint, "--entrypoint", "--type byo")?,
            language: cmd.language,
        },
    };

    let mut spec = ctx.store.read_project_spec()?;
    let build = build_agent(
        &spec,
        AgentOptions {
            name: cmd.name.clone(),
            kind,
            memory: cmd.memory,
        },
    )?;

    let api_key = match (&cmd.api_key, &build.api_key_env_var) {
        (Some(key), Some(var)) => Some((var.clone(), key.clone())),
        (Some(_), None) => {
            return Err(AgentCoreError::Validation(
                "--api-key is only used with a model provider that needs an API key".to_string(),
            ))
        }
        (None, _) => None,
    };
    if let Some((var, key)) = &api_key {
        check_assignment(var, key)?;
    }

    let memory = build.memory.as_ref().map(|m| m.name.clone());
    build.apply(&mut spec);
    ctx.store.write_project_spec(&spec)?;

    if let Some((var, key)) = api_key {
        set_env_var(&env_file(ctx), &var, &key)?;
    }
    tracing::info!(agent = %cmd.name, "agent added");

    let mut message = format!("Added agent '{}'", cmd.name);
    if let Some(memory) = memory {
        message.push_str(&format!(" with memory '{}'", memory));
    }
    Ok(CommandResult::ok(ResourceKind::Agent, &cmd.name, message))
}

fn add_gateway(ctx: &Context, cmd: &AddGatewayCmd) -> Result<CommandResult> {
    let mut spec = ctx.store.read_project_spec()?;
    let mut mcp = ctx.store.read_mcp_spec_or_default()?;

    let build = build_gateway(
        &spec,
        &mcp,
        GatewayOptions {
            name: cmd.name.clone(),
            description: cmd.description.clone(),
            authorizer_type: cmd.authorizer_type,
            jwt: cmd.jwt.to_authorizer(),
            agents: cmd.agents.clone(),
        },
    )?;
    let touches_agents = !build.agents.is_empty();
    build.apply(&mut spec, &mut mcp);

    // The gateway must exist before agents reference it.
    ctx.store.write_mcp_spec(&mcp)?;
    if touches_agents {
        ctx.store.write_project_spec(&spec)?;
    }
    tracing::info!(gateway = %cmd.name, "gateway added");

    Ok(CommandResult::ok(
        ResourceKind::Gateway,
        &cmd.name,
        format!("Added gateway '{}'", cmd.name),
    ))
}

fn add_mcp_tool(ctx: &Context, cmd: &AddMcpToolCmd) -> Result<CommandResult> {
    let exposure = match cmd.exposure {
        ExposureMode::McpRuntime => {
            if cmd.gateway.is_some() {
                return Err(AgentCoreError::Validation(
                    "--gateway requires --exposure behind-gateway".to_string(),
                ));
            }
            ToolExposure::McpRuntime
        }
        ExposureMode::BehindGateway => ToolExposure::BehindGateway {
            gateway: required(&cmd.gateway, "--gateway", "--exposure behind-gateway")?,
        },
    };

    let spec = ctx.store.read_project_spec()?;
    let mut mcp = ctx.store.read_mcp_spec_or_default()?;
    let mut defs = ctx.store.read_mcp_defs_or_default()?;

    let build = build_mcp_tool(
        &spec,
        &mcp,
        &defs,
        McpToolOptions {
            name: cmd.name.clone(),
            description: cmd.description.clone(),
            language: cmd.language,
            exposure,
            host: cmd.host,
            agents: cmd.agents.clone(),
        },
    )?;
    let message = match build.gateway() {
        Some(gateway) => format!("Added MCP tool '{}' behind gateway '{}'", cmd.name, gateway),
        None => format!("Added MCP runtime tool '{}'", cmd.name),
    };
    build.apply(&mut mcp, &mut defs);

    ctx.store.write_mcp_defs(&defs)?;
    ctx.store.write_mcp_spec(&mcp)?;
    tracing::info!(tool = %cmd.name, "mcp tool added");

    Ok(CommandResult::ok(ResourceKind::McpTool, &cmd.name, message))
}

fn add_memory(ctx: &Context, cmd: &AddMemoryCmd) -> Result<CommandResult> {
    let mut spec = ctx.store.read_project_spec()?;
    let build = build_memory(
        &spec,
        MemoryOptions {
            name: cmd.name.clone(),
            owner: cmd.owner.clone(),
            users: cmd
                .users
                .iter()
                .map(|u| (u.agent.clone(), u.access))
                .collect(),
            strategies: cmd.strategies.clone(),
            event_expiry_days: cmd.expiry,
        },
    )?;
    build.apply(&mut spec);
    ctx.store.write_project_spec(&spec)?;
    tracing::info!(memory = %cmd.name, owner = %cmd.owner, "memory added");

    Ok(CommandResult::ok(
        ResourceKind::Memory,
        &cmd.name,
        format!("Added memory '{}' owned by agent '{}'", cmd.name, cmd.owner),
    ))
}

fn add_identity(ctx: &Context, cmd: &AddIdentityCmd) -> Result<CommandResult> {
    let mut spec = ctx.store.read_project_spec()?;
    let build = build_identity(
        &spec,
        IdentityOptions {
            name: cmd.name.clone(),
            owner: cmd.owner.clone(),
            users: cmd.users.clone(),
            variant: cmd.variant,
            description: cmd.description.clone(),
        },
    )?;
    let qualified = build.credential.name.clone();
    let env_var = build.env_var_name().to_string();
    if let Some(key) = &cmd.api_key {
        check_assignment(&env_var, key)?;
    }
    build.apply(&mut spec);
    ctx.store.write_project_spec(&spec)?;

    if let Some(key) = &cmd.api_key {
        set_env_var(&env_file(ctx), &env_var, key)?;
    }
    tracing::info!(identity = %qualified, "identity added");

    let result = CommandResult::ok(
        ResourceKind::Identity,
        &qualified,
        format!("Added identity '{}'", qualified),
    );
    Ok(if cmd.api_key.is_none() {
        result.with_note(format!(
            "Set {} in agentcore/{} before deploying.",
            env_var, ctx.settings.env.file
        ))
    } else {
        result
    })
}

fn add_target(ctx: &Context, cmd: &AddTargetCmd) -> Result<CommandResult> {
    let mut targets = ctx.store.read_targets_or_default()?;
    let target = build_target(
        &targets,
        TargetOptions {
            name: cmd.name.clone(),
            account: cmd.account.clone(),
            region: cmd.region.clone(),
            description: cmd.description.clone(),
        },
    )?;
    let message = format!(
        "Added deployment target '{}' ({}, {})",
        target.name, target.account, target.region
    );
    targets.push(target);
    ctx.store.write_targets(&targets)?;
    tracing::info!(target = %cmd.name, "deployment target added");

    Ok(CommandResult::ok(ResourceKind::Target, &cmd.name, message))
}

fn required(value: &Option<String>, flag: &str, context: &str) -> Result<String> {
    value
        .clone()
        .ok_or_else(|| AgentCoreError::Validation(format!("{} is required with {}", flag, context)))
}

fn env_file(ctx: &Context) -> PathBuf {
    ctx.project.config_dir().join(&ctx.settings.env.file)
}
