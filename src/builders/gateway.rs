use super::require_users;
use crate::error::{AgentCoreError, ResourceKind, Result};
use crate::naming;
use crate::schema::{
    AuthorizerConfiguration, AuthorizerType, CustomJwtAuthorizer, Gateway, McpProvider, McpSpec,
    ProjectSpec,
};

#[derive(Debug, Clone)]
pub struct GatewayOptions {
    pub name: String,
    pub description: Option<String>,
    pub authorizer_type: AuthorizerType,
    pub jwt: Option<CustomJwtAuthorizer>,
    /// Agents that get an MCP provider entry for the new gateway
    pub agents: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct GatewayBuild {
    pub gateway: Gateway,
    pub agents: Vec<String>,
}

pub fn build_gateway(spec: &ProjectSpec, mcp: &McpSpec, opts: GatewayOptions) -> Result<GatewayBuild> {
    naming::validate_resource_name(ResourceKind::Gateway, &opts.name)?;

    if mcp.gateway(&opts.name).is_some() {
        return Err(AgentCoreError::duplicate(ResourceKind::Gateway, &opts.name));
    }

    let gateway = Gateway {
        name: opts.name,
        description: opts.description,
        targets: Vec::new(),
        authorizer_type: opts.authorizer_type,
        authorizer_configuration: opts
            .jwt
            .map(|custom_jwt_authorizer| AuthorizerConfiguration {
                custom_jwt_authorizer,
            }),
    };
    gateway
        .check_authorizer()
        .map_err(AgentCoreError::Validation)?;

    require_users(spec, None, opts.agents.iter().map(String::as_str))?;

    Ok(GatewayBuild {
        gateway,
        agents: opts.agents,
    })
}

impl GatewayBuild {
    /// Adds the gateway to the MCP spec and the provider entries to the agents.
    pub fn apply(self, spec: &mut ProjectSpec, mcp: &mut McpSpec) {
        let env_var_name = naming::gateway_env_var(&self.gateway.name);
        for agent_name in &self.agents {
            if let Some(agent) = spec.agent_mut(agent_name) {
                if !agent.has_mcp_provider(&self.gateway.name) {
                    agent.mcp_providers.push(McpProvider::Gateway {
                        name: self.gateway.name.clone(),
                        env_var_name: env_var_name.clone(),
                    });
                }
            }
        }
        mcp.agent_core_gateways.push(self.gateway);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures::project_with_agents;

    fn opts(name: &str) -> GatewayOptions {
        GatewayOptions {
            name: name.to_string(),
            description: None,
            authorizer_type: AuthorizerType::None,
            jwt: None,
            agents: vec![],
        }
    }

    fn jwt(url: &str) -> CustomJwtAuthorizer {
        CustomJwtAuthorizer {
            discovery_url: url.to_string(),
            allowed_audience: vec!["api".to_string()],
            allowed_clients: vec![],
        }
    }

    #[test]
    fn test_build_gateway_with_agents() {
        let mut spec = project_with_agents("Acme", &["A"]);
        let mut mcp = McpSpec::default();
        let mut o = opts("Tools");
        o.agents = vec!["A".to_string()];

        build_gateway(&spec, &mcp, o).unwrap().apply(&mut spec, &mut mcp);

        assert_eq!(mcp.agent_core_gateways.len(), 1);
        let agent = spec.agent("A").unwrap();
        assert!(agent.has_mcp_provider("Tools"));
        match &agent.mcp_providers[0] {
            McpProvider::Gateway { env_var_name, .. } => {
                assert_eq!(env_var_name, "AGENTCORE_GATEWAY_TOOLS_URL")
            }
        }
    }

    #[test]
    fn test_duplicate_gateway() {
        let mut spec = project_with_agents("Acme", &[]);
        let mut mcp = McpSpec::default();
        build_gateway(&spec, &mcp, opts("Tools"))
            .unwrap()
            .apply(&mut spec, &mut mcp);
        let err = build_gateway(&spec, &mcp, opts("Tools")).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_custom_jwt_requires_config() {
        let spec = project_with_agents("Acme", &[]);
        let mut o = opts("Secure");
        o.authorizer_type = AuthorizerType::CustomJwt;
        assert!(matches!(
            build_gateway(&spec, &McpSpec::default(), o),
            Err(AgentCoreError::Validation(_))
        ));
    }

    #[test]
    fn test_custom_jwt_discovery_url_checked() {
        let spec = project_with_agents("Acme", &[]);
        let mut o = opts("Secure");
        o.authorizer_type = AuthorizerType::CustomJwt;
        o.jwt = Some(jwt("https://idp.example.com/jwks"));
        assert!(build_gateway(&spec, &McpSpec::default(), o.clone()).is_err());

        o.jwt = Some(jwt(
            "https://idp.example.com/.well-known/openid-configuration",
        ));
        let build = build_gateway(&spec, &McpSpec::default(), o).unwrap();
        assert!(build.gateway.authorizer_configuration.is_some());
    }

    #[test]
    fn test_unknown_agent() {
        let spec = project_with_agents("Acme", &[]);
        let mut o = opts("Tools");
        o.agents = vec!["Ghost".to_string()];
        assert!(build_gateway(&spec, &McpSpec::default(), o)
            .unwrap_err()
            .to_string()
            .contains("not found"));
    }
}
