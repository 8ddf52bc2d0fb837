use crate::error::{AgentCoreError, ResourceKind, Result};
use crate::naming;
use crate::schema::project::DEFAULT_EXPIRY_DAYS;
use crate::schema::{
    Access, AgentSource, AgentSpec, Credential, CredentialVariant, Framework, IdentityProvider,
    Language, Memory, MemoryProvider, MemoryStrategy, ModelProvider, ProjectSpec, Relation,
    StrategyType,
};
use clap::ValueEnum;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum AgentKind {
    Generated {
        framework: Framework,
        language: Language,
        model_provider: ModelProvider,
    },
    Byo {
        code_location: String,
        entrypoint: String,
        language: Language,
    },
}

/// Memory created alongside a new agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MemoryOption {
    #[default]
    None,
    #[value(name = "short-term")]
    ShortTerm,
    #[value(name = "long-and-short-term")]
    LongAndShortTerm,
}

#[derive(Debug, Clone)]
pub struct AgentOptions {
    pub name: String,
    pub kind: AgentKind,
    pub memory: MemoryOption,
}

/// A new agent plus the resources created with it, applied in one write
#[derive(Debug, Clone)]
pub struct AgentBuild {
    pub agent: AgentSpec,
    pub memory: Option<Memory>,
    pub credential: Option<Credential>,
    /// Env var that will hold the model provider API key, if one is needed
    pub api_key_env_var: Option<String>,
}

pub fn build_agent(spec: &ProjectSpec, opts: AgentOptions) -> Result<AgentBuild> {
    naming::validate_resource_name(ResourceKind::Agent, &opts.name)?;

    if naming::is_taken(spec.agents.iter().map(|a| a.name.as_str()), &opts.name) {
        return Err(AgentCoreError::duplicate(ResourceKind::Agent, &opts.name));
    }

    let source = match opts.kind {
        AgentKind::Generated {
            framework,
            language,
            model_provider,
        } => AgentSource::Generated {
            framework,
            language,
            model_provider,
            code_location: format!("app/{}/", opts.name),
            entrypoint: language.default_entrypoint().to_string(),
        },
        AgentKind::Byo {
            code_location,
            entrypoint,
            language,
        } => {
            check_byo(&code_location, &entrypoint, language)?;
            AgentSource::Byo {
                code_location,
                entrypoint,
                language,
            }
        }
    };

    let mut agent = AgentSpec::new(opts.name.clone(), source);

    let memory = match opts.memory {
        MemoryOption::None => None,
        MemoryOption::ShortTerm => Some(Vec::new()),
        MemoryOption::LongAndShortTerm => Some(vec![
            StrategyType::Semantic,
            StrategyType::Summarization,
            StrategyType::UserPreference,
        ]),
    }
    .map(|strategies| default_memory(spec, &opts.name, strategies))
    .transpose()?;

    if let Some(memory) = &memory {
        agent.memory_providers.push(MemoryProvider {
            relation: Relation::Own,
            name: memory.name.clone(),
            access: Access::ReadWrite,
            env_var_name: naming::memory_env_var(&memory.name),
        });
    }

    let mut credential = None;
    let mut api_key_env_var = None;
    if let AgentSource::Generated { model_provider, .. } = &agent.source {
        if model_provider.requires_api_key() {
            let simple = model_provider.as_str();
            let qualified = naming::qualify(&spec.name, simple);
            let env_var_name = naming::credential_env_var(simple);

            // Agents on the same provider share one credential; the first one owns it.
            let provider = if spec.credential(&qualified).is_some() {
                IdentityProvider::Use {
                    name: qualified,
                    env_var_name: env_var_name.clone(),
                }
            } else {
                let description = Some(format!("{} API key", simple));
                credential = Some(Credential {
                    name: qualified.clone(),
                    variant: CredentialVariant::ApiKey,
                    description: description.clone(),
                    env_var_name: env_var_name.clone(),
                });
                IdentityProvider::Own {
                    name: qualified,
                    variant: CredentialVariant::ApiKey,
                    description,
                    env_var_name: env_var_name.clone(),
                }
            };
            agent.identity_providers.push(provider);
            api_key_env_var = Some(env_var_name);
        }
    }

    Ok(AgentBuild {
        agent,
        memory,
        credential,
        api_key_env_var,
    })
}

impl AgentBuild {
    pub fn apply(self, spec: &mut ProjectSpec) {
        spec.agents.push(self.agent);
        if let Some(memory) = self.memory {
            spec.memories.push(memory);
        }
        if let Some(credential) = self.credential {
            spec.credentials.push(credential);
        }
    }
}

fn default_memory(spec: &ProjectSpec, agent: &str, strategies: Vec<StrategyType>) -> Result<Memory> {
    let name = format!("{}Memory", agent);
    naming::validate_resource_name(ResourceKind::Memory, &name).map_err(|_| {
        AgentCoreError::Validation(format!(
            "agent name '{}' is too long for its default memory '{}'; use a shorter name or --memory none",
            agent, name
        ))
    })?;
    if spec.memory(&name).is_some() {
        return Err(AgentCoreError::duplicate(ResourceKind::Memory, name));
    }
    Ok(Memory {
        name,
        event_expiry_duration: DEFAULT_EXPIRY_DAYS,
        strategies: strategies
            .into_iter()
            .map(|strategy_type| MemoryStrategy {
                strategy_type,
                namespaces: strategy_type.default_namespaces(),
            })
            .collect(),
    })
}

fn check_byo(code_location: &str, entrypoint: &str, language: Language) -> Result<()> {
    if code_location.trim().is_empty() {
        return Err(AgentCoreError::Validation(
            "code location is required for a bring-your-own agent".to_string(),
        ));
    }

    let extension = Path::new(entrypoint)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if !language.entrypoint_extensions().contains(&extension) {
        return Err(AgentCoreError::Validation(format!(
            "entrypoint '{}' is not a {:?} file (expected .{})",
            entrypoint,
            language,
            language.entrypoint_extensions().join(" or .")
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures::project_with_agents;

    fn generated(name: &str, provider: ModelProvider, memory: MemoryOption) -> AgentOptions {
        AgentOptions {
            name: name.to_string(),
            kind: AgentKind::Generated {
                framework: Framework::Strands,
                language: Language::Python,
                model_provider: provider,
            },
            memory,
        }
    }

    #[test]
    fn test_generated_agent_defaults() {
        let spec = ProjectSpec::new("Acme");
        let build = build_agent(&spec, generated("Bot", ModelProvider::Bedrock, MemoryOption::None))
            .unwrap();

        assert_eq!(build.agent.source.code_location(), "app/Bot/");
        assert!(build.memory.is_none());
        assert!(build.credential.is_none());
        assert!(build.api_key_env_var.is_none());
    }

    #[test]
    fn test_agent_with_memory_and_credential_in_one_build() {
        let mut spec = ProjectSpec::new("Acme");
        let build = build_agent(
            &spec,
            generated("Bot", ModelProvider::Anthropic, MemoryOption::LongAndShortTerm),
        )
        .unwrap();
        assert_eq!(
            build.api_key_env_var.as_deref(),
            Some("AGENTCORE_CREDENTIAL_ANTHROPIC")
        );
        build.apply(&mut spec);

        assert_eq!(spec.memories[0].name, "BotMemory");
        assert_eq!(spec.memories[0].strategies.len(), 3);
        assert_eq!(spec.credentials[0].name, "AcmeAnthropic");
        assert_eq!(spec.credential_owner("AcmeAnthropic").unwrap().name, "Bot");
        assert_eq!(spec.memory_owner("BotMemory").unwrap().name, "Bot");
    }

    #[test]
    fn test_second_agent_uses_existing_provider_credential() {
        let mut spec = ProjectSpec::new("Acme");
        build_agent(&spec, generated("A", ModelProvider::OpenAI, MemoryOption::None))
            .unwrap()
            .apply(&mut spec);
        build_agent(&spec, generated("B", ModelProvider::OpenAI, MemoryOption::None))
            .unwrap()
            .apply(&mut spec);

        assert_eq!(spec.credentials.len(), 1);
        let b = spec.agent("B").unwrap();
        assert_eq!(b.identity_providers[0].relation(), Relation::Use);
    }

    #[test]
    fn test_default_memory_name_keeps_length_limit() {
        let spec = ProjectSpec::new("Acme");
        let name = format!("A{}", "b".repeat(44));

        let err = build_agent(
            &spec,
            generated(&name, ModelProvider::Bedrock, MemoryOption::ShortTerm),
        )
        .unwrap_err();
        assert!(err.to_string().contains("too long for its default memory"));

        let without_memory = generated(&name, ModelProvider::Bedrock, MemoryOption::None);
        assert!(build_agent(&spec, without_memory).is_ok());
    }

    #[test]
    fn test_duplicate_agent() {
        let spec = project_with_agents("Acme", &["Bot"]);
        let err = build_agent(&spec, generated("Bot", ModelProvider::Bedrock, MemoryOption::None))
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_byo_entrypoint_must_match_language() {
        let spec = ProjectSpec::new("Acme");
        let opts = AgentOptions {
            name: "Custom".to_string(),
            kind: AgentKind::Byo {
                code_location: "src/custom".to_string(),
                entrypoint: "main.go".to_string(),
                language: Language::Python,
            },
            memory: MemoryOption::None,
        };
        assert!(matches!(
            build_agent(&spec, opts),
            Err(AgentCoreError::Validation(_))
        ));
    }

    #[test]
    fn test_byo_agent() {
        let spec = ProjectSpec::new("Acme");
        let opts = AgentOptions {
            name: "Custom".to_string(),
            kind: AgentKind::Byo {
                code_location: "src/custom".to_string(),
                entrypoint: "index.ts".to_string(),
                language: Language::TypeScript,
            },
            memory: MemoryOption::ShortTerm,
        };
        let build = build_agent(&spec, opts).unwrap();
        assert_eq!(build.agent.source.code_location(), "src/custom");
        assert!(build.memory.unwrap().strategies.is_empty());
    }
}
