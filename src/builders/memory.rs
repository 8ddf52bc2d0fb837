use super::{require_agent, require_users};
use crate::error::{AgentCoreError, ResourceKind, Result};
use crate::naming;
use crate::schema::project::{DEFAULT_EXPIRY_DAYS, MAX_EXPIRY_DAYS, MIN_EXPIRY_DAYS};
use crate::schema::{
    Access, Memory, MemoryProvider, MemoryStrategy, ProjectSpec, Relation, StrategyType,
};

#[derive(Debug, Clone)]
pub struct MemoryOptions {
    pub name: String,
    pub owner: String,
    pub users: Vec<(String, Access)>,
    pub strategies: Vec<StrategyType>,
    pub event_expiry_days: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct MemoryBuild {
    pub memory: Memory,
    pub owner: String,
    pub users: Vec<(String, Access)>,
}

pub fn build_memory(spec: &ProjectSpec, opts: MemoryOptions) -> Result<MemoryBuild> {
    naming::validate_resource_name(ResourceKind::Memory, &opts.name)?;

    if naming::is_taken(spec.memories.iter().map(|m| m.name.as_str()), &opts.name) {
        return Err(AgentCoreError::duplicate(ResourceKind::Memory, &opts.name));
    }

    let owner = require_agent(spec, &opts.owner)?;
    require_users(
        spec,
        Some(opts.owner.as_str()),
        opts.users.iter().map(|(u, _)| u.as_str()),
    )?;

    // A stale reference left by a hand edit would become a second provider entry.
    for agent in std::iter::once(owner).chain(
        opts.users
            .iter()
            .filter_map(|(u, _)| spec.agent(u)),
    ) {
        if agent.has_memory(&opts.name) {
            return Err(AgentCoreError::already_attached(
                ResourceKind::Memory,
                &opts.name,
                &agent.name,
            ));
        }
    }

    let expiry = opts.event_expiry_days.unwrap_or(DEFAULT_EXPIRY_DAYS);
    if !(MIN_EXPIRY_DAYS..=MAX_EXPIRY_DAYS).contains(&expiry) {
        return Err(AgentCoreError::Validation(format!(
            "event expiry must be between {} and {} days, got {}",
            MIN_EXPIRY_DAYS, MAX_EXPIRY_DAYS, expiry
        )));
    }

    let mut strategies: Vec<MemoryStrategy> = Vec::new();
    for strategy_type in opts.strategies {
        if strategies.iter().any(|s| s.strategy_type == strategy_type) {
            continue;
        }
        strategies.push(MemoryStrategy {
            strategy_type,
            namespaces: strategy_type.default_namespaces(),
        });
    }

    Ok(MemoryBuild {
        memory: Memory {
            name: opts.name,
            event_expiry_duration: expiry,
            strategies,
        },
        owner: opts.owner,
        users: opts.users,
    })
}

impl MemoryBuild {
    pub fn apply(self, spec: &mut ProjectSpec) {
        let env_var_name = naming::memory_env_var(&self.memory.name);

        if let Some(owner) = spec.agent_mut(&self.owner) {
            owner.memory_providers.push(MemoryProvider {
                relation: Relation::Own,
                name: self.memory.name.clone(),
                access: Access::ReadWrite,
                env_var_name: env_var_name.clone(),
            });
        }
        for (user, access) in &self.users {
            if let Some(agent) = spec.agent_mut(user) {
                agent.memory_providers.push(MemoryProvider {
                    relation: Relation::Use,
                    name: self.memory.name.clone(),
                    access: *access,
                    env_var_name: env_var_name.clone(),
                });
            }
        }
        spec.memories.push(self.memory);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures::project_with_agents;

    fn opts(name: &str, owner: &str, users: &[(&str, Access)]) -> MemoryOptions {
        MemoryOptions {
            name: name.to_string(),
            owner: owner.to_string(),
            users: users.iter().map(|(u, a)| (u.to_string(), *a)).collect(),
            strategies: vec![StrategyType::Semantic],
            event_expiry_days: None,
        }
    }

    #[test]
    fn test_build_and_apply_memory() {
        let mut spec = project_with_agents("Acme", &["A", "B"]);
        let build = build_memory(&spec, opts("M1", "A", &[("B", Access::Read)])).unwrap();
        build.apply(&mut spec);

        assert_eq!(spec.memories.len(), 1);
        assert_eq!(spec.memories[0].event_expiry_duration, 30);
        assert_eq!(
            spec.memories[0].strategies[0].namespaces,
            vec!["/users/{actorId}/facts".to_string()]
        );

        let a = spec.agent("A").unwrap();
        assert_eq!(a.memory_providers[0].relation, Relation::Own);
        assert_eq!(a.memory_providers[0].access, Access::ReadWrite);

        let b = spec.agent("B").unwrap();
        assert_eq!(b.memory_providers[0].relation, Relation::Use);
        assert_eq!(b.memory_providers[0].access, Access::Read);
        assert_eq!(b.memory_providers[0].env_var_name, "AGENTCORE_MEMORY_M1_ID");
    }

    #[test]
    fn test_duplicate_memory_leaves_first_untouched() {
        let mut spec = project_with_agents("Acme", &["A", "B"]);
        build_memory(&spec, opts("M1", "A", &[]))
            .unwrap()
            .apply(&mut spec);
        let before = spec.clone();

        let err = build_memory(&spec, opts("M1", "B", &[])).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(spec, before);
    }

    #[test]
    fn test_missing_owner() {
        let spec = project_with_agents("Acme", &["A"]);
        let err = build_memory(&spec, opts("M1", "Ghost", &[])).unwrap_err();
        assert!(err.to_string().to_lowercase().contains("not found"));
    }

    #[test]
    fn test_strategies_are_deduplicated() {
        let spec = project_with_agents("Acme", &["A"]);
        let mut o = opts("M1", "A", &[]);
        o.strategies = vec![
            StrategyType::Semantic,
            StrategyType::Custom,
            StrategyType::Semantic,
        ];
        let build = build_memory(&spec, o).unwrap();
        assert_eq!(build.memory.strategies.len(), 2);
        assert!(build.memory.strategies[1].namespaces.is_empty());
    }

    #[test]
    fn test_expiry_bounds() {
        let spec = project_with_agents("Acme", &["A"]);
        let mut o = opts("M1", "A", &[]);
        o.event_expiry_days = Some(400);
        assert!(matches!(
            build_memory(&spec, o),
            Err(AgentCoreError::Validation(_))
        ));
    }
}
