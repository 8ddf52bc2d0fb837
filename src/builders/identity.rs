use super::{require_agent, require_users};
use crate::error::{AgentCoreError, ResourceKind, Result};
use crate::naming;
use crate::schema::{Credential, CredentialVariant, IdentityProvider, ProjectSpec};

#[derive(Debug, Clone)]
pub struct IdentityOptions {
    /// Simple name; the stored name is qualified with the project name
    pub name: String,
    pub owner: String,
    pub users: Vec<String>,
    pub variant: CredentialVariant,
    pub description: Option<String>,
}

/// The credential plus one owned and N referenced provider entries, all
/// carrying the same qualified name.
#[derive(Debug, Clone)]
pub struct IdentityBuild {
    pub credential: Credential,
    pub owned: (String, IdentityProvider),
    pub referenced: Vec<(String, IdentityProvider)>,
}

pub fn build_identity(spec: &ProjectSpec, opts: IdentityOptions) -> Result<IdentityBuild> {
    naming::validate_identity_name(&opts.name)?;

    let qualified = naming::qualify(&spec.name, &opts.name);
    if naming::is_taken(spec.credentials.iter().map(|c| c.name.as_str()), &qualified) {
        return Err(AgentCoreError::duplicate(ResourceKind::Identity, &qualified));
    }

    // Resolve every agent before building anything.
    require_agent(spec, &opts.owner)?;
    require_users(spec, Some(opts.owner.as_str()), opts.users.iter().map(String::as_str))?;

    for agent_name in std::iter::once(&opts.owner).chain(opts.users.iter()) {
        if spec.agent(agent_name).is_some_and(|a| a.has_identity(&qualified)) {
            return Err(AgentCoreError::already_attached(
                ResourceKind::Identity,
                &qualified,
                agent_name,
            ));
        }
    }

    let env_var_name = naming::identity_env_var(&opts.name);

    let owned = IdentityProvider::Own {
        name: qualified.clone(),
        variant: opts.variant,
        description: opts.description.clone(),
        env_var_name: env_var_name.clone(),
    };
    let referenced = opts
        .users
        .into_iter()
        .map(|user| {
            let provider = IdentityProvider::Use {
                name: qualified.clone(),
                env_var_name: env_var_name.clone(),
            };
            (user, provider)
        })
        .collect();

    Ok(IdentityBuild {
        credential: Credential {
            name: qualified,
            variant: opts.variant,
            description: opts.description,
            env_var_name,
        },
        owned: (opts.owner, owned),
        referenced,
    })
}

impl IdentityBuild {
    pub fn env_var_name(&self) -> &str {
        &self.credential.env_var_name
    }

    pub fn apply(self, spec: &mut ProjectSpec) {
        let (owner, provider) = self.owned;
        if let Some(agent) = spec.agent_mut(&owner) {
            agent.identity_providers.push(provider);
        }
        for (user, provider) in self.referenced {
            if let Some(agent) = spec.agent_mut(&user) {
                agent.identity_providers.push(provider);
            }
        }
        spec.credentials.push(self.credential);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures::project_with_agents;
    use crate::schema::Relation;

    fn opts(name: &str, owner: &str, users: &[&str]) -> IdentityOptions {
        IdentityOptions {
            name: name.to_string(),
            owner: owner.to_string(),
            users: users.iter().map(|u| u.to_string()).collect(),
            variant: CredentialVariant::ApiKey,
            description: None,
        }
    }

    #[test]
    fn test_identity_is_qualified() {
        let mut spec = project_with_agents("Acme", &["Owner", "User"]);
        let build = build_identity(&spec, opts("Key", "Owner", &["User"])).unwrap();
        assert_eq!(build.env_var_name(), "AGENTCORE_IDENTITY_KEY");
        build.apply(&mut spec);

        assert_eq!(spec.credentials[0].name, "AcmeKey");
        let owner = &spec.agent("Owner").unwrap().identity_providers[0];
        assert_eq!(owner.name(), "AcmeKey");
        assert_eq!(owner.relation(), Relation::Own);
        let user = &spec.agent("User").unwrap().identity_providers[0];
        assert_eq!(user.name(), "AcmeKey");
        assert_eq!(user.relation(), Relation::Use);
    }

    #[test]
    fn test_missing_user_aborts_before_mutation() {
        let spec = project_with_agents("Acme", &["Owner"]);
        let before = spec.clone();
        let err = build_identity(&spec, opts("Key", "Owner", &["Ghost"])).unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert_eq!(spec, before);
    }

    #[test]
    fn test_duplicate_identity() {
        let mut spec = project_with_agents("Acme", &["Owner"]);
        build_identity(&spec, opts("Key", "Owner", &[]))
            .unwrap()
            .apply(&mut spec);
        let err = build_identity(&spec, opts("Key", "Owner", &[])).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(spec.credentials.len(), 1);
    }

    #[test]
    fn test_identity_name_must_be_alphanumeric() {
        let spec = project_with_agents("Acme", &["Owner"]);
        assert!(matches!(
            build_identity(&spec, opts("my-key", "Owner", &[])),
            Err(AgentCoreError::Validation(_))
        ));
    }
}
