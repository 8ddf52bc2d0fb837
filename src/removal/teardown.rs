use crate::error::Result;
use crate::schema::Region;
use crate::store::DocumentSet;
use crate::toolkit::StackToolkit;

/// Stack cleanup owed by a target removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teardown {
    pub project: String,
    pub target: String,
    pub region: Region,
}

impl Teardown {
    /// Only targets recorded in deployed state have anything to tear down.
    /// No deployed-state document at all means nothing was ever deployed.
    pub(super) fn for_target(docs: &DocumentSet, target: &str, region: Region) -> Option<Self> {
        let state = docs.deployed.as_ref()?;
        state.targets.contains_key(target).then(|| Teardown {
            project: docs.project.name.clone(),
            target: target.to_string(),
            region,
        })
    }

    /// Discover the stack and destroy it. Returns the destroyed stack name,
    /// or `None` when discovery finds nothing.
    pub fn run(&self, toolkit: &dyn StackToolkit) -> Result<Option<String>> {
        match toolkit.discover(self.region, &self.project, &self.target)? {
            Some(stack) => {
                toolkit.destroy(stack.pattern())?;
                tracing::info!(stack = %stack.stack_name, "stack destroyed");
                Ok(Some(stack.stack_name))
            }
            None => {
                tracing::info!(target = %self.target, "no stack found, skipping destroy");
                Ok(None)
            }
        }
    }
}
