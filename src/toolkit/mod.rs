//! Deployment toolkit seam.
//!
//! Target removal needs to find and destroy the CloudFormation stack of a
//! deployed target. Everything else in the crate reaches the toolkit through
//! [`StackToolkit`] so tests can swap in a fake.

mod cdk;

pub use cdk::CdkToolkit;

use crate::error::Result;
use crate::schema::Region;

/// A stack that exists in the target account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedStack {
    pub stack_name: String,
    pub status: String,
}

impl DeployedStack {
    /// Pattern handed to `destroy`
    pub fn pattern(&self) -> &str {
        &self.stack_name
    }
}

/// Stack naming shared by deploy and teardown
pub fn stack_name(project: &str, target: &str) -> String {
    format!("AgentCore-{}-{}", project, target)
}

pub trait StackToolkit {
    /// Look up the stack of `target`. `Ok(None)` means nothing is deployed.
    fn discover(&self, region: Region, project: &str, target: &str)
        -> Result<Option<DeployedStack>>;

    fn destroy(&self, stack_pattern: &str) -> Result<()>;
}
