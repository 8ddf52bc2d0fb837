//! `aws-targets.json`: where a project can be deployed.

use super::{check_unique, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTarget {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub account: String,
    pub region: Region,
}

/// An AWS account id is exactly twelve ASCII digits.
pub fn check_account(account: &str) -> std::result::Result<(), String> {
    if account.len() == 12 && account.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(format!(
            "account '{}' must be exactly 12 digits",
            account
        ))
    }
}

impl Validate for Vec<DeploymentTarget> {
    fn validate(&self) -> std::result::Result<(), String> {
        check_unique("target", self.iter().map(|t| t.name.as_str()))?;
        for target in self {
            check_account(&target.account).map_err(|e| format!("target '{}': {}", target.name, e))?;
        }
        Ok(())
    }
}

/// Regions where AgentCore is available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "us-east-1")]
    UsEast1,
    #[serde(rename = "us-east-2")]
    UsEast2,
    #[serde(rename = "us-west-2")]
    UsWest2,
    #[serde(rename = "ap-south-1")]
    ApSouth1,
    #[serde(rename = "ap-southeast-1")]
    ApSoutheast1,
    #[serde(rename = "ap-southeast-2")]
    ApSoutheast2,
    #[serde(rename = "ap-northeast-1")]
    ApNortheast1,
    #[serde(rename = "eu-central-1")]
    EuCentral1,
    #[serde(rename = "eu-west-1")]
    EuWest1,
}

impl Region {
    pub const ALL: &'static [Region] = &[
        Region::UsEast1,
        Region::UsEast2,
        Region::UsWest2,
        Region::ApSouth1,
        Region::ApSoutheast1,
        Region::ApSoutheast2,
        Region::ApNortheast1,
        Region::EuCentral1,
        Region::EuWest1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::UsEast1 => "us-east-1",
            Region::UsEast2 => "us-east-2",
            Region::UsWest2 => "us-west-2",
            Region::ApSouth1 => "ap-south-1",
            Region::ApSoutheast1 => "ap-southeast-1",
            Region::ApSoutheast2 => "ap-southeast-2",
            Region::ApNortheast1 => "ap-northeast-1",
            Region::EuCentral1 => "eu-central-1",
            Region::EuWest1 => "eu-west-1",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.as_str() == s)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_serde_matches_as_str() {
        for region in Region::ALL {
            let json = serde_json::to_string(region).unwrap();
            assert_eq!(json, format!("\"{}\"", region.as_str()));
            let back: Region = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *region);
        }
    }

    #[test]
    fn test_unknown_region_rejected() {
        assert!(serde_json::from_str::<Region>("\"mars-north-1\"").is_err());
        assert_eq!(Region::parse("mars-north-1"), None);
        assert_eq!(Region::parse("eu-west-1"), Some(Region::EuWest1));
    }

    #[test]
    fn test_check_account() {
        assert!(check_account("123456789012").is_ok());
        assert!(check_account("12345678901").is_err());
        assert!(check_account("invalid").unwrap_err().contains("12 digits"));
        assert!(check_account("12345678901a").is_err());
    }

    #[test]
    fn test_targets_validate_duplicates() {
        let target = DeploymentTarget {
            name: "dev".to_string(),
            description: None,
            account: "123456789012".to_string(),
            region: Region::UsEast1,
        };
        let targets = vec![target.clone(), target];
        assert!(targets.validate().unwrap_err().contains("duplicate target"));
    }
}
