//! Deploy target environment

use crate::core::DeployError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment a checkout is being deployed to
///
/// Selected once per run. Only validated and reported: no step behaves
/// differently depending on which environment was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Staging,
    Qa,
}

impl Environment {
    pub const ALL: [Environment; 3] = [
        Environment::Production,
        Environment::Staging,
        Environment::Qa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Qa => "qa",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Environment::ALL
            .iter()
            .copied()
            .find(|env| env.as_str() == s)
            .ok_or_else(|| {
                DeployError::InvalidArgument(
                    "Invalid environment argument provided. Use one of \"production\", \"staging\", or \"qa\""
                        .to_string(),
                )
            })
    }
}
