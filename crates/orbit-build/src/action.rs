//! Lifecycle actions
use crate::error::{OrchestratorError, OrchestratorResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A lifecycle action applicable to a package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    FetchDependencies,
    Build,
    BuildRelease,
    Test,
    Lint,
    Clean,
    DeepClean,
}

impl Action {
    /// All actions, in lifecycle order
    pub const ALL: [Action; 7] = [
        Self::FetchDependencies,
        Self::Build,
        Self::BuildRelease,
        Self::Test,
        Self::Lint,
        Self::Clean,
        Self::DeepClean,
    ];

    /// Get action name
    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchDependencies => "fetch-dependencies",
            Self::Build => "build",
            Self::BuildRelease => "build-release",
            Self::Test => "test",
            Self::Lint => "lint",
            Self::Clean => "clean",
            Self::DeepClean => "deep-clean",
        }
    }

    fn expected() -> String {
        Self::ALL
            .iter()
            .map(Action::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for Action {
    type Err = OrchestratorError;

    fn from_str(s: &str) -> OrchestratorResult<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| OrchestratorError::UnknownAction {
                action: s.to_string(),
                expected: Self::expected(),
            })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
