//! CLI configuration via environment variables

use std::env;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Default to JSON output (ORBIT_JSON=1)
    pub default_json: bool,
    /// Capture command output by default (ORBIT_CAPTURE=1)
    pub capture: bool,
    /// Disable colored output (ORBIT_NO_COLOR=1 or NO_COLOR=1)
    pub no_color: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            default_json: flag("ORBIT_JSON"),
            capture: flag("ORBIT_CAPTURE"),
            no_color: env::var_os("ORBIT_NO_COLOR").is_some() || env::var_os("NO_COLOR").is_some(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Set and not one of 0/false/off/no
fn flag(name: &str) -> bool {
    env::var(name)
        .map(|v| {
            let lower = v.trim().to_lowercase();
            !(lower.is_empty() || lower == "0" || lower == "false" || lower == "off" || lower == "no")
        })
        .unwrap_or(false)
}
