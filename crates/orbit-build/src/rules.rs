//! Pattern rule table
//!
//! Maps each [`Action`] to a [`RuleTemplate`]: the command to run, the
//! environment overlay it needs and the prerequisite action it implies.
//! Package substitution happens when a template is instantiated for a
//! concrete package, so there is no textual pattern matching involved.

use crate::action::Action;
use crate::error::OrchestratorResult;
use crate::registry::Package;
use orbit_config::{ActionConfig, EnvConfig};
use std::collections::BTreeMap;
use std::path::Path;

/// Placeholder replaced with the package name
pub const PACKAGE_PLACEHOLDER: &str = "{package}";
/// Placeholder replaced with the orchestrator root
pub const ROOT_PLACEHOLDER: &str = "{root}";

/// Environment overlay: variable name to value template
pub type EnvOverlay = BTreeMap<String, String>;

/// Substitute `{package}` and `{root}` in a template
pub fn render(template: &str, package: Option<&Package>, root: &Path) -> String {
    let rendered = template.replace(ROOT_PLACEHOLDER, &root.display().to_string());
    match package {
        Some(package) => rendered.replace(PACKAGE_PLACEHOLDER, package.name()),
        None => rendered,
    }
}

/// Rule template for one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTemplate {
    action: Action,
    command: String,
    env: EnvOverlay,
    prerequisite: Option<Action>,
    requires_bootstrap: bool,
}

impl RuleTemplate {
    pub fn new(action: Action, command: impl Into<String>) -> Self {
        Self {
            action,
            command: command.into(),
            env: EnvOverlay::new(),
            prerequisite: None,
            requires_bootstrap: false,
        }
    }

    pub fn with_prerequisite(mut self, prerequisite: Action) -> Self {
        self.prerequisite = Some(prerequisite);
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_bootstrap(mut self) -> Self {
        self.requires_bootstrap = true;
        self
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Raw command template
    pub fn command_template(&self) -> &str {
        &self.command
    }

    /// Command line for a concrete package
    pub fn command(&self, package: &Package, root: &Path) -> String {
        render(&self.command, Some(package), root)
    }

    /// Environment overlay for a concrete package
    pub fn environment(&self, package: &Package, root: &Path) -> EnvOverlay {
        self.env
            .iter()
            .map(|(key, value)| (key.clone(), render(value, Some(package), root)))
            .collect()
    }

    /// Action that must complete for the same package first
    pub fn prerequisite(&self) -> Option<Action> {
        self.prerequisite
    }

    /// Whether the shared tool bootstrap must run first
    pub fn requires_bootstrap(&self) -> bool {
        self.requires_bootstrap
    }

    fn apply_override(&mut self, config: &ActionConfig) {
        if let Some(command) = &config.command {
            self.command = command.clone();
        }
        for (key, value) in &config.env {
            self.env.insert(key.clone(), value.clone());
        }
    }
}

/// Static registry of rule templates, one per action
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: BTreeMap<Action, RuleTemplate>,
}

impl RuleTable {
    /// The standard table for a Mix-style package layout
    pub fn standard(env: &EnvConfig) -> Self {
        let profiled = |rule: RuleTemplate, profile: &str| {
            rule.with_env(&env.profile_var, profile)
                .with_env(&env.build_root_var, &env.build_root)
        };

        let rules = [
            RuleTemplate::new(Action::FetchDependencies, "mix deps.get").with_bootstrap(),
            profiled(
                RuleTemplate::new(Action::Build, "mix compile")
                    .with_prerequisite(Action::FetchDependencies),
                &env.default_profile,
            ),
            profiled(
                RuleTemplate::new(Action::BuildRelease, "mix compile")
                    .with_prerequisite(Action::FetchDependencies),
                &env.release_profile,
            ),
            profiled(
                RuleTemplate::new(Action::Test, "mix test").with_prerequisite(Action::Build),
                &env.default_profile,
            ),
            profiled(
                RuleTemplate::new(Action::Lint, "mix lint").with_prerequisite(Action::Build),
                &env.default_profile,
            ),
            RuleTemplate::new(Action::Clean, "mix clean"),
            RuleTemplate::new(Action::DeepClean, "rm -rf _build deps"),
        ];

        Self {
            rules: rules.into_iter().map(|r| (r.action, r)).collect(),
        }
    }

    /// Standard table with per-action overrides applied
    ///
    /// Override keys are action names; an unknown key is an `UnknownAction`.
    pub fn from_config(
        env: &EnvConfig,
        overrides: &BTreeMap<String, ActionConfig>,
    ) -> OrchestratorResult<Self> {
        let mut table = Self::standard(env);
        for (name, config) in overrides {
            let action: Action = name.parse()?;
            if let Some(rule) = table.rules.get_mut(&action) {
                rule.apply_override(config);
            }
        }
        Ok(table)
    }

    /// Rule for an action
    pub fn rule_for(&self, action: Action) -> &RuleTemplate {
        // Every Action variant is inserted by `standard`.
        &self.rules[&action]
    }

    /// Rule for an action name
    pub fn rule_for_name(&self, name: &str) -> OrchestratorResult<&RuleTemplate> {
        let action: Action = name.parse()?;
        Ok(self.rule_for(action))
    }

    /// Replace a rule wholesale
    pub fn with_rule(mut self, rule: RuleTemplate) -> Self {
        self.rules.insert(rule.action, rule);
        self
    }

    pub fn rules(&self) -> impl Iterator<Item = &RuleTemplate> {
        self.rules.values()
    }
}
