//! Configuration loading and precedence tests

use orbit_config::{ConfigError, ConfigLoader, ProjectConfig, CONFIG_FILE_NAME};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn create_config_file(dir: &Path, content: &str) -> PathBuf {
    let config_path = dir.join(CONFIG_FILE_NAME);
    fs::write(&config_path, content).unwrap();
    config_path
}

// ============================================================================
// Config Loading Tests
// ============================================================================

#[test]
fn test_load_full_workspace_config() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        r#"
[workspace]
packages = ["ockam", "ockam_services", "ockam_kafka"]
packages_dir = "ockam"
shared_dirs = ["_build", "deps", ".cache"]

[env]
profile_var = "APP_ENV"
release_profile = "release"

[[tools]]
name = "hex"
install = "mix local.hex --force --if-missing"
check = "mix hex.info"
program = "mix"

[actions.lint]
command = "mix credo --strict"

[actions.test.env]
APP_ENV = "test"

[delegate]
dir = "../rust"
"#,
    );

    let config = ConfigLoader::new()
        .without_env()
        .load_from_directory(temp_dir.path())
        .unwrap();

    assert_eq!(
        config.package_names(),
        ["ockam", "ockam_services", "ockam_kafka"]
    );
    assert_eq!(config.project.workspace.shared_dirs.len(), 3);
    assert_eq!(config.project.env.profile_var, "APP_ENV");
    assert_eq!(config.project.env.default_profile, "dev");
    assert_eq!(config.project.tools.len(), 1);
    assert_eq!(config.project.tools[0].program.as_deref(), Some("mix"));
    assert_eq!(
        config.project.actions["lint"].command.as_deref(),
        Some("mix credo --strict")
    );
    assert_eq!(config.project.actions["test"].env["APP_ENV"], "test");

    let delegate = config.project.delegate.as_ref().unwrap();
    assert_eq!(delegate.command, "make deep_clean");
    assert_eq!(delegate.display_name(), "rust");
}

#[test]
fn test_registry_order_preserved() {
    let config = ProjectConfig::parse(
        r#"
[workspace]
packages = ["zeta", "alpha", "mid"]
"#,
    )
    .unwrap();
    assert_eq!(config.package_names(), ["zeta", "alpha", "mid"]);
}

#[test]
fn test_invalid_toml_reports_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "[workspace\npackages = 1");

    match ConfigLoader::new().load_from_file(&path) {
        Err(ConfigError::TomlParseError { file, .. }) => assert_eq!(file, path),
        other => panic!("Expected TomlParseError, got {:?}", other),
    }
}

#[rstest]
#[case::empty_package(r#"
[workspace]
packages = [""]
"#)]
#[case::empty_install(r#"
[[tools]]
name = "hex"
install = " "
"#)]
#[case::empty_profile_var(r#"
[env]
profile_var = ""
"#)]
#[case::empty_delegate_command(r#"
[delegate]
dir = "../rust"
command = ""
"#)]
fn test_validation_rejects(#[case] content: &str) {
    let result = ProjectConfig::parse(content);
    assert!(
        matches!(result, Err(ConfigError::InvalidValue { .. })),
        "expected InvalidValue, got {:?}",
        result
    );
}

// ============================================================================
// Precedence Tests
// ============================================================================

#[test]
#[serial]
fn test_env_overrides_file_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(
        temp_dir.path(),
        r#"
[env]
default_profile = "dev"
build_root = "{root}/out"
"#,
    );

    env::set_var("ORBIT_PROFILE", "staging");
    env::set_var("ORBIT_BUILD_ROOT", "/var/orbit/{package}");
    let config = ConfigLoader::new().load_from_file(&path).unwrap();
    env::remove_var("ORBIT_PROFILE");
    env::remove_var("ORBIT_BUILD_ROOT");

    assert_eq!(config.project.env.default_profile, "staging");
    assert_eq!(config.project.env.build_root, "/var/orbit/{package}");
    assert_eq!(config.project.env.release_profile, "prod");
}

#[test]
#[serial]
fn test_empty_env_value_is_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "");

    env::set_var("ORBIT_PROFILE", "");
    let config = ConfigLoader::new().load_from_file(&path).unwrap();
    env::remove_var("ORBIT_PROFILE");

    assert_eq!(config.project.env.default_profile, "dev");
}
