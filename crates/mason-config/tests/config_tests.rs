//! Configuration loading and precedence tests

use mason_config::{ConfigError, ConfigLoader, DepsMode, ProjectConfig, Toolchain};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn create_config_file(dir: &Path, content: &str) -> PathBuf {
    let config_path = dir.join("mason.toml");
    fs::write(&config_path, content).unwrap();
    config_path
}

fn loader_without_global(dir: &Path) -> ConfigLoader {
    ConfigLoader::new().with_global_config_path(dir.join("absent.toml"))
}

// ============================================================================
// Loading
// ============================================================================

#[test]
#[serial]
fn test_load_from_specific_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(
        temp_dir.path(),
        r#"
[build]
out_dir = "build-out"
build_apps = false

[toolchain]
deps_mode = "none"
"#,
    );

    let mut loader = loader_without_global(temp_dir.path());
    let config = loader.load_from_file(&path).unwrap();

    assert_eq!(config.project_root(), Some(temp_dir.path()));
    assert_eq!(config.out_dir(), PathBuf::from("build-out"));
    assert!(!config.build_apps());
    assert!(config.build_tests());
    assert_eq!(config.toolchain().deps_mode, DepsMode::None);
}

#[test]
fn test_missing_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let result = ProjectConfig::load_from_file(&temp_dir.path().join("mason.toml"));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_invalid_toml_reports_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "[build\nout_dir = 1");
    match ProjectConfig::load_from_file(&path) {
        Err(ConfigError::TomlParseError { file, .. }) => assert_eq!(file, path),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_invalid_toolchain_rejected_on_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(
        temp_dir.path(),
        r#"
[toolchain]
archive_suffix = "lib/.a"
"#,
    );
    assert!(matches!(
        ProjectConfig::load_from_file(&path),
        Err(ConfigError::InvalidValue { .. })
    ));
}

// ============================================================================
// Environment overrides
// ============================================================================

#[rstest]
#[case("1", false)]
#[case("true", false)]
#[case("YES", false)]
#[case("0", true)]
#[case("off", true)]
#[serial]
fn test_env_warnings_override(#[case] value: &str, #[case] disabled: bool) {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "");

    env::set_var("MASON_WARNINGS", value);
    let mut loader = loader_without_global(temp_dir.path());
    let config = loader.load_from_directory(temp_dir.path()).unwrap();
    env::remove_var("MASON_WARNINGS");

    assert_eq!(config.enable_warnings(), !disabled);
}

#[test]
#[serial]
fn test_env_out_dir_moves_database() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        r#"
[build]
out_dir = "from-file"
db_path = "deps.db"
"#,
    );

    env::set_var("MASON_OUT_DIR", "from-env");
    let mut loader = loader_without_global(temp_dir.path());
    let config = loader.load_from_directory(temp_dir.path()).unwrap();
    env::remove_var("MASON_OUT_DIR");

    assert_eq!(config.out_dir(), PathBuf::from("from-env"));
    assert_eq!(config.db_path(), PathBuf::from("from-env").join("deps.db"));
}

#[test]
#[serial]
fn test_env_deps_mode_override() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        r#"
[toolchain]
deps_mode = "gnu"
"#,
    );

    env::set_var("MASON_DEPS_MODE", "msvc");
    let mut loader = loader_without_global(temp_dir.path());
    let config = loader.load_from_directory(temp_dir.path()).unwrap();
    env::remove_var("MASON_DEPS_MODE");

    let expected = Toolchain {
        deps_mode: DepsMode::Msvc,
        ..Toolchain::default()
    };
    assert_eq!(config.toolchain(), expected);
}
