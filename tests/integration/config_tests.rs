//! Integration tests for configuration loading and merging.

use std::fs;

use n_pm::config::{load_config, load_config_from_path, Config, DEFAULT_CLEAN_DIRS};
use n_pm::error::NError;
use n_pm::package::PackageManager;

use crate::integration::fixtures::create_project;

#[tokio::test]
async fn test_missing_files_give_defaults() {
    let project = create_project(&[]);
    let config = load_config_from_path(&project.path().join("missing.toml")).await;
    assert!(matches!(config, Err(NError::InvalidConfig { .. })));

    let defaults = Config::default();
    assert_eq!(defaults.clean_dirs(), DEFAULT_CLEAN_DIRS.to_vec());
    assert!(!defaults.cache_enabled());
}

#[tokio::test]
async fn test_cli_config_overrides_project_config() {
    let project = create_project(&[]);
    fs::write(
        project.path().join(".nrc.toml"),
        "[general]\nmanager = \"yarn\"\n\n[clean]\ndirs = [\"tmp\"]\n",
    )
    .unwrap();
    let cli_path = project.path().join("override.toml");
    fs::write(&cli_path, "[general]\nmanager = \"bun\"\n").unwrap();

    let config = load_config(Some(&cli_path), project.path()).await.unwrap();

    assert_eq!(config.general.manager, Some(PackageManager::Bun));
    assert_eq!(config.clean_dirs(), vec!["tmp".to_string()]);
}

#[tokio::test]
async fn test_broken_project_config_is_ignored() {
    let project = create_project(&[]);
    fs::write(project.path().join(".nrc.toml"), "[general\nmanager =").unwrap();

    assert!(load_config(None, project.path()).await.is_ok());
}

#[tokio::test]
async fn test_unknown_keys_rejected() {
    let project = create_project(&[]);
    let path = project.path().join("n.toml");
    fs::write(&path, "[general]\nrunner = \"npm\"\n").unwrap();

    let err = load_config_from_path(&path).await.unwrap_err();
    assert_eq!(err.exit_code(), n_pm::error::exit_code::INVALID_CONFIG);
}

#[tokio::test]
async fn test_scan_section() {
    let project = create_project(&[]);
    let path = project.path().join("n.toml");
    fs::write(
        &path,
        "[scan]\nextensions = [\"ts\"]\nskip = [\"vendor\"]\n\n[cache]\nenabled = true\n",
    )
    .unwrap();

    let config = load_config_from_path(&path).await.unwrap();
    let options = config.scan_options();

    assert_eq!(options.extensions, vec!["ts".to_string()]);
    assert_eq!(options.skip, vec!["vendor".to_string()]);
    assert!(config.cache_enabled());
}
