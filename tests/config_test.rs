//! Loading the YAML configuration from disk

use std::fs;
use std::path::PathBuf;

use loyalty_points::config::AppConfig;
use loyalty_points::LoyaltyError;
use tempfile::{tempdir, TempDir};

fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("config.yaml");
    fs::write(&path, contents).expect("Failed to write config");
    (dir, path)
}

#[test]
fn test_load_departments_in_order() {
    let (_dir, path) = write_config("department:\n  - R&D\n  - Sales\n  - Design\n");

    let config = AppConfig::load(&path).expect("Failed to load config");

    assert_eq!(config.department, ["R&D", "Sales", "Design"]);
}

#[test]
fn test_missing_sections_fall_back_to_defaults() {
    let (_dir, path) = write_config("department: [R&D]\n");

    let config = AppConfig::load(&path).expect("Failed to load config");

    assert_eq!(config.database.url, "sqlite:data/loyalty.db");
    assert_eq!(config.database.max_connections, 4);
    assert_eq!(config.database.connection_timeout_secs, 30);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, "text");
    assert_eq!(config.logging.file_path, None);
    assert_eq!(config.export.default_format, "json");
    assert_eq!(config.export.output_directory, "./output");
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let (_dir, path) = write_config("department: [R&D]\ndatabase:\n  url: \"sqlite:/tmp/other.db\"\n");

    let config = AppConfig::load(&path).expect("Failed to load config");

    assert_eq!(config.database.url, "sqlite:/tmp/other.db");
    assert_eq!(config.database.max_connections, 4);
}

#[test]
fn test_missing_file_is_fatal() {
    let dir = tempdir().expect("Failed to create temp directory");

    let result = AppConfig::load(dir.path().join("absent.yaml"));

    assert!(matches!(result, Err(LoyaltyError::Config(_))));
}

#[test]
fn test_missing_department_key_is_fatal() {
    let (_dir, path) = write_config("logging:\n  level: debug\n");

    assert!(AppConfig::load(&path).is_err());
}

#[test]
fn test_malformed_yaml_is_fatal() {
    let (_dir, path) = write_config("department: [R&D\n  - : :\n");

    assert!(matches!(AppConfig::load(&path), Err(LoyaltyError::Config(_))));
}

#[test]
fn test_invalid_log_level_rejected() {
    let (_dir, path) = write_config("department: [R&D]\nlogging:\n  level: loud\n");

    assert!(matches!(
        AppConfig::load(&path),
        Err(LoyaltyError::InvalidConfig(_))
    ));
}

#[test]
fn test_blank_department_rejected() {
    let (_dir, path) = write_config("department: [R&D, \"  \"]\n");

    assert!(matches!(
        AppConfig::load(&path),
        Err(LoyaltyError::InvalidConfig(_))
    ));
}

#[test]
fn test_empty_department_list_is_allowed() {
    let (_dir, path) = write_config("department: []\n");

    let config = AppConfig::load(&path).expect("Failed to load config");

    assert!(config.department.is_empty());
}

#[test]
fn test_config_validation_zero_max_connections() {
    let mut config = AppConfig::with_departments(["R&D"]);
    config.database.max_connections = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_invalid_export_format() {
    let mut config = AppConfig::with_departments(["R&D"]);
    config.export.default_format = "pdf".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_valid_log_formats() {
    for format in ["text", "json"] {
        let mut config = AppConfig::with_departments(["R&D"]);
        config.logging.format = format.to_string();
        assert!(config.validate().is_ok(), "Failed for format: {}", format);
    }
}

#[test]
fn test_yaml_rendering_lists_departments() {
    let config = AppConfig::with_departments(["R&D", "Sales"]);

    let yaml = config.to_yaml().expect("Failed to render config");

    assert!(yaml.contains("R&D"));
    assert!(yaml.contains("Sales"));
    assert!(yaml.contains("max_connections: 4"));
}
