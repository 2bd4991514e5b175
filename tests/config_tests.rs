// Configuration tests - verify config parsing and validation

use looper_poll::application::config::loader::ConfigLoader;
use looper_poll::application::config::models::GlueConfig;
use looper_poll::GlueError;
use std::fs;

fn write_config(name: &str, content: &str) -> String {
    let temp_file = std::env::temp_dir().join(format!("looper_poll_{}_{}.toml", name, std::process::id()));
    fs::write(&temp_file, content).unwrap();
    temp_file.to_string_lossy().to_string()
}

#[test]
fn test_valid_config_parsing() {
    let path = write_config(
        "valid",
        r#"
log_handler = true
main_loop = true
log_tag = "MyApp"
log_filter = "looper_poll=debug,info"
base_ident = 10
max_events = 64
"#,
    );

    let config = ConfigLoader::load(&path).unwrap();
    assert_eq!(config.log_tag, "MyApp");
    assert_eq!(config.base_ident, 10);
    assert_eq!(config.max_events, 64);
}

#[test]
fn test_partial_config_uses_defaults() {
    let path = write_config("partial", "main_loop = false\n");

    let config = ConfigLoader::load(&path).unwrap();
    assert!(!config.main_loop);
    assert_eq!(
        config,
        GlueConfig {
            main_loop: false,
            ..GlueConfig::default()
        }
    );
}

#[test]
fn test_missing_file() {
    let path = std::env::temp_dir().join("looper_poll_does_not_exist.toml");
    let result = ConfigLoader::load(path.to_str().unwrap());
    assert!(matches!(result, Err(GlueError::ConfigError(_))));
}

#[test]
fn test_malformed_toml() {
    let path = write_config("malformed", "base_ident = \"three\"\n");
    assert!(matches!(ConfigLoader::load(&path), Err(GlueError::ConfigError(_))));
}

#[test]
fn test_reserved_base_ident_rejected() {
    let path = write_config("reserved", "base_ident = 2\n");
    let err = ConfigLoader::load(&path).unwrap_err();
    assert!(err.to_string().contains("base_ident"), "{}", err);
}

#[test]
fn test_max_events_limit() {
    let path = write_config("max_events", "max_events = 4096\n");
    assert!(ConfigLoader::load(&path).is_err());
}
