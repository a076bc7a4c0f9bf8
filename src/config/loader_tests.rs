//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

fn write_temp_config(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("serlog_test_{}_{}.toml", name, std::process::id()));
    fs::write(&path, contents).expect("Failed to write test config");
    path
}

// ===== Paths =====

#[test]
fn default_config_path_ends_with_serlog_config_toml() {
    let path = default_config_path().expect("Should have default path");
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("serlog") && path_str.ends_with("config.toml"),
        "Path should contain 'serlog' and end with 'config.toml', got: {}",
        path_str
    );
}

#[test]
fn default_log_path_ends_with_serlog_log() {
    let path = default_log_path();
    assert!(
        path.to_string_lossy().ends_with("serlog.log"),
        "Default log path should end with 'serlog.log', got: {:?}",
        path
    );
}

#[test]
fn default_export_dir_is_not_empty() {
    assert!(!default_export_dir().as_os_str().is_empty());
}

// ===== Loading =====

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(result, Ok(None));
}

#[test]
fn load_config_file_parses_valid_toml() {
    let path = write_temp_config(
        "valid",
        r#"
port = "/dev/ttyACM0"
baud_rate = 115200
timestamps = false
export_dir = "/tmp/reports"
share_command = "xdg-open"
quick_send = ["1", "status"]
append_newline = true
"#,
    );

    let config = load_config_file(&path)
        .expect("Should parse valid TOML")
        .expect("Should return Some for existing file");

    assert_eq!(config.port.as_deref(), Some("/dev/ttyACM0"));
    assert_eq!(config.baud_rate, Some(115200));
    assert_eq!(config.timestamps, Some(false));
    assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/reports")));
    assert_eq!(config.share_command.as_deref(), Some("xdg-open"));
    assert_eq!(
        config.quick_send,
        Some(vec!["1".to_string(), "status".to_string()])
    );
    assert_eq!(config.append_newline, Some(true));

    fs::remove_file(path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let path = write_temp_config("invalid", "baud_rate = [not valid");

    let result = load_config_file(&path);
    assert!(
        matches!(result, Err(ConfigError::ParseError { .. })),
        "Invalid TOML should be a ParseError, got: {:?}",
        result
    );

    fs::remove_file(path).ok();
}

#[test]
fn load_config_file_rejects_unknown_keys() {
    let path = write_temp_config("unknown", "theme = \"dark\"\n");

    let result = load_config_file(&path);
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));

    fs::remove_file(path).ok();
}

#[test]
fn empty_config_file_is_all_none() {
    let path = write_temp_config("empty", "");
    let config = load_config_file(&path).unwrap().unwrap();
    assert_eq!(config, ConfigFile::default());
    fs::remove_file(path).ok();
}

#[test]
#[serial(config_env)]
fn explicit_path_wins_over_env_var() {
    let explicit = write_temp_config("explicit", "baud_rate = 19200\n");
    let from_env = write_temp_config("from_env", "baud_rate = 38400\n");
    env::set_var("SERLOG_CONFIG", &from_env);

    let config = load_config_with_precedence(Some(explicit.clone()))
        .unwrap()
        .unwrap();
    assert_eq!(config.baud_rate, Some(19200));

    env::remove_var("SERLOG_CONFIG");
    fs::remove_file(explicit).ok();
    fs::remove_file(from_env).ok();
}

#[test]
#[serial(config_env)]
fn env_var_path_is_used_without_explicit_path() {
    let from_env = write_temp_config("env_only", "timestamps = false\n");
    env::set_var("SERLOG_CONFIG", &from_env);

    let config = load_config_with_precedence(None).unwrap().unwrap();
    assert_eq!(config.timestamps, Some(false));

    env::remove_var("SERLOG_CONFIG");
    fs::remove_file(from_env).ok();
}

// ===== Merging =====

#[test]
fn merge_without_file_gives_defaults() {
    let config = merge_config(None);
    assert_eq!(config.baud_rate, 9600);
    assert!(config.timestamps);
    assert_eq!(config.quick_send, default_quick_send());
    assert!(!config.append_newline);
    assert_eq!(config.port, None);
}

#[test]
fn merge_prefers_file_values() {
    let config = merge_config(Some(ConfigFile {
        baud_rate: Some(57600),
        share_command: Some("open".to_string()),
        ..ConfigFile::default()
    }));
    assert_eq!(config.baud_rate, 57600);
    assert_eq!(config.share_command.as_deref(), Some("open"));
    assert!(config.timestamps);
}

#[test]
fn merge_truncates_quick_send_to_nine() {
    let commands: Vec<String> = (0..12).map(|n| format!("cmd{}", n)).collect();
    let config = merge_config(Some(ConfigFile {
        quick_send: Some(commands),
        ..ConfigFile::default()
    }));
    assert_eq!(config.quick_send.len(), MAX_QUICK_SEND);
    assert_eq!(config.quick_send[8], "cmd8");
}

// ===== Overrides =====

#[test]
#[serial(config_env)]
fn env_overrides_port_and_baud() {
    env::set_var("SERLOG_PORT", "/dev/ttyUSB3");
    env::set_var("SERLOG_BAUD", "115200");

    let config = apply_env_overrides(ResolvedConfig::default()).unwrap();
    assert_eq!(config.port.as_deref(), Some("/dev/ttyUSB3"));
    assert_eq!(config.baud_rate, 115200);

    env::remove_var("SERLOG_PORT");
    env::remove_var("SERLOG_BAUD");
}

#[test]
#[serial(config_env)]
fn env_override_rejects_bad_baud() {
    env::set_var("SERLOG_BAUD", "fast");

    let result = apply_env_overrides(ResolvedConfig::default());
    assert_eq!(
        result,
        Err(ConfigError::InvalidEnv {
            var: "SERLOG_BAUD",
            value: "fast".to_string(),
        })
    );

    env::remove_var("SERLOG_BAUD");
}

#[test]
#[serial(config_env)]
fn env_overrides_absent_leave_config_unchanged() {
    env::remove_var("SERLOG_PORT");
    env::remove_var("SERLOG_BAUD");

    let base = ResolvedConfig::default();
    assert_eq!(apply_env_overrides(base.clone()).unwrap(), base);
}

#[test]
fn cli_overrides_win() {
    let base = ResolvedConfig {
        port: Some("/dev/from-file".to_string()),
        ..ResolvedConfig::default()
    };

    let config = apply_cli_overrides(
        base,
        CliOverrides {
            port: Some("/dev/from-cli".to_string()),
            baud_rate: Some(4800),
            no_timestamps: true,
            export_dir: Some(PathBuf::from("/tmp/out")),
        },
    );

    assert_eq!(config.port.as_deref(), Some("/dev/from-cli"));
    assert_eq!(config.baud_rate, 4800);
    assert!(!config.timestamps);
    assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
}

#[test]
fn cli_overrides_empty_leave_config_unchanged() {
    let base = ResolvedConfig::default();
    assert_eq!(apply_cli_overrides(base.clone(), CliOverrides::default()), base);
}
