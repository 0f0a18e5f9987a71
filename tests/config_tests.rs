//! Config Tests
//!
//! Loading configuration files and building clients from them.

use std::io::Write;
use std::time::Duration;

use jigctl::config::Config;
use jigctl::{Client, JigError};
use tempfile::NamedTempFile;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_config(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// =============================================================================
// File Loading Tests
// =============================================================================

#[test]
fn test_load_full_config() {
    let file = write_config(
        r#"
listen_addr = "127.0.0.1:9999"
server_addr = "127.0.0.1:9999"
recv_timeout_ms = 250
recv_buffer_size = 2048
history_file = "/tmp/jig_history"
history_len = 50
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.listen_addr, "127.0.0.1:9999");
    assert_eq!(config.recv_timeout(), Duration::from_millis(250));
    assert_eq!(config.recv_buffer_size, 2048);
    assert_eq!(config.history_len, 50);
    assert_eq!(
        config.history_file.as_deref(),
        Some(std::path::Path::new("/tmp/jig_history"))
    );
}

#[test]
fn test_empty_file_is_default() {
    let file = write_config("");
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, JigError::Io(_)));
}

#[test]
fn test_invalid_file_names_path() {
    let file = write_config("recv_timeout_ms = [1, 2]");
    let err = Config::from_file(file.path()).unwrap_err();
    match err {
        JigError::Config(msg) => assert!(msg.contains(&file.path().display().to_string())),
        other => panic!("Expected config error, got {:?}", other),
    }
}

#[test]
fn test_builder_overrides_loaded_values() {
    let file = write_config("recv_timeout_ms = 250\n");
    let loaded = Config::from_file(file.path()).unwrap();
    let config = jigctl::config::ConfigBuilder::from_config(loaded)
        .server_addr("127.0.0.1:7000")
        .build();
    assert_eq!(config.server_addr, "127.0.0.1:7000");
    assert_eq!(config.recv_timeout_ms, 250);
}

// =============================================================================
// Client From Config Tests
// =============================================================================

#[test]
fn test_client_uses_configured_timeout() {
    let config = Config::builder()
        .server_addr("127.0.0.1:8888")
        .recv_timeout_ms(300)
        .build();
    let client = Client::from_config(&config).unwrap();
    assert_eq!(client.timeout(), Duration::from_millis(300));
    assert_eq!(client.server_addr().port(), 8888);
}
