use super::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.openai.model, "gpt-4o-mini");
    assert_eq!(config.openai.api_key_env, "API_KEY");
    assert_eq!(config.openai.vector_store_name, "assvectorstore");
    assert_eq!(config.poll.interval_ms, 100);
    assert_eq!(config.poll.timeout_secs, 300);
    assert_eq!(config.channel.session_scope, SessionScope::Shared);
    assert!(!config.channel.report_parse_errors);
}

#[test]
fn test_session_scope_deserialization() {
    let config: Config = toml::from_str(
        r#"
        [channel]
        session_scope = "per_connection"
        "#,
    )
    .unwrap();
    assert_eq!(config.channel.session_scope, SessionScope::PerConnection);
}

#[test]
fn test_session_scope_rejects_unknown() {
    let result: Result<Config, _> = toml::from_str(
        r#"
        [channel]
        session_scope = "global"
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn test_partial_openai_section_keeps_defaults() {
    let config: Config = toml::from_str(
        r#"
        [openai]
        model = "gpt-4o"
        "#,
    )
    .unwrap();
    assert_eq!(config.openai.model, "gpt-4o");
    assert_eq!(config.openai.base_url, "https://api.openai.com/v1");
    assert_eq!(config.openai.request_timeout_secs, 60);
    assert!(config.openai.api_key.is_none());
}

#[test]
fn test_resolve_api_key_prefers_explicit() {
    let config = OpenAIConfig {
        api_key: Some("sk-explicit".to_string()),
        api_key_env: "RELAY_TEST_UNSET_KEY_VAR".to_string(),
        ..Default::default()
    };
    assert_eq!(config.resolve_api_key().as_deref(), Some("sk-explicit"));
}

#[test]
fn test_resolve_api_key_from_env() {
    // SAFETY: This test sets a unique test-only env var
    unsafe {
        std::env::set_var("RELAY_TEST_API_KEY_VAR", "sk-from-env");
    }
    let config = OpenAIConfig {
        api_key: Some(String::new()),
        api_key_env: "RELAY_TEST_API_KEY_VAR".to_string(),
        ..Default::default()
    };
    assert_eq!(config.resolve_api_key().as_deref(), Some("sk-from-env"));
    unsafe {
        std::env::remove_var("RELAY_TEST_API_KEY_VAR");
    }
}

#[test]
fn test_resolve_api_key_missing() {
    let config = OpenAIConfig {
        api_key_env: "RELAY_TEST_DEFINITELY_UNSET_12345".to_string(),
        ..Default::default()
    };
    assert!(config.resolve_api_key().is_none());
}
