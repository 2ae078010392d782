use std::collections::HashMap;

mod test_utils;

use pretty_assertions::assert_eq;
use teamsync_api::{build_router, config::ApiConfig};
use teamsync_core::models::community::ConfigDocument;
use test_utils::TestContext;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_defaults() {
    let config = ApiConfig::from_lookup(lookup(&[])).unwrap();

    assert_eq!(config, ApiConfig::default());
    assert_eq!(config.server_addr(), "0.0.0.0:3000");
}

#[test]
fn test_values_from_environment() {
    let config = ApiConfig::from_lookup(lookup(&[
        ("API_HOST", "127.0.0.1"),
        ("API_PORT", "8080"),
        ("API_CORS_ORIGINS", "http://a.test, ,http://b.test"),
        ("API_REQUEST_TIMEOUT_SECONDS", "5"),
    ]))
    .unwrap();

    assert_eq!(config.server_addr(), "127.0.0.1:8080");
    assert_eq!(
        config.cors_origins,
        Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
    );
    assert_eq!(config.request_timeout, 5);
}

#[test]
fn test_invalid_port_is_an_error() {
    assert!(ApiConfig::from_lookup(lookup(&[("API_PORT", "eighty")])).is_err());
}

#[test]
fn test_invalid_cors_origin_fails_router_build() {
    let config = ApiConfig {
        cors_origins: Some(vec!["bad\norigin".to_string()]),
        ..ApiConfig::default()
    };
    let ctx = TestContext::new(ConfigDocument::default());

    assert!(build_router(ctx.state.clone(), &config).is_err());
}
