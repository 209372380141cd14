use std::env;
use std::time::Duration;

use gatehouse::config::ServerConfig;
use gatehouse::error::GatehouseError;

const GOOD_SECRET: &str = "k3Jq9vX2mR8tL5wZ1nB7cF4hD6gY0pA-e2s";

const VARS: &[&str] = &[
    "GATEHOUSE_HOST",
    "GATEHOUSE_PORT",
    "GATEHOUSE_JWT_SECRET",
    "JWT_SECRET",
    "GATEHOUSE_TOKEN_TTL_HOURS",
    "GATEHOUSE_ARGON2_MEMORY_KIB",
    "GATEHOUSE_ARGON2_ITERATIONS",
    "GATEHOUSE_LOGIN_MIN_DURATION_MS",
    "GATEHOUSE_MAX_BODY_BYTES",
    "GATEHOUSE_ALLOWED_ORIGINS",
    "GATEHOUSE_ADMIN_EMAIL",
    "GATEHOUSE_ADMIN_PASSWORD",
];

fn clear() {
    for var in VARS {
        env::remove_var(var);
    }
}

fn assert_config_error(expected: &str) {
    match ServerConfig::from_env() {
        Err(GatehouseError::ConfigError(msg)) => {
            assert!(msg.contains(expected), "unexpected message: {}", msg)
        }
        other => panic!("expected config error containing '{}', got {:?}", expected, other),
    }
}

// Environment variables are process-wide, so every case runs in one test
#[test]
fn test_config_from_env() {
    clear();

    // Secret is mandatory
    assert_config_error("JWT_SECRET");

    // Weak secrets
    env::set_var("JWT_SECRET", "short1");
    assert_config_error("at least 32 characters");
    env::set_var("JWT_SECRET", "my-super-secret-value-for-the-service-1");
    assert_config_error("insecure pattern");
    env::set_var("JWT_SECRET", "abcdefghijklmnopqrstuvwxyzabcdefghij");
    assert_config_error("mixed characters");

    // Defaults
    env::set_var("JWT_SECRET", GOOD_SECRET);
    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 5000);
    assert_eq!(config.token_ttl_hours, 24);
    assert_eq!(config.token_lifetime(), chrono::Duration::hours(24));
    assert_eq!(config.login_min_duration, Duration::from_millis(100));
    assert!(config.allowed_origins.is_empty());
    assert!(config.admin.is_none());

    // Overrides, with the prefixed secret taking precedence
    env::set_var("GATEHOUSE_JWT_SECRET", "Zx8-another-strong-key-9Qw7Er6Ty5Ui4");
    env::set_var("GATEHOUSE_HOST", "0.0.0.0");
    env::set_var("GATEHOUSE_PORT", "8081");
    env::set_var("GATEHOUSE_TOKEN_TTL_HOURS", "2");
    env::set_var("GATEHOUSE_MAX_BODY_BYTES", "1024");
    env::set_var(
        "GATEHOUSE_ALLOWED_ORIGINS",
        "https://a.example.com, ,https://b.example.com",
    );
    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.jwt_secret, "Zx8-another-strong-key-9Qw7Er6Ty5Ui4");
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 8081);
    assert_eq!(config.token_ttl_hours, 2);
    assert_eq!(config.max_body_bytes, 1024);
    assert_eq!(
        config.allowed_origins,
        vec!["https://a.example.com", "https://b.example.com"]
    );

    // Token lifetime bounds
    env::set_var("GATEHOUSE_TOKEN_TTL_HOURS", "0");
    assert_config_error("GATEHOUSE_TOKEN_TTL_HOURS");
    env::set_var("GATEHOUSE_TOKEN_TTL_HOURS", "721");
    assert_config_error("GATEHOUSE_TOKEN_TTL_HOURS");

    // Unparseable numbers are reported, blank ones fall back to the default
    env::set_var("GATEHOUSE_TOKEN_TTL_HOURS", "abc");
    assert_config_error("GATEHOUSE_TOKEN_TTL_HOURS has an invalid value");
    env::set_var("GATEHOUSE_TOKEN_TTL_HOURS", "  ");
    assert_eq!(ServerConfig::from_env().unwrap().token_ttl_hours, 24);
    env::remove_var("GATEHOUSE_TOKEN_TTL_HOURS");
    env::set_var("GATEHOUSE_PORT", "http");
    assert_config_error("GATEHOUSE_PORT has an invalid value");
    env::set_var("GATEHOUSE_PORT", "8081");

    // Admin bootstrap needs both halves
    env::set_var("GATEHOUSE_ADMIN_EMAIL", "root@example.com");
    assert_config_error("must be set together");
    env::set_var("GATEHOUSE_ADMIN_PASSWORD", "Adm1n-pass");
    let admin = ServerConfig::from_env().unwrap().admin.unwrap();
    assert_eq!(admin.email, "root@example.com");
    assert_eq!(admin.password, "Adm1n-pass");

    clear();
}
