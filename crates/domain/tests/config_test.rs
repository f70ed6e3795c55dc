use ferrous_resolv_domain::{
    CliOverrides, Config, ConfigError, LogFormat, Provider, ResolverConfig,
};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert!(config.resolver.is_none());
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Text);
    assert_eq!(config.discovery.resolv_conf, "/etc/resolv.conf");
    assert_eq!(config.providers.len(), 6);
}

#[test]
fn test_default_providers_are_sorted() {
    let config = Config::default();
    let names: Vec<&str> = config.providers.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["cloudflare", "cloudflare2", "google", "google2", "quad9", "quad92"]
    );
}

#[test]
fn test_provider_lookup_is_case_insensitive() {
    let providers = ferrous_resolv_domain::config::default_providers();
    let quad9 = Provider::find(&providers, "Quad9").unwrap();
    assert_eq!(quad9.ip.to_string(), "9.9.9.9");
    assert_eq!(quad9.pin, "/SlsviBkb05Y/8XiKF9+CZsgCtrqPQk5bh47o0R3/Cg=");
}

#[test]
fn test_from_provider_dot() {
    let providers = ferrous_resolv_domain::config::default_providers();
    let google = Provider::find(&providers, "google").unwrap();

    let dot = ResolverConfig::from_provider(google, true);
    assert_eq!(dot.server, "8.8.8.8:853");
    assert!(dot.dot);
    assert_eq!(dot.tls_key_pin.as_deref(), Some(google.pin.as_str()));

    let plain = ResolverConfig::from_provider(google, false);
    assert_eq!(plain.server, "8.8.8.8:53");
    assert!(!plain.dot);
    assert!(plain.tls_key_pin.is_none());
}

#[test]
fn test_localhost_resolver() {
    let config = ResolverConfig::localhost();
    assert_eq!(config.name, "localhost");
    assert_eq!(config.server, "127.0.0.1:53");
    assert_eq!(config.timeout().as_secs(), 8);
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[logging]
level = "debug"
format = "json"

[resolver]
name = "office"
server = "10.0.0.53:53"
no_ip6 = true
timeout_ms = 2000
"#
    )
    .unwrap();

    let config = Config::load(file.path().to_str(), CliOverrides::default()).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
    let resolver = config.resolver.unwrap();
    assert_eq!(resolver.name, "office");
    assert!(resolver.no_ip6);
    assert_eq!(resolver.timeout().as_millis(), 2000);
    assert_eq!(resolver.transport().unwrap().to_string(), "udp4");
}

#[test]
fn test_load_rejects_conflicting_flags() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[resolver]
server = "10.0.0.53:53"
no_udp = true
no_tcp = true
"#
    )
    .unwrap();

    let result = Config::load(file.path().to_str(), CliOverrides::default());
    assert!(matches!(result, Err(ConfigError::TransportsDisabled { .. })));
}

#[test]
fn test_load_missing_file() {
    let result = Config::load(Some("/nonexistent/ferrous-resolv.toml"), CliOverrides::default());
    assert!(matches!(result, Err(ConfigError::FileRead(..))));
}

#[test]
fn test_cli_provider_override() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[logging]\nlevel = \"warn\"").unwrap();

    let overrides = CliOverrides {
        provider: Some("cloudflare".to_string()),
        dot: true,
        log_level: Some("trace".to_string()),
        ..Default::default()
    };
    let config = Config::load(file.path().to_str(), overrides).unwrap();
    assert_eq!(config.logging.level, "trace");
    let resolver = config.resolver.unwrap();
    assert_eq!(resolver.server, "1.1.1.1:853");
    assert!(resolver.dot);
}

#[test]
fn test_cli_unknown_provider() {
    let file = NamedTempFile::new().unwrap();
    let overrides = CliOverrides {
        provider: Some("nope".to_string()),
        ..Default::default()
    };
    let result = Config::load(file.path().to_str(), overrides);
    assert!(matches!(result, Err(ConfigError::UnknownProvider(_))));
}

#[test]
fn test_cli_server_override_with_flags() {
    let file = NamedTempFile::new().unwrap();
    let overrides = CliOverrides {
        server: Some("192.0.2.1:5353".to_string()),
        no_udp: true,
        timeout_secs: Some(3),
        ..Default::default()
    };
    let config = Config::load(file.path().to_str(), overrides).unwrap();
    let resolver = config.resolver.unwrap();
    assert_eq!(resolver.transport().unwrap().to_string(), "tcp");
    assert_eq!(resolver.timeout().as_secs(), 3);
}

#[test]
fn test_resolv_conf_first_nameserver() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "# generated\nsearch example.internal\nnameserver 10.1.2.3\nnameserver 10.1.2.4"
    )
    .unwrap();

    let config = ResolverConfig::from_resolv_conf(file.path()).unwrap();
    assert_eq!(config.server, "10.1.2.3:53");
    assert_eq!(config.name, file.path().display().to_string());
}

#[test]
fn test_resolv_conf_ipv6_nameserver() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "nameserver fe80::1%eth0").unwrap();

    let config = ResolverConfig::from_resolv_conf(file.path()).unwrap();
    assert_eq!(config.server, "[fe80::1]:53");
}

#[test]
fn test_resolv_conf_without_nameserver() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "search example.internal").unwrap();

    assert!(matches!(
        ResolverConfig::from_resolv_conf(file.path()),
        Err(ConfigError::Validation(_))
    ));
}
