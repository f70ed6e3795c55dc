mod helpers;

use ferrous_resolv_application::services::ReachabilityMemo;
use ferrous_resolv_application::Resolver;
use ferrous_resolv_domain::{ConfigError, DomainError, RecordType, ResolverConfig};
use helpers::{record, MockAddressCache, MockConnector, TEST_SERVER};
use std::sync::Arc;

fn memo() -> Arc<ReachabilityMemo> {
    Arc::new(ReachabilityMemo::new())
}

#[tokio::test]
async fn test_unconfigured_resolver_fails_every_operation() {
    let resolver = Resolver::unconfigured();

    assert!(!resolver.is_configured());
    assert!(matches!(
        resolver.lookup("example.com", RecordType::A).await,
        Err(DomainError::NoResolver)
    ));
    assert!(matches!(
        resolver.lookup_addr("example.com", RecordType::A).await,
        Err(DomainError::NoResolver)
    ));
    assert!(matches!(
        resolver.lookup_addrs("example.com", &[RecordType::A]).await,
        Err(DomainError::NoResolver)
    ));
    assert!(matches!(
        resolver.reverse_lookup_ipv4("8.8.8.8").await,
        Err(DomainError::NoResolver)
    ));
    assert!(matches!(
        resolver.exchange("example.com", true, true, &[RecordType::A]).await,
        Err(DomainError::NoResolver)
    ));
    assert!(!resolver.is_reachable().await);
}

#[test]
fn test_both_families_disabled_rejected_at_construction() {
    let connector = MockConnector::new();
    let config = ResolverConfig::new("test", TEST_SERVER)
        .with_no_ip4(true)
        .with_no_ip6(true);

    let result = Resolver::new(config, Arc::new(connector.clone()), memo());

    assert!(matches!(result, Err(ConfigError::IpFamiliesDisabled { .. })));
    assert!(connector.connects().is_empty());
}

#[test]
fn test_plain_transports_disabled_rejected_at_construction() {
    let connector = MockConnector::new();
    let config = ResolverConfig::new("test", TEST_SERVER)
        .with_no_udp(true)
        .with_no_tcp(true);

    let result = Resolver::new(config, Arc::new(connector.clone()), memo());

    assert!(matches!(result, Err(ConfigError::TransportsDisabled { .. })));
    assert!(connector.connects().is_empty());
}

#[tokio::test]
async fn test_dot_resolver_uses_tls() {
    let connector = MockConnector::with_server("9.9.9.9:853");
    let config = ResolverConfig::new("quad9", "9.9.9.9:853").with_dot(Some("pin".to_string()));
    let resolver = Resolver::new(config, Arc::new(connector.clone()), memo()).unwrap();

    let _ = resolver.lookup("example.com", RecordType::A).await;

    assert_eq!(connector.connects()[0].to_string(), "tcp-tls");
}

#[tokio::test]
async fn test_address_cache_serves_repeated_lookups() {
    let connector = MockConnector::new();
    connector.set_answers(
        "example.com",
        RecordType::A,
        vec![record("example.com", RecordType::A, "192.0.2.7")],
    );
    let cache = Arc::new(MockAddressCache::new());
    let resolver = Resolver::new(
        ResolverConfig::new("test", TEST_SERVER),
        Arc::new(connector.clone()),
        memo(),
    )
    .unwrap()
    .with_address_cache(cache.clone());

    let first = resolver.lookup_addr("example.com", RecordType::A).await.unwrap();
    let second = resolver.lookup_addr("EXAMPLE.com.", RecordType::A).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(connector.queries().len(), 1);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_forget_drops_cached_addresses() {
    let connector = MockConnector::new();
    connector.set_answers(
        "example.com",
        RecordType::A,
        vec![record("example.com", RecordType::A, "192.0.2.7")],
    );
    let cache = Arc::new(MockAddressCache::new());
    let resolver = Resolver::new(
        ResolverConfig::new("test", TEST_SERVER),
        Arc::new(connector.clone()),
        memo(),
    )
    .unwrap()
    .with_address_cache(cache.clone());

    resolver.lookup_addr("example.com", RecordType::A).await.unwrap();
    resolver.forget("example.com");
    assert_eq!(cache.len(), 0);

    resolver.lookup_addr("example.com", RecordType::A).await.unwrap();
    assert_eq!(connector.queries().len(), 2);
}

#[tokio::test]
async fn test_cache_all_warms_both_families_and_ignores_errors() {
    let connector = MockConnector::new();
    connector.set_answers(
        "example.com",
        RecordType::A,
        vec![record("example.com", RecordType::A, "192.0.2.7")],
    );
    // AAAA gets an empty answer, which is a no-answer error
    let cache = Arc::new(MockAddressCache::new());
    let resolver = Resolver::new(
        ResolverConfig::new("test", TEST_SERVER),
        Arc::new(connector.clone()),
        memo(),
    )
    .unwrap()
    .with_address_cache(cache.clone());

    resolver.cache_all("example.com").await;

    assert_eq!(cache.len(), 1);
    assert_eq!(
        connector.queried_types(),
        vec![RecordType::A, RecordType::AAAA]
    );

    let addrs = resolver
        .lookup_addrs("example.com", &[RecordType::A, RecordType::AAAA])
        .await
        .unwrap();
    assert_eq!(addrs.len(), 1);
}

#[tokio::test]
async fn test_exchange_through_facade() {
    let connector = MockConnector::new();
    connector.set_answers(
        "example.com",
        RecordType::TXT,
        vec![record("example.com", RecordType::TXT, "\"v=spf1 -all\"")],
    );
    let resolver = Resolver::new(
        ResolverConfig::new("test", TEST_SERVER),
        Arc::new(connector),
        memo(),
    )
    .unwrap();

    let answer = resolver
        .exchange("example.com", false, true, &[RecordType::TXT, RecordType::ANY])
        .await
        .unwrap();

    assert_eq!(answer.summary.len(), 1);
    assert!(answer.summary[&RecordType::TXT].contains("v=spf1"));
}
