use ferrous_resolv_application::services::ReachabilityMemo;
use ferrous_resolv_application::Resolver;
use ferrous_resolv_domain::Config;
use ferrous_resolv_infrastructure::{discover, AddressCache, ResolverBuilder};
use std::sync::Arc;
use tracing::info;

/// The configured resolver, or the first reachable one found by discovery.
pub async fn build_resolver(config: &Config) -> anyhow::Result<Resolver> {
    let memo = Arc::new(ReachabilityMemo::new());
    let cache = Arc::new(AddressCache::new());

    let resolver = match &config.resolver {
        Some(resolver_config) => {
            info!(server = %resolver_config.server, "Using configured resolver");
            ResolverBuilder::new(resolver_config.clone())
                .with_memo(memo)
                .build()?
        }
        None => {
            info!("No resolver configured, running discovery");
            discover(config, memo).await
        }
    };

    Ok(resolver.with_address_cache(cache))
}
