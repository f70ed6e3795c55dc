//! Picks a working resolver when none is configured.
//!
//! Candidates, in order: the system resolver from resolv.conf, the loopback
//! resolver, every provider over DoT, every provider over plain DNS. The
//! first reachable one wins; with none reachable the result is
//! [`Resolver::unconfigured`].

use crate::dns::resolver::ResolverBuilder;
use ferrous_resolv_application::services::ReachabilityMemo;
use ferrous_resolv_application::Resolver;
use ferrous_resolv_domain::{Config, ResolverConfig};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub async fn discover(config: &Config, memo: Arc<ReachabilityMemo>) -> Resolver {
    match first_reachable(candidates(config), memo).await {
        Some(resolver) => resolver,
        None => {
            warn!("No reachable resolver found");
            Resolver::unconfigured()
        }
    }
}

/// Candidate configurations in discovery order.
pub fn candidates(config: &Config) -> Vec<ResolverConfig> {
    let mut out = Vec::with_capacity(2 + config.providers.len() * 2);

    let resolv_conf = Path::new(&config.discovery.resolv_conf);
    if resolv_conf.exists() {
        match ResolverConfig::from_resolv_conf(resolv_conf) {
            Ok(system) => out.push(system),
            Err(e) => warn!(path = %resolv_conf.display(), error = %e, "Ignoring resolv.conf"),
        }
    }

    out.push(ResolverConfig::localhost());
    out.extend(
        config
            .providers
            .iter()
            .map(|p| ResolverConfig::from_provider(p, true)),
    );
    out.extend(
        config
            .providers
            .iter()
            .map(|p| ResolverConfig::from_provider(p, false)),
    );
    out
}

/// Probes candidates one at a time and returns the first reachable one.
pub async fn first_reachable(
    candidates: Vec<ResolverConfig>,
    memo: Arc<ReachabilityMemo>,
) -> Option<Resolver> {
    for candidate in candidates {
        let name = candidate.display_name().to_string();
        let resolver = match ResolverBuilder::new(candidate)
            .with_memo(Arc::clone(&memo))
            .build()
        {
            Ok(resolver) => resolver,
            Err(e) => {
                warn!(resolver = %name, error = %e, "Skipping invalid resolver");
                continue;
            }
        };

        if resolver.is_reachable().await {
            info!(resolver = %name, "Using resolver");
            return Some(resolver);
        }
        debug!(resolver = %name, "Resolver unreachable");
    }
    None
}
