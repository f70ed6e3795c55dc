use crate::dns::transport::{NetworkConnector, TlsClientConfig};
use ferrous_resolv_application::ports::AddressCachePort;
use ferrous_resolv_application::services::ReachabilityMemo;
use ferrous_resolv_application::Resolver;
use ferrous_resolv_domain::{ConfigError, ResolverConfig};
use std::sync::Arc;
use tracing::info;

/// Wires a [`Resolver`] to the network connector.
///
/// DoT resolvers get the fixed TLS profile (pinned when the configuration
/// carries a pin) unless a TLS configuration is supplied. A supplied
/// configuration must carry a pin verifier whenever a pin is set.
pub struct ResolverBuilder {
    config: ResolverConfig,
    tls: Option<TlsClientConfig>,
    memo: Option<Arc<ReachabilityMemo>>,
    address_cache: Option<Arc<dyn AddressCachePort>>,
}

impl ResolverBuilder {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            tls: None,
            memo: None,
            address_cache: None,
        }
    }

    pub fn with_tls_config(mut self, tls: TlsClientConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    pub fn with_memo(mut self, memo: Arc<ReachabilityMemo>) -> Self {
        self.memo = Some(memo);
        self
    }

    pub fn with_address_cache(mut self, cache: Arc<dyn AddressCachePort>) -> Self {
        self.address_cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<Resolver, ConfigError> {
        self.config.validate()?;

        let tls = if self.config.dot {
            Some(self.tls_config()?)
        } else {
            None
        };

        info!(
            resolver = %self.config.display_name(),
            server = %self.config.server,
            dot = self.config.dot,
            pinned = self.config.tls_key_pin.is_some(),
            cache = self.address_cache.is_some(),
            "Building resolver"
        );

        let connector = Arc::new(NetworkConnector::from_config(&self.config, tls)?);
        let memo = self.memo.unwrap_or_default();
        let resolver = Resolver::new(self.config, connector, memo)?;

        Ok(match self.address_cache {
            Some(cache) => resolver.with_address_cache(cache),
            None => resolver,
        })
    }

    fn tls_config(&self) -> Result<TlsClientConfig, ConfigError> {
        let resolver = self.config.display_name();
        match (&self.tls, self.config.tls_key_pin.as_deref()) {
            (Some(tls), Some(_)) if !tls.has_pin_verifier() => {
                Err(ConfigError::MissingPinVerifier {
                    resolver: resolver.to_string(),
                })
            }
            (Some(tls), _) => Ok(tls.clone()),
            (None, Some(pin)) => TlsClientConfig::pinned(resolver, pin),
            (None, None) => TlsClientConfig::unpinned(),
        }
    }
}
