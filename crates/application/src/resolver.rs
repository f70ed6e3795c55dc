//! Resolver facade.
//!
//! A [`Resolver`] binds one validated [`ResolverConfig`] to a connector and
//! exposes the lookup operations. [`Resolver::unconfigured`] stands in when
//! discovery finds nothing; every operation on it fails with
//! [`DomainError::NoResolver`].

use crate::ports::{AddressCachePort, DnsConnector};
use crate::services::{query_fingerprint, ReachabilityMemo};
use crate::use_cases::lookup::collect_addresses;
use crate::use_cases::{
    CheckReachabilityUseCase, ExchangeUseCase, LookupUseCase, QueryExecutor,
    ReverseLookupUseCase,
};
use ferrous_resolv_domain::{Answer, ConfigError, DomainError, RecordType, ResolverConfig};
use futures::future::join_all;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

struct Engine {
    config: Arc<ResolverConfig>,
    lookup: LookupUseCase,
    reverse: ReverseLookupUseCase,
    exchange: ExchangeUseCase,
    reachability: CheckReachabilityUseCase,
}

pub struct Resolver {
    engine: Option<Engine>,
    address_cache: Option<Arc<dyn AddressCachePort>>,
}

impl Resolver {
    /// Validates `config` and wires the use cases. Conflicting transport or
    /// family flags are rejected here, before any network activity.
    pub fn new(
        config: ResolverConfig,
        connector: Arc<dyn DnsConnector>,
        memo: Arc<ReachabilityMemo>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let transport = config.transport()?;
        let executor = Arc::new(QueryExecutor::new(
            connector,
            transport,
            config.tcp_disabled(),
        ));

        debug!(
            resolver = %config.display_name(),
            server = %config.server,
            transport = %transport,
            "Resolver configured"
        );

        Ok(Self {
            engine: Some(Engine {
                config: Arc::new(config),
                lookup: LookupUseCase::new(Arc::clone(&executor)),
                reverse: ReverseLookupUseCase::new(Arc::clone(&executor)),
                exchange: ExchangeUseCase::new(Arc::clone(&executor)),
                reachability: CheckReachabilityUseCase::new(executor, memo),
            }),
            address_cache: None,
        })
    }

    /// A resolver with no server; all operations fail with `NoResolver`.
    pub fn unconfigured() -> Self {
        Self {
            engine: None,
            address_cache: None,
        }
    }

    pub fn with_address_cache(mut self, cache: Arc<dyn AddressCachePort>) -> Self {
        self.address_cache = Some(cache);
        self
    }

    pub fn is_configured(&self) -> bool {
        self.engine.is_some()
    }

    pub fn config(&self) -> Option<&ResolverConfig> {
        self.engine.as_ref().map(|e| e.config.as_ref())
    }

    fn engine(&self) -> Result<&Engine, DomainError> {
        self.engine.as_ref().ok_or(DomainError::NoResolver)
    }

    pub async fn lookup(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<String>, DomainError> {
        self.engine()?.lookup.lines(name, record_type).await
    }

    pub async fn lookup_addr(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<IpAddr>, DomainError> {
        let engine = self.engine()?;

        let Some(cache) = &self.address_cache else {
            return engine.lookup.addresses(name, record_type).await;
        };

        if !record_type.is_address() {
            return Err(DomainError::UnsupportedRecordType(record_type));
        }

        let key = query_fingerprint(name, record_type);
        if let Some(addresses) = cache.get(key) {
            debug!(domain = %name, record_type = %record_type, "Address cache hit");
            return Ok(addresses.to_vec());
        }

        let addresses = engine.lookup.addresses(name, record_type).await?;
        cache.add(key, Arc::from(addresses.as_slice()));
        Ok(addresses)
    }

    /// Fails only when every requested type failed.
    pub async fn lookup_addrs(
        &self,
        name: &str,
        record_types: &[RecordType],
    ) -> Result<Vec<IpAddr>, DomainError> {
        let engine = self.engine()?;
        if self.address_cache.is_none() {
            return engine.lookup.addresses_multi(name, record_types).await;
        }

        let results = join_all(
            record_types
                .iter()
                .map(|&record_type| self.lookup_addr(name, record_type)),
        )
        .await;
        collect_addresses(results)
    }

    pub async fn reverse_lookup_ipv4(&self, ip: &str) -> Result<String, DomainError> {
        // Input validation happens before the resolver check so malformed
        // addresses are reported even without a server.
        let addr: IpAddr = ip
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidIpAddress(ip.to_string()))?;
        self.reverse_lookup_ipv4_addr(addr).await
    }

    pub async fn reverse_lookup_ipv4_addr(&self, ip: IpAddr) -> Result<String, DomainError> {
        self.engine()?.reverse.execute(ip).await
    }

    pub async fn exchange(
        &self,
        name: &str,
        raw: bool,
        summary: bool,
        record_types: &[RecordType],
    ) -> Result<Answer, DomainError> {
        self.engine()?
            .exchange
            .execute(name, raw, summary, record_types)
            .await
    }

    pub async fn is_functional(&self) -> Result<(), DomainError> {
        self.engine()?.reachability.execute().await
    }

    pub async fn is_reachable(&self) -> bool {
        self.is_functional().await.is_ok()
    }

    /// Warms the address cache for A and AAAA. Errors are ignored.
    pub async fn cache_all(&self, name: &str) {
        if self.address_cache.is_none() {
            return;
        }
        for record_type in [RecordType::A, RecordType::AAAA] {
            if let Err(e) = self.lookup_addr(name, record_type).await {
                debug!(domain = %name, record_type = %record_type, error = %e, "Cache warm-up skipped");
            }
        }
    }

    /// Drops cached A and AAAA entries for `name`.
    pub fn forget(&self, name: &str) {
        if let Some(cache) = &self.address_cache {
            for record_type in [RecordType::A, RecordType::AAAA] {
                cache.del(query_fingerprint(name, record_type));
            }
        }
    }
}
