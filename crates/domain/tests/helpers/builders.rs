#![allow(dead_code)]
use ferrous_resolv_domain::ResolverConfig;

pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ResolverConfig::new("test", "192.0.2.53:53"),
        }
    }

    pub fn server(mut self, server: &str) -> Self {
        self.config.server = server.to_string();
        self
    }

    pub fn no_ip4(mut self) -> Self {
        self.config.no_ip4 = true;
        self
    }

    pub fn no_ip6(mut self) -> Self {
        self.config.no_ip6 = true;
        self
    }

    pub fn no_udp(mut self) -> Self {
        self.config.no_udp = true;
        self
    }

    pub fn no_tcp(mut self) -> Self {
        self.config.no_tcp = true;
        self
    }

    pub fn dot(mut self, pin: Option<&str>) -> Self {
        self.config.dot = true;
        self.config.tls_key_pin = pin.map(str::to_string);
        self
    }

    pub fn build(self) -> ResolverConfig {
        self.config
    }
}

impl Default for ResolverConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
