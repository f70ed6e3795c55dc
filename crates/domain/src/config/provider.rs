use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A well-known public resolver and the SPKI pin of its DoT certificate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Provider {
    pub name: String,
    pub ip: IpAddr,
    pub pin: String,
}

impl Provider {
    pub fn new(name: &str, ip: IpAddr, pin: &str) -> Self {
        Self {
            name: name.to_string(),
            ip,
            pin: pin.to_string(),
        }
    }

    /// Looks a provider up by name, case-insensitively.
    pub fn find<'a>(providers: &'a [Provider], name: &str) -> Option<&'a Provider> {
        providers.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

const GOOGLE_PIN: &str = "TXV9bLOi7Bt/vB9N8l1yGWokU85gKfaiLtYaV+zWkQM=";
const CLOUDFLARE_PIN: &str = "MnLdGiqUGYhtyinlrGTC4FZdDyDXv4NOWFGnXW3ur14=";
const QUAD9_PIN: &str = "/SlsviBkb05Y/8XiKF9+CZsgCtrqPQk5bh47o0R3/Cg=";

/// Built-in provider table, sorted by name.
pub fn default_providers() -> Vec<Provider> {
    use std::net::Ipv4Addr;

    let mut providers = vec![
        Provider::new("google", IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), GOOGLE_PIN),
        Provider::new("google2", IpAddr::V4(Ipv4Addr::new(8, 8, 4, 4)), GOOGLE_PIN),
        Provider::new("cloudflare", IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)), CLOUDFLARE_PIN),
        Provider::new("cloudflare2", IpAddr::V4(Ipv4Addr::new(1, 0, 0, 1)), CLOUDFLARE_PIN),
        Provider::new("quad9", IpAddr::V4(Ipv4Addr::new(9, 9, 9, 9)), QUAD9_PIN),
        Provider::new("quad92", IpAddr::V4(Ipv4Addr::new(9, 9, 9, 10)), QUAD9_PIN),
    ];
    providers.sort_by(|a, b| a.name.cmp(&b.name));
    providers
}
