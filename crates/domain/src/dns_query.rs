use super::RecordType;
use std::net::Ipv4Addr;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
}

impl DnsQuery {
    pub fn new(domain: impl Into<Arc<str>>, record_type: RecordType) -> Self {
        Self {
            domain: domain.into(),
            record_type,
        }
    }

    /// PTR query for `d.c.b.a.in-addr.arpa`.
    pub fn reverse_ipv4(ip: Ipv4Addr) -> Self {
        let [a, b, c, d] = ip.octets();
        Self::new(
            format!("{}.{}.{}.{}.in-addr.arpa", d, c, b, a),
            RecordType::PTR,
        )
    }

    /// Lower-cased, dot-terminated form of the queried name.
    pub fn fqdn(&self) -> String {
        let mut name = self.domain.to_ascii_lowercase();
        if !name.ends_with('.') {
            name.push('.');
        }
        name
    }
}
