use ferrous_resolv_domain::RecordType;
use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Cache key for a (name, type) pair. Names are compared case-insensitively
/// and with or without the trailing dot.
pub fn query_fingerprint(name: &str, record_type: RecordType) -> u64 {
    let mut hasher = FxHasher::default();
    let trimmed = name.trim_end_matches('.');
    for byte in trimmed.bytes() {
        hasher.write_u8(byte.to_ascii_lowercase());
    }
    hasher.write_u8(b'.');
    hasher.write_u16(record_type.to_u16());
    hasher.finish()
}
