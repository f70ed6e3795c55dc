mod fingerprint;
mod reachability;

pub use fingerprint::query_fingerprint;
pub use reachability::ReachabilityMemo;
