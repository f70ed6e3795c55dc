use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

/// Server endpoint -> "known reachable" flag.
///
/// Entries are overwritten on every successful probe and never removed.
#[derive(Debug, Default)]
pub struct ReachabilityMemo {
    entries: DashMap<String, bool, FxBuildHasher>,
}

impl ReachabilityMemo {
    pub fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuildHasher),
        }
    }

    pub fn is_known_reachable(&self, server: &str) -> bool {
        self.entries.get(server).map(|v| *v).unwrap_or(false)
    }

    pub fn get(&self, server: &str) -> Option<bool> {
        self.entries.get(server).map(|v| *v)
    }

    pub fn record(&self, server: &str, reachable: bool) {
        self.entries.insert(server.to_string(), reachable);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
