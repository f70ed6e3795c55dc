use std::collections::HashMap;

use crate::dns_record::RecordType;

/// Result of a multi-type exchange.
///
/// `raw` holds the rendered response message per type, `summary` one
/// `DNS <TYPE>\t<record>` line per matching answer (or a `FAIL` line).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answer {
    pub raw: HashMap<RecordType, String>,
    pub summary: HashMap<RecordType, String>,
}

impl Answer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() && self.summary.is_empty()
    }

    /// Summary lines in record type order.
    pub fn summary_text(&self) -> String {
        let mut types: Vec<&RecordType> = self.summary.keys().collect();
        types.sort();
        types
            .into_iter()
            .filter_map(|t| self.summary.get(t))
            .map(String::as_str)
            .collect()
    }
}
