//! Topic lookup table types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Destination descriptor for one topic-table key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicEntry {
    /// Ukrainian display name, substituted into the caption on
    /// sub-locality matches
    pub ukr_name: String,

    /// Forum topic id inside the target chat
    pub topic: i64,
}

/// Static mapping from a normalized key (sub-locality, category or type
/// name, lower-cased with spaces replaced by underscores) to its
/// destination descriptor. Loaded once per run, never mutated by the
/// pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct TopicTable {
    pub entries: HashMap<String, TopicEntry>,
}

impl TopicTable {
    /// Look up a destination by its normalized key.
    pub fn get(&self, key: &str) -> Option<&TopicEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_json_shape() {
        let json = r#"{"аркадия": {"ukr_name": "Аркадія", "topic": 12}}"#;
        let table: TopicTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.len(), 1);
        let entry = table.get("аркадия").unwrap();
        assert_eq!(entry.ukr_name, "Аркадія");
        assert_eq!(entry.topic, 12);
    }
}
