//! Extracted tag mapping: `device → public key → tag name → tag value`.
//!
//! Collectors use [`ExtraTags::apply`] to merge the operator's tags into the
//! label set of a peer sample.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag name → tag value for one peer.
pub type TagSet = BTreeMap<String, String>;

/// Public key → tags, for one device.
pub type DeviceTags = BTreeMap<String, TagSet>;

/// Tags for every parsed device.
///
/// Serializes as a nested object `{device: {key: {tag: value}}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtraTags {
    devices: BTreeMap<String, DeviceTags>,
}

impl ExtraTags {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags of all peers of `device`.
    pub fn device(&self, device: &str) -> Option<&DeviceTags> {
        self.devices.get(device)
    }

    /// Tags of one peer of one device.
    pub fn peer_tags(&self, device: &str, public_key: &str) -> Option<&TagSet> {
        self.devices.get(device)?.get(public_key)
    }

    /// Merge the tags of `(device, public_key)` into `labels`.
    ///
    /// Labels already present are left untouched. Returns the number of
    /// labels inserted.
    pub fn apply(
        &self,
        device: &str,
        public_key: &str,
        labels: &mut BTreeMap<String, String>,
    ) -> usize {
        let Some(tags) = self.peer_tags(device, public_key) else {
            return 0;
        };
        let mut inserted = 0;
        for (name, value) in tags {
            if !labels.contains_key(name) {
                labels.insert(name.clone(), value.clone());
                inserted += 1;
            }
        }
        inserted
    }

    /// Number of devices, including devices with no tagged peers.
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Number of tagged peers across all devices.
    pub fn peer_count(&self) -> usize {
        self.devices.values().map(BTreeMap::len).sum()
    }

    /// True when no device was parsed.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Iterate devices in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeviceTags)> {
        self.devices.iter().map(|(name, peers)| (name.as_str(), peers))
    }

    /// Borrow the underlying nested map.
    pub fn as_map(&self) -> &BTreeMap<String, DeviceTags> {
        &self.devices
    }

    /// Start a fresh, empty entry for `device`, replacing any previous one.
    pub(crate) fn reset_device(&mut self, device: &str) {
        self.devices.insert(device.to_string(), DeviceTags::new());
    }

    /// Record the tags of one peer.
    pub(crate) fn insert_peer(&mut self, device: &str, public_key: String, tags: TagSet) {
        self.devices
            .entry(device.to_string())
            .or_default()
            .insert(public_key, tags);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExtraTags {
        let mut tags = ExtraTags::new();
        tags.reset_device("wg0");
        tags.insert_peer(
            "wg0",
            "ABC123".to_string(),
            TagSet::from([
                ("role".to_string(), "edge".to_string()),
                ("device".to_string(), "spoofed".to_string()),
            ]),
        );
        tags.reset_device("wg1");
        tags
    }

    #[test]
    fn lookups() {
        let tags = sample();
        assert_eq!(tags.device_count(), 2);
        assert_eq!(tags.peer_count(), 1);
        assert!(tags.device("wg1").unwrap().is_empty());
        assert_eq!(
            tags.peer_tags("wg0", "ABC123").and_then(|t| t.get("role")),
            Some(&"edge".to_string())
        );
        assert!(tags.peer_tags("wg0", "missing").is_none());
        assert!(tags.peer_tags("wg9", "ABC123").is_none());
    }

    #[test]
    fn iter_in_device_order() {
        let tags = sample();
        let summary: Vec<(&str, usize)> = tags.iter().map(|(d, peers)| (d, peers.len())).collect();
        assert_eq!(summary, vec![("wg0", 1), ("wg1", 0)]);
    }

    #[test]
    fn apply_keeps_existing_labels() {
        let tags = sample();
        let mut labels = BTreeMap::from([
            ("device".to_string(), "wg0".to_string()),
            ("public_key".to_string(), "ABC123".to_string()),
        ]);
        let inserted = tags.apply("wg0", "ABC123", &mut labels);
        assert_eq!(inserted, 1);
        assert_eq!(labels["device"], "wg0");
        assert_eq!(labels["role"], "edge");
    }

    #[test]
    fn apply_unknown_peer_is_noop() {
        let tags = sample();
        let mut labels = BTreeMap::new();
        assert_eq!(tags.apply("wg0", "nope", &mut labels), 0);
        assert!(labels.is_empty());
    }

    #[test]
    fn reset_device_clears_previous_peers() {
        let mut tags = sample();
        tags.reset_device("wg0");
        assert!(tags.device("wg0").unwrap().is_empty());
        assert_eq!(tags.peer_count(), 0);
    }

    #[test]
    fn serializes_as_nested_object() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["wg0"]["ABC123"]["role"], "edge");
        assert_eq!(json["wg1"], serde_json::json!({}));
    }
}
