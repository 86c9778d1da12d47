//! Segment tag catalog
//!
//! Segment tags are externally pre-computed named boolean user predicates,
//! fetched from the reference-data endpoint and looked up by name.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// One named boolean predicate column on the segmentation table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentTag {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub user_count: i64,
}

/// Read-only catalog of segment tags, keyed by name
#[derive(Debug, Clone, Default)]
pub struct SegmentCatalog {
    tags: AHashMap<String, SegmentTag>,
    order: Vec<String>,
}

impl SegmentCatalog {
    pub fn new(tags: Vec<SegmentTag>) -> Self {
        let mut map = AHashMap::with_capacity(tags.len());
        let mut order = Vec::with_capacity(tags.len());
        for tag in tags {
            if !map.contains_key(&tag.name) {
                order.push(tag.name.clone());
            }
            map.insert(tag.name.clone(), tag);
        }
        Self { tags: map, order }
    }

    pub fn lookup(&self, name: &str) -> Option<&SegmentTag> {
        self.tags.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SegmentTag> {
        self.order.iter().filter_map(|name| self.tags.get(name))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, user_count: i64) -> SegmentTag {
        SegmentTag {
            name: name.to_string(),
            description: format!("{} users", name),
            user_count,
        }
    }

    #[test]
    fn test_lookup_by_name() {
        let catalog = SegmentCatalog::new(vec![tag("is_high_value", 1200), tag("is_dormant", 800)]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lookup("is_high_value").unwrap().user_count, 1200);
        assert!(catalog.lookup("is_unknown").is_none());
    }

    #[test]
    fn test_duplicate_names_keep_last_definition() {
        let catalog = SegmentCatalog::new(vec![tag("is_dormant", 1), tag("is_dormant", 2)]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup("is_dormant").unwrap().user_count, 2);
    }

    #[test]
    fn test_deserialize_payload_defaults() {
        let tags: Vec<SegmentTag> =
            serde_json::from_str(r#"[{"name": "is_high_value"}]"#).unwrap();
        assert_eq!(tags[0].name, "is_high_value");
        assert_eq!(tags[0].user_count, 0);
        assert!(tags[0].description.is_empty());
    }
}
