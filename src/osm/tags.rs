use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `highway=*` values mapped as paths rather than roads.
pub const PATH_HIGHWAY_VALUES: &[&str] = &[
    "path",
    "footway",
    "cycleway",
    "bridleway",
    "pedestrian",
    "corridor",
    "steps",
];

/// Keys that only carry bookkeeping, never meaning.
const UNINTERESTING_KEYS: &[&str] = &["attribution", "created_by", "source", "odbl"];
const UNINTERESTING_PREFIXES: &[&str] = &["source:", "tiger:"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Key present with any value other than `no`.
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty() && v != "no")
    }

    /// True when at least one tag means something beyond edit bookkeeping.
    pub fn has_interesting_tags(&self) -> bool {
        self.0.keys().any(|k| is_interesting_key(k))
    }

    /// Merges `other` into `self`. A key present on both sides with different
    /// values ends up with the union of their `;`-separated parts.
    pub fn merge(&mut self, other: &Tags) {
        for (key, value) in &other.0 {
            match self.0.get_mut(key) {
                None => {
                    self.0.insert(key.clone(), value.clone());
                }
                Some(existing) if existing.as_str() != value.as_str() => {
                    let mut parts: Vec<&str> = split_values(existing).collect();
                    for part in split_values(value) {
                        if !parts.contains(&part) {
                            parts.push(part);
                        }
                    }
                    *existing = parts.join(";");
                }
                Some(_) => {}
            }
        }
    }
}

fn split_values(value: &str) -> impl Iterator<Item = &str> {
    value.split(';').map(str::trim)
}

pub fn is_interesting_key(key: &str) -> bool {
    !UNINTERESTING_KEYS.contains(&key)
        && !UNINTERESTING_PREFIXES
            .iter()
            .any(|prefix| key.starts_with(prefix))
}

pub fn is_path_highway(value: &str) -> bool {
    PATH_HIGHWAY_VALUES.contains(&value)
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Tags(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Tags {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_set_ignores_no() {
        let tags = Tags::from([("building", "no"), ("indoor", "room")]);
        assert!(!tags.is_set("building"));
        assert!(tags.is_set("indoor"));
        assert!(!tags.is_set("boundary"));
    }

    #[test]
    fn test_interesting_tags() {
        assert!(!Tags::new().has_interesting_tags());
        assert!(!Tags::from([("source", "survey"), ("created_by", "JOSM")]).has_interesting_tags());
        assert!(!Tags::from([("source:geometry", "bing"), ("tiger:cfcc", "A41")]).has_interesting_tags());
        assert!(Tags::from([("source", "survey"), ("entrance", "yes")]).has_interesting_tags());
    }

    #[test]
    fn test_path_highways() {
        assert!(is_path_highway("footway"));
        assert!(is_path_highway("steps"));
        assert!(!is_path_highway("residential"));
    }

    #[test]
    fn test_merge_unions_conflicting_values() {
        let mut survivor = Tags::from([("entrance", "yes"), ("ref", "A;B")]);
        survivor.merge(&Tags::from([("ref", "B; C"), ("level", "1")]));
        assert_eq!(survivor.get("entrance"), Some("yes"));
        assert_eq!(survivor.get("ref"), Some("A;B;C"));
        assert_eq!(survivor.get("level"), Some("1"));
    }

    #[test]
    fn test_merge_keeps_equal_values() {
        let mut survivor = Tags::from([("layer", "1")]);
        survivor.merge(&Tags::from([("layer", "1")]));
        assert_eq!(survivor.get("layer"), Some("1"));
    }
}
