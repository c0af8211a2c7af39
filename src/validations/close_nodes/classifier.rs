// Coarse feature typing for ways, used to pick a proximity threshold.
//
// Rules are tried top-down and the first match wins. A way's own tags are
// consulted before any of its parent relations.

use crate::osm::tags::is_path_highway;
use crate::osm::{Graph, Relation, Tags, Way};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureType {
    Boundary,
    Indoor,
    Building,
    Path,
    Other,
}

pub type WayRule = fn(&Tags) -> Option<FeatureType>;
pub type RelationRule = fn(&Relation) -> Option<FeatureType>;

pub const WAY_RULES: &[WayRule] = &[boundary_tag, indoor_tag, building_tag, path_highway];

pub const RELATION_RULES: &[RelationRule] = &[boundary_relation, multipolygon_area];

fn is_building(tags: &Tags) -> bool {
    tags.is_set("building") || tags.is_set("building:part")
}

pub fn boundary_tag(tags: &Tags) -> Option<FeatureType> {
    tags.is_set("boundary").then_some(FeatureType::Boundary)
}

pub fn indoor_tag(tags: &Tags) -> Option<FeatureType> {
    tags.is_set("indoor").then_some(FeatureType::Indoor)
}

pub fn building_tag(tags: &Tags) -> Option<FeatureType> {
    is_building(tags).then_some(FeatureType::Building)
}

pub fn path_highway(tags: &Tags) -> Option<FeatureType> {
    tags.get("highway")
        .filter(|value| is_path_highway(value))
        .map(|_| FeatureType::Path)
}

pub fn boundary_relation(relation: &Relation) -> Option<FeatureType> {
    (relation.tags.get("type") == Some("boundary")).then_some(FeatureType::Boundary)
}

/// Multipolygons lend their area tagging to member ways.
pub fn multipolygon_area(relation: &Relation) -> Option<FeatureType> {
    if !relation.is_multipolygon() {
        return None;
    }
    if relation.tags.is_set("indoor") {
        return Some(FeatureType::Indoor);
    }
    is_building(&relation.tags).then_some(FeatureType::Building)
}

pub fn classify(way: &Way, graph: &Graph) -> FeatureType {
    if let Some(feature) = WAY_RULES.iter().find_map(|rule| rule(&way.tags)) {
        return feature;
    }

    graph
        .parent_relations(way.id.into())
        .into_iter()
        .find_map(|relation| RELATION_RULES.iter().find_map(|rule| rule(relation)))
        .unwrap_or(FeatureType::Other)
}
