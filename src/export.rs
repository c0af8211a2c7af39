// Issue serialization for the CLI: flat JSON records and a GeoJSON layer of
// issue anchors for loading into a map viewer.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue};
use serde::Serialize;

use crate::osm::{EntityId, EntityLookup, Graph, Loc};
use crate::validations::{Fix, Issue, IssueSubtype, Severity};

/// An issue with its message rendered against a particular snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct IssueRecord<'a> {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub subtype: IssueSubtype,
    pub severity: Severity,
    pub message: String,
    pub reference: &'static str,
    pub entity_ids: &'a [EntityId],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Loc>,
    pub fixes: &'a [Fix],
}

impl<'a> IssueRecord<'a> {
    pub fn new<L: EntityLookup + ?Sized>(issue: &'a Issue, lookup: &L) -> Self {
        Self {
            id: issue.id(),
            kind: issue.kind,
            subtype: issue.subtype,
            severity: issue.severity,
            message: issue.message(lookup),
            reference: issue.reference(),
            entity_ids: &issue.entity_ids,
            loc: issue.loc,
            fixes: &issue.fixes,
        }
    }
}

pub fn to_records<'a>(issues: &'a [Issue], graph: &Graph) -> Vec<IssueRecord<'a>> {
    issues
        .iter()
        .map(|issue| IssueRecord::new(issue, graph))
        .collect()
}

/// Where to draw an issue: its anchor, or the first node it names.
pub fn display_loc(issue: &Issue, graph: &Graph) -> Option<Loc> {
    issue.loc.or_else(|| {
        issue
            .entity_ids
            .iter()
            .filter_map(EntityId::as_node)
            .find_map(|id| graph.node(id))
            .map(|node| node.loc)
    })
}

/// Point features for every issue that can still be placed on `graph`.
pub fn to_feature_collection(issues: &[Issue], graph: &Graph) -> FeatureCollection {
    let features = issues
        .iter()
        .filter_map(|issue| {
            let loc = display_loc(issue, graph)?;

            let mut properties = JsonObject::new();
            properties.insert(String::from("type"), JsonValue::from(issue.kind));
            properties.insert(
                String::from("severity"),
                JsonValue::from(issue.severity.label()),
            );
            properties.insert(String::from("message"), JsonValue::from(issue.message(graph)));
            properties.insert(
                String::from("entity_ids"),
                JsonValue::Array(
                    issue
                        .entity_ids
                        .iter()
                        .map(|id| JsonValue::String(id.to_string()))
                        .collect(),
                ),
            );

            Some(Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::Point(loc.to_vec()))),
                id: Some(geojson::feature::Id::String(issue.id())),
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

pub fn to_geojson_string(issues: &[Issue], graph: &Graph) -> String {
    GeoJson::from(to_feature_collection(issues, graph)).to_string()
}
