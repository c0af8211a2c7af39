//! Validation issues and the fixes offered for them.
//!
//! An `Issue` only carries ids. Anything human readable is derived on demand
//! from whatever graph snapshot the caller holds at that moment.

use itertools::Itertools;
use serde::Serialize;

use crate::actions::{self, ActionError};
use crate::osm::{EntityId, EntityLookup, Graph, Loc, NodeId, WayId, display_label};

pub const CLOSE_NODES: &str = "close_nodes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Which configuration produced a close-nodes issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSubtype {
    /// Two consecutive vertices of one way: `[way, node1, node2]`.
    Vertices,
    /// Two standalone points: `[subject, candidate]`.
    Detached,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub subtype: IssueSubtype,
    pub severity: Severity,
    pub entity_ids: Vec<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Loc>,
    pub fixes: Vec<Fix>,
}

impl Issue {
    pub fn close_vertices(way: WayId, node1: NodeId, node2: NodeId, loc: Loc) -> Self {
        Self {
            kind: CLOSE_NODES,
            subtype: IssueSubtype::Vertices,
            severity: Severity::Warning,
            entity_ids: vec![way.into(), node1.into(), node2.into()],
            loc: Some(loc),
            fixes: vec![Fix::merge_points(node1, node2), Fix::move_points_apart()],
        }
    }

    pub fn close_points(subject: NodeId, candidate: NodeId) -> Self {
        Self {
            kind: CLOSE_NODES,
            subtype: IssueSubtype::Detached,
            severity: Severity::Warning,
            entity_ids: vec![subject.into(), candidate.into()],
            loc: None,
            fixes: vec![Fix::move_points_apart(), Fix::use_different_layers_or_levels()],
        }
    }

    /// Stable identity: the same configuration always yields the same id.
    pub fn id(&self) -> String {
        format!("{}-{}", self.kind, self.entity_ids.iter().join("-"))
    }

    /// Renders the message against a live lookup. Empty when any entity it
    /// names has since left the graph.
    pub fn message<L: EntityLookup + ?Sized>(&self, lookup: &L) -> String {
        match self.subtype {
            IssueSubtype::Vertices => {
                let Some(way) = self.entity_ids.first().and_then(|id| lookup.lookup(*id)) else {
                    return String::new();
                };
                format!("{} has very close points", display_label(way))
            }
            IssueSubtype::Detached => {
                let resolved = (
                    self.entity_ids.first().and_then(|id| lookup.lookup(*id)),
                    self.entity_ids.get(1).and_then(|id| lookup.lookup(*id)),
                );
                match resolved {
                    (Some(feature), Some(feature2)) => format!(
                        "{} is too close to {}",
                        display_label(feature),
                        display_label(feature2)
                    ),
                    _ => String::new(),
                }
            }
        }
    }

    pub fn reference(&self) -> &'static str {
        match self.subtype {
            IssueSubtype::Vertices => {
                "Redundant points in a way should either be merged or moved apart."
            }
            IssueSubtype::Detached => {
                "Separate points should not be very close together or be stacked on top of each other."
            }
        }
    }
}

/// Programmatic remediation attached to a fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixAction {
    MergeNodes([NodeId; 2]),
}

impl FixAction {
    /// History description recorded alongside the edit.
    pub fn annotation(&self) -> &'static str {
        match self {
            FixAction::MergeNodes(_) => actions::MERGE_CLOSE_VERTICES_ANNOTATION,
        }
    }

    /// Performs the edit against `graph`, returning the resulting snapshot.
    pub fn apply(&self, graph: &Graph) -> Result<Graph, ActionError> {
        match self {
            FixAction::MergeNodes(ids) => actions::merge_nodes(graph, ids),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fix {
    pub icon: &'static str,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<FixAction>,
}

impl Fix {
    pub fn merge_points(node1: NodeId, node2: NodeId) -> Self {
        Self {
            icon: "icon-plus",
            title: "Merge these points",
            action: Some(FixAction::MergeNodes([node1, node2])),
        }
    }

    pub fn move_points_apart() -> Self {
        Self {
            icon: "operation-disconnect",
            title: "Move these points apart",
            action: None,
        }
    }

    pub fn use_different_layers_or_levels() -> Self {
        Self {
            icon: "icon-layers",
            title: "Use different layers or levels",
            action: None,
        }
    }

    /// Advisory fixes only describe what to do.
    pub fn is_advisory(&self) -> bool {
        self.action.is_none()
    }
}
