//! OSM entity model: typed ids, nodes, ways, relations and the graph snapshot
//! they live in.

pub mod graph;
pub mod loader;
pub mod tags;

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

pub use graph::{EntityLookup, Graph, GraphBuilder, GraphError};
pub use tags::Tags;

/// (lon, lat) in WGS84 degrees.
pub type Loc = [f64; 2];

/// Typed wrapper for OSM node IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Typed wrapper for OSM way IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WayId(pub i64);

impl fmt::Display for WayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Typed wrapper for OSM relation IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationId(pub i64);

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Id of any entity kind. Serializes as its display form (`n1`, `w2`, `r3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityId {
    Node(NodeId),
    Way(WayId),
    Relation(RelationId),
}

impl EntityId {
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            EntityId::Node(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Node(id) => id.fmt(f),
            EntityId::Way(id) => id.fmt(f),
            EntityId::Relation(id) => id.fmt(f),
        }
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<NodeId> for EntityId {
    fn from(id: NodeId) -> Self {
        EntityId::Node(id)
    }
}

impl From<WayId> for EntityId {
    fn from(id: WayId) -> Self {
        EntityId::Way(id)
    }
}

impl From<RelationId> for EntityId {
    fn from(id: RelationId) -> Self {
        EntityId::Relation(id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub loc: Loc,
    pub tags: Tags,
}

impl Node {
    pub fn new(id: i64, loc: Loc) -> Self {
        Self {
            id: NodeId(id),
            loc,
            tags: Tags::default(),
        }
    }

    pub fn with_tags(mut self, tags: impl Into<Tags>) -> Self {
        self.tags = tags.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Way {
    pub id: WayId,
    pub nodes: Vec<NodeId>,
    pub tags: Tags,
}

impl Way {
    pub fn new(id: i64, nodes: impl IntoIterator<Item = i64>) -> Self {
        Self {
            id: WayId(id),
            nodes: nodes.into_iter().map(NodeId).collect(),
            tags: Tags::default(),
        }
    }

    pub fn with_tags(mut self, tags: impl Into<Tags>) -> Self {
        self.tags = tags.into();
        self
    }

    /// A way is closed when it ends where it starts.
    pub fn is_closed(&self) -> bool {
        self.nodes.len() > 1 && self.nodes.first() == self.nodes.last()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub id: EntityId,
    pub role: String,
}

impl Member {
    pub fn new(id: impl Into<EntityId>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub id: RelationId,
    pub tags: Tags,
    pub members: Vec<Member>,
}

impl Relation {
    pub fn new(id: i64, members: Vec<Member>) -> Self {
        Self {
            id: RelationId(id),
            tags: Tags::default(),
            members,
        }
    }

    pub fn with_tags(mut self, tags: impl Into<Tags>) -> Self {
        self.tags = tags.into();
        self
    }

    pub fn is_multipolygon(&self) -> bool {
        self.tags.get("type") == Some("multipolygon")
    }
}

/// A borrowed view of one entity in a [`Graph`].
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Node(&'a Node),
    Way(&'a Way),
    Relation(&'a Relation),
}

impl<'a> Entity<'a> {
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Node(node) => node.id.into(),
            Entity::Way(way) => way.id.into(),
            Entity::Relation(relation) => relation.id.into(),
        }
    }

    pub fn tags(&self) -> &'a Tags {
        match *self {
            Entity::Node(node) => &node.tags,
            Entity::Way(way) => &way.tags,
            Entity::Relation(relation) => &relation.tags,
        }
    }

    pub fn as_node(&self) -> Option<&'a Node> {
        match *self {
            Entity::Node(node) => Some(node),
            _ => None,
        }
    }

    fn kind_label(&self) -> &'static str {
        match self {
            Entity::Node(_) => "Point",
            Entity::Way(_) => "Line",
            Entity::Relation(_) => "Relation",
        }
    }
}

/// Human readable label for an entity: its name, else its ref, else its kind and id.
pub fn display_label(entity: Entity<'_>) -> String {
    let tags = entity.tags();
    if let Some(name) = tags.get("name").filter(|s| !s.is_empty()) {
        return name.to_string();
    }
    if let Some(reference) = tags.get("ref").filter(|s| !s.is_empty()) {
        return reference.to_string();
    }
    format!("{} {}", entity.kind_label(), entity.id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_display() {
        assert_eq!(EntityId::from(NodeId(5)).to_string(), "n5");
        assert_eq!(EntityId::from(WayId(-3)).to_string(), "w-3");
        assert_eq!(EntityId::from(RelationId(9)).to_string(), "r9");
    }

    #[test]
    fn test_way_closed() {
        assert!(Way::new(1, [1, 2, 3, 1]).is_closed());
        assert!(!Way::new(1, [1, 2, 3]).is_closed());
        assert!(!Way::new(1, [1]).is_closed());
    }

    #[test]
    fn test_display_label_fallbacks() {
        let named = Way::new(1, [1, 2]).with_tags([("name", "Main Street"), ("ref", "A1")]);
        assert_eq!(display_label(Entity::Way(&named)), "Main Street");

        let reffed = Way::new(2, [1, 2]).with_tags([("ref", "A1")]);
        assert_eq!(display_label(Entity::Way(&reffed)), "A1");

        let bare = Node::new(7, [0.0, 0.0]);
        assert_eq!(display_label(Entity::Node(&bare)), "Point n7");
    }

    #[test]
    fn test_multipolygon_detection() {
        let mp = Relation::new(1, vec![Member::new(WayId(4), "outer")])
            .with_tags([("type", "multipolygon")]);
        assert!(mp.is_multipolygon());
        assert_eq!(mp.members[0].id, EntityId::Way(WayId(4)));

        let route = Relation::new(2, vec![]).with_tags([("type", "route")]);
        assert!(!route.is_multipolygon());
    }
}
