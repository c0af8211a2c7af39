// ===========================================================================
// Immutable OSM graph snapshot
// ===========================================================================
//
// A `Graph` is built once through `GraphBuilder` and never changes. Parent
// indexes (node -> ways, member -> relations) are computed at build time so
// validators can walk upwards without scanning the whole dataset. Edits go
// through `Graph::edit`, which hands back a builder seeded with the current
// entities; building it yields a new snapshot.
// ===========================================================================

use ahash::AHashMap;
use thiserror::Error;

use super::{Entity, EntityId, Node, NodeId, Relation, RelationId, Way, WayId};
use crate::geo_utils::Extent;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("entity {0} was added more than once")]
    DuplicateEntity(EntityId),
    #[error("way {way} references node {node}, which is not in the graph")]
    MissingNode { way: WayId, node: NodeId },
}

/// Read-only entity resolution. Issue messages are rendered against this, so
/// they can be produced from whichever snapshot is current.
pub trait EntityLookup {
    fn lookup(&self, id: EntityId) -> Option<Entity<'_>>;
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: AHashMap<NodeId, Node>,
    ways: AHashMap<WayId, Way>,
    relations: AHashMap<RelationId, Relation>,
    // Sorted by id so traversal order is stable across builds.
    node_parent_ways: AHashMap<NodeId, Vec<WayId>>,
    parent_relations: AHashMap<EntityId, Vec<RelationId>>,
}

impl Graph {
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn way(&self, id: WayId) -> Option<&Way> {
        self.ways.get(&id)
    }

    pub fn relation(&self, id: RelationId) -> Option<&Relation> {
        self.relations.get(&id)
    }

    /// Resolves any entity by id.
    pub fn entity(&self, id: EntityId) -> Option<Entity<'_>> {
        match id {
            EntityId::Node(id) => self.node(id).map(Entity::Node),
            EntityId::Way(id) => self.way(id).map(Entity::Way),
            EntityId::Relation(id) => self.relation(id).map(Entity::Relation),
        }
    }

    pub fn has_entity(&self, id: EntityId) -> bool {
        self.entity(id).is_some()
    }

    /// Ways that contain `node`, ordered by way id.
    pub fn parent_ways(&self, node: NodeId) -> Vec<&Way> {
        self.node_parent_ways
            .get(&node)
            .map(|ids| ids.iter().filter_map(|id| self.ways.get(id)).collect())
            .unwrap_or_default()
    }

    /// Relations that list `entity` as a member, ordered by relation id.
    pub fn parent_relations(&self, entity: EntityId) -> Vec<&Relation> {
        self.parent_relations
            .get(&entity)
            .map(|ids| ids.iter().filter_map(|id| self.relations.get(id)).collect())
            .unwrap_or_default()
    }

    /// A node with no parent ways is rendered as a point; otherwise it is a vertex.
    pub fn is_point(&self, node: NodeId) -> bool {
        self.node_parent_ways
            .get(&node)
            .is_none_or(|parents| parents.is_empty())
    }

    /// The way's nodes in order. A built graph guarantees every reference resolves.
    pub fn child_nodes(&self, way: &Way) -> Vec<&Node> {
        way.nodes
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }

    /// Bounding box of a way's nodes, `None` for a way without nodes.
    pub fn extent(&self, way: &Way) -> Option<Extent> {
        Extent::from_locs(self.child_nodes(way).iter().map(|node| node.loc))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn ways(&self) -> impl Iterator<Item = &Way> {
        self.ways.values()
    }

    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn way_count(&self) -> usize {
        self.ways.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    /// Starts an edit seeded with this snapshot's entities.
    pub fn edit(&self) -> GraphBuilder {
        GraphBuilder {
            nodes: self.nodes.clone(),
            ways: self.ways.clone(),
            relations: self.relations.clone(),
            duplicates: Vec::new(),
        }
    }
}

impl EntityLookup for Graph {
    fn lookup(&self, id: EntityId) -> Option<Entity<'_>> {
        self.entity(id)
    }
}

#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: AHashMap<NodeId, Node>,
    ways: AHashMap<WayId, Way>,
    relations: AHashMap<RelationId, Relation>,
    duplicates: Vec<EntityId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new node. Adding an id twice fails the build.
    pub fn add_node(&mut self, node: Node) -> &mut Self {
        let id = node.id;
        if self.nodes.insert(id, node).is_some() {
            self.duplicates.push(id.into());
        }
        self
    }

    pub fn add_way(&mut self, way: Way) -> &mut Self {
        let id = way.id;
        if self.ways.insert(id, way).is_some() {
            self.duplicates.push(id.into());
        }
        self
    }

    pub fn add_relation(&mut self, relation: Relation) -> &mut Self {
        let id = relation.id;
        if self.relations.insert(id, relation).is_some() {
            self.duplicates.push(id.into());
        }
        self
    }

    /// Inserts or overwrites a node.
    pub fn replace_node(&mut self, node: Node) -> &mut Self {
        self.nodes.insert(node.id, node);
        self
    }

    pub fn replace_way(&mut self, way: Way) -> &mut Self {
        self.ways.insert(way.id, way);
        self
    }

    pub fn replace_relation(&mut self, relation: Relation) -> &mut Self {
        self.relations.insert(relation.id, relation);
        self
    }

    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.remove(&id)
    }

    pub fn remove_way(&mut self, id: WayId) -> Option<Way> {
        self.ways.remove(&id)
    }

    pub fn has_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Checks references and indexes parents.
    ///
    /// Relation members pointing outside the graph are kept: extracts routinely
    /// cut relations at their bounds.
    pub fn build(self) -> Result<Graph, GraphError> {
        if let Some(id) = self.duplicates.first() {
            return Err(GraphError::DuplicateEntity(*id));
        }

        let mut node_parent_ways: AHashMap<NodeId, Vec<WayId>> = AHashMap::new();
        for way in self.ways.values() {
            for node_id in &way.nodes {
                if !self.nodes.contains_key(node_id) {
                    return Err(GraphError::MissingNode {
                        way: way.id,
                        node: *node_id,
                    });
                }
                node_parent_ways.entry(*node_id).or_default().push(way.id);
            }
        }
        for parents in node_parent_ways.values_mut() {
            parents.sort_unstable();
            parents.dedup();
        }

        let mut parent_relations: AHashMap<EntityId, Vec<RelationId>> = AHashMap::new();
        for relation in self.relations.values() {
            for member in &relation.members {
                parent_relations
                    .entry(member.id)
                    .or_default()
                    .push(relation.id);
            }
        }
        for parents in parent_relations.values_mut() {
            parents.sort_unstable();
            parents.dedup();
        }

        Ok(Graph {
            nodes: self.nodes,
            ways: self.ways,
            relations: self.relations,
            node_parent_ways,
            parent_relations,
        })
    }
}
