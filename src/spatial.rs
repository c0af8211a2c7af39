//! Spatial lookup of entities by bounding box.

use rstar::{RTree, primitives::GeomWithData};

use crate::geo_utils::Extent;
use crate::osm::{Entity, Graph, NodeId};

/// Read-only spatial query capability. Implementations answer for the graph
/// snapshot they were built from; resolution goes through `graph` so a stale
/// index never hands out entities the snapshot does not have.
pub trait SpatialIndex: Sync {
    fn intersects<'g>(&self, extent: &Extent, graph: &'g Graph) -> Vec<Entity<'g>>;
}

/// R-tree over node locations.
pub struct PointIndex {
    tree: RTree<GeomWithData<[f64; 2], NodeId>>,
}

impl PointIndex {
    pub fn build(graph: &Graph) -> Self {
        let items: Vec<_> = graph
            .nodes()
            .map(|node| GeomWithData::new(node.loc, node.id))
            .collect();

        Self {
            tree: RTree::bulk_load(items),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl SpatialIndex for PointIndex {
    fn intersects<'g>(&self, extent: &Extent, graph: &'g Graph) -> Vec<Entity<'g>> {
        let mut hits: Vec<NodeId> = self
            .tree
            .locate_in_envelope_intersecting(&extent.to_aabb())
            .map(|item| item.data)
            .collect();
        hits.sort_unstable();

        hits.into_iter()
            .filter_map(|id| graph.node(id))
            .map(Entity::Node)
            .collect()
    }
}
