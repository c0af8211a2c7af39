use std::collections::BTreeMap;

use itertools::Itertools;
use tracing::debug;

use super::ActionError;
use crate::osm::{EntityId, Graph, Loc, Node, NodeId, Relation, RelationId, Way, WayId};

pub const MERGE_CLOSE_VERTICES_ANNOTATION: &str = "Merged very close points in a way.";

/// Collapses `ids` into a single node.
///
/// The survivor is the last node carrying interesting tags, or the last node
/// when none do. It sits at the tagged node's location if exactly one node is
/// tagged, otherwise at the mean location. Every other node is removed and
/// its references in ways and relations point at the survivor.
pub fn merge_nodes(graph: &Graph, ids: &[NodeId]) -> Result<Graph, ActionError> {
    let ids: Vec<NodeId> = ids.iter().copied().unique().collect();
    if ids.len() < 2 {
        return Err(ActionError::NotEnoughNodes(ids.len()));
    }

    let nodes = ids
        .iter()
        .map(|id| graph.node(*id).ok_or(ActionError::MissingNode(*id)))
        .collect::<Result<Vec<&Node>, _>>()?;

    let tagged: Vec<&Node> = nodes
        .iter()
        .copied()
        .filter(|node| node.tags.has_interesting_tags())
        .collect();

    let loc = match tagged.as_slice() {
        [only] => only.loc,
        _ => mean_loc(&nodes),
    };

    let survivor = tagged
        .last()
        .or(nodes.last())
        .copied()
        .ok_or(ActionError::NotEnoughNodes(nodes.len()))?;

    let mut merged = survivor.clone();
    merged.loc = loc;
    for node in &nodes {
        if node.id != merged.id {
            merged.tags.merge(&node.tags);
        }
    }

    let removed: Vec<NodeId> = ids.iter().copied().filter(|id| *id != merged.id).collect();
    let mut edit = graph.edit();

    let parent_ways: BTreeMap<WayId, &Way> = removed
        .iter()
        .flat_map(|id| graph.parent_ways(*id))
        .map(|way| (way.id, way))
        .collect();

    let mut deleted_ways = Vec::new();
    for way in parent_ways.values() {
        let mut updated = (*way).clone();
        updated.nodes = way
            .nodes
            .iter()
            .map(|id| if removed.contains(id) { merged.id } else { *id })
            .dedup()
            .collect();

        if is_collapsed(&updated) {
            debug!("{} collapsed by merge, deleting", way.id);
            edit.remove_way(way.id);
            deleted_ways.push(way.id);
        } else {
            edit.replace_way(updated);
        }
    }

    let affected_members: Vec<EntityId> = removed
        .iter()
        .map(|id| EntityId::from(*id))
        .chain(deleted_ways.iter().map(|id| EntityId::from(*id)))
        .collect();
    let parent_relations: BTreeMap<RelationId, &Relation> = affected_members
        .iter()
        .flat_map(|id| graph.parent_relations(*id))
        .map(|relation| (relation.id, relation))
        .collect();

    for relation in parent_relations.values() {
        let mut updated = (*relation).clone();
        updated.members = relation
            .members
            .iter()
            .filter(|member| !matches!(member.id, EntityId::Way(way) if deleted_ways.contains(&way)))
            .map(|member| {
                let mut member = member.clone();
                if matches!(member.id, EntityId::Node(id) if removed.contains(&id)) {
                    member.id = merged.id.into();
                }
                member
            })
            .unique_by(|member| (member.id, member.role.clone()))
            .collect();
        edit.replace_relation(updated);
    }

    for id in &removed {
        edit.remove_node(*id);
    }
    edit.replace_node(merged);

    Ok(edit.build()?)
}

fn mean_loc(nodes: &[&Node]) -> Loc {
    let count = nodes.len().max(1) as f64;
    let (lon, lat) = nodes
        .iter()
        .fold((0.0, 0.0), |(lon, lat), node| (lon + node.loc[0], lat + node.loc[1]));
    [lon / count, lat / count]
}

/// Too few distinct nodes left to draw the way.
fn is_collapsed(way: &Way) -> bool {
    let distinct = way.nodes.iter().unique().count();
    distinct < 2 || (way.is_closed() && distinct < 3)
}
