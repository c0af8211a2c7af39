use ahash::AHashSet;
use osmpbfreader::{OsmId, OsmObj, OsmPbfReader};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::{EntityId, Graph, GraphBuilder, GraphError, Member, Node, NodeId, Relation, RelationId, Tags, Way, WayId};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error opening '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("PBF decode error: {0}")]
    Pbf(#[from] osmpbfreader::Error),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Reads every node, way and relation of an `.osm.pbf` extract into a graph.
pub fn load_pbf(path: &Path) -> Result<Graph, LoadError> {
    info!("Loading OSM data from {:?}", path);

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = OsmPbfReader::new(BufReader::new(file));

    let mut nodes = Vec::new();
    let mut ways = Vec::new();
    let mut relations = Vec::new();

    for obj in reader.iter() {
        match obj? {
            OsmObj::Node(node) => {
                nodes.push(Node {
                    id: NodeId(node.id.0),
                    loc: [node.lon(), node.lat()],
                    tags: convert_tags(&node.tags),
                });
            }
            OsmObj::Way(way) => {
                ways.push(Way {
                    id: WayId(way.id.0),
                    nodes: way.nodes.iter().map(|id| NodeId(id.0)).collect(),
                    tags: convert_tags(&way.tags),
                });
            }
            OsmObj::Relation(relation) => {
                let members = relation
                    .refs
                    .iter()
                    .map(|member| Member {
                        id: convert_id(member.member),
                        role: member.role.to_string(),
                    })
                    .collect();
                relations.push(Relation {
                    id: RelationId(relation.id.0),
                    tags: convert_tags(&relation.tags),
                    members,
                });
            }
        }
    }

    info!(
        "Read {} nodes, {} ways, {} relations",
        nodes.len(),
        ways.len(),
        relations.len()
    );

    Ok(assemble(nodes, ways, relations)?)
}

/// Builds a graph from raw extract contents. Extracts clip ways at their
/// bounds, so node references that did not make it in are dropped.
pub fn assemble(nodes: Vec<Node>, ways: Vec<Way>, relations: Vec<Relation>) -> Result<Graph, GraphError> {
    let present: AHashSet<NodeId> = nodes.iter().map(|node| node.id).collect();
    let mut builder = GraphBuilder::new();
    let mut clipped = 0usize;

    for node in nodes {
        builder.add_node(node);
    }
    for mut way in ways {
        let before = way.nodes.len();
        way.nodes.retain(|id| present.contains(id));
        if way.nodes.len() != before {
            clipped += 1;
        }
        builder.add_way(way);
    }
    for relation in relations {
        builder.add_relation(relation);
    }

    if clipped > 0 {
        warn!("{clipped} ways referenced nodes outside the extract");
    }

    builder.build()
}

fn convert_tags(tags: &osmpbfreader::Tags) -> Tags {
    tags.iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn convert_id(id: OsmId) -> EntityId {
    match id {
        OsmId::Node(id) => NodeId(id.0).into(),
        OsmId::Way(id) => WayId(id.0).into(),
        OsmId::Relation(id) => RelationId(id.0).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_pbf(Path::new("/nonexistent/extract.osm.pbf")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_assemble_drops_clipped_references() {
        let graph = assemble(
            vec![Node::new(1, [0.0, 0.0]), Node::new(2, [0.0, 1.0])],
            vec![Way::new(10, [1, 2, 3])],
            vec![Relation::new(
                90,
                vec![Member::new(WayId(10), "outer"), Member::new(WayId(11), "inner")],
            )],
        )
        .unwrap();

        assert_eq!(graph.way(WayId(10)).unwrap().nodes, vec![NodeId(1), NodeId(2)]);
        assert_eq!(graph.parent_relations(WayId(10).into()).len(), 1);
    }

    #[test]
    fn test_assemble_rejects_duplicate_ids() {
        let err = assemble(
            vec![Node::new(1, [0.0, 0.0]), Node::new(1, [0.0, 1.0])],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, GraphError::DuplicateEntity(NodeId(1).into()));
    }

    #[test]
    fn test_convert_id() {
        assert_eq!(
            convert_id(OsmId::Way(osmpbfreader::WayId(7))),
            EntityId::Way(WayId(7))
        );
    }
}
