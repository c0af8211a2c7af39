use super::way_scan::{checked_threshold, pair_issue};
use crate::config::ValidatorConfig;
use crate::osm::{Graph, Node, Way};
use crate::validations::issue::Issue;

/// Revalidates only the edges of `parent_ways` that touch `node`.
///
/// Edges are visited in node-sequence order with their original orientation,
/// so the result is exactly what a full scan of each way yields for those
/// edges.
pub fn issues_for_vertex(
    node: &Node,
    parent_ways: &[&Way],
    graph: &Graph,
    config: &ValidatorConfig,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    for way in parent_ways {
        let Some(threshold) = checked_threshold(way, graph, config) else {
            continue;
        };

        for edge in way.nodes.windows(2) {
            let [from, to] = [edge[0], edge[1]];
            if from != node.id && to != node.id {
                continue;
            }
            let (Some(node1), Some(node2)) = (graph.node(from), graph.node(to)) else {
                continue;
            };
            issues.extend(pair_issue(way, node1, node2, threshold));
        }
    }

    issues
}
