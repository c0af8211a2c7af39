use itertools::Itertools;
use tracing::trace;

use super::classifier::classify;
use crate::config::ValidatorConfig;
use crate::geo_utils::spherical_distance;
use crate::osm::{Graph, Node, Way};
use crate::validations::issue::Issue;

/// Merging any pair of vertices would leave fewer than two distinct nodes
/// (or a closed ring with fewer than three).
pub fn is_degenerate(way: &Way) -> bool {
    way.nodes.len() <= 2 || (way.is_closed() && way.nodes.len() <= 4)
}

/// Threshold to scan `way` with, or `None` when the way is exempt.
pub(super) fn checked_threshold(way: &Way, graph: &Graph, config: &ValidatorConfig) -> Option<f64> {
    if is_degenerate(way) {
        return None;
    }

    let threshold = config.thresholds.for_feature(classify(way, graph))?;

    // don't flag close nodes in very small ways
    let diagonal = graph.extent(way)?.diagonal_m();
    if diagonal < config.min_way_extent_m {
        trace!("skipping {}: extent diagonal {diagonal:.3}m", way.id);
        return None;
    }

    Some(threshold)
}

pub fn should_check_way(way: &Way, graph: &Graph, config: &ValidatorConfig) -> bool {
    checked_threshold(way, graph, config).is_some()
}

/// Every consecutive node pair of `way` closer than its feature threshold.
pub fn scan(way: &Way, graph: &Graph, config: &ValidatorConfig) -> Vec<Issue> {
    let Some(threshold) = checked_threshold(way, graph, config) else {
        return Vec::new();
    };

    graph
        .child_nodes(way)
        .into_iter()
        .tuple_windows()
        .filter_map(|(node1, node2)| pair_issue(way, node1, node2, threshold))
        .collect()
}

/// The check shared by full scans and vertex revalidation.
pub(super) fn pair_issue(way: &Way, node1: &Node, node2: &Node, threshold: f64) -> Option<Issue> {
    if node1.id == node2.id {
        return None;
    }
    // tagged on both sides usually means intentionally coincident, e.g. entrances
    if node1.tags.has_interesting_tags() && node2.tags.has_interesting_tags() {
        return None;
    }

    if node1.loc != node2.loc && spherical_distance(node1.loc, node2.loc) > threshold {
        return None;
    }

    Some(Issue::close_vertices(way.id, node1.id, node2.id, node1.loc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo_utils::meters_to_lat;
    use crate::osm::{GraphBuilder, WayId};

    #[test]
    fn test_degenerate_ways() {
        assert!(is_degenerate(&Way::new(1, [1, 2])));
        assert!(is_degenerate(&Way::new(1, [1, 2, 3, 1])));
        assert!(!is_degenerate(&Way::new(1, [1, 2, 3])));
        assert!(!is_degenerate(&Way::new(1, [1, 2, 3, 4, 1])));
    }

    #[test]
    fn test_small_way_is_not_checked() {
        let step = meters_to_lat(0.4);
        let mut builder = GraphBuilder::new();
        builder
            .add_node(Node::new(1, [0.0, 0.0]))
            .add_node(Node::new(2, [0.0, step]))
            .add_node(Node::new(3, [0.0, step * 2.0]))
            .add_way(Way::new(10, [1, 2, 3]));
        let graph = builder.build().unwrap();
        let way = graph.way(WayId(10)).unwrap();

        assert!(!should_check_way(way, &graph, &ValidatorConfig::default()));
        assert!(scan(way, &graph, &ValidatorConfig::default()).is_empty());

        let loose = ValidatorConfig {
            min_way_extent_m: 0.5,
            ..ValidatorConfig::default()
        };
        assert!(should_check_way(way, &graph, &loose));
    }

    #[test]
    fn test_pair_issue_exactly_at_threshold_flags() {
        let way = Way::new(10, [1, 2]);
        let a = Node::new(1, [0.0, 0.0]);
        let b = Node::new(2, [0.0, 0.0001]);
        let distance = spherical_distance(a.loc, b.loc);
        assert!(pair_issue(&way, &a, &b, distance).is_some());
        assert!(pair_issue(&way, &a, &b, distance * 0.99).is_none());
    }

    #[test]
    fn test_pair_issue_same_node_is_skipped() {
        let way = Way::new(10, [1, 1]);
        let a = Node::new(1, [0.0, 0.0]);
        assert!(pair_issue(&way, &a, &a, 2.0).is_none());
    }

    #[test]
    fn test_one_tagged_node_still_flags() {
        let way = Way::new(10, [1, 2]);
        let a = Node::new(1, [0.0, 0.0]).with_tags([("entrance", "yes")]);
        let b = Node::new(2, [0.0, 0.0]).with_tags([("source", "survey")]);
        assert!(pair_issue(&way, &a, &b, 2.0).is_some());
    }
}
