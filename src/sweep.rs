//! Whole-graph validation.

use rayon::prelude::*;
use std::time::Instant;
use tracing::info;

use crate::osm::{EntityId, Graph};
use crate::validations::{CloseNodes, Issue, IssueSubtype};

#[derive(Debug, Default)]
pub struct SweepReport {
    /// Unique issues ordered by their entity ids.
    pub issues: Vec<Issue>,
    pub entities_checked: usize,
    pub vertex_issues: usize,
    pub detached_issues: usize,
}

/// Validates every node and way of `graph` in parallel.
///
/// A close vertex pair is found once from its way and again from each of the
/// two nodes; those collapse into one issue since they share an id.
pub fn sweep(graph: &Graph, validator: &CloseNodes<'_>) -> SweepReport {
    let start = Instant::now();

    let mut targets: Vec<EntityId> = graph
        .nodes()
        .map(|node| node.id.into())
        .chain(graph.ways().map(|way| way.id.into()))
        .collect();
    targets.sort_unstable();

    let mut issues: Vec<Issue> = targets
        .par_iter()
        .flat_map_iter(|id| {
            graph
                .entity(*id)
                .map(|entity| validator.validate(entity, graph))
                .unwrap_or_default()
        })
        .collect();

    issues.sort_by(|a, b| a.entity_ids.cmp(&b.entity_ids));
    issues.dedup_by(|a, b| a.entity_ids == b.entity_ids);

    let vertex_issues = issues
        .iter()
        .filter(|issue| issue.subtype == IssueSubtype::Vertices)
        .count();
    let detached_issues = issues.len() - vertex_issues;

    info!(
        "Checked {} entities in {:?}: {} close vertex pairs, {} stacked points",
        targets.len(),
        start.elapsed(),
        vertex_issues,
        detached_issues
    );

    SweepReport {
        issues,
        entities_checked: targets.len(),
        vertex_issues,
        detached_issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo_utils::meters_to_lat;
    use crate::osm::{GraphBuilder, Node, NodeId, Way, WayId};
    use crate::spatial::PointIndex;

    fn north(id: i64, meters: f64) -> Node {
        Node::new(id, [8.5, 47.3 + meters_to_lat(meters)])
    }

    fn sample() -> Graph {
        let mut builder = GraphBuilder::new();
        builder
            .add_node(north(1, 0.0))
            .add_node(north(2, 0.01))
            .add_node(north(3, 8.0))
            .add_way(Way::new(10, [1, 2, 3]))
            .add_node(north(20, 50.0))
            .add_node(north(21, 50.0))
            .add_node(north(22, 80.0));
        builder.build().unwrap()
    }

    #[test]
    fn test_sweep_deduplicates_vertex_issues() {
        let graph = sample();
        let index = PointIndex::build(&graph);
        let validator = CloseNodes::new(&index);
        let report = sweep(&graph, &validator);

        assert_eq!(report.entities_checked, 7);
        assert_eq!(report.vertex_issues, 1);
        // Each stacked point reports its neighbour.
        assert_eq!(report.detached_issues, 2);

        let ids: Vec<String> = report.issues.iter().map(Issue::id).collect();
        assert_eq!(
            ids,
            vec![
                "close_nodes-n20-n21",
                "close_nodes-n21-n20",
                "close_nodes-w10-n1-n2",
            ]
        );
    }

    #[test]
    fn test_sweep_is_deterministic() {
        let graph = sample();
        let index = PointIndex::build(&graph);
        let validator = CloseNodes::new(&index);
        assert_eq!(sweep(&graph, &validator).issues, sweep(&graph, &validator).issues);
    }

    #[test]
    fn test_sweep_after_fix_is_clean() {
        let graph = sample();
        let index = PointIndex::build(&graph);
        let validator = CloseNodes::new(&index);
        let report = sweep(&graph, &validator);

        let vertex_issue = report
            .issues
            .iter()
            .find(|issue| issue.entity_ids[0] == WayId(10).into())
            .unwrap();
        let fixed = vertex_issue.fixes[0].action.as_ref().unwrap().apply(&graph).unwrap();
        assert!(fixed.node(NodeId(1)).is_none());

        let index = PointIndex::build(&fixed);
        let validator = CloseNodes::new(&index);
        assert_eq!(sweep(&fixed, &validator).vertex_issues, 0);
    }
}
