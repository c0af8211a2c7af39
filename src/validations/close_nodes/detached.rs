use tracing::trace;

use crate::config::ValidatorConfig;
use crate::geo_utils::{Extent, spherical_distance};
use crate::osm::{Graph, Node, Tags};
use crate::spatial::SpatialIndex;
use crate::validations::issue::Issue;

/// Keys whose differing values put two points on different vertical planes.
pub const Z_AXIS_KEYS: &[&str] = &["layer", "level"];

/// Values are opaque strings; a missing or empty value reads as `"0"`.
/// `"01"` and `"1"` therefore count as different.
pub fn z_axis_differentiates(a: &Tags, b: &Tags) -> bool {
    fn z_value<'t>(tags: &'t Tags, key: &str) -> &'t str {
        tags.get(key).filter(|value| !value.is_empty()).unwrap_or("0")
    }

    Z_AXIS_KEYS
        .iter()
        .any(|key| z_value(a, key) != z_value(b, key))
}

/// Standalone points within the point threshold of `node`, in candidate id order.
pub fn issues_for_detached_point(
    node: &Node,
    graph: &Graph,
    index: &dyn SpatialIndex,
    config: &ValidatorConfig,
) -> Vec<Issue> {
    let threshold = config.thresholds.point_m;
    let query = Extent::around(node.loc, threshold);

    index
        .intersects(&query, graph)
        .into_iter()
        .filter_map(|entity| entity.as_node())
        .filter(|nearby| nearby.id != node.id && graph.is_point(nearby.id))
        .filter(|nearby| {
            nearby.loc == node.loc || spherical_distance(node.loc, nearby.loc) < threshold
        })
        .filter(|nearby| {
            let exempt = z_axis_differentiates(&node.tags, &nearby.tags);
            if exempt {
                trace!("{} and {} differ on layer or level", node.id, nearby.id);
            }
            !exempt
        })
        .map(|nearby| Issue::close_points(node.id, nearby.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_and_zero_are_equal() {
        let plain = Tags::new();
        let zero = Tags::from([("layer", "0")]);
        let empty = Tags::from([("level", "")]);
        assert!(!z_axis_differentiates(&plain, &zero));
        assert!(!z_axis_differentiates(&plain, &empty));
    }

    #[test]
    fn test_any_key_differing_exempts() {
        let a = Tags::from([("layer", "1"), ("level", "2")]);
        let b = Tags::from([("layer", "1"), ("level", "3")]);
        assert!(z_axis_differentiates(&a, &b));
    }

    #[test]
    fn test_values_are_not_parsed() {
        let a = Tags::from([("layer", "01")]);
        let b = Tags::from([("layer", "1")]);
        assert!(z_axis_differentiates(&a, &b));

        let c = Tags::from([("level", "-0")]);
        assert!(z_axis_differentiates(&c, &Tags::new()));
    }
}
