//! Flags nodes placed implausibly close together.
//!
//! Ways are scanned pair by pair against a threshold chosen from their feature
//! type. A node that belongs to ways only has its own edges revalidated. A
//! standalone point is compared against nearby standalone points found
//! through the spatial index.

pub mod classifier;
pub mod detached;
pub mod thresholds;
pub mod vertex;
pub mod way_scan;


pub use classifier::{FeatureType, classify};
pub use thresholds::Thresholds;

use tracing::debug;

use crate::config::ValidatorConfig;
use crate::osm::{Entity, Graph};
use crate::spatial::SpatialIndex;
use crate::validations::issue::Issue;

pub struct CloseNodes<'a> {
    config: ValidatorConfig,
    index: &'a dyn SpatialIndex,
}

impl<'a> CloseNodes<'a> {
    pub fn new(index: &'a dyn SpatialIndex) -> Self {
        Self::with_config(index, ValidatorConfig::default())
    }

    pub fn with_config(index: &'a dyn SpatialIndex, config: ValidatorConfig) -> Self {
        Self { config, index }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Issues for one entity against `graph`. Pure: calling twice on the same
    /// snapshot gives the same issues in the same order.
    pub fn validate(&self, entity: Entity<'_>, graph: &Graph) -> Vec<Issue> {
        let issues = match entity {
            Entity::Node(node) => {
                let parent_ways = graph.parent_ways(node.id);
                if parent_ways.is_empty() {
                    detached::issues_for_detached_point(node, graph, self.index, &self.config)
                } else {
                    vertex::issues_for_vertex(node, &parent_ways, graph, &self.config)
                }
            }
            Entity::Way(way) => way_scan::scan(way, graph, &self.config),
            Entity::Relation(_) => Vec::new(),
        };

        if !issues.is_empty() {
            debug!("{} close-node issue(s) on {}", issues.len(), entity.id());
        }
        issues
    }
}
