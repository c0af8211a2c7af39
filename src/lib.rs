// Copyright: Kyler Chin <kyler@catenarymaps.org>
// Catenary Transit Initiatives
// Removal of the attribution is not allowed, as covered under the AGPL license

#![deny(
    clippy::mutable_key_type,
    clippy::map_entry,
    clippy::boxed_local,
    clippy::let_unit_value,
    clippy::redundant_allocation,
    clippy::bool_comparison,
    clippy::bind_instead_of_map,
    clippy::vec_box,
    clippy::while_let_loop,
    clippy::useless_asref,
    clippy::repeat_once,
    clippy::deref_addrof,
    clippy::suspicious_map,
    clippy::single_char_pattern,
    clippy::for_kv_map,
    clippy::let_and_return,
    clippy::iter_nth,
    clippy::iter_cloned_collect,
    clippy::match_result_ok,
    clippy::cmp_owned,
    clippy::op_ref
)]

//! Detection of implausibly close nodes in OpenStreetMap data.
//!
//! Load a [`osm::Graph`], index its points with [`spatial::PointIndex`], and
//! run [`validations::CloseNodes`] entity by entity or over the whole graph
//! with [`sweep::sweep`].

pub mod actions;
pub mod config;
pub mod export;
pub mod geo_utils;
pub mod osm;
pub mod spatial;
pub mod sweep;
pub mod validations;

pub use config::ValidatorConfig;
pub use osm::{Entity, EntityId, Graph, GraphBuilder};
pub use spatial::{PointIndex, SpatialIndex};
pub use validations::{CloseNodes, Issue};
