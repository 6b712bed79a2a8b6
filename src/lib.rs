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
    clippy::for_kv_map,
    clippy::let_and_return,
    clippy::iter_nth,
    clippy::iter_cloned_collect,
    clippy::match_result_ok,
    clippy::cmp_owned,
    clippy::op_ref
)]

pub mod circle_probe;
pub mod junctions;
pub mod line_store;
pub mod loader;
pub mod merge;
pub mod polyline;
pub mod render;
pub mod resolver;

pub use line_store::{LineStore, StoreError};
pub use merge::MergeError;
pub use polyline::{LineId, Polyline};
pub use resolver::{JunctionOutcome, JunctionResolver, SimplifyReport, simplify};

/// File name of the rendered network inside the output directory.
pub const OUT_FILE_NAME: &str = "roads.png";
