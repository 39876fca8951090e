//! Compiler passes.
//!
//! # Pipeline Position
//!
//! ```text
//! ViewSpec → normalize → parse_scales → parse_selections → assemble
//!                                                           ├─ unit signals
//!                                                           ├─ top-level signals
//!                                                           └─ scales (domain resolution)
//! ```
//!
//! Ordering is load-bearing: scales must exist before selections can bind
//! them, and every selection must be parsed before a scale domain can
//! reference it.

pub mod domain;
pub mod normalize;
pub mod pipeline;
pub mod registry;
pub mod scales;
pub mod selection;
pub mod signals;
pub mod top_level;

pub use domain::{assemble_scales_for_view, resolve_selection_domain};
pub use normalize::{normalize, selection_config};
pub use pipeline::Compilation;
pub use registry::{SelectionEntry, SelectionRegistry};
pub use scales::{parse_scales, ScaleTable};
pub use selection::{parse_selections, parse_unit_selections};
pub use signals::{assemble_unit_selection_signals, composite_update};
pub use top_level::{assemble_top_level_signals, TopLevelSignals};
