//! Data model of the selection compiler.
//!
//! - [`spec`] - raw view spec as deserialized from JSON
//! - [`view`] - the normalized view tree
//! - [`selection`] - selection declarations and parsed components
//! - [`scale`] - scale domains, components and assembled scales
//! - [`signal`] - signal definitions
//! - [`compiled`] - the compiled artifact

pub mod compiled;
pub mod scale;
pub mod selection;
pub mod signal;
pub mod spec;
pub mod view;
pub mod walk;

pub use compiled::{CompiledSpec, CompiledView};
pub use scale::{
    DataRef, ResolveMode, ScaleComponent, ScaleDomain, SelectionDomain, SignalRef, VgDomain,
    VgScale, DATA_SOURCE,
};
pub use selection::{
    Bind, BindSpec, Projection, SelectionComponent, SelectionConfig, SelectionDef,
    SelectionDefaults, SelectionResolution, SelectionType,
};
pub use signal::{Events, NewSignal, OnEvent, Push, PushSignal, Signal};
pub use spec::ViewSpec;
pub use view::{
    CompositeKind, CompositeView, FieldDef, Repeater, UnitView, ViewId, ViewKind, ViewNode,
    ViewTree,
};
