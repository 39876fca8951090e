//! The compiled artifact: top-level signals plus per-view scales and signals.

use serde::Serialize;

use super::scale::VgScale;
use super::signal::Signal;

/// Scales and signals assembled for one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledView {
    pub name: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scales: Vec<VgScale>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub signals: Vec<Signal>,
}

/// Everything the runtime needs from the selection stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompiledSpec {
    /// Signals declared at the top-level scope, in merge order.
    pub signals: Vec<Signal>,
    /// Views in pre-order.
    pub views: Vec<CompiledView>,
}

impl CompiledSpec {
    pub fn view(&self, name: &str) -> Option<&CompiledView> {
        self.views.iter().find(|view| view.name == name)
    }

    pub fn signal(&self, name: &str) -> Option<&Signal> {
        self.signals.iter().find(|signal| signal.name() == name)
    }

    /// Every assembled scale, in view pre-order.
    pub fn scales(&self) -> impl Iterator<Item = &VgScale> {
        self.views.iter().flat_map(|view| view.scales.iter())
    }
}
