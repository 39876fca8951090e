//! Compile pipeline.
//!
//! [`Compilation`] owns the results of the parse passes (view tree, scale
//! table, selection registry) and assembles the compiled artifact from them.
//! Parsing runs eagerly in [`Compilation::new`]; assembly is read-only and can
//! be run for the whole spec or one view at a time.

use tracing::debug;
use vizsel_ast::{
    CompiledSpec, CompiledView, SelectionConfig, Signal, VgScale, ViewId, ViewSpec, ViewTree,
};

use super::domain::assemble_scales_for_view;
use super::normalize::{normalize, selection_config};
use super::registry::SelectionRegistry;
use super::scales::{parse_scales, ScaleTable};
use super::selection::parse_selections;
use super::signals::assemble_unit_selection_signals;
use super::top_level::{assemble_top_level_signals, TopLevelSignals};
use crate::diagnostics::Diagnostics;
use crate::error::{CompileError, Result};

/// A parsed spec, ready for assembly.
#[derive(Debug, Clone)]
pub struct Compilation {
    tree: ViewTree,
    scales: ScaleTable,
    selections: SelectionRegistry,
}

impl Compilation {
    /// Parse scales, then selections, over a normalized tree.
    ///
    /// # Errors
    ///
    /// Structural selection errors; see [`parse_selections`].
    pub fn new(tree: ViewTree, config: &SelectionConfig, diagnostics: &mut Diagnostics) -> Result<Self> {
        let mut scales = parse_scales(&tree);
        let selections = parse_selections(&tree, config, &mut scales, diagnostics)?;
        debug!(
            views = tree.len(),
            scales = scales.len(),
            warnings = diagnostics.len(),
            "parsed spec"
        );
        Ok(Self {
            tree,
            scales,
            selections,
        })
    }

    /// Normalize a raw spec and parse it.
    ///
    /// # Errors
    ///
    /// Normalization or selection errors.
    pub fn from_spec(spec: &ViewSpec, diagnostics: &mut Diagnostics) -> Result<Self> {
        let tree = normalize(spec)?;
        Self::new(tree, &selection_config(spec), diagnostics)
    }

    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    pub fn scales(&self) -> &ScaleTable {
        &self.scales
    }

    pub fn selections(&self) -> &SelectionRegistry {
        &self.selections
    }

    /// Scales owned by `view`, with selection domains resolved.
    pub fn assemble_scales(&self, view: ViewId, diagnostics: &mut Diagnostics) -> Vec<VgScale> {
        assemble_scales_for_view(&self.tree, &self.scales, &self.selections, view, diagnostics)
    }

    /// Selection signals declared by one unit view.
    ///
    /// # Errors
    ///
    /// [`CompileError::NotAUnit`] for composite views.
    pub fn assemble_unit_signals(&self, unit: ViewId) -> Result<Vec<Signal>> {
        self.require_unit(unit)?;
        Ok(assemble_unit_selection_signals(
            &self.tree,
            &self.scales,
            unit,
            self.selections.components_of(unit),
        ))
    }

    /// Merge one unit view into the top-level signals.
    ///
    /// # Errors
    ///
    /// [`CompileError::NotAUnit`] for composite views.
    pub fn assemble_top_level_signals(&self, unit: ViewId, acc: TopLevelSignals) -> Result<TopLevelSignals> {
        self.require_unit(unit)?;
        Ok(assemble_top_level_signals(self.selections.components_of(unit), acc))
    }

    /// Assemble every view in pre-order plus the top-level signals.
    pub fn assemble(&self, diagnostics: &mut Diagnostics) -> CompiledSpec {
        let mut views = Vec::with_capacity(self.tree.len());
        let mut top_level = TopLevelSignals::new();

        for id in self.tree.preorder() {
            let node = self.tree.node(id);
            let scales = self.assemble_scales(id, diagnostics);
            let signals = match node.as_unit() {
                Some(_) => {
                    let components = self.selections.components_of(id);
                    top_level = assemble_top_level_signals(components, top_level);
                    assemble_unit_selection_signals(&self.tree, &self.scales, id, components)
                }
                None => Vec::new(),
            };
            views.push(CompiledView {
                name: node.name.clone(),
                kind: node.kind_name(),
                scales,
                signals,
            });
        }

        debug!(
            views = views.len(),
            signals = top_level.signals.len(),
            "assembled spec"
        );
        CompiledSpec {
            signals: top_level.into_signals(),
            views,
        }
    }

    fn require_unit(&self, id: ViewId) -> Result<()> {
        match self.tree.get(id) {
            Some(node) if node.as_unit().is_some() => Ok(()),
            Some(node) => Err(CompileError::NotAUnit(node.name.clone())),
            None => Err(CompileError::NotAUnit(id.to_string())),
        }
    }
}
