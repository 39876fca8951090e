//! Global selection registry.
//!
//! Selection names form one namespace per compiled spec. The registry is
//! filled in a single top-down pass over the unit views before any component
//! is parsed, and rejects conflicting declarations up front.
//!
//! # Scoping Rules
//!
//! - The same name declared on several units (sibling concat views, repeat
//!   instances) is one logical selection; its declarations must agree on type,
//!   resolve and bind.
//! - Lookup from a view walks its ancestors, nearest first. At each ancestor
//!   the first declaring unit (pre-order) inside that subtree wins. The root
//!   contains every unit, so any declared name is reachable from anywhere.

use indexmap::IndexMap;
use tracing::debug;
use vizsel_ast::{
    Bind, SelectionComponent, SelectionConfig, SelectionResolution, SelectionType, ViewId, ViewTree,
};

use crate::error::{CompileError, Result};

/// One logical selection and the units declaring it.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEntry {
    pub name: String,
    pub selection_type: SelectionType,
    pub resolve: SelectionResolution,
    pub bind: Bind,
    /// Declaring units in pre-order.
    pub declared_in: Vec<ViewId>,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionRegistry {
    entries: IndexMap<String, SelectionEntry>,
    components: IndexMap<ViewId, Vec<SelectionComponent>>,
}

impl SelectionRegistry {
    /// Collect every selection name declared in `tree`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::ConflictingSelection`] when two units declare
    /// the same name with a different type, resolve or bind.
    pub fn collect(tree: &ViewTree, config: &SelectionConfig) -> Result<Self> {
        let mut registry = Self::default();
        for (unit_id, unit) in tree.units() {
            for (name, def) in &unit.selections {
                let def = config.apply(def);
                let candidate = SelectionEntry {
                    name: name.clone(),
                    selection_type: def.selection_type,
                    resolve: def.resolve.unwrap_or_default(),
                    bind: Bind::from(def.bind.as_ref()),
                    declared_in: vec![unit_id],
                };
                registry.declare(tree, candidate)?;
            }
        }
        debug!(selections = registry.entries.len(), "collected selection names");
        Ok(registry)
    }

    fn declare(&mut self, tree: &ViewTree, candidate: SelectionEntry) -> Result<()> {
        let Some(existing) = self.entries.get_mut(&candidate.name) else {
            self.entries.insert(candidate.name.clone(), candidate);
            return Ok(());
        };

        let agrees = existing.selection_type == candidate.selection_type
            && existing.resolve == candidate.resolve
            && existing.bind == candidate.bind;
        if !agrees {
            let first = existing.declared_in.first().copied().unwrap_or_default();
            let second = candidate.declared_in.first().copied().unwrap_or_default();
            return Err(CompileError::ConflictingSelection {
                name: candidate.name,
                first: tree.name(first).to_string(),
                second: tree.name(second).to_string(),
            });
        }
        existing.declared_in.extend(candidate.declared_in);
        Ok(())
    }

    /// Record a parsed component on its declaring unit.
    pub fn attach(&mut self, component: SelectionComponent) {
        self.components
            .entry(component.unit)
            .or_default()
            .push(component);
    }

    pub fn entry(&self, name: &str) -> Option<&SelectionEntry> {
        self.entries.get(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &SelectionEntry> {
        self.entries.values()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Components declared on `unit`, in declaration order.
    pub fn components_of(&self, unit: ViewId) -> &[SelectionComponent] {
        self.components.get(&unit).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn component(&self, unit: ViewId, name: &str) -> Option<&SelectionComponent> {
        self.components_of(unit).iter().find(|c| c.name == name)
    }

    /// The occurrence of `name` visible from `from`.
    pub fn lookup_from(&self, tree: &ViewTree, from: ViewId, name: &str) -> Option<&SelectionComponent> {
        let entry = self.entries.get(name)?;
        tree.ancestors(from).find_map(|scope| {
            entry
                .declared_in
                .iter()
                .find(|unit| tree.is_within(**unit, scope))
                .and_then(|unit| self.component(*unit, name))
        })
    }
}
