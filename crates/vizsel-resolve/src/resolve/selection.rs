//! Selection component parsing.
//!
//! Turns the raw selection declarations on each unit view into canonical
//! [`SelectionComponent`]s: config defaults applied, projections resolved
//! against the unit's encodings, and scale bindings recorded on the scales
//! they drive.
//!
//! # Projections
//!
//! Projections are keyed by field in first-insertion order. Explicit `fields`
//! come first (without a channel); `encodings` follow, and a channel whose
//! field is already projected updates that projection in place. A declaration
//! naming neither projects every encoded channel that carries a field.
//!
//! # Scale Bindings
//!
//! `bind: scales` on a globally resolved interval selection sets the
//! `domainRaw` of each projected channel's scale to `<name>["<field>"]`.
//! Scales that cannot be zoomed (missing, discrete or binned) are skipped with
//! a warning. On a diagonal repeat instance the opposite positional scale is
//! bound as well, since both axes show the same field.

use indexmap::IndexMap;
use tracing::debug;
use vizsel_ast::selection::{INTERVAL_EVENTS, POINT_EVENTS};
use vizsel_ast::{
    string_value, Bind, Channel, CompositeKind, FieldPath, Projection, SelectionComponent,
    SelectionConfig, SelectionDef, SelectionResolution, SelectionType, SignalRef, UnitView, ViewId,
    ViewTree,
};

use super::registry::SelectionRegistry;
use super::scales::ScaleTable;
use crate::diagnostics::{CompileWarning, Diagnostics};
use crate::error::{CompileError, Result};

/// Parse the selections of every unit into a registry.
///
/// Names are collected and validated first, then components are parsed unit
/// by unit in pre-order.
///
/// # Errors
///
/// - [`CompileError::ConflictingSelection`] from name collection
/// - [`CompileError::EmptyProjection`] when a selection projects nothing
pub fn parse_selections(
    tree: &ViewTree,
    config: &SelectionConfig,
    scales: &mut ScaleTable,
    diagnostics: &mut Diagnostics,
) -> Result<SelectionRegistry> {
    let mut registry = SelectionRegistry::collect(tree, config)?;
    let units: Vec<ViewId> = tree.units().map(|(id, _)| id).collect();
    for unit in units {
        for component in parse_unit_selections(tree, unit, config, scales, diagnostics)? {
            registry.attach(component);
        }
    }
    Ok(registry)
}

/// Parse the selections declared on one unit view.
///
/// # Errors
///
/// - [`CompileError::NotAUnit`] if `unit_id` is a composite view
/// - [`CompileError::EmptyProjection`] when a selection projects nothing
pub fn parse_unit_selections(
    tree: &ViewTree,
    unit_id: ViewId,
    config: &SelectionConfig,
    scales: &mut ScaleTable,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<SelectionComponent>> {
    let unit = tree
        .unit(unit_id)
        .ok_or_else(|| CompileError::NotAUnit(tree.name(unit_id).to_string()))?;

    let mut components = Vec::with_capacity(unit.selections.len());
    for (name, def) in &unit.selections {
        let def = config.apply(def);
        let component = parse_component(tree, unit_id, unit, name, &def, scales, diagnostics)?;
        debug!(
            view = tree.name(unit_id),
            selection = %component.name,
            projections = component.projections.len(),
            bound = component.scales.len(),
            push_outer = component.push_outer,
            "parsed selection"
        );
        components.push(component);
    }
    Ok(components)
}

fn parse_component(
    tree: &ViewTree,
    unit_id: ViewId,
    unit: &UnitView,
    name: &str,
    def: &SelectionDef,
    scales: &mut ScaleTable,
    diagnostics: &mut Diagnostics,
) -> Result<SelectionComponent> {
    let view = tree.name(unit_id);
    let selection_type = def.selection_type;
    let resolve = def.resolve.unwrap_or_default();
    let bind = Bind::from(def.bind.as_ref());

    let mut projections = project(unit, view, name, def, diagnostics);
    if selection_type == SelectionType::Interval {
        projections.retain(|projection| match projection.channel {
            Some(channel) if channel.is_xy() => true,
            channel => {
                diagnostics.push(CompileWarning::interval_channel_unsupported(view, name, channel));
                false
            }
        });
    }
    if projections.is_empty() {
        return Err(CompileError::EmptyProjection {
            selection: name.to_string(),
            view: view.to_string(),
        });
    }

    let mut bound = Vec::new();
    if def.is_scale_bound() {
        if selection_type == SelectionType::Interval && resolve == SelectionResolution::Global {
            let diagonal = unit.repeater.as_ref().is_some_and(|r| r.is_diagonal());
            for projection in &projections {
                let Some(channel) = projection.channel else {
                    continue;
                };
                let mut targets = vec![channel];
                if diagonal {
                    targets.extend(channel.opposite());
                }
                for target in targets {
                    let binding = BindTarget {
                        unit: unit_id,
                        view,
                        selection: name,
                        channel: target,
                        field: &projection.field,
                    };
                    if bind_scale(tree, scales, &binding, diagnostics) && !bound.contains(&target) {
                        bound.push(target);
                    }
                }
            }
        } else {
            diagnostics.push(CompileWarning::unsupported_scale_binding(view, name));
        }
    }

    let push_outer = selection_type == SelectionType::Interval
        && resolve == SelectionResolution::Global
        && !bound.is_empty()
        && !shares_top_level_scope(tree, unit_id);

    let default_events = match selection_type {
        SelectionType::Interval => INTERVAL_EVENTS,
        SelectionType::Single | SelectionType::Multi => POINT_EVENTS,
    };
    let events = def.on.clone().unwrap_or_else(|| default_events.to_string());

    Ok(SelectionComponent {
        name: name.to_string(),
        selection_type,
        resolve,
        bind,
        events,
        projections,
        scales: bound,
        push_outer,
        unit: unit_id,
    })
}

/// Resolve the declared (or implied) projections of one selection.
fn project(
    unit: &UnitView,
    view: &str,
    name: &str,
    def: &SelectionDef,
    diagnostics: &mut Diagnostics,
) -> Vec<Projection> {
    let mut by_field: IndexMap<FieldPath, Option<Channel>> = IndexMap::new();

    if def.encodings.is_none() && def.fields.is_none() {
        for (channel, field_def) in &unit.encoding {
            if let Some(field) = &field_def.field {
                by_field.insert(field.clone(), Some(*channel));
            }
        }
    }

    for field in def.fields.iter().flatten() {
        by_field.entry(field.clone()).or_insert(None);
    }

    for &channel in def.encodings.iter().flatten() {
        match unit.field(channel) {
            Some(field) => {
                by_field.insert(field.clone(), Some(channel));
            }
            None => {
                diagnostics.push(CompileWarning::cannot_project_without_field(view, name, channel))
            }
        }
    }

    by_field
        .into_iter()
        .map(|(field, channel)| Projection { channel, field })
        .collect()
}

struct BindTarget<'a> {
    unit: ViewId,
    view: &'a str,
    selection: &'a str,
    channel: Channel,
    field: &'a FieldPath,
}

/// Point the scale `target.channel` of the unit at the selection. Returns
/// whether the scale was bound.
fn bind_scale(
    tree: &ViewTree,
    scales: &mut ScaleTable,
    target: &BindTarget<'_>,
    diagnostics: &mut Diagnostics,
) -> bool {
    match scales.lookup_mut(tree, target.unit, target.channel) {
        Some(scale) if scale.scale_type.supports_scale_binding() => {
            scale.binding = Some(SignalRef::new(format!(
                "{}[{}]",
                target.selection,
                string_value(target.field.as_str())
            )));
            true
        }
        _ => {
            diagnostics.push(CompileWarning::scale_bindings_continuous(
                target.view,
                target.selection,
                target.channel,
            ));
            false
        }
    }
}

/// Units directly under a root layer already share the top-level scope.
fn shares_top_level_scope(tree: &ViewTree, unit: ViewId) -> bool {
    match tree.parent(unit) {
        None => true,
        Some(parent) => {
            tree.parent(parent).is_none()
                && tree
                    .node(parent)
                    .as_composite()
                    .is_some_and(|composite| composite.kind == CompositeKind::Layer)
        }
    }
}
