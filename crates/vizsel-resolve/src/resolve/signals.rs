//! Unit selection signal assembly.
//!
//! Builds the signals one unit view declares for its selections, in
//! declaration order. Per selection:
//!
//! - **interval**: for each projection a visual signal `<name>_<channel>_px`
//!   holding the pixel extent (only while the channel is not scale-bound),
//!   a data signal `<name>_<field>` holding the data extent, then the tuple
//!   signal `<name>_tuple`
//! - **single / multi**: the tuple signal `<name>_tuple` fired by the
//!   selection's events, then a data signal per projection reading the tuple
//! - the composite `<name>`, unless the selection is owned by the top level
//!
//! Data signals of scale-bound channels carry no handlers: their extent is
//! driven through the bound scale. On outer-owned selections they are push
//! signals whose state lives in the top-level scope.
//!
//! Field names are never reinterpreted: `nested.b` yields `<name>_nested.b`
//! and the composite key `"nested.b"`.

use serde_json::{json, Value};
use vizsel_ast::{
    string_value, Channel, Events, NewSignal, OnEvent, Projection, PushSignal, SelectionComponent,
    SelectionType, Signal, SignalRef, ViewId, ViewTree,
};

use super::scales::ScaleTable;

/// Suffix of the signal holding the current selection tuple.
pub const TUPLE: &str = "_tuple";

/// Signals of the selections declared on `unit`.
pub fn assemble_unit_selection_signals(
    tree: &ViewTree,
    scales: &ScaleTable,
    unit: ViewId,
    components: &[SelectionComponent],
) -> Vec<Signal> {
    let mut signals = Vec::new();
    for component in components {
        match component.selection_type {
            SelectionType::Interval => interval_signals(tree, scales, unit, component, &mut signals),
            SelectionType::Single | SelectionType::Multi => {
                point_signals(tree, unit, component, &mut signals)
            }
        }
        if !component.push_outer {
            let entries: Vec<(String, String)> = component
                .projections
                .iter()
                .map(|p| (p.field.to_string(), data_signal_name(&component.name, p)))
                .collect();
            signals.push(
                NewSignal::declare(component.name.clone())
                    .with_update(composite_update(
                        entries.iter().map(|(field, signal)| (field.as_str(), signal.as_str())),
                    ))
                    .into(),
            );
        }
    }
    signals
}

/// `{"<field>": <signal>, ...}` in the given order.
pub fn composite_update<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let body: Vec<String> = entries
        .into_iter()
        .map(|(field, signal)| format!("{}: {}", string_value(field), signal))
        .collect();
    format!("{{{}}}", body.join(", "))
}

/// `<selection>_<field>`, with the field verbatim.
pub fn data_signal_name(selection: &str, projection: &Projection) -> String {
    format!("{}_{}", selection, projection.field)
}

/// `<selection>_<channel>_px`, the pixel extent of a brush channel.
///
/// Data signals are named after fields, so a field literally called `x_px`
/// would clash; the name is extended with `_` until it is free.
pub fn visual_signal_name(component: &SelectionComponent, channel: Channel) -> String {
    let mut name = format!("{}_{}_px", component.name, channel);
    while component
        .projections
        .iter()
        .any(|p| data_signal_name(&component.name, p) == name)
    {
        name.push('_');
    }
    name
}

fn interval_signals(
    tree: &ViewTree,
    scales: &ScaleTable,
    unit: ViewId,
    component: &SelectionComponent,
    signals: &mut Vec<Signal>,
) {
    let name = &component.name;
    let mut triggers = Vec::new();
    let mut intervals = Vec::new();

    for projection in &component.projections {
        let Some(channel) = projection.channel else {
            continue;
        };
        let data = data_signal_name(name, projection);

        if component.is_bound_to(channel) {
            if component.pushes(projection) {
                signals.push(PushSignal::outer(data.clone()).into());
            } else {
                signals.push(NewSignal::declare(data.clone()).with_value(Value::Null).into());
            }
        } else {
            let visual = visual_signal_name(component, channel);
            signals.push(visual_signal(&visual, channel, &component.events).into());

            let scale = scales
                .lookup(tree, unit, channel)
                .map(|scale| scale.name.clone())
                .unwrap_or_else(|| channel.as_str().to_string());
            signals.push(
                NewSignal::declare(data.clone())
                    .with_on(OnEvent::new(
                        Events::Signal(SignalRef::new(visual.clone())),
                        format!(
                            "{v}[0] === {v}[1] ? null : invert({}, {v})",
                            string_value(&scale),
                            v = visual
                        ),
                    ))
                    .into(),
            );
        }

        intervals.push(format!(
            "{{encoding: {}, field: {}, extent: {}}}",
            string_value(channel.as_str()),
            string_value(projection.field.as_str()),
            data
        ));
        triggers.push(SignalRef::new(data));
    }

    signals.push(
        NewSignal::declare(format!("{}{}", name, TUPLE))
            .with_on(OnEvent::new(
                Events::Signals(triggers),
                format!(
                    "{{unit: {}, intervals: [{}]}}",
                    string_value(tree.name(unit)),
                    intervals.join(", ")
                ),
            ))
            .into(),
    );
}

/// Pixel extent of a brush along one positional channel.
fn visual_signal(name: &str, channel: Channel, events: &str) -> NewSignal {
    let coord = format!("{}(unit)", channel);
    let size = channel.size_signal().unwrap_or("width");
    NewSignal::declare(name)
        .with_value(json!([]))
        .with_on(OnEvent::new(
            Events::Selector(start_event(events)),
            format!("[{c}, {c}]", c = coord),
        ))
        .with_on(OnEvent::new(
            Events::Selector(events.to_string()),
            format!("[{}[0], clamp({}, 0, {})]", name, coord, size),
        ))
}

/// The event that starts a drag stream: `A` in `[A, B] > C`.
///
/// `A` may carry its own `[filter]`, so the split is at the first comma
/// outside any nested brackets.
fn start_event(events: &str) -> String {
    let trimmed = events.trim();
    let Some(rest) = trimmed.strip_prefix('[') else {
        return trimmed.to_string();
    };
    let mut depth = 0usize;
    for (index, c) in rest.char_indices() {
        match c {
            '[' => depth += 1,
            ']' if depth == 0 => break,
            ']' => depth -= 1,
            ',' if depth == 0 => return rest[..index].trim().to_string(),
            _ => {}
        }
    }
    trimmed.to_string()
}

fn point_signals(tree: &ViewTree, unit: ViewId, component: &SelectionComponent, signals: &mut Vec<Signal>) {
    let tuple = format!("{}{}", component.name, TUPLE);

    let encodings: Vec<String> = component
        .projections
        .iter()
        .filter_map(|p| p.channel.map(|c| string_value(c.as_str())))
        .collect();
    let fields: Vec<String> = component
        .projections
        .iter()
        .map(|p| string_value(p.field.as_str()))
        .collect();
    let values: Vec<String> = component
        .projections
        .iter()
        .map(|p| p.field.datum_access("datum"))
        .collect();

    let update = format!(
        "datum && item().mark.marktype !== 'group' ? {{unit: {}, encodings: [{}], fields: [{}], values: [{}]}} : null",
        string_value(tree.name(unit)),
        encodings.join(", "),
        fields.join(", "),
        values.join(", ")
    );
    signals.push(
        NewSignal::declare(tuple.clone())
            .with_value(json!({}))
            .with_on(OnEvent::new(Events::Selector(component.events.clone()), update).forced())
            .into(),
    );

    for (index, projection) in component.projections.iter().enumerate() {
        signals.push(
            NewSignal::declare(data_signal_name(&component.name, projection))
                .with_update(format!("{t} ? {t}.values[{}] : null", index, t = tuple))
                .into(),
        );
    }
}
