//! Top-level signal merging.
//!
//! Folds unit views, one at a time in the tree's declared order, into the
//! signal list of the top-level scope. Only outer-owned selections (bound to
//! scales from inside a composition) contribute here: their channel signals
//! are declared once at the top level and pushed to from every instance.
//!
//! The composite of each such selection is rebuilt from an ordered
//! accumulator of `field → signal` entries. A later unit can only extend the
//! accumulator, so keys stay in first-encounter order across the whole fold.

use indexmap::IndexMap;
use serde_json::json;
use tracing::trace;
use vizsel_ast::{Events, NewSignal, OnEvent, SelectionComponent, Signal};

use super::signals::{composite_update, data_signal_name};

/// Name of the signal tracking the unit group under the pointer.
pub const UNIT_SIGNAL: &str = "unit";

/// Top-level signals accumulated so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopLevelSignals {
    /// Signals in declaration order.
    pub signals: Vec<Signal>,
    /// Per selection, composite entries in first-encounter order.
    pub composites: IndexMap<String, IndexMap<String, String>>,
}

impl TopLevelSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.signals.iter().any(|s| s.name() == name)
    }

    pub fn get(&self, name: &str) -> Option<&Signal> {
        self.signals.iter().find(|s| s.name() == name)
    }

    /// All signals with the given name.
    pub fn named(&self, name: &str) -> Vec<&Signal> {
        self.signals.iter().filter(|s| s.name() == name).collect()
    }

    pub fn into_signals(self) -> Vec<Signal> {
        self.signals
    }

    fn upsert(&mut self, signal: Signal) {
        match self.signals.iter().position(|s| s.name() == signal.name()) {
            Some(index) => self.signals[index] = signal,
            None => self.signals.push(signal),
        }
    }
}

/// Merge the selections of one unit view into the top-level signals.
///
/// # Parameters
///
/// - `components`: the unit's parsed selections
/// - `acc`: signals accumulated from the units merged before this one
///
/// # Returns
///
/// The extended accumulator. A channel signal already declared at the top
/// level is reused; a new one is appended after its selection's composite,
/// whose update is regenerated from the accumulated entries.
pub fn assemble_top_level_signals(components: &[SelectionComponent], mut acc: TopLevelSignals) -> TopLevelSignals {
    if components.is_empty() {
        return acc;
    }
    if !acc.contains(UNIT_SIGNAL) {
        acc.signals.insert(0, unit_signal());
    }

    for component in components.iter().filter(|c| c.push_outer) {
        let mut introduced = Vec::new();
        for projection in component.projections.iter().filter(|p| component.pushes(p)) {
            let signal = data_signal_name(&component.name, projection);
            if acc.contains(&signal) {
                trace!(signal = %signal, "outer signal already declared");
                continue;
            }
            acc.composites
                .entry(component.name.clone())
                .or_default()
                .entry(projection.field.to_string())
                .or_insert_with(|| signal.clone());
            introduced.push(signal);
        }
        if introduced.is_empty() {
            continue;
        }

        let update = acc
            .composites
            .get(&component.name)
            .map(|entries| composite_update(entries.iter().map(|(f, s)| (f.as_str(), s.as_str()))))
            .unwrap_or_else(|| composite_update(Vec::<(&str, &str)>::new()));
        trace!(selection = %component.name, update = %update, "regenerated composite");
        acc.upsert(NewSignal::declare(component.name.clone()).with_update(update).into());
        for signal in introduced {
            acc.signals.push(NewSignal::declare(signal).into());
        }
    }
    acc
}

fn unit_signal() -> Signal {
    NewSignal::declare(UNIT_SIGNAL)
        .with_value(json!({}))
        .with_on(OnEvent::new(
            Events::Selector("mousemove".into()),
            "isTuple(group()) ? group() : unit",
        ))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::test_support::{child, compile};
    use serde_json::{json, Value};

    fn repeat_spec() -> Value {
        json!({
            "repeat": {
                "row": ["Horsepower", "Acceleration"],
                "column": ["Miles_per_Gallon", "Acceleration"]
            },
            "spec": {
                "mark": "point",
                "selection": {"grid": {"type": "interval", "resolve": "global", "bind": "scales"}},
                "encoding": {
                    "x": {"field": {"repeat": "column"}, "type": "quantitative"},
                    "y": {"field": {"repeat": "row"}, "type": "quantitative"},
                    "color": {"field": "Origin", "type": "nominal"}
                }
            }
        })
    }

    #[test]
    fn test_composite_extends_across_instances() {
        let (compilation, _) = compile(repeat_spec());
        let first = compilation
            .assemble_top_level_signals(child(&compilation, 0), TopLevelSignals::new())
            .unwrap();
        assert_eq!(first.named("grid_Horsepower").len(), 1);
        assert_eq!(first.named("grid_Miles_per_Gallon").len(), 1);
        let grid = first.named("grid");
        assert_eq!(grid.len(), 1);
        assert_eq!(
            grid[0].update(),
            Some(r#"{"Miles_per_Gallon": grid_Miles_per_Gallon, "Horsepower": grid_Horsepower}"#)
        );

        let second = compilation
            .assemble_top_level_signals(child(&compilation, 1), first)
            .unwrap();
        assert_eq!(second.named("grid_Acceleration").len(), 1);
        assert_eq!(second.named("grid_Horsepower").len(), 1);
        let grid = second.named("grid");
        assert_eq!(grid.len(), 1);
        assert_eq!(
            grid[0].update(),
            Some(concat!(
                r#"{"Miles_per_Gallon": grid_Miles_per_Gallon, "Horsepower": grid_Horsepower, "#,
                r#""Acceleration": grid_Acceleration}"#
            ))
        );
    }

    #[test]
    fn test_signal_order() {
        let (compilation, _) = compile(repeat_spec());
        let acc = compilation
            .assemble_top_level_signals(child(&compilation, 0), TopLevelSignals::new())
            .unwrap();
        let names: Vec<_> = acc.signals.iter().map(Signal::name).collect();
        assert_eq!(
            names,
            vec!["unit", "grid", "grid_Miles_per_Gallon", "grid_Horsepower"]
        );
        assert_eq!(
            serde_json::to_value(&acc.signals[0]).unwrap(),
            json!({
                "name": "unit",
                "value": {},
                "on": [{"events": "mousemove", "update": "isTuple(group()) ? group() : unit"}]
            })
        );
        assert_eq!(
            serde_json::to_value(&acc.signals[2]).unwrap(),
            json!({"name": "grid_Miles_per_Gallon"})
        );
    }

    #[test]
    fn test_satisfied_instance_adds_nothing() {
        let (compilation, _) = compile(repeat_spec());
        let acc = compilation
            .assemble_top_level_signals(child(&compilation, 0), TopLevelSignals::new())
            .unwrap();
        let before = acc.clone();
        // repeat_row_0_column_0 again: every channel is already declared.
        let again = compilation
            .assemble_top_level_signals(child(&compilation, 0), acc)
            .unwrap();
        assert_eq!(again, before);
    }

    #[test]
    fn test_concat_siblings_extend_composite() {
        let (compilation, _) = compile(json!({
            "hconcat": [
                {
                    "mark": "point",
                    "encoding": {
                        "x": {"type": "quantitative", "field": "Miles_per_Gallon"},
                        "y": {"type": "quantitative", "field": "Weight_in_lbs"}
                    },
                    "selection": {"selector001": {"type": "interval", "bind": "scales"}}
                },
                {
                    "mark": "point",
                    "encoding": {
                        "x": {"type": "quantitative", "field": "Acceleration"},
                        "y": {"type": "quantitative", "field": "Horsepower"}
                    },
                    "selection": {"selector001": {"type": "interval", "bind": "scales"}}
                }
            ]
        }));
        let acc = compilation
            .assemble_top_level_signals(child(&compilation, 0), TopLevelSignals::new())
            .unwrap();
        let acc = compilation
            .assemble_top_level_signals(child(&compilation, 1), acc)
            .unwrap();
        assert_eq!(
            acc.get("selector001").unwrap().update(),
            Some(concat!(
                r#"{"Miles_per_Gallon": selector001_Miles_per_Gallon, "#,
                r#""Weight_in_lbs": selector001_Weight_in_lbs, "#,
                r#""Acceleration": selector001_Acceleration, "#,
                r#""Horsepower": selector001_Horsepower}"#
            ))
        );
    }

    #[test]
    fn test_unit_without_selections_is_a_no_op() {
        let (compilation, _) = compile(json!({"mark": "point"}));
        let acc = compilation
            .assemble_top_level_signals(compilation.tree().root(), TopLevelSignals::new())
            .unwrap();
        assert!(acc.signals.is_empty());
    }

    #[test]
    fn test_root_selection_only_adds_unit_signal() {
        let (compilation, _) = compile(json!({
            "mark": "point",
            "selection": {"grid": {"type": "interval", "bind": "scales"}},
            "encoding": {
                "x": {"field": "a", "type": "quantitative"},
                "y": {"field": "b", "type": "quantitative"}
            }
        }));
        let acc = compilation
            .assemble_top_level_signals(compilation.tree().root(), TopLevelSignals::new())
            .unwrap();
        let names: Vec<_> = acc.signals.iter().map(Signal::name).collect();
        assert_eq!(names, vec!["unit"]);
    }
}
