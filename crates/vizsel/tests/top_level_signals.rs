// Push signals and top-level merging, end to end
//
// A scale-bound interval selection inside a composition is owned by the top
// level: each instance only pushes to it, and the top-level composite grows
// in first-encounter order as instances are merged.

use vizsel::{Compilation, Diagnostics, Signal, TopLevelSignals, ViewId, ViewSpec};

fn parse(source: &str) -> Compilation {
    let spec: ViewSpec = serde_json::from_str(source).expect("fixture should deserialize");
    Compilation::from_spec(&spec, &mut Diagnostics::new()).expect("fixture should compile")
}

fn child(compilation: &Compilation, index: usize) -> ViewId {
    let tree = compilation.tree();
    tree.child(tree.root(), index).expect("child should exist")
}

fn named<'a>(signals: &'a [Signal], name: &str) -> Vec<&'a Signal> {
    signals.iter().filter(|s| s.name() == name).collect()
}

#[test]
fn test_marked_as_push_outer() {
    let compilation = parse(include_str!("fixtures/repeat_grid.json"));
    let signals = compilation
        .assemble_unit_signals(child(&compilation, 0))
        .unwrap();

    for name in ["grid_Horsepower", "grid_Miles_per_Gallon"] {
        let matching = named(&signals, name);
        assert_eq!(matching.len(), 1, "{}", name);
        assert!(matching[0].is_push());

        let value = serde_json::to_value(matching[0]).unwrap();
        assert_eq!(value["push"], "outer");
        assert!(value.get("value").is_none());
        assert!(value.get("update").is_none());
    }
}

#[test]
fn test_assembled_at_the_top_level() {
    let compilation = parse(include_str!("fixtures/repeat_grid.json"));

    let signals = compilation
        .assemble_top_level_signals(child(&compilation, 0), TopLevelSignals::new())
        .unwrap();
    assert_eq!(signals.named("grid_Horsepower").len(), 1);
    assert_eq!(signals.named("grid_Miles_per_Gallon").len(), 1);
    let named = signals.named("grid");
    assert_eq!(named.len(), 1);
    assert_eq!(
        named[0].update(),
        Some(r#"{"Miles_per_Gallon": grid_Miles_per_Gallon, "Horsepower": grid_Horsepower}"#)
    );

    let signals2 = compilation
        .assemble_top_level_signals(child(&compilation, 1), signals)
        .unwrap();
    assert_eq!(signals2.named("grid_Acceleration").len(), 1);
    let named = signals2.named("grid");
    assert_eq!(named.len(), 1);
    assert_eq!(
        named[0].update(),
        Some(
            r#"{"Miles_per_Gallon": grid_Miles_per_Gallon, "Horsepower": grid_Horsepower, "Acceleration": grid_Acceleration}"#
        )
    );
}

#[test]
fn test_concat_siblings_merge_in_order() {
    let compilation = parse(include_str!("fixtures/concat_scales.json"));
    let signals3 = compilation
        .assemble_top_level_signals(
            child(&compilation, 1),
            compilation
                .assemble_top_level_signals(child(&compilation, 0), TopLevelSignals::new())
                .unwrap(),
        )
        .unwrap();
    let named = signals3.named("selector001");
    assert_eq!(
        named[0].update(),
        Some(
            r#"{"Miles_per_Gallon": selector001_Miles_per_Gallon, "Weight_in_lbs": selector001_Weight_in_lbs, "Acceleration": selector001_Acceleration, "Horsepower": selector001_Horsepower}"#
        )
    );
}

#[test]
fn test_full_compile_declares_one_outer_set() {
    let output = vizsel::compile(include_str!("fixtures/repeat_grid.json")).unwrap();
    let top: Vec<_> = output.compiled.signals.iter().map(Signal::name).collect();
    assert_eq!(
        top,
        vec![
            "unit",
            "grid",
            "grid_Miles_per_Gallon",
            "grid_Horsepower",
            "grid_Acceleration"
        ]
    );

    // Every instance only pushes: no composite and no value-bearing channel.
    for view in output.compiled.views.iter().filter(|v| v.kind == "unit") {
        assert!(view.signals.iter().all(|s| s.name() != "grid"), "{}", view.name);
        for signal in view.signals.iter().filter(|s| s.name() != "grid_tuple") {
            assert!(signal.is_push(), "{} in {}", signal.name(), view.name);
        }
    }
}

#[test]
fn test_facet_instance_pushes_to_the_top_level() {
    let output = vizsel::compile(include_str!("fixtures/faceted.json")).unwrap();
    assert!(output.warnings.is_empty());

    let top: Vec<_> = output.compiled.signals.iter().map(Signal::name).collect();
    assert_eq!(top, vec!["unit", "grid", "grid_a", "grid_b"]);
    assert_eq!(
        output.compiled.signal("grid").unwrap().update(),
        Some(r#"{"a": grid_a, "b": grid_b}"#)
    );

    let child = output.compiled.view("child").unwrap();
    for name in ["grid_a", "grid_b"] {
        let matching = named(&child.signals, name);
        assert_eq!(matching.len(), 1, "{}", name);
        assert_eq!(
            serde_json::to_value(matching[0]).unwrap(),
            serde_json::json!({"name": name, "push": "outer"})
        );
    }
    assert!(named(&child.signals, "grid").is_empty());

    // Facets share their scales, so the bound scales sit on the facet itself.
    let root = output.compiled.view("root").unwrap();
    let raw: Vec<_> = root.scales.iter().map(|s| s.domain_raw_signal()).collect();
    assert_eq!(raw, vec![Some(r#"grid["a"]"#), Some(r#"grid["b"]"#)]);
    assert!(child.scales.is_empty());
}
