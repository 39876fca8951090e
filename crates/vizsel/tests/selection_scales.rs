// Selection-driven scale domains, end to end
//
// These tests compile the JSON fixtures under `fixtures/` and check the
// assembled `domainRaw` of each scale, plus the warnings raised for scale
// bindings that cannot be honoured.

use vizsel::{Compilation, Diagnostics, VgDomain, VgScale, ViewId, ViewSpec, WarningCode};

/// Helper: parse a fixture and run the parse passes.
fn parse(source: &str) -> (Compilation, Diagnostics) {
    let spec: ViewSpec = serde_json::from_str(source).expect("fixture should deserialize");
    let mut diagnostics = Diagnostics::new();
    let compilation =
        Compilation::from_spec(&spec, &mut diagnostics).expect("fixture should compile");
    (compilation, diagnostics)
}

fn child(compilation: &Compilation, index: usize) -> ViewId {
    let tree = compilation.tree();
    tree.child(tree.root(), index).expect("child should exist")
}

fn scales_of(compilation: &Compilation, view: ViewId) -> Vec<VgScale> {
    compilation.assemble_scales(view, &mut Diagnostics::new())
}

#[test]
fn test_extent_assembled_from_selection_parameter() {
    let (compilation, _) = parse(include_str!("fixtures/selection_extent.json"));
    let scales = scales_of(&compilation, child(&compilation, 1));
    assert_eq!(scales.len(), 4);

    let expected = [
        r#"brush["date"]"#,
        r#"brush2["price"]"#,
        r#"brush2["price"]"#,
        r#"brush3["date"]"#,
    ];
    for (scale, signal) in scales.iter().zip(expected) {
        assert!(matches!(scale.domain, VgDomain::Data(_)), "{}", scale.name);
        assert_eq!(scale.domain_raw_signal(), Some(signal), "{}", scale.name);
    }

    let names: Vec<_> = scales.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["concat_1_x", "concat_1_y", "concat_1_color", "concat_1_opacity"]
    );
}

#[test]
fn test_first_projection_used_for_ambiguous_domain() {
    let (compilation, _) = parse(include_str!("fixtures/selection_extent.json"));
    let mut diagnostics = Diagnostics::new();
    compilation.assemble_scales(child(&compilation, 1), &mut diagnostics);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics.warnings()[0].code,
        WarningCode::SelectionDomainMultipleFields
    );
    assert_eq!(diagnostics.warnings()[0].selection.as_deref(), Some("brush3"));
}

#[test]
fn test_diagonal_repeat_binds_both_scales() {
    let (compilation, diagnostics) = parse(include_str!("fixtures/repeat_grid.json"));
    assert!(diagnostics.is_empty());

    let scales = scales_of(&compilation, child(&compilation, 3));
    assert_eq!(scales.len(), 2);
    assert_eq!(scales[0].domain_raw_signal(), Some(r#"grid["Acceleration"]"#));
    assert_eq!(scales[1].domain_raw_signal(), Some(r#"grid["Acceleration"]"#));
}

#[test]
fn test_off_diagonal_repeat_binds_own_fields() {
    let (compilation, _) = parse(include_str!("fixtures/repeat_grid.json"));
    let scales = scales_of(&compilation, child(&compilation, 0));
    assert_eq!(scales[0].domain_raw_signal(), Some(r#"grid["Miles_per_Gallon"]"#));
    assert_eq!(scales[1].domain_raw_signal(), Some(r#"grid["Horsepower"]"#));

    // The shared color scale sits on the repeat and is never bound.
    let root = scales_of(&compilation, compilation.tree().root());
    assert_eq!(root.len(), 1);
    assert!(root[0].domain_raw.is_none());
}

#[test]
fn test_merged_for_layered_views() {
    let (compilation, _) = parse(include_str!("fixtures/layered.json"));
    let scales = scales_of(&compilation, child(&compilation, 0));
    assert_eq!(scales[0].domain_raw_signal(), Some(r#"brush["date"]"#));
}

#[test]
fn test_nested_field_references_in_unit() {
    let (compilation, _) = parse(include_str!("fixtures/nested_unit.json"));
    let scales = scales_of(&compilation, compilation.tree().root());
    assert_eq!(scales[0].domain_raw_signal(), Some(r#"grid["nested.b"]"#));
    assert_eq!(scales[1].domain_raw_signal(), Some(r#"grid["nested.a"]"#));
}

#[test]
fn test_nested_field_references_across_concat() {
    let (compilation, _) = parse(include_str!("fixtures/nested_concat.json"));
    for index in [1, 2] {
        let scales = scales_of(&compilation, child(&compilation, index));
        assert_eq!(scales[0].domain_raw_signal(), Some(r#"brush["nested.a"]"#));
    }
}

#[test]
fn test_no_binding_for_unavailable_scale() {
    let (compilation, diagnostics) = parse(
        r#"{
            "data": {"url": "data/cars.json"},
            "selection": {"grid": {"type": "interval", "bind": "scales"}},
            "mark": "circle",
            "encoding": {"y": {"field": "Miles_per_Gallon", "type": "quantitative"}}
        }"#,
    );
    assert_eq!(diagnostics.len(), 1);
    let warning = &diagnostics.warnings()[0];
    assert_eq!(warning.code, WarningCode::CannotProjectOnChannelWithoutField);
    assert_eq!(
        warning.message,
        r#"Cannot project selection "grid" on encoding channel "x", which has no field."#
    );

    let scales = scales_of(&compilation, compilation.tree().root());
    assert_eq!(scales.len(), 1);
    assert_eq!(scales[0].domain_raw_signal(), Some(r#"grid["Miles_per_Gallon"]"#));
}

#[test]
fn test_no_binding_for_discrete_scale() {
    let (compilation, diagnostics) = parse(
        r#"{
            "data": {"url": "data/cars.json"},
            "selection": {"grid": {"type": "interval", "bind": "scales"}},
            "mark": "circle",
            "encoding": {
                "x": {"field": "Origin", "type": "nominal"},
                "y": {"field": "Miles_per_Gallon", "type": "quantitative"}
            }
        }"#,
    );
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.warnings()[0].code, WarningCode::ScaleBindingsContinuous);

    let scales = scales_of(&compilation, compilation.tree().root());
    assert!(scales[0].domain_raw.is_none());
    assert!(scales[1].domain_raw.is_some());
}
