//! Scale domain resolution and scale assembly.
//!
//! A scale whose domain reads `{selection, field?, encoding?}` is driven by
//! the selection's data signal: its assembled `domainRaw` is
//! `{signal: '<selection>["<field>"]'}`. The field is picked, in order, from
//! the explicit `field`, the field projected on (or encoded on) `encoding`,
//! or the selection's projections.
//!
//! The referenced selection is looked up from the view owning the scale
//! through [`SelectionRegistry::lookup_from`]: nearest enclosing scope first,
//! then the whole spec. A reference that cannot be resolved is not an error;
//! the scale simply keeps its default domain.

use tracing::debug;
use vizsel_ast::{
    string_value, DataRef, FieldPath, ScaleComponent, ScaleDomain, SelectionDomain, SignalRef,
    VgDomain, VgScale, ViewId, ViewTree, DATA_SOURCE,
};

use super::registry::SelectionRegistry;
use super::scales::ScaleTable;
use crate::diagnostics::{CompileWarning, Diagnostics};

/// Resolve a selection domain of a scale owned by `owner`.
///
/// # Returns
///
/// The `domainRaw` signal, or `None` when the selection or field cannot be
/// resolved.
pub fn resolve_selection_domain(
    tree: &ViewTree,
    registry: &SelectionRegistry,
    owner: ViewId,
    domain: &SelectionDomain,
    diagnostics: &mut Diagnostics,
) -> Option<SignalRef> {
    let Some(component) = registry.lookup_from(tree, owner, &domain.selection) else {
        debug!(
            view = tree.name(owner),
            selection = %domain.selection,
            "selection domain references an unknown selection"
        );
        return None;
    };

    let field: Option<FieldPath> = if let Some(field) = &domain.field {
        Some(field.clone())
    } else if let Some(channel) = domain.encoding {
        component
            .projection_for_channel(channel)
            .map(|projection| projection.field.clone())
            .or_else(|| {
                tree.unit(component.unit)
                    .and_then(|unit| unit.field(channel))
                    .cloned()
            })
    } else {
        match component.projections.as_slice() {
            [] => None,
            [only] => Some(only.field.clone()),
            [first, ..] => {
                diagnostics.push(CompileWarning::selection_domain_multiple_fields(
                    tree.name(owner),
                    &domain.selection,
                    &first.field,
                ));
                Some(first.field.clone())
            }
        }
    };

    match field {
        Some(field) => Some(SignalRef::new(format!(
            "{}[{}]",
            domain.selection,
            string_value(field.as_str())
        ))),
        None => {
            debug!(
                view = tree.name(owner),
                selection = %domain.selection,
                "selection domain resolves to no field"
            );
            None
        }
    }
}

/// Assemble the scales owned by `view`, in canonical channel order.
pub fn assemble_scales_for_view(
    tree: &ViewTree,
    scales: &ScaleTable,
    registry: &SelectionRegistry,
    view: ViewId,
    diagnostics: &mut Diagnostics,
) -> Vec<VgScale> {
    scales
        .owned_by(view)
        .into_iter()
        .map(|component| assemble_scale(tree, registry, component, diagnostics))
        .collect()
}

fn assemble_scale(
    tree: &ViewTree,
    registry: &SelectionRegistry,
    component: &ScaleComponent,
    diagnostics: &mut Diagnostics,
) -> VgScale {
    // A scale binding wins over any declared selection domain.
    let domain_raw = match (&component.binding, &component.domain) {
        (Some(binding), _) => Some(binding.clone()),
        (None, ScaleDomain::Selection(domain)) => {
            resolve_selection_domain(tree, registry, component.owner, domain, diagnostics)
        }
        (None, ScaleDomain::Data | ScaleDomain::Literal(_)) => None,
    };

    let domain = match &component.domain {
        ScaleDomain::Literal(values) => VgDomain::Literal(values.clone()),
        ScaleDomain::Data | ScaleDomain::Selection(_) => VgDomain::Data(data_ref(&component.fields)),
    };

    VgScale {
        name: component.name.clone(),
        scale_type: component.scale_type,
        domain,
        domain_raw,
    }
}

fn data_ref(fields: &[FieldPath]) -> DataRef {
    match fields {
        [field] => DataRef {
            data: DATA_SOURCE.to_string(),
            field: Some(field.to_string()),
            fields: Vec::new(),
        },
        _ => DataRef {
            data: DATA_SOURCE.to_string(),
            field: None,
            fields: fields.iter().map(FieldPath::to_string).collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::WarningCode;
    use crate::resolve::test_support::{child, compile};
    use serde_json::json;
    use vizsel_ast::ScaleType;

    fn raw(scale: &VgScale) -> Option<&str> {
        scale.domain_raw_signal()
    }

    #[test]
    fn test_domains_from_selection_parameters() {
        let (compilation, _) = compile(json!({
            "vconcat": [
                {
                    "mark": "area",
                    "selection": {
                        "brush": {"type": "interval", "encodings": ["x"]},
                        "brush2": {"type": "multi", "fields": ["price"], "resolve": "intersect"}
                    },
                    "encoding": {
                        "x": {"field": "date", "type": "temporal"},
                        "y": {"field": "price", "type": "quantitative"}
                    }
                },
                {
                    "selection": {"brush3": {"type": "interval"}},
                    "mark": "area",
                    "encoding": {
                        "x": {"field": "date", "type": "temporal",
                              "scale": {"domain": {"selection": "brush", "encoding": "x"}}},
                        "y": {"field": "price", "type": "quantitative",
                              "scale": {"domain": {"selection": "brush2", "field": "price"}}},
                        "color": {"field": "symbol", "type": "nominal",
                                  "scale": {"domain": {"selection": "brush2"}}},
                        "opacity": {"field": "symbol", "type": "nominal",
                                    "scale": {"domain": {"selection": "brush3"}}}
                    }
                }
            ],
            "resolve": {"scale": {"color": "independent", "opacity": "independent"}}
        }));
        let mut diagnostics = Diagnostics::new();
        let scales = compilation.assemble_scales(child(&compilation, 1), &mut diagnostics);
        assert_eq!(scales.len(), 4);

        assert_eq!(raw(&scales[0]), Some(r#"brush["date"]"#));
        assert_eq!(raw(&scales[1]), Some(r#"brush2["price"]"#));
        assert_eq!(raw(&scales[2]), Some(r#"brush2["price"]"#));
        assert_eq!(raw(&scales[3]), Some(r#"brush3["date"]"#));
        for scale in &scales {
            assert!(matches!(scale.domain, VgDomain::Data(_)));
        }
        assert_eq!(diagnostics.count(WarningCode::SelectionDomainMultipleFields), 1);
    }

    #[test]
    fn test_selection_visible_from_sibling_layer() {
        let (compilation, _) = compile(json!({
            "vconcat": [
                {"layer": [{
                    "mark": "point",
                    "encoding": {
                        "x": {"field": "date", "type": "temporal",
                              "scale": {"domain": {"selection": "brush"}}},
                        "y": {"field": "price", "type": "quantitative"}
                    }
                }]},
                {
                    "mark": "area",
                    "selection": {"brush": {"type": "interval", "encodings": ["x"]}},
                    "encoding": {
                        "x": {"field": "date", "type": "temporal"},
                        "y": {"field": "price", "type": "quantitative"}
                    }
                }
            ]
        }));
        let mut diagnostics = Diagnostics::new();
        let scales = compilation.assemble_scales(child(&compilation, 0), &mut diagnostics);
        assert_eq!(scales[0].name, "concat_0_x");
        assert_eq!(raw(&scales[0]), Some(r#"brush["date"]"#));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_nested_fields_by_encoding_and_by_field() {
        let (compilation, _) = compile(json!({
            "vconcat": [
                {
                    "mark": "area",
                    "selection": {"brush": {"type": "interval", "encodings": ["x"]}},
                    "encoding": {
                        "x": {"field": "nested.a", "type": "temporal"},
                        "y": {"field": "price", "type": "quantitative"}
                    }
                },
                {
                    "mark": "area",
                    "encoding": {
                        "x": {"field": "date", "type": "temporal",
                              "scale": {"domain": {"selection": "brush", "encoding": "x"}}},
                        "y": {"field": "price", "type": "quantitative"}
                    }
                },
                {
                    "mark": "area",
                    "encoding": {
                        "x": {"field": "date", "type": "temporal",
                              "scale": {"domain": {"selection": "brush", "field": "nested.a"}}},
                        "y": {"field": "price", "type": "quantitative"}
                    }
                }
            ]
        }));
        let mut diagnostics = Diagnostics::new();
        for index in [1, 2] {
            let scales = compilation.assemble_scales(child(&compilation, index), &mut diagnostics);
            assert_eq!(raw(&scales[0]), Some(r#"brush["nested.a"]"#));
        }
    }

    #[test]
    fn test_unknown_selection_omits_domain_raw() {
        let (compilation, _) = compile(json!({
            "mark": "point",
            "encoding": {
                "x": {"field": "a", "type": "quantitative",
                      "scale": {"domain": {"selection": "nowhere"}}}
            }
        }));
        let mut diagnostics = Diagnostics::new();
        let scales = compilation.assemble_scales(compilation.tree().root(), &mut diagnostics);
        assert_eq!(scales.len(), 1);
        assert!(scales[0].domain_raw.is_none());
        assert!(diagnostics.is_empty());
        assert_eq!(
            serde_json::to_value(&scales[0]).unwrap(),
            json!({"name": "x", "type": "linear", "domain": {"data": "source_0", "field": "a"}})
        );
    }

    #[test]
    fn test_encoding_without_projection_falls_back_to_unit_field() {
        let (compilation, _) = compile(json!({
            "hconcat": [
                {
                    "mark": "point",
                    "selection": {"pick": {"type": "single", "fields": ["Origin"]}},
                    "encoding": {
                        "x": {"field": "Horsepower", "type": "quantitative"},
                        "color": {"field": "Origin", "type": "nominal"}
                    }
                },
                {
                    "mark": "point",
                    "encoding": {
                        "x": {"field": "Horsepower", "type": "quantitative",
                              "scale": {"domain": {"selection": "pick", "encoding": "x"}}}
                    }
                }
            ]
        }));
        let mut diagnostics = Diagnostics::new();
        let scales = compilation.assemble_scales(child(&compilation, 1), &mut diagnostics);
        assert_eq!(raw(&scales[0]), Some(r#"pick["Horsepower"]"#));
    }

    #[test]
    fn test_binding_wins_over_selection_domain() {
        let (compilation, _) = compile(json!({
            "mark": "point",
            "selection": {
                "grid": {"type": "interval", "bind": "scales", "encodings": ["x"]},
                "other": {"type": "single", "fields": ["b"]}
            },
            "encoding": {
                "x": {"field": "a", "type": "quantitative",
                      "scale": {"domain": {"selection": "other"}}},
                "y": {"field": "b", "type": "quantitative"}
            }
        }));
        let mut diagnostics = Diagnostics::new();
        let scales = compilation.assemble_scales(compilation.tree().root(), &mut diagnostics);
        assert_eq!(raw(&scales[0]), Some(r#"grid["a"]"#));
        assert_eq!(scales[0].scale_type, ScaleType::Linear);
        assert!(scales[1].domain_raw.is_none());
    }

    #[test]
    fn test_shared_scale_lists_all_fields() {
        let (compilation, _) = compile(json!({
            "layer": [
                {"mark": "point", "encoding": {"y": {"field": "low", "type": "quantitative"}}},
                {"mark": "point", "encoding": {"y": {"field": "high", "type": "quantitative"}}}
            ]
        }));
        let mut diagnostics = Diagnostics::new();
        let scales = compilation.assemble_scales(compilation.tree().root(), &mut diagnostics);
        assert_eq!(
            serde_json::to_value(&scales[0]).unwrap()["domain"],
            json!({"data": "source_0", "fields": ["low", "high"]})
        );
    }
}
