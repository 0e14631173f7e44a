//! Reference extraction
//!
//! Walks one form definition and collects the identifiers of every other
//! form it references. Three reference shapes exist, and any element may
//! carry any of them regardless of its type tag:
//!
//! 1. `formId`: direct sub-form embedding (grid-of-forms, subform element)
//! 2. `optionsSource.formId`: a select element backed by another form's
//!    submissions
//! 3. `loadSource.formId`: pre-population of an element from another form
//!
//! Extraction is a pure read over the document; the result is a sorted set
//! of distinct, non-empty identifiers.

use std::collections::BTreeSet;

use super::document::FormNode;

/// Property naming an embedded sub-form
const PROP_FORM_ID: &str = "formId";
/// Sub-structure property for selection-list data sources
const PROP_OPTIONS_SOURCE: &str = "optionsSource";
/// Sub-structure property for pre-population bindings
const PROP_LOAD_SOURCE: &str = "loadSource";

/// Collects every form identifier referenced by `form`
///
/// Visits the full child tree depth-first. Identifiers are trimmed;
/// empty or whitespace-only references are ignored rather than reported.
pub fn extract_references(form: &FormNode) -> BTreeSet<String> {
    let mut refs = BTreeSet::new();
    collect(form, &mut refs);
    refs
}

fn collect(node: &FormNode, refs: &mut BTreeSet<String>) {
    record(node.property_str(PROP_FORM_ID), refs);

    for source_prop in [PROP_OPTIONS_SOURCE, PROP_LOAD_SOURCE] {
        if let Some(source) = node.property_node(source_prop) {
            record(source.property_str(PROP_FORM_ID), refs);
        }
    }

    for child in &node.children {
        collect(child, refs);
    }
}

fn record(reference: Option<&str>, refs: &mut BTreeSet<String>) {
    if let Some(id) = reference {
        let id = id.trim();
        if !id.is_empty() {
            refs.insert(id.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::PropertyValue;

    fn subform(form_id: &str) -> FormNode {
        FormNode::new("subform").with_str("formId", form_id)
    }

    fn select_with_options(form_id: &str) -> FormNode {
        FormNode::new("select").with_property(
            "optionsSource",
            PropertyValue::Node(Box::new(FormNode::new("source").with_str("formId", form_id))),
        )
    }

    fn text_with_load(form_id: &str) -> FormNode {
        FormNode::new("text").with_property(
            "loadSource",
            PropertyValue::Node(Box::new(FormNode::new("source").with_str("formId", form_id))),
        )
    }

    #[test]
    fn no_references() {
        let form = FormNode::new("form").with_child(FormNode::new("text"));
        assert!(extract_references(&form).is_empty());
    }

    #[test]
    fn direct_embedding() {
        let form = FormNode::new("form").with_child(subform("address_block"));
        let refs = extract_references(&form);
        assert_eq!(refs, BTreeSet::from(["address_block".to_string()]));
    }

    #[test]
    fn options_source() {
        let form = FormNode::new("form").with_child(select_with_options("departments"));
        assert!(extract_references(&form).contains("departments"));
    }

    #[test]
    fn load_source() {
        let form = FormNode::new("form").with_child(text_with_load("employee_defaults"));
        assert!(extract_references(&form).contains("employee_defaults"));
    }

    #[test]
    fn deeply_nested_references_are_found() {
        let deep = FormNode::new("section")
            .with_child(FormNode::new("grid").with_child(subform("nested_target")));
        let form = FormNode::new("form").with_child(deep);

        assert!(extract_references(&form).contains("nested_target"));
    }

    #[test]
    fn all_shapes_combine_and_dedupe() {
        let form = FormNode::new("form")
            .with_child(subform("shared"))
            .with_child(select_with_options("shared"))
            .with_child(text_with_load("other"));

        let refs = extract_references(&form);
        assert_eq!(
            refs,
            BTreeSet::from(["other".to_string(), "shared".to_string()])
        );
    }

    #[test]
    fn blank_references_are_ignored() {
        let form = FormNode::new("form")
            .with_child(subform(""))
            .with_child(subform("   "))
            .with_child(subform("  real  "));

        let refs = extract_references(&form);
        assert_eq!(refs, BTreeSet::from(["real".to_string()]));
    }

    #[test]
    fn reference_on_root_node() {
        let form = FormNode::new("form").with_str("formId", "template");
        assert!(extract_references(&form).contains("template"));
    }

    #[test]
    fn non_string_form_id_is_not_a_reference() {
        let form = FormNode::new("form").with_child(
            FormNode::new("subform")
                .with_property("formId", PropertyValue::Number(serde_json::Number::from(7))),
        );
        assert!(extract_references(&form).is_empty());
    }
}
