//! Top-level conversion entry points
//!
//! Ties the pieces together: parse the input text (YAML or JSON) into a
//! raw document, walk its root elements through the factory, and collect
//! the produced model elements together with the registry's orphans.

use serde_json::Value;

use crate::error::Result;
use crate::factory;
use crate::model::{turtle, ModelElement, NodeRef};
use crate::schema::{ResolvedNode, Schema};

/// The model output of one converted schema document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSchema {
    /// Elements reachable from the document's root elements.
    pub model_elements: Vec<ModelElement>,
    /// Valid output not reachable from any root element; must be merged
    /// into the same graph for completeness.
    pub orphan_elements: Vec<ModelElement>,
}

impl ParsedSchema {
    pub fn is_empty(&self) -> bool {
        self.model_elements.is_empty() && self.orphan_elements.is_empty()
    }
}

impl From<ParsedSchema> for (Vec<ModelElement>, Vec<ModelElement>) {
    fn from(parsed: ParsedSchema) -> Self {
        (parsed.model_elements, parsed.orphan_elements)
    }
}

/// Parse schema text into a raw document. YAML is a superset of JSON, so
/// both serializations are accepted.
pub fn parse_document(text: &str) -> Result<Value> {
    Ok(serde_yaml::from_str(text)?)
}

/// Convert a schema document to its model representation.
///
/// Input that is not a mapping converts to an empty result rather than
/// an error; an invalid `base_uri` is fatal.
pub fn json_schema_to_model(text: &str, base_uri: &str) -> Result<ParsedSchema> {
    if text.trim().is_empty() {
        return Ok(ParsedSchema::default());
    }
    let document = parse_document(text)?;
    if !document.is_object() {
        return Ok(ParsedSchema::default());
    }
    let mut schema = Schema::new(base_uri, document)?;
    Ok(parse_schema(&mut schema))
}

/// Convert every root element of the registry's document, in document
/// order, draining the orphan sink into the result.
pub fn parse_schema(schema: &mut Schema) -> ParsedSchema {
    let keys: Vec<String> = schema
        .document()
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default();

    let mut model_elements = Vec::new();
    for key in keys {
        tracing::debug!(root = %key, "converting root element");
        for resolved in schema.get_components_by_path(&format!("#/{key}")) {
            if let ResolvedNode::Component(component) = resolved {
                if let Some(NodeRef::Element(element)) =
                    factory::create_model_element(&component, schema)
                {
                    model_elements.push(*element);
                }
            }
        }
    }

    let orphan_elements = schema.take_orphan_elements();
    ParsedSchema {
        model_elements,
        orphan_elements,
    }
}

/// Convert a single component of the registry's document, given as a
/// list of document keys.
pub fn json_schema_component_to_model(schema: &mut Schema, path: &[&str]) -> ParsedSchema {
    if path.is_empty() {
        return ParsedSchema::default();
    }

    let mut model_elements = Vec::new();
    for resolved in schema.get_components_by_path_list(path) {
        if let ResolvedNode::Component(component) = resolved {
            if let Some(NodeRef::Element(element)) =
                factory::create_model_element(&component, schema)
            {
                model_elements.push(*element);
            }
        }
    }

    ParsedSchema {
        model_elements,
        orphan_elements: schema.orphan_elements().to_vec(),
    }
}

/// Convert a schema document straight to a Turtle graph document.
pub fn json_schema_to_graph(text: &str, base_uri: &str) -> Result<String> {
    let parsed = json_schema_to_model(text, base_uri)?;
    Ok(turtle::render_document(
        &parsed.model_elements,
        &parsed.orphan_elements,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelElement;
    use serde_json::json;

    const BASE_URI: &str = "http://uri.com";

    #[test]
    fn test_empty_input_converts_to_empty_model() {
        let parsed = json_schema_to_model("", BASE_URI).expect("converted");
        assert_eq!(parsed, ParsedSchema::default());
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_non_mapping_input_converts_to_empty_model() {
        let parsed = json_schema_to_model("42", BASE_URI).expect("converted");
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_invalid_base_uri_is_fatal() {
        assert!(json_schema_to_model(r#"{"Element": {"type": "object"}}"#, "<>").is_err());
    }

    #[test]
    fn test_converts_root_elements_in_document_order() {
        let text = r#"{
            "Beta": {"type": "object"},
            "Alpha": {"type": "object"}
        }"#;
        let parsed = json_schema_to_model(text, BASE_URI).expect("converted");

        let identifiers: Vec<&str> = parsed
            .model_elements
            .iter()
            .map(ModelElement::identifier)
            .collect();
        assert_eq!(
            identifiers,
            vec!["http://uri.com/#Beta", "http://uri.com/#Alpha"]
        );
    }

    #[test]
    fn test_accepts_yaml_input() {
        let text = "Eiendom:\n  type: object\n  properties:\n    erstatter:\n      type: string\n";
        let parsed = json_schema_to_model(text, BASE_URI).expect("converted");

        assert_eq!(parsed.model_elements.len(), 1);
        assert_eq!(
            parsed.model_elements[0].identifier(),
            "http://uri.com/#Eiendom"
        );
    }

    #[test]
    fn test_orphans_are_collected() {
        let text = r#"{
            "Eiendom": {
                "properties": {
                    "propertyCode": {"type": "string", "enum": ["a", "b", "c"]}
                }
            }
        }"#;
        let parsed = json_schema_to_model(text, BASE_URI).expect("converted");

        assert_eq!(parsed.model_elements.len(), 1);
        assert_eq!(parsed.orphan_elements.len(), 3);
        assert!(parsed
            .orphan_elements
            .iter()
            .all(|orphan| matches!(orphan, ModelElement::CodeElement(_))));
    }

    #[test]
    fn test_single_component_conversion() {
        let document = json!({"schemas": {"Element": {"type": "object"}}});
        let mut schema = crate::schema::Schema::new(BASE_URI, document).expect("valid schema");

        let parsed = json_schema_component_to_model(&mut schema, &["schemas", "Element"]);

        assert_eq!(parsed.model_elements.len(), 1);
        assert_eq!(
            parsed.model_elements[0].identifier(),
            "http://uri.com/Element#Element"
        );
    }

    #[test]
    fn test_single_component_conversion_with_empty_path() {
        let mut schema = crate::schema::Schema::new(BASE_URI, json!({})).expect("valid schema");
        assert_eq!(
            json_schema_component_to_model(&mut schema, &[]),
            ParsedSchema::default()
        );
    }

    #[test]
    fn test_graph_rendering_includes_elements_and_prefixes() {
        let text = r#"{"Eiendom": {"type": "object"}}"#;
        let graph = json_schema_to_graph(text, BASE_URI).expect("rendered");

        assert!(graph.starts_with("@prefix dct:"));
        assert!(graph.contains("<http://uri.com/#Eiendom> a modelldcatno:ObjectType"));
        assert!(graph.contains("dct:title \"Eiendom\""));
    }
}
