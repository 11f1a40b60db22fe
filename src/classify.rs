//! Type classification
//!
//! Determines WHAT each component denotes in the information model. The
//! classification is a pure function of the component and the schema
//! document; the emission engine switches over the resulting tag.
//!
//! The order of the checks is load-bearing: components can satisfy
//! several predicates at once (an enumerated object, say), and the first
//! match decides.

use crate::component::Component;
use crate::schema::{ResolvedNode, Schema};
use crate::uri;

/// JSON Schema type names that denote a primitive simple type. `int32`
/// shows up as a format alias for 32-bit integers.
pub const PRIMITIVE_TYPES: [&str; 5] = ["string", "boolean", "number", "integer", "int32"];

/// Canonical vocabulary URI for a primitive type name.
pub fn type_definition_reference(type_name: &str) -> Option<&'static str> {
    match type_name {
        "string" => Some("https://www.w3.org/2019/wot/json-schema#stringschema"),
        "boolean" => Some("https://www.w3.org/2019/wot/json-schema#booleanschema"),
        "number" => Some("https://www.w3.org/2019/wot/json-schema#numberschema"),
        "integer" | "int32" => Some("https://www.w3.org/2019/wot/json-schema#integerschema"),
        _ => None,
    }
}

/// Semantic category of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    ObjectType,
    SimpleType,
    PrimitiveSimpleType,
    Choice,
    ObjectArray,
    SimpleTypeArray,
    Specializes,
    CodeList,
}

/// Kind of a `$ref` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// In-document path, `#`-prefixed.
    Recursive,
    /// Fully qualified URI to an outside resource.
    External,
}

/// Classify a reference string. `http`-prefixed strings that do not parse
/// as a URI are unresolvable, not external.
pub fn determine_reference_type(reference: Option<&str>) -> Option<ReferenceKind> {
    let reference = reference.filter(|r| !r.is_empty())?;
    if reference.starts_with('#') {
        return Some(ReferenceKind::Recursive);
    }
    if reference.starts_with("http") && uri::is_valid_uri(reference) {
        return Some(ReferenceKind::External);
    }
    None
}

/// Cap on chained `$ref` classification. A reference cycle that never
/// reaches a structural keyword would otherwise recurse forever.
const MAX_REF_DEPTH: usize = 64;

/// Classify a component into its semantic category, or `None` when it
/// carries no recognized type signal.
pub fn determine_component_type(component: &Component, schema: &Schema) -> Option<ComponentType> {
    classify(component, schema, 0)
}

/// Classification of the type a reference points at.
pub fn determine_ref_type(reference: &str, schema: &Schema) -> Option<ComponentType> {
    ref_type(reference, schema, 0)
}

fn classify(component: &Component, schema: &Schema, depth: usize) -> Option<ComponentType> {
    if let Some(items) = &component.items {
        match classify(items, schema, depth) {
            Some(ComponentType::ObjectType) => return Some(ComponentType::ObjectArray),
            Some(ComponentType::SimpleType) => return Some(ComponentType::SimpleTypeArray),
            // Arrays of anything else fall through to the later checks.
            // Notably, items classifying as a bare primitive are not
            // wrapped into an array category.
            _ => {}
        }
    }

    if component.specializes.is_some() {
        return Some(ComponentType::Specializes);
    }

    if !component.one_of.is_empty() {
        return Some(ComponentType::Choice);
    }

    if !component.enum_values.is_empty() {
        return Some(ComponentType::CodeList);
    }

    if component.schema_type.as_deref() == Some("object") || !component.properties.is_empty() {
        return Some(ComponentType::ObjectType);
    }

    if component
        .schema_type
        .as_deref()
        .map_or(false, |name| PRIMITIVE_TYPES.contains(&name))
    {
        return Some(if has_descriptive_fields(component) {
            ComponentType::SimpleType
        } else {
            ComponentType::PrimitiveSimpleType
        });
    }

    if let Some(reference) = component.reference.as_deref().filter(|r| !r.is_empty()) {
        return ref_type(reference, schema, depth);
    }

    None
}

fn ref_type(reference: &str, schema: &Schema, depth: usize) -> Option<ComponentType> {
    if depth >= MAX_REF_DEPTH {
        tracing::warn!(reference, "reference chain exceeds depth limit");
        return None;
    }
    match determine_reference_type(Some(reference))? {
        ReferenceKind::Recursive => {
            match schema.get_components_by_path(reference).into_iter().next()? {
                ResolvedNode::Component(component) => classify(&component, schema, depth + 1),
                // A bare link in the document denotes an object-typed
                // resource, same as an external reference.
                ResolvedNode::Uri(_) => Some(ComponentType::ObjectType),
            }
        }
        ReferenceKind::External => Some(ComponentType::ObjectType),
    }
}

/// Fields that make a primitive-typed component a named/constrained
/// simple type rather than the bare global primitive.
fn has_descriptive_fields(component: &Component) -> bool {
    component.title.is_some()
        || component.description.is_some()
        || component.pattern.is_some()
        || component.min_length.is_some()
        || component.max_length.is_some()
        || component.minimum.is_some()
        || component.maximum.is_some()
        || component.exclusive_minimum.is_some()
        || component.exclusive_maximum.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::create_component;
    use serde_json::json;

    fn empty_schema() -> Schema {
        Schema::new("http://uri.com", json!({})).expect("valid schema")
    }

    fn component_for(raw: serde_json::Value) -> Component {
        create_component(
            &["#".to_string(), "Test".to_string()],
            &raw,
            &[],
        )
    }

    #[test]
    fn test_reference_kinds() {
        assert_eq!(
            determine_reference_type(Some("#/test")),
            Some(ReferenceKind::Recursive)
        );
        assert_eq!(
            determine_reference_type(Some("http://uri.com#test")),
            Some(ReferenceKind::External)
        );
        assert_eq!(determine_reference_type(Some("test")), None);
        assert_eq!(determine_reference_type(Some("http://uri<.com")), None);
        assert_eq!(determine_reference_type(Some("")), None);
        assert_eq!(determine_reference_type(None), None);
    }

    #[test]
    fn test_object_classification() {
        let schema = empty_schema();
        let typed = component_for(json!({"type": "object"}));
        assert_eq!(
            determine_component_type(&typed, &schema),
            Some(ComponentType::ObjectType)
        );

        let untyped = component_for(json!({"properties": {"a": {"type": "string"}}}));
        assert_eq!(
            determine_component_type(&untyped, &schema),
            Some(ComponentType::ObjectType)
        );
    }

    #[test]
    fn test_primitive_without_constraints() {
        let schema = empty_schema();
        let component = component_for(json!({"type": "string"}));
        assert_eq!(
            determine_component_type(&component, &schema),
            Some(ComponentType::PrimitiveSimpleType)
        );
    }

    #[test]
    fn test_primitive_with_constraints_is_simple_type() {
        let schema = empty_schema();
        for raw in [
            json!({"type": "string", "title": "name"}),
            json!({"type": "string", "pattern": "^a"}),
            json!({"type": "integer", "minimum": 0}),
            json!({"type": "string", "maxLength": 10}),
        ] {
            let component = component_for(raw);
            assert_eq!(
                determine_component_type(&component, &schema),
                Some(ComponentType::SimpleType)
            );
        }
    }

    #[test]
    fn test_format_alone_does_not_constrain() {
        let schema = empty_schema();
        let component = component_for(json!({"type": "string", "format": "date-time"}));
        assert_eq!(
            determine_component_type(&component, &schema),
            Some(ComponentType::PrimitiveSimpleType)
        );
    }

    #[test]
    fn test_enum_wins_over_object_and_primitive() {
        let schema = empty_schema();
        let enumerated_string =
            component_for(json!({"type": "string", "enum": ["a", "b"]}));
        assert_eq!(
            determine_component_type(&enumerated_string, &schema),
            Some(ComponentType::CodeList)
        );

        let enumerated_object = component_for(json!({"type": "object", "enum": ["a"]}));
        assert_eq!(
            determine_component_type(&enumerated_object, &schema),
            Some(ComponentType::CodeList)
        );
    }

    #[test]
    fn test_one_of_wins_over_enum() {
        let schema = empty_schema();
        let component =
            component_for(json!({"oneOf": [{"type": "string"}], "enum": ["a"]}));
        assert_eq!(
            determine_component_type(&component, &schema),
            Some(ComponentType::Choice)
        );
    }

    #[test]
    fn test_array_of_objects() {
        let schema = empty_schema();
        let component = component_for(json!({
            "type": "array",
            "items": {"type": "object"}
        }));
        assert_eq!(
            determine_component_type(&component, &schema),
            Some(ComponentType::ObjectArray)
        );
    }

    #[test]
    fn test_array_of_constrained_strings() {
        let schema = empty_schema();
        // The injected "items" title makes the item component a named
        // simple type.
        let component = component_for(json!({
            "type": "array",
            "items": {"type": "string"}
        }));
        assert_eq!(
            determine_component_type(&component, &schema),
            Some(ComponentType::SimpleTypeArray)
        );
    }

    #[test]
    fn test_array_of_bare_primitives_falls_through() {
        let schema = empty_schema();
        // A hand-built component whose items carry no title at all: the
        // item classifies as a bare primitive, which the array check does
        // not recognize, and nothing else matches.
        let component = Component {
            path: vec!["#".to_string(), "Test".to_string()],
            items: Some(Box::new(Component {
                path: Component::anonymous_path(),
                schema_type: Some("string".to_string()),
                ..Default::default()
            })),
            ..Default::default()
        };
        assert_eq!(determine_component_type(&component, &schema), None);
    }

    #[test]
    fn test_specializes_wins_over_one_of() {
        let schema = empty_schema();
        let component = Component {
            path: Component::anonymous_path(),
            specializes: Some(Box::new(Component {
                path: Component::anonymous_path(),
                schema_type: Some("string".to_string()),
                ..Default::default()
            })),
            one_of: vec![Component::default()],
            ..Default::default()
        };
        assert_eq!(
            determine_component_type(&component, &schema),
            Some(ComponentType::Specializes)
        );
    }

    #[test]
    fn test_empty_component_is_unclassifiable() {
        let schema = empty_schema();
        let component = component_for(json!({}));
        assert_eq!(determine_component_type(&component, &schema), None);
    }

    #[test]
    fn test_recursive_reference_classifies_target() {
        let schema = Schema::new(
            "http://uri.com",
            json!({"Two": {"type": "object"}, "Str": {"type": "string", "title": "Str"}}),
        )
        .expect("valid schema");

        let object_ref = component_for(json!({"$ref": "#/Two"}));
        assert_eq!(
            determine_component_type(&object_ref, &schema),
            Some(ComponentType::ObjectType)
        );

        let string_ref = component_for(json!({"$ref": "#/Str"}));
        assert_eq!(
            determine_component_type(&string_ref, &schema),
            Some(ComponentType::SimpleType)
        );
    }

    #[test]
    fn test_external_reference_classifies_as_object() {
        let schema = empty_schema();
        let component = component_for(json!({"$ref": "http://someuri.com"}));
        assert_eq!(
            determine_component_type(&component, &schema),
            Some(ComponentType::ObjectType)
        );
    }

    #[test]
    fn test_unresolvable_reference_classifies_as_none() {
        let schema = empty_schema();
        let component = component_for(json!({"$ref": "not a reference"}));
        assert_eq!(determine_component_type(&component, &schema), None);
    }

    #[test]
    fn test_degenerate_reference_cycle_terminates() {
        let schema = Schema::new("http://uri.com", json!({"A": {"$ref": "#/A"}}))
            .expect("valid schema");
        let component = component_for(json!({"$ref": "#/A"}));
        assert_eq!(determine_component_type(&component, &schema), None);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let schema = empty_schema();
        let component = component_for(json!({"type": "string", "title": "name"}));
        let first = determine_component_type(&component, &schema);
        let second = determine_component_type(&component, &schema);
        assert_eq!(first, second);
    }
}
