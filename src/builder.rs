//! Component tree builder
//!
//! Maps raw JSON Schema nodes onto [`Component`] trees, recursively
//! materializing `properties`, `items`, `allOf` and `oneOf`. Keywords are
//! extracted by direct key lookup; anything absent stays absent.

use serde_json::{Map, Value};

use crate::component::{Component, Text};

/// Recursion limit for pathologically nested documents. JSON Schema
/// nesting is shallow in practice; past this depth children are dropped
/// rather than overflowing the stack.
const MAX_DEPTH: usize = 128;

/// Build the components for one raw schema node.
///
/// A node whose `type` is an array of type names expands into one
/// component per listed type (the same node re-read with `type` overridden),
/// modeling the "type can be an array" shorthand as a set of alternative
/// single-typed components. Every other node yields exactly one component.
pub fn create_components(
    path: &[String],
    raw: &Value,
    parent_required: &[String],
) -> Vec<Component> {
    if let Some(types) = raw.get("type").and_then(Value::as_array) {
        let names: Vec<&str> = types.iter().filter_map(Value::as_str).collect();
        if !names.is_empty() {
            return names
                .iter()
                .map(|name| build(path, raw, parent_required, Some(name), 0))
                .collect();
        }
    }
    vec![build(path, raw, parent_required, None, 0)]
}

/// Build a single component for one raw schema node.
pub fn create_component(path: &[String], raw: &Value, parent_required: &[String]) -> Component {
    build(path, raw, parent_required, None, 0)
}

fn build(
    path: &[String],
    raw: &Value,
    parent_required: &[String],
    type_override: Option<&str>,
    depth: usize,
) -> Component {
    let title = raw.get("title").and_then(Value::as_str).map(Text::new);
    let schema_type = match type_override {
        Some(name) => Some(name.to_string()),
        None => extract_type(raw),
    };
    let required = string_list(raw.get("required"));
    let one_of_raw = raw.get("oneOf").and_then(Value::as_array);

    let max_occurs = if schema_type.as_deref() == Some("array") {
        Some(
            raw.get("maxItems")
                .and_then(Value::as_u64)
                .map(|n| n.to_string())
                .unwrap_or_else(|| "*".to_string()),
        )
    } else if one_of_raw.map_or(false, |entries| !entries.is_empty()) {
        Some("*".to_string())
    } else {
        Some("1".to_string())
    };

    let min_occurs = match &title {
        Some(title) if parent_required.iter().any(|name| name == &title.value) => Some(1),
        _ => Some(0),
    };

    let child_path = match &title {
        Some(title) => {
            let mut extended = path.to_vec();
            extended.push(title.value.clone());
            extended
        }
        None => Component::anonymous_path(),
    };

    let mut component = Component {
        path: path.to_vec(),
        schema_type,
        title,
        description: raw.get("description").and_then(Value::as_str).map(Text::new),
        pattern: raw.get("pattern").and_then(Value::as_str).map(String::from),
        format: raw.get("format").and_then(Value::as_str).map(String::from),
        required: required.clone(),
        enum_values: raw
            .get("enum")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        minimum: number(raw.get("minimum")),
        maximum: number(raw.get("maximum")),
        exclusive_minimum: truthy_flag(raw.get("exclusiveMinimum")),
        exclusive_maximum: truthy_flag(raw.get("exclusiveMaximum")),
        min_length: raw.get("minLength").and_then(Value::as_u64),
        max_length: raw.get("maxLength").and_then(Value::as_u64),
        min_items: raw.get("minItems").and_then(Value::as_u64),
        max_items: raw.get("maxItems").and_then(Value::as_u64),
        reference: raw.get("$ref").and_then(Value::as_str).map(String::from),
        max_occurs,
        min_occurs,
        ..Default::default()
    };

    if depth >= MAX_DEPTH {
        tracing::warn!(?path, "schema nesting exceeds depth limit; dropping children");
        return component;
    }

    if let Some(items) = raw.get("items").filter(|node| node.is_object()) {
        component.items = Some(Box::new(build(
            &child_path,
            &with_title(items, "items", true),
            &required,
            None,
            depth + 1,
        )));
    }

    if let Some(properties) = raw.get("properties").and_then(Value::as_object) {
        component.properties = properties
            .iter()
            .map(|(name, node)| {
                build(
                    &child_path,
                    &with_title(node, name, false),
                    &required,
                    None,
                    depth + 1,
                )
            })
            .collect();
    }

    if let Some(entries) = raw.get("allOf").and_then(Value::as_array) {
        component.all_of = entries
            .iter()
            .map(|entry| build(&child_path, entry, &required, None, depth + 1))
            .collect();
    }

    if let Some(entries) = one_of_raw {
        component.one_of = entries
            .iter()
            .map(|entry| build(&child_path, entry, &required, None, depth + 1))
            .collect();
    }

    component
}

fn extract_type(raw: &Value) -> Option<String> {
    match raw.get("type") {
        Some(Value::String(name)) => Some(name.clone()),
        Some(Value::Array(names)) => names.iter().find_map(Value::as_str).map(String::from),
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn number(value: Option<&Value>) -> Option<serde_json::Number> {
    match value {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    }
}

/// Draft 4 uses boolean exclusivity flags; later drafts allow numbers.
/// Either way the component only needs to know whether the bound is
/// exclusive.
fn truthy_flag(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(flag) => Some(*flag),
        Value::Number(n) => Some(n.as_f64().map_or(false, |f| f != 0.0)),
        _ => None,
    }
}

/// Clone of a raw node with `title` injected. Children found under
/// `properties` keep their own title if they declare one; `items` nodes
/// always get the synthetic `items` title.
fn with_title(raw: &Value, title: &str, force: bool) -> Value {
    let mut map: Map<String, Value> = raw.as_object().cloned().unwrap_or_default();
    if force || !map.contains_key("title") {
        map.insert("title".to_string(), Value::String(title.to_string()));
    }
    Value::Object(map)
}

/// Clone of a raw node with `title` defaulted to the given name. Used by
/// path resolution, where the last path segment names the node.
pub(crate) fn with_default_title(raw: &Value, title: &str) -> Value {
    with_title(raw, title, false)
}
