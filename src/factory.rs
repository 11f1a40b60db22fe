//! Model element and property factory
//!
//! The recursive emission engine. Two mutually recursive entry points
//! walk the same component tree: [`create_model_element`] produces
//! standalone graph nodes, [`create_model_property`] produces the typed
//! slots that attach them to an owning element.
//!
//! Both follow the same protocol: consult the registry's cache first
//! (which is what breaks cycles in self-referential schemas), resolve
//! `$ref`s instead of classifying (elements only), mint and register the
//! node's identity, then construct by classified category. Components
//! that classify to nothing yield nothing; callers filter silently.

use crate::classify::{self, ComponentType, ReferenceKind};
use crate::component::{Component, Text};
use crate::model::{
    Attribute, Choice, CodeElement, CodeList, ModelElement, ModelProperty, NodeRef, ObjectType,
    PropertyRef, Role, SimpleType, Specialization,
};
use crate::schema::{ResolvedNode, Schema};

/// Produce the standalone graph node for a component, or the identifier
/// of an equivalent node emitted earlier in this traversal.
pub fn create_model_element(component: &Component, schema: &mut Schema) -> Option<NodeRef> {
    let complete_path = component.complete_path();

    if let Some(path) = &complete_path {
        if let Some(uri) = schema.get_parsed_component_uri(path) {
            tracing::debug!(path = %path, "component already parsed; reusing identifier");
            return Some(NodeRef::Reference(uri.to_string()));
        }
    }

    if let Some(reference) = component.reference.clone().filter(|r| !r.is_empty()) {
        return resolve_component_reference(&reference, schema);
    }

    let classified = classify::determine_component_type(component, schema)?;
    if !matches!(
        classified,
        ComponentType::ObjectType
            | ComponentType::SimpleType
            | ComponentType::PrimitiveSimpleType
            | ComponentType::CodeList
    ) {
        // Property-only categories produce no standalone element.
        return None;
    }

    let identifier = schema.create_identifier(complete_path.as_deref());
    component.assign_identifier(&identifier);
    register(component, schema);

    let element = match classified {
        ComponentType::ObjectType => {
            ModelElement::ObjectType(create_object_type(component, &identifier, schema))
        }
        ComponentType::SimpleType => {
            ModelElement::SimpleType(create_simple_type(component, &identifier, schema))
        }
        ComponentType::PrimitiveSimpleType => {
            return Some(create_primitive_simple_type(component, schema))
        }
        ComponentType::CodeList => {
            ModelElement::CodeList(create_code_list(component, &identifier, schema))
        }
        _ => return None,
    };
    Some(NodeRef::Element(Box::new(element)))
}

/// Produce the property node for a component in a property position, or
/// the identifier of one emitted earlier.
pub fn create_model_property(component: &Component, schema: &mut Schema) -> Option<PropertyRef> {
    let complete_path = component.complete_path();

    if let Some(path) = &complete_path {
        if let Some(uri) = schema.get_parsed_component_uri(path) {
            tracing::debug!(path = %path, "property already parsed; reusing identifier");
            return Some(PropertyRef::Reference(uri.to_string()));
        }
    }

    let classified = classify::determine_component_type(component, schema)?;

    let identifier = schema.create_identifier(complete_path.as_deref());
    component.assign_identifier(&identifier);
    register(component, schema);

    let property = match classified {
        ComponentType::ObjectType => {
            ModelProperty::Role(create_role_property(component, &identifier, schema))
        }
        ComponentType::SimpleType
        | ComponentType::PrimitiveSimpleType
        | ComponentType::CodeList => {
            ModelProperty::Attribute(create_attribute_property(component, &identifier, schema))
        }
        ComponentType::Choice => {
            ModelProperty::Choice(create_choice_property(component, &identifier, schema))
        }
        ComponentType::ObjectArray => {
            ModelProperty::Role(create_object_array_property(component, &identifier, schema))
        }
        ComponentType::SimpleTypeArray => ModelProperty::Attribute(
            create_simple_type_array_property(component, &identifier, schema),
        ),
        ComponentType::Specializes => ModelProperty::Specialization(
            create_specialization_property(component, &identifier, schema),
        ),
    };
    Some(PropertyRef::Property(Box::new(property)))
}

fn register(component: &Component, schema: &mut Schema) {
    if let Err(err) = schema.add_parsed_component(component) {
        tracing::error!(%err, "component registration failed; keeping first registration");
    }
}

fn resolve_component_reference(reference: &str, schema: &mut Schema) -> Option<NodeRef> {
    match classify::determine_reference_type(Some(reference))? {
        ReferenceKind::Recursive => resolve_recursive_reference(reference, schema),
        ReferenceKind::External => Some(NodeRef::Reference(reference.to_string())),
    }
}

/// Resolve an in-document reference by rebuilding and emitting whatever
/// the path points at. The first produced element substitutes for the
/// referencing component; any further elements are valid output with no
/// place in the tree and go to the orphan sink. When only identifiers
/// come back (already-emitted or external nodes), the first one is the
/// answer.
fn resolve_recursive_reference(reference: &str, schema: &mut Schema) -> Option<NodeRef> {
    if !schema.begin_reference(reference) {
        tracing::warn!(reference, "unresolvable reference cycle; dropping");
        return None;
    }

    let mut elements: Vec<ModelElement> = Vec::new();
    let mut uris: Vec<String> = Vec::new();
    for node in schema.get_components_by_path(reference) {
        match node {
            ResolvedNode::Component(component) => {
                match create_model_element(&component, schema) {
                    Some(NodeRef::Element(element)) => elements.push(*element),
                    Some(NodeRef::Reference(uri)) => uris.push(uri),
                    None => {}
                }
            }
            ResolvedNode::Uri(uri) => uris.push(uri),
        }
    }
    schema.end_reference(reference);

    if elements.is_empty() {
        return uris.into_iter().next().map(NodeRef::Reference);
    }
    let mut elements = elements.into_iter();
    let primary = elements.next()?;
    let remaining: Vec<ModelElement> = elements.collect();
    if !remaining.is_empty() {
        schema.add_orphan_elements(remaining);
    }
    Some(NodeRef::Element(Box::new(primary)))
}

fn create_object_type(component: &Component, identifier: &str, schema: &mut Schema) -> ObjectType {
    ObjectType {
        identifier: identifier.to_string(),
        title: component.title.clone(),
        description: component.description.clone(),
        properties: component
            .properties
            .iter()
            .filter_map(|child| create_model_property(child, schema))
            .collect(),
    }
}

fn create_simple_type(component: &Component, identifier: &str, schema: &mut Schema) -> SimpleType {
    let mut simple_type = SimpleType::new(identifier);
    simple_type.title = component.title.clone();
    simple_type.description = component.description.clone();
    simple_type.pattern = component.pattern.clone();
    simple_type.min_length = component.min_length;
    simple_type.max_length = component.max_length;

    if let Some(minimum) = component.minimum.clone() {
        if component.exclusive_minimum.unwrap_or(false) {
            simple_type.min_exclusive = Some(minimum);
        } else {
            simple_type.min_inclusive = Some(minimum);
        }
    }
    if let Some(maximum) = component.maximum.clone() {
        if component.exclusive_maximum.unwrap_or(false) {
            simple_type.max_exclusive = Some(maximum);
        } else {
            simple_type.max_inclusive = Some(maximum);
        }
    }

    // A named simple type refines an anonymous primitive basis type.
    if component.title.is_some()
        && (component.schema_type.is_some() || component.format.is_some())
    {
        let specialization = specialization_component(component);
        if let Some(property) = create_model_property(&specialization, schema) {
            simple_type.properties = vec![property];
        }
    }

    simple_type
}

/// The synthetic component for a simple type's specialization slot: an
/// untitled node under `<path>/specializes` wrapping a primitive that
/// carries only the owner's type and format. Untitled, so it always
/// skolemizes and is never cached.
fn specialization_component(component: &Component) -> Component {
    let mut path = component.path.clone();
    path.push("specializes".to_string());
    Component {
        path,
        specializes: Some(Box::new(Component {
            path: Component::anonymous_path(),
            schema_type: component.schema_type.clone(),
            format: component.format.clone(),
            ..Default::default()
        })),
        ..Default::default()
    }
}

/// Emit the global primitive simple type for a component's type/format.
///
/// Primitives are path-independent: the node is anchored at the
/// anonymous path under its own name, so every occurrence of `string`
/// anywhere in the document collapses to the same cached node.
fn create_primitive_simple_type(component: &Component, schema: &mut Schema) -> NodeRef {
    let name = component
        .format
        .clone()
        .or_else(|| component.schema_type.clone());
    let primitive = Component {
        path: Component::anonymous_path(),
        title: name.map(Text::new),
        schema_type: component.schema_type.clone(),
        ..Default::default()
    };

    let complete_path = primitive.complete_path();
    if let Some(path) = &complete_path {
        if let Some(uri) = schema.get_parsed_component_uri(path) {
            return NodeRef::Reference(uri.to_string());
        }
    }

    let identifier = schema.create_identifier(complete_path.as_deref());
    primitive.assign_identifier(&identifier);
    register(&primitive, schema);

    let mut simple_type = SimpleType::new(&identifier);
    simple_type.title = primitive.title.clone();
    if let Some(reference) = primitive
        .schema_type
        .as_deref()
        .and_then(classify::type_definition_reference)
    {
        simple_type.type_definition_reference = Some(reference.to_string());
    }
    NodeRef::Element(Box::new(ModelElement::SimpleType(simple_type)))
}

fn create_code_list(component: &Component, identifier: &str, schema: &mut Schema) -> CodeList {
    let code_elements: Vec<ModelElement> = component
        .enum_values
        .iter()
        .map(|literal| {
            ModelElement::CodeElement(create_code_element(literal, identifier, schema))
        })
        .collect();
    schema.add_orphan_elements(code_elements);

    CodeList {
        identifier: identifier.to_string(),
        title: component.title.clone(),
        description: component.description.clone(),
    }
}

/// Code elements are emitted into the orphan sink, discoverable through
/// their back-reference to the owning code list.
fn create_code_element(
    literal: &serde_json::Value,
    code_list_uri: &str,
    schema: &mut Schema,
) -> CodeElement {
    let notation = literal
        .as_str()
        .map(String::from)
        .unwrap_or_else(|| literal.to_string());
    CodeElement {
        identifier: schema.create_identifier(None),
        notation,
        in_scheme: code_list_uri.to_string(),
    }
}

fn create_specialization_property(
    component: &Component,
    identifier: &str,
    schema: &mut Schema,
) -> Specialization {
    Specialization {
        identifier: identifier.to_string(),
        has_general_concept: component
            .specializes
            .as_deref()
            .and_then(|child| create_model_element(child, schema)),
    }
}

fn create_attribute_property(
    component: &Component,
    identifier: &str,
    schema: &mut Schema,
) -> Attribute {
    let child_path = component.child_path();
    let mut attribute = Attribute {
        identifier: identifier.to_string(),
        title: component.title.clone(),
        description: component.description.clone(),
        max_occurs: component.max_occurs.clone(),
        min_occurs: component.min_occurs,
        has_simple_type: None,
        has_value_from: None,
    };

    // The plain simple-type basis: the component with its enumeration
    // and naming stripped, so an enumerated string still links the
    // underlying string type.
    let stripped = component.stripped(child_path.clone());
    if matches!(
        classify::determine_component_type(&stripped, schema),
        Some(ComponentType::SimpleType) | Some(ComponentType::PrimitiveSimpleType)
    ) {
        attribute.has_simple_type = create_model_element(&stripped, schema);
    }

    if classify::determine_component_type(component, schema) == Some(ComponentType::CodeList) {
        let code_list = component.repathed(child_path);
        attribute.has_value_from = create_model_element(&code_list, schema);
    }

    attribute
}

fn create_choice_property(component: &Component, identifier: &str, schema: &mut Schema) -> Choice {
    Choice {
        identifier: identifier.to_string(),
        title: component.title.clone(),
        description: component.description.clone(),
        max_occurs: component.max_occurs.clone(),
        min_occurs: component.min_occurs,
        has_some: component
            .one_of
            .iter()
            .filter_map(|alternative| create_model_element(alternative, schema))
            .collect(),
    }
}

fn create_object_array_property(
    component: &Component,
    identifier: &str,
    schema: &mut Schema,
) -> Role {
    Role {
        identifier: identifier.to_string(),
        title: component.title.clone(),
        description: component.description.clone(),
        max_occurs: component.max_occurs.clone(),
        min_occurs: component.min_occurs,
        has_object_type: component
            .items
            .as_deref()
            .and_then(|items| create_model_element(items, schema)),
    }
}

fn create_simple_type_array_property(
    component: &Component,
    identifier: &str,
    schema: &mut Schema,
) -> Attribute {
    Attribute {
        identifier: identifier.to_string(),
        title: component.title.clone(),
        description: component.description.clone(),
        max_occurs: component.max_occurs.clone(),
        min_occurs: component.min_occurs,
        has_simple_type: component
            .items
            .as_deref()
            .and_then(|items| create_model_element(items, schema)),
        has_value_from: None,
    }
}

/// The value of an inline object-typed property IS an object type of its
/// own, anchored under the property's child path.
fn create_role_property(component: &Component, identifier: &str, schema: &mut Schema) -> Role {
    let inline = component.repathed(component.child_path());
    Role {
        identifier: identifier.to_string(),
        title: component.title.clone(),
        description: component.description.clone(),
        max_occurs: component.max_occurs.clone(),
        min_occurs: component.min_occurs,
        has_object_type: create_model_element(&inline, schema),
    }
}
