//! Information model nodes
//!
//! Typed graph nodes produced by the conversion: standalone elements
//! (object types, simple types, code lists and their code elements) and
//! the properties that attach them to an owning element (attributes,
//! roles, choices, specializations). Every node carries its own
//! identifier and renders its own triples; see [`turtle`].

pub mod turtle;

use serde::{Deserialize, Serialize};

use crate::component::Text;

/// A standalone graph node with its own identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelElement {
    ObjectType(ObjectType),
    SimpleType(SimpleType),
    CodeList(CodeList),
    CodeElement(CodeElement),
}

impl ModelElement {
    pub fn identifier(&self) -> &str {
        match self {
            ModelElement::ObjectType(node) => &node.identifier,
            ModelElement::SimpleType(node) => &node.identifier,
            ModelElement::CodeList(node) => &node.identifier,
            ModelElement::CodeElement(node) => &node.identifier,
        }
    }

    /// Render this element (and every node it owns) as Turtle triples.
    pub fn to_turtle(&self) -> String {
        let mut out = String::new();
        turtle::write_element(&mut out, self);
        out
    }
}

/// Result of emitting an element: either a fully constructed node or a
/// bare URI reference to a node that exists elsewhere (already emitted
/// earlier in the traversal, or external to the document).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeRef {
    Element(Box<ModelElement>),
    Reference(String),
}

impl NodeRef {
    pub fn identifier(&self) -> &str {
        match self {
            NodeRef::Element(element) => element.identifier(),
            NodeRef::Reference(uri) => uri,
        }
    }
}

/// A typed slot on an owning element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelProperty {
    Attribute(Attribute),
    Role(Role),
    Choice(Choice),
    Specialization(Specialization),
}

impl ModelProperty {
    pub fn identifier(&self) -> &str {
        match self {
            ModelProperty::Attribute(node) => &node.identifier,
            ModelProperty::Role(node) => &node.identifier,
            ModelProperty::Choice(node) => &node.identifier,
            ModelProperty::Specialization(node) => &node.identifier,
        }
    }
}

/// Result of emitting a property: a constructed property node or a URI
/// reference to one emitted earlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyRef {
    Property(Box<ModelProperty>),
    Reference(String),
}

impl PropertyRef {
    pub fn identifier(&self) -> &str {
        match self {
            PropertyRef::Property(property) => property.identifier(),
            PropertyRef::Reference(uri) => uri,
        }
    }
}

/// A composite type holding named properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectType {
    pub identifier: String,
    pub title: Option<Text>,
    pub description: Option<Text>,
    pub properties: Vec<PropertyRef>,
}

/// A constrained or named scalar type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleType {
    pub identifier: String,
    pub title: Option<Text>,
    pub description: Option<Text>,
    pub pattern: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub min_inclusive: Option<serde_json::Number>,
    pub max_inclusive: Option<serde_json::Number>,
    pub min_exclusive: Option<serde_json::Number>,
    pub max_exclusive: Option<serde_json::Number>,
    /// Canonical vocabulary URI for the primitive this type denotes.
    pub type_definition_reference: Option<String>,
    pub properties: Vec<PropertyRef>,
}

impl SimpleType {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: None,
            description: None,
            pattern: None,
            min_length: None,
            max_length: None,
            min_inclusive: None,
            max_inclusive: None,
            min_exclusive: None,
            max_exclusive: None,
            type_definition_reference: None,
            properties: Vec::new(),
        }
    }
}

/// An enumeration scheme. Its code elements are emitted separately and
/// point back at the list via `in_scheme`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeList {
    pub identifier: String,
    pub title: Option<Text>,
    pub description: Option<Text>,
}

/// One literal of an enumeration scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeElement {
    pub identifier: String,
    pub notation: String,
    pub in_scheme: String,
}

/// A scalar-valued property, optionally constrained to a code list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub identifier: String,
    pub title: Option<Text>,
    pub description: Option<Text>,
    pub max_occurs: Option<String>,
    pub min_occurs: Option<u64>,
    pub has_simple_type: Option<NodeRef>,
    pub has_value_from: Option<NodeRef>,
}

/// An object-valued property (reference or containment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub identifier: String,
    pub title: Option<Text>,
    pub description: Option<Text>,
    pub max_occurs: Option<String>,
    pub min_occurs: Option<u64>,
    pub has_object_type: Option<NodeRef>,
}

/// A property whose value is one of several alternatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub identifier: String,
    pub title: Option<Text>,
    pub description: Option<Text>,
    pub max_occurs: Option<String>,
    pub min_occurs: Option<u64>,
    pub has_some: Vec<NodeRef>,
}

/// A property linking a named simple type to the primitive it refines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specialization {
    pub identifier: String,
    pub has_general_concept: Option<NodeRef>,
}
