//! Turtle serialization of model elements
//!
//! Renders the typed graph nodes to Turtle 1.1. Each element writes its
//! own triple block and recurses into the nodes it owns; URI references
//! only appear as objects of the linking triple.

use crate::component::Text;
use crate::model::{
    Attribute, Choice, CodeElement, CodeList, ModelElement, ModelProperty, NodeRef, ObjectType,
    PropertyRef, Role, SimpleType, Specialization,
};

/// Vocabulary namespaces used in the rendered graph.
pub mod vocab {
    pub const MODELLDCATNO: &str = "https://data.norge.no/vocabulary/modelldcatno#";
    pub const DCT: &str = "http://purl.org/dc/terms/";
    pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
}

/// Render a complete Turtle document for the given elements and orphans.
pub fn render_document(elements: &[ModelElement], orphans: &[ModelElement]) -> String {
    let mut out = String::with_capacity(4 * 1024);

    out.push_str(&format!("@prefix dct:   <{}> .\n", vocab::DCT));
    out.push_str(&format!(
        "@prefix modelldcatno: <{}> .\n",
        vocab::MODELLDCATNO
    ));
    out.push_str(&format!("@prefix skos:  <{}> .\n", vocab::SKOS));
    out.push_str(&format!("@prefix xsd:   <{}> .\n", vocab::XSD));
    out.push('\n');

    for element in elements.iter().chain(orphans) {
        write_element(&mut out, element);
    }

    out
}

/// Append the triple block for one element, recursing into owned nodes.
pub fn write_element(out: &mut String, element: &ModelElement) {
    match element {
        ModelElement::ObjectType(node) => write_object_type(out, node),
        ModelElement::SimpleType(node) => write_simple_type(out, node),
        ModelElement::CodeList(node) => write_code_list(out, node),
        ModelElement::CodeElement(node) => write_code_element(out, node),
    }
}

fn write_property(out: &mut String, property: &ModelProperty) {
    match property {
        ModelProperty::Attribute(node) => write_attribute(out, node),
        ModelProperty::Role(node) => write_role(out, node),
        ModelProperty::Choice(node) => write_choice(out, node),
        ModelProperty::Specialization(node) => write_specialization(out, node),
    }
}

fn write_object_type(out: &mut String, node: &ObjectType) {
    let mut block = Block::new(&node.identifier, "modelldcatno:ObjectType");
    block.text("dct:title", &node.title);
    block.text("dct:description", &node.description);
    for property in &node.properties {
        block.link("modelldcatno:hasProperty", property.identifier());
    }
    block.finish(out);

    for property in &node.properties {
        if let PropertyRef::Property(property) = property {
            write_property(out, property);
        }
    }
}

fn write_simple_type(out: &mut String, node: &SimpleType) {
    let mut block = Block::new(&node.identifier, "modelldcatno:SimpleType");
    block.text("dct:title", &node.title);
    block.text("dct:description", &node.description);
    if let Some(pattern) = &node.pattern {
        block.literal("xsd:pattern", &turtle_string(pattern));
    }
    if let Some(n) = node.min_length {
        block.literal("xsd:minLength", &non_negative(n));
    }
    if let Some(n) = node.max_length {
        block.literal("xsd:maxLength", &non_negative(n));
    }
    if let Some(n) = &node.min_inclusive {
        block.literal("xsd:minInclusive", &numeric(n));
    }
    if let Some(n) = &node.max_inclusive {
        block.literal("xsd:maxInclusive", &numeric(n));
    }
    if let Some(n) = &node.min_exclusive {
        block.literal("xsd:minExclusive", &numeric(n));
    }
    if let Some(n) = &node.max_exclusive {
        block.literal("xsd:maxExclusive", &numeric(n));
    }
    if let Some(reference) = &node.type_definition_reference {
        block.link("modelldcatno:typeDefinitionReference", reference);
    }
    for property in &node.properties {
        block.link("modelldcatno:hasProperty", property.identifier());
    }
    block.finish(out);

    for property in &node.properties {
        if let PropertyRef::Property(property) = property {
            write_property(out, property);
        }
    }
}

fn write_code_list(out: &mut String, node: &CodeList) {
    let mut block = Block::new(&node.identifier, "modelldcatno:CodeList");
    block.text("dct:title", &node.title);
    block.text("dct:description", &node.description);
    block.finish(out);
}

fn write_code_element(out: &mut String, node: &CodeElement) {
    let mut block = Block::new(&node.identifier, "modelldcatno:CodeElement");
    block.literal("skos:notation", &turtle_string(&node.notation));
    block.link("skos:inScheme", &node.in_scheme);
    block.finish(out);
}

fn write_attribute(out: &mut String, node: &Attribute) {
    let mut block = Block::new(&node.identifier, "modelldcatno:Attribute");
    block.text("dct:title", &node.title);
    block.text("dct:description", &node.description);
    block.occurs(&node.max_occurs, node.min_occurs);
    if let Some(simple_type) = &node.has_simple_type {
        block.link("modelldcatno:hasSimpleType", simple_type.identifier());
    }
    if let Some(value_source) = &node.has_value_from {
        block.link("modelldcatno:hasValueFrom", value_source.identifier());
    }
    block.finish(out);

    write_node_ref(out, &node.has_simple_type);
    write_node_ref(out, &node.has_value_from);
}

fn write_role(out: &mut String, node: &Role) {
    let mut block = Block::new(&node.identifier, "modelldcatno:Role");
    block.text("dct:title", &node.title);
    block.text("dct:description", &node.description);
    block.occurs(&node.max_occurs, node.min_occurs);
    if let Some(object_type) = &node.has_object_type {
        block.link("modelldcatno:hasObjectType", object_type.identifier());
    }
    block.finish(out);

    write_node_ref(out, &node.has_object_type);
}

fn write_choice(out: &mut String, node: &Choice) {
    let mut block = Block::new(&node.identifier, "modelldcatno:Choice");
    block.text("dct:title", &node.title);
    block.text("dct:description", &node.description);
    block.occurs(&node.max_occurs, node.min_occurs);
    for alternative in &node.has_some {
        block.link("modelldcatno:hasSome", alternative.identifier());
    }
    block.finish(out);

    for alternative in &node.has_some {
        if let NodeRef::Element(element) = alternative {
            write_element(out, element);
        }
    }
}

fn write_specialization(out: &mut String, node: &Specialization) {
    let mut block = Block::new(&node.identifier, "modelldcatno:Specialization");
    if let Some(concept) = &node.has_general_concept {
        block.link("modelldcatno:hasGeneralConcept", concept.identifier());
    }
    block.finish(out);

    write_node_ref(out, &node.has_general_concept);
}

fn write_node_ref(out: &mut String, node: &Option<NodeRef>) {
    if let Some(NodeRef::Element(element)) = node {
        write_element(out, element);
    }
}

/// Buffers one `subject a type ; predicate object ...` block, taking care
/// of the `;`/`.` punctuation between statements.
struct Block {
    buf: String,
}

impl Block {
    fn new(identifier: &str, rdf_type: &str) -> Self {
        Block {
            buf: format!("<{identifier}> a {rdf_type}"),
        }
    }

    fn text(&mut self, predicate: &str, text: &Option<Text>) {
        if let Some(text) = text {
            self.statement(predicate, &text_literal(text));
        }
    }

    fn link(&mut self, predicate: &str, uri: &str) {
        self.statement(predicate, &format!("<{uri}>"));
    }

    fn literal(&mut self, predicate: &str, literal: &str) {
        self.statement(predicate, literal);
    }

    /// Unbounded multiplicity is the plain literal `"*"`; bounded values
    /// are non-negative integers. A lower bound of zero is the default
    /// and is not rendered.
    fn occurs(&mut self, max_occurs: &Option<String>, min_occurs: Option<u64>) {
        if let Some(n) = min_occurs.filter(|n| *n > 0) {
            self.literal("xsd:minOccurs", &non_negative(n));
        }
        if let Some(max) = max_occurs {
            if max == "*" {
                self.literal("xsd:maxOccurs", "\"*\"");
            } else {
                self.literal(
                    "xsd:maxOccurs",
                    &format!("\"{max}\"^^xsd:nonNegativeInteger"),
                );
            }
        }
    }

    fn statement(&mut self, predicate: &str, object: &str) {
        self.buf.push_str(" ;\n  ");
        self.buf.push_str(predicate);
        self.buf.push(' ');
        self.buf.push_str(object);
    }

    fn finish(self, out: &mut String) {
        out.push_str(&self.buf);
        out.push_str(" .\n\n");
    }
}

fn non_negative(n: u64) -> String {
    format!("\"{n}\"^^xsd:nonNegativeInteger")
}

fn numeric(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        format!("\"{n}\"^^xsd:integer")
    } else {
        format!("\"{n}\"^^xsd:decimal")
    }
}

fn text_literal(text: &Text) -> String {
    match &text.language {
        Some(language) => format!("{}@{}", turtle_string(&text.value), language),
        None => turtle_string(&text.value),
    }
}

fn turtle_string(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_type_block() {
        let element = ModelElement::ObjectType(ObjectType {
            identifier: "http://uri.com/#Eiendom".to_string(),
            title: Some(Text::new("Eiendom")),
            description: None,
            properties: vec![PropertyRef::Reference(
                "http://uri.com/Eiendom#erstatter".to_string(),
            )],
        });

        let turtle = element.to_turtle();
        assert!(turtle.contains("<http://uri.com/#Eiendom> a modelldcatno:ObjectType"));
        assert!(turtle.contains("dct:title \"Eiendom\""));
        assert!(turtle.contains("modelldcatno:hasProperty <http://uri.com/Eiendom#erstatter>"));
        assert!(turtle.trim_end().ends_with('.'));
    }

    #[test]
    fn test_attribute_recurses_into_owned_simple_type() {
        let simple_type = ModelElement::SimpleType(SimpleType {
            title: Some(Text::new("string")),
            type_definition_reference: Some(
                "https://www.w3.org/2019/wot/json-schema#stringschema".to_string(),
            ),
            ..SimpleType::new("http://uri.com/#string")
        });
        let attribute = ModelProperty::Attribute(Attribute {
            identifier: "http://uri.com/Eiendom#erstatter".to_string(),
            title: Some(Text::new("erstatter")),
            description: None,
            max_occurs: Some("1".to_string()),
            min_occurs: Some(0),
            has_simple_type: Some(NodeRef::Element(Box::new(simple_type))),
            has_value_from: None,
        });

        let mut out = String::new();
        write_property(&mut out, &attribute);

        assert!(out.contains("a modelldcatno:Attribute"));
        assert!(out.contains("xsd:maxOccurs \"1\"^^xsd:nonNegativeInteger"));
        assert!(!out.contains("xsd:minOccurs"));
        assert!(out.contains("modelldcatno:hasSimpleType <http://uri.com/#string>"));
        assert!(out.contains("<http://uri.com/#string> a modelldcatno:SimpleType"));
        assert!(out.contains(
            "modelldcatno:typeDefinitionReference <https://www.w3.org/2019/wot/json-schema#stringschema>"
        ));
    }

    #[test]
    fn test_unbounded_max_occurs_is_plain_literal() {
        let choice = ModelProperty::Choice(Choice {
            identifier: "http://uri.com/A#dataType".to_string(),
            title: None,
            description: None,
            max_occurs: Some("*".to_string()),
            min_occurs: Some(1),
            has_some: vec![
                NodeRef::Reference("http://uri.com/#XML".to_string()),
                NodeRef::Reference("http://uri.com/#CSV".to_string()),
            ],
        });

        let mut out = String::new();
        write_property(&mut out, &choice);

        assert!(out.contains("xsd:maxOccurs \"*\""));
        assert!(!out.contains("xsd:maxOccurs \"*\"^^"));
        assert!(out.contains("xsd:minOccurs \"1\"^^xsd:nonNegativeInteger"));
        assert!(out.contains("modelldcatno:hasSome <http://uri.com/#XML>"));
        assert!(out.contains("modelldcatno:hasSome <http://uri.com/#CSV>"));
    }

    #[test]
    fn test_code_element_block() {
        let element = ModelElement::CodeElement(CodeElement {
            identifier: "https://example.com/.well-known/skolem/0".to_string(),
            notation: "residential".to_string(),
            in_scheme: "http://uri.com/Eiendom/propertyCode#propertyCode".to_string(),
        });

        let turtle = element.to_turtle();
        assert!(turtle.contains("a modelldcatno:CodeElement"));
        assert!(turtle.contains("skos:notation \"residential\""));
        assert!(turtle
            .contains("skos:inScheme <http://uri.com/Eiendom/propertyCode#propertyCode>"));
    }

    #[test]
    fn test_literal_escaping() {
        assert_eq!(turtle_string(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(turtle_string(r"back\slash"), r#""back\\slash""#);
    }

    #[test]
    fn test_document_prefix_header() {
        let document = render_document(&[], &[]);
        assert!(document.starts_with("@prefix dct:"));
        assert!(document.contains("@prefix modelldcatno:"));
        assert!(document.contains("@prefix skos:"));
        assert!(document.contains("@prefix xsd:"));
    }

    #[test]
    fn test_language_tagged_literal() {
        let text = Text {
            value: "Eiendom".to_string(),
            language: Some("nb".to_string()),
        };
        assert_eq!(text_literal(&text), "\"Eiendom\"@nb");
    }
}
