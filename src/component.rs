//! Parsed schema components
//!
//! A [`Component`] is the immutable in-memory form of one JSON Schema node
//! at a specific path in the document, together with derived multiplicity
//! and path metadata. Components are built bottom-up by the
//! [builder](crate::builder) and read-only afterwards, except for the
//! lazily assigned identifier.

use std::cell::OnceCell;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Path segment marking an anonymous component with no stable address.
///
/// Components anchored at this path never produce a `complete_path` on
/// their own and are therefore never cached; synthetic primitives get a
/// title on top of it, which yields the global `/#<name>` address.
pub const EMPTY_PATH: &str = "#";

/// A human-readable text value with an optional locale.
///
/// Titles and descriptions are single-locale today; carrying the language
/// alongside the value keeps the door open for localized schemas without
/// taking on that complexity now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub value: String,
    pub language: Option<String>,
}

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
        }
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// One JSON Schema node plus its derived path and multiplicity metadata.
///
/// `path[0]` is the in-document marker `#`, `path[1]` the root key under
/// which the node was found; children extend the path with their parent's
/// title. Absent keywords are `None`/empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Component {
    pub path: Vec<String>,
    pub schema_type: Option<String>,
    pub title: Option<Text>,
    pub description: Option<Text>,
    pub pattern: Option<String>,
    pub format: Option<String>,
    pub required: Vec<String>,
    pub enum_values: Vec<serde_json::Value>,
    pub minimum: Option<serde_json::Number>,
    pub maximum: Option<serde_json::Number>,
    pub exclusive_minimum: Option<bool>,
    pub exclusive_maximum: Option<bool>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub items: Option<Box<Component>>,
    pub properties: Vec<Component>,
    pub all_of: Vec<Component>,
    pub one_of: Vec<Component>,
    pub reference: Option<String>,
    pub max_occurs: Option<String>,
    pub min_occurs: Option<u64>,
    pub specializes: Option<Box<Component>>,
    /// Assigned at most once by the emission engine, right before the
    /// component is first rendered. `OnceCell` makes the assignment
    /// structural: there is no API to overwrite a set value.
    pub identifier: OnceCell<String>,
}

impl Component {
    /// The anonymous path, for components with no stable address.
    pub fn anonymous_path() -> Vec<String> {
        vec![EMPTY_PATH.to_string()]
    }

    /// Complete path of this component: the path segments past the two
    /// root markers joined by `/`, with `#<title>` appended.
    ///
    /// `None` if and only if the component has no title. The complete path
    /// is the memoization key, so untitled components are resolved fresh
    /// on every encounter. Identifiers are formed by concatenating the
    /// base URI and this value, hence the leading slash.
    pub fn complete_path(&self) -> Option<String> {
        let title = &self.title.as_ref()?.value;
        let joined = if self.path.len() > 2 {
            self.path[2..].join("/")
        } else {
            String::new()
        };
        Some(format!("/{joined}#{title}"))
    }

    /// Path under which children of this component are anchored: the
    /// component's own path extended by its title, or the anonymous path
    /// when there is no title to extend with.
    pub fn child_path(&self) -> Vec<String> {
        match &self.title {
            Some(title) => {
                let mut path = self.path.clone();
                path.push(title.value.clone());
                path
            }
            None => Self::anonymous_path(),
        }
    }

    /// The identifier assigned to this component, if any.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.get().map(String::as_str)
    }

    /// Assign the component's identity. At most one assignment takes
    /// effect; a later attempt with a different value is a logic fault in
    /// the emission engine and is logged, keeping the first value.
    pub fn assign_identifier(&self, uri: &str) {
        if self.identifier.set(uri.to_string()).is_err()
            && self.identifier() != Some(uri)
        {
            tracing::warn!(
                path = ?self.path,
                kept = ?self.identifier(),
                rejected = uri,
                "identifier already assigned; keeping first value"
            );
        }
    }

    /// Copy of this component anchored at a different path.
    ///
    /// The identifier is not carried over: a re-anchored component has a
    /// new address and gets its own identity.
    pub fn repathed(&self, path: Vec<String>) -> Component {
        Component {
            path,
            identifier: OnceCell::new(),
            ..self.clone()
        }
    }

    /// Copy with `enum`, `title` and `description` cleared, anchored at a
    /// different path. Used to extract the plain simple-type basis out of
    /// an enumerated attribute without re-triggering code-list handling.
    pub fn stripped(&self, path: Vec<String>) -> Component {
        Component {
            path,
            title: None,
            description: None,
            enum_values: Vec::new(),
            identifier: OnceCell::new(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(path: &[&str], title: &str) -> Component {
        Component {
            path: path.iter().map(|s| s.to_string()).collect(),
            title: Some(Text::new(title)),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_path_at_root() {
        let component = titled(&["#"], "title");
        assert_eq!(component.complete_path().as_deref(), Some("/#title"));
    }

    #[test]
    fn test_complete_path_skips_root_markers() {
        let component = titled(&["#", "Eiendom", "Eiendom"], "erstatter");
        assert_eq!(
            component.complete_path().as_deref(),
            Some("/Eiendom#erstatter")
        );
    }

    #[test]
    fn test_complete_path_none_without_title() {
        let component = Component {
            path: vec!["#".to_string(), "path".to_string()],
            ..Default::default()
        };
        assert_eq!(component.complete_path(), None);
    }

    #[test]
    fn test_child_path_extends_with_title() {
        let component = titled(&["#", "Eiendom"], "Eiendom");
        assert_eq!(component.child_path(), vec!["#", "Eiendom", "Eiendom"]);
    }

    #[test]
    fn test_child_path_of_untitled_is_anonymous() {
        let component = Component {
            path: vec!["#".to_string(), "path".to_string()],
            ..Default::default()
        };
        assert_eq!(component.child_path(), vec![EMPTY_PATH]);
    }

    #[test]
    fn test_identifier_assigned_once() {
        let component = titled(&["#"], "title");
        assert_eq!(component.identifier(), None);

        component.assign_identifier("http://uri.com/#title");
        component.assign_identifier("http://uri.com/#other");

        assert_eq!(component.identifier(), Some("http://uri.com/#title"));
    }

    #[test]
    fn test_repathed_resets_identifier() {
        let component = titled(&["#", "One"], "oneToTwo");
        component.assign_identifier("http://uri.com/#One");

        let copy = component.repathed(vec![
            "#".to_string(),
            "One".to_string(),
            "oneToTwo".to_string(),
        ]);

        assert_eq!(copy.identifier(), None);
        assert_eq!(copy.title, component.title);
        assert_eq!(copy.complete_path().as_deref(), Some("/One#oneToTwo"));
    }

    #[test]
    fn test_stripped_clears_enum_and_metadata() {
        let component = Component {
            path: vec!["#".to_string(), "Eiendom".to_string()],
            schema_type: Some("string".to_string()),
            title: Some(Text::new("propertyCode")),
            description: Some(Text::new("kind of property")),
            enum_values: vec![serde_json::json!("residential")],
            ..Default::default()
        };

        let stripped = component.stripped(Component::anonymous_path());

        assert_eq!(stripped.title, None);
        assert_eq!(stripped.description, None);
        assert!(stripped.enum_values.is_empty());
        assert_eq!(stripped.schema_type.as_deref(), Some("string"));
        assert_eq!(stripped.complete_path(), None);
    }
}
