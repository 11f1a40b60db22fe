//! Schema registry
//!
//! Owns the raw schema document and everything shared across one
//! conversion run: the base namespace URI, the cache of already parsed
//! components, the orphan element sink and the skolemizer. One registry
//! is scoped to one top-level conversion and is passed by mutable
//! reference through the recursive evaluation; it is not designed for
//! concurrent mutation.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::builder;
use crate::component::Component;
use crate::error::{Result, SchemaError};
use crate::model::ModelElement;
use crate::uri::{self, Skolemizer, UuidSkolemizer};

/// Result of resolving a document path: a rebuilt component, or a bare
/// URI when the document holds a plain link at that position.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedNode {
    Component(Component),
    Uri(String),
}

/// Shared state for one conversion run.
pub struct Schema {
    base_uri: String,
    document: Value,
    parsed_components: HashMap<String, String>,
    orphan_elements: Vec<ModelElement>,
    skolemizer: Box<dyn Skolemizer>,
    resolving: HashSet<String>,
}

impl Schema {
    /// Create a registry for `document` under `base_uri`.
    ///
    /// An invalid base URI is the one fatal condition of the whole
    /// conversion: nothing sensible can be produced without a namespace
    /// to mint identifiers in.
    pub fn new(base_uri: impl Into<String>, document: Value) -> Result<Self> {
        Self::with_skolemizer(base_uri, document, Box::<UuidSkolemizer>::default())
    }

    /// Create a registry with a custom skolemizer, e.g. a deterministic
    /// one for reproducible output.
    pub fn with_skolemizer(
        base_uri: impl Into<String>,
        document: Value,
        skolemizer: Box<dyn Skolemizer>,
    ) -> Result<Self> {
        let base_uri = base_uri.into();
        uri::validate_uri(&base_uri)?;
        Ok(Self {
            base_uri,
            document,
            parsed_components: HashMap::new(),
            orphan_elements: Vec::new(),
            skolemizer,
            resolving: HashSet::new(),
        })
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Resolve a reference path to components.
    ///
    /// In-document paths (leading `#`) descend into the raw document by
    /// nested key lookup and rebuild components from whatever mapping is
    /// found there, injecting the last segment as title. Anything else is
    /// treated as a bare URI. Unknown paths and invalid URIs resolve to
    /// an empty list, never an error.
    pub fn get_components_by_path(&self, path: &str) -> Vec<ResolvedNode> {
        if path.starts_with('#') {
            let segments: Vec<&str> = path.split('/').collect();
            let keys = &segments[1..];
            let Some(last) = keys.last() else {
                return Vec::new();
            };
            match nested_get(&self.document, keys) {
                Some(node @ Value::Object(_)) => {
                    let raw = builder::with_default_title(node, last);
                    let segment_path: Vec<String> =
                        segments.iter().map(|s| s.to_string()).collect();
                    builder::create_components(&segment_path, &raw, &[])
                        .into_iter()
                        .map(ResolvedNode::Component)
                        .collect()
                }
                Some(Value::String(link)) if uri::is_valid_uri(link) => {
                    vec![ResolvedNode::Uri(link.clone())]
                }
                _ => Vec::new(),
            }
        } else if uri::is_valid_uri(path) {
            vec![ResolvedNode::Uri(path.to_string())]
        } else {
            Vec::new()
        }
    }

    /// Resolve a path given as a list of document keys.
    pub fn get_components_by_path_list(&self, keys: &[&str]) -> Vec<ResolvedNode> {
        self.get_components_by_path(&format!("#/{}", keys.join("/")))
    }

    /// Mint an identifier for a component at `complete_path`.
    ///
    /// The schema-derived candidate `base_uri + complete_path` is used
    /// when it forms a valid URI; everything else degrades to a fresh
    /// skolem identifier. Never fails.
    pub fn create_identifier(&mut self, complete_path: Option<&str>) -> String {
        if let Some(path) = complete_path {
            let candidate = format!("{}{}", self.base_uri, path);
            if uri::is_valid_uri(&candidate) {
                return candidate;
            }
            tracing::debug!(%candidate, "identifier candidate is not a valid URI; skolemizing");
        }
        self.skolemizer.skolemize()
    }

    /// Register a component's identifier under its complete path.
    ///
    /// Anonymous components (no complete path) are not cached and the
    /// call is a no-op, so they are resolved fresh each time they are
    /// reached. Re-registering the same identifier is idempotent; a
    /// different identifier under an already used path is a logic fault.
    pub fn add_parsed_component(&mut self, component: &Component) -> Result<()> {
        let Some(path) = component.complete_path() else {
            return Ok(());
        };
        let Some(identifier) = component.identifier() else {
            return Ok(());
        };
        uri::validate_uri(identifier)?;
        match self.parsed_components.get(&path) {
            Some(existing) if existing == identifier => Ok(()),
            Some(_) => Err(SchemaError::ComponentAlreadyExists { path }),
            None => {
                self.parsed_components.insert(path, identifier.to_string());
                Ok(())
            }
        }
    }

    /// Identifier previously minted for `complete_path`, if any.
    pub fn get_parsed_component_uri(&self, complete_path: &str) -> Option<&str> {
        self.parsed_components.get(complete_path).map(String::as_str)
    }

    /// Append elements that are valid output but unreachable from the
    /// element currently being rendered.
    pub fn add_orphan_elements(&mut self, elements: Vec<ModelElement>) {
        self.orphan_elements.extend(elements);
    }

    pub fn orphan_elements(&self) -> &[ModelElement] {
        &self.orphan_elements
    }

    /// Drain the collected orphan elements.
    pub fn take_orphan_elements(&mut self) -> Vec<ModelElement> {
        std::mem::take(&mut self.orphan_elements)
    }

    /// Mark `reference` as being resolved. Returns false when the
    /// reference is already in flight, i.e. a reference cycle that the
    /// path cache cannot break (nothing got cached yet along the cycle).
    pub(crate) fn begin_reference(&mut self, reference: &str) -> bool {
        self.resolving.insert(reference.to_string())
    }

    pub(crate) fn end_reference(&mut self, reference: &str) {
        self.resolving.remove(reference);
    }
}

fn nested_get<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in keys {
        current = current.get(key)?;
    }
    Some(current)
}
