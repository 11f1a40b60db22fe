//! JSON Schema to modelldcatno conversion
//!
//! Converts a JSON Schema document into a graph-based information model:
//! object types, simple types, attributes, roles, choices and code lists
//! identified by URIs minted under a base namespace, rendered as Turtle.
//!
//! ## Architecture
//!
//! ```text
//! raw document (JSON/YAML)
//!   └─ builder        rebuilds schema nodes as Component trees
//!        └─ classify  maps each Component to its semantic category
//!             └─ factory   emits typed graph nodes, resolving $refs and
//!                          deduplicating via the registry's path cache
//!                  └─ schema   base URI, raw document, cache, orphan sink
//! ```
//!
//! Components that resolve to the same document path are emitted exactly
//! once; later encounters reuse the minted identifier. Elements that are
//! valid output but unreachable from any root (extra reference branches,
//! enum code elements) are collected separately as orphans and belong in
//! the same output graph.

pub mod builder;
pub mod classify;
pub mod component;
pub mod config;
pub mod error;
pub mod factory;
pub mod model;
pub mod parse;
pub mod schema;
pub mod uri;

pub use component::{Component, Text};
pub use config::ConvertConfig;
pub use error::{Result, SchemaError};
pub use factory::{create_model_element, create_model_property};
pub use model::{ModelElement, ModelProperty, NodeRef, PropertyRef};
pub use parse::{
    json_schema_component_to_model, json_schema_to_graph, json_schema_to_model, ParsedSchema,
};
pub use schema::{ResolvedNode, Schema};
pub use uri::{SequentialSkolemizer, Skolemizer, UuidSkolemizer};
