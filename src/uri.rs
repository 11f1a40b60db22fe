//! URI syntax validation and skolem identifier minting

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::error::{Result, SchemaError};

/// Base used for skolem identifiers when none is configured.
pub const DEFAULT_SKOLEM_BASE: &str = "https://example.com";

/// Absolute URI: a scheme followed by at least one character that is legal
/// in a URI reference. Characters excluded per RFC 3986 (whitespace and the
/// delimiters `<>"{}|\^` and backtick).
static URI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s<>"{}|\\^`]+$"#).expect("URI pattern compiles")
});

/// Check whether `candidate` is a syntactically valid absolute URI.
pub fn is_valid_uri(candidate: &str) -> bool {
    URI_PATTERN.is_match(candidate)
}

/// Validate `candidate` as an absolute URI, returning it on success.
pub fn validate_uri(candidate: &str) -> Result<&str> {
    if is_valid_uri(candidate) {
        Ok(candidate)
    } else {
        Err(SchemaError::InvalidUri(candidate.to_string()))
    }
}

/// Minting of globally-unique identifiers for components that have no
/// stable, schema-derived URI.
///
/// This is a seam: the conversion engine only requires "give me a fresh
/// absolute URI", so alternative implementations can be injected (a
/// deterministic one for reproducible output, for instance).
pub trait Skolemizer {
    /// Mint a fresh globally-unique absolute identifier.
    fn skolemize(&mut self) -> String;
}

/// Default skolemizer minting `<base>/.well-known/skolem/<uuid4>` identifiers.
#[derive(Debug, Clone)]
pub struct UuidSkolemizer {
    base: String,
}

impl UuidSkolemizer {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

impl Default for UuidSkolemizer {
    fn default() -> Self {
        Self::new(DEFAULT_SKOLEM_BASE)
    }
}

impl Skolemizer for UuidSkolemizer {
    fn skolemize(&mut self) -> String {
        format!(
            "{}/.well-known/skolem/{}",
            self.base.trim_end_matches('/'),
            Uuid::new_v4()
        )
    }
}

/// Deterministic skolemizer minting `<base>/.well-known/skolem/<n>`.
///
/// Useful when output must be reproducible across runs, e.g. in golden
/// tests or diffable exports.
#[derive(Debug, Clone)]
pub struct SequentialSkolemizer {
    base: String,
    counter: u64,
}

impl SequentialSkolemizer {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            counter: 0,
        }
    }
}

impl Skolemizer for SequentialSkolemizer {
    fn skolemize(&mut self) -> String {
        let minted = format!(
            "{}/.well-known/skolem/{}",
            self.base.trim_end_matches('/'),
            self.counter
        );
        self.counter += 1;
        minted
    }
}
