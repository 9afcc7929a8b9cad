//! RDF statement store for aspect model loading (boundary adapter).
//!
//! This crate sits at the **input boundary** of the instantiation engine:
//!
//! - It parses RDF text (untrusted) into a flat, ordered statement list.
//! - It indexes statements by subject and expands `rdf:List` chains.
//! - It groups stores into a [`Workspace`] of documents the engine can query.
//!
//! Parsing uses **Sophia** for the common serializations:
//! - N-Triples (`.nt`)
//! - Turtle (`.ttl`)
//! - N-Quads (`.nq`)
//! - TriG (`.trig`)
//! - RDF/XML (`.rdf`, `.owl`, `.xml`)
//!
//! Nothing here knows about the aspect meta model; vocabulary lives in
//! `aspectgraph-model`.

pub mod parse;
pub mod store;
pub mod workspace;

use serde::{Deserialize, Serialize};

pub use parse::{parse_statements, RdfFormat};
pub use store::{ListError, Store};
pub use workspace::{Document, DocumentId, Workspace};

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDF_TYPE_IRI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_FIRST_IRI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
pub const RDF_REST_IRI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
pub const RDF_NIL_IRI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
pub const RDF_LANG_STRING_IRI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

// ============================================================================
// RDF term model
// ============================================================================

/// A subject or non-literal object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RdfNode {
    Iri(String),
    BlankNode(String),
}

impl RdfNode {
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            Self::BlankNode(_) => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::BlankNode(_))
    }

    /// The IRI or the blank node label, whichever this node carries.
    pub fn key(&self) -> &str {
        match self {
            Self::Iri(iri) => iri,
            Self::BlankNode(label) => label,
        }
    }
}

impl std::fmt::Display for RdfNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{iri}>"),
            Self::BlankNode(label) => write!(f, "_:{label}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RdfLiteral {
    pub lexical: String,
    pub datatype: Option<String>,
    pub language: Option<String>,
}

impl RdfLiteral {
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    /// Boolean reading of `"true"`/`"1"`; anything else is false.
    pub fn as_bool(&self) -> bool {
        matches!(self.lexical.trim(), "true" | "1")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RdfObject {
    Node(RdfNode),
    Literal(RdfLiteral),
}

impl RdfObject {
    pub fn as_node(&self) -> Option<&RdfNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&RdfLiteral> {
        match self {
            Self::Literal(lit) => Some(lit),
            Self::Node(_) => None,
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        self.as_node().and_then(RdfNode::as_iri)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RdfStatement {
    pub index: usize,
    pub subject: RdfNode,
    pub predicate_iri: String,
    pub object: RdfObject,
    pub graph_name: Option<RdfNode>,
}

/// Last path segment of an IRI (after `#` or `/`).
pub fn local_name(iri: &str) -> &str {
    iri.rsplit(['#', '/']).next().unwrap_or(iri)
}

/// Namespace part of an IRI up to and including the last `#`.
pub fn namespace_of(iri: &str) -> Option<&str> {
    iri.rfind('#').map(|pos| &iri[..=pos])
}

#[derive(Debug, thiserror::Error)]
pub enum RdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse {format}: {message}")]
    Parse { format: &'static str, message: String },
    #[error("unsupported RDF term form: {0}")]
    Term(String),
    #[error("unsupported RDF format: .{0}")]
    UnsupportedFormat(String),
    #[error("failed to walk {path}: {message}")]
    Walk { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_name_and_namespace() {
        let iri = "urn:samm:org.example:1.0.0#Movement";
        assert_eq!(local_name(iri), "Movement");
        assert_eq!(namespace_of(iri), Some("urn:samm:org.example:1.0.0#"));
        assert_eq!(local_name("http://example.org/a/b"), "b");
        assert_eq!(namespace_of("http://example.org/a/b"), None);
    }

    #[test]
    fn literal_boolean_reading() {
        assert!(RdfLiteral::plain("true").as_bool());
        assert!(RdfLiteral::plain("1").as_bool());
        assert!(!RdfLiteral::plain("false").as_bool());
        assert!(!RdfLiteral::plain("yes").as_bool());
    }
}
