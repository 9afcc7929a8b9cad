//! Sophia-backed parsing into the flat statement model.
//!
//! Terms are converted through their display form (`<iri>`, `_:b0`,
//! `"lex"@lang`, `"lex"^^<dt>`), which keeps this module independent of the
//! concrete term types each Sophia parser yields.

use crate::{RdfError, RdfLiteral, RdfNode, RdfObject, RdfStatement, RDF_NS, XSD_NS};
use sophia::api::prelude::*;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    NTriples,
    Turtle,
    NQuads,
    TriG,
    RdfXml,
}

impl RdfFormat {
    pub fn from_extension(ext: &str) -> Result<Self, RdfError> {
        match ext.to_lowercase().as_str() {
            "nt" | "ntriples" => Ok(Self::NTriples),
            "ttl" | "turtle" => Ok(Self::Turtle),
            "nq" | "nquads" => Ok(Self::NQuads),
            "trig" => Ok(Self::TriG),
            "rdf" | "owl" | "xml" => Ok(Self::RdfXml),
            other => Err(RdfError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, RdfError> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        Self::from_extension(ext)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::NTriples => "N-Triples",
            Self::Turtle => "Turtle",
            Self::NQuads => "N-Quads",
            Self::TriG => "TriG",
            Self::RdfXml => "RDF/XML",
        }
    }
}

fn unescape_rdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Expand the `xsd:`/`rdf:` shorthands some serializers print for datatypes.
fn expand_datatype(dt: &str) -> String {
    if let Some(local) = dt.strip_prefix("xsd:") {
        format!("{XSD_NS}{local}")
    } else if let Some(local) = dt.strip_prefix("rdf:") {
        format!("{RDF_NS}{local}")
    } else {
        dt.to_string()
    }
}

pub(crate) fn parse_term_display(term: &str) -> Result<RdfObject, RdfError> {
    let s = term.trim();

    if let Some(rest) = s.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return Ok(RdfObject::Node(RdfNode::Iri(rest.to_string())));
    }

    if let Some(rest) = s.strip_prefix("_:") {
        return Ok(RdfObject::Node(RdfNode::BlankNode(rest.to_string())));
    }

    if s.starts_with('"') {
        let mut end_quote = None;
        let mut prev_was_escape = false;
        for (i, ch) in s.char_indices().skip(1) {
            if ch == '"' && !prev_was_escape {
                end_quote = Some(i);
                break;
            }
            prev_was_escape = ch == '\\' && !prev_was_escape;
        }
        let Some(end) = end_quote else {
            return Err(RdfError::Term(format!("missing closing quote: {s}")));
        };

        let lexical = unescape_rdf_string(&s[1..end]);
        let rest = s[end + 1..].trim();

        let mut language = None;
        let mut datatype = None;

        if let Some(lang) = rest.strip_prefix('@') {
            language = Some(lang.to_string());
        } else if let Some(dt) = rest.strip_prefix("^^") {
            let dt = dt.trim();
            if let Some(dt_iri) = dt.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
                datatype = Some(dt_iri.to_string());
            } else if !dt.is_empty() {
                datatype = Some(expand_datatype(dt));
            }
        }

        return Ok(RdfObject::Literal(RdfLiteral {
            lexical,
            datatype,
            language,
        }));
    }

    Err(RdfError::Term(s.to_string()))
}

fn parse_node_term_display(term: &str) -> Result<RdfNode, RdfError> {
    match parse_term_display(term)? {
        RdfObject::Node(node) => Ok(node),
        RdfObject::Literal(_) => Err(RdfError::Term(format!(
            "expected IRI/blank node, got literal: {term}"
        ))),
    }
}

/// Append one statement given the display forms of its terms.
///
/// Statements whose predicate is not an IRI are skipped.
fn push_statement(
    out: &mut Vec<RdfStatement>,
    subject: &str,
    predicate: &str,
    object: &str,
    graph_name: Option<String>,
) -> Result<(), RdfError> {
    let subject = parse_node_term_display(subject)?;
    let RdfNode::Iri(predicate_iri) = parse_node_term_display(predicate)? else {
        return Ok(());
    };
    let object = parse_term_display(object)?;
    let graph_name = graph_name
        .map(|g| parse_node_term_display(&g))
        .transpose()?;
    let index = out.len();
    out.push(RdfStatement {
        index,
        subject,
        predicate_iri,
        object,
        graph_name,
    });
    Ok(())
}

/// Parse `bytes` in the given serialization into statements, in document order.
pub fn parse_statements(bytes: &[u8], format: RdfFormat) -> Result<Vec<RdfStatement>, RdfError> {
    let reader = std::io::BufReader::new(std::io::Cursor::new(bytes));
    let parse_error = |e: &dyn std::fmt::Display| RdfError::Parse {
        format: format.name(),
        message: e.to_string(),
    };

    let mut out: Vec<RdfStatement> = Vec::new();
    match format {
        RdfFormat::NTriples => {
            let mut parser = sophia::turtle::parser::nt::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> Result<(), RdfError> {
                    push_statement(
                        &mut out,
                        &t.s().to_string(),
                        &t.p().to_string(),
                        &t.o().to_string(),
                        None,
                    )
                })
                .map_err(|e| parse_error(&e))?;
        }
        RdfFormat::Turtle => {
            let mut parser = sophia::turtle::parser::turtle::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> Result<(), RdfError> {
                    push_statement(
                        &mut out,
                        &t.s().to_string(),
                        &t.p().to_string(),
                        &t.o().to_string(),
                        None,
                    )
                })
                .map_err(|e| parse_error(&e))?;
        }
        RdfFormat::NQuads => {
            let mut parser = sophia::turtle::parser::nq::parse_bufread(reader);
            parser
                .try_for_each_quad(|q| -> Result<(), RdfError> {
                    push_statement(
                        &mut out,
                        &q.s().to_string(),
                        &q.p().to_string(),
                        &q.o().to_string(),
                        q.g().map(|g| g.to_string()),
                    )
                })
                .map_err(|e| parse_error(&e))?;
        }
        RdfFormat::TriG => {
            let mut parser = sophia::turtle::parser::trig::parse_bufread(reader);
            parser
                .try_for_each_quad(|q| -> Result<(), RdfError> {
                    push_statement(
                        &mut out,
                        &q.s().to_string(),
                        &q.p().to_string(),
                        &q.o().to_string(),
                        q.g().map(|g| g.to_string()),
                    )
                })
                .map_err(|e| parse_error(&e))?;
        }
        RdfFormat::RdfXml => {
            let mut parser = sophia::xml::parser::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> Result<(), RdfError> {
                    push_statement(
                        &mut out,
                        &t.s().to_string(),
                        &t.p().to_string(),
                        &t.o().to_string(),
                        None,
                    )
                })
                .map_err(|e| parse_error(&e))?;
        }
    }

    tracing::trace!(format = format.name(), statements = out.len(), "parsed RDF");
    Ok(out)
}
