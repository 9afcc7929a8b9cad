//! In-memory statement store with a subject index.
//!
//! The store is append-only and keeps statements in load order; subjects are
//! iterated in the order they were first seen, which gives the engine a stable
//! classification order.

use crate::{
    RdfLiteral, RdfNode, RdfObject, RdfStatement, RDF_FIRST_IRI, RDF_NIL_IRI, RDF_REST_IRI,
    RDF_TYPE_IRI,
};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    #[error("list chain through {node} does not terminate")]
    Cycle { node: RdfNode },
    #[error("list cell {node} has no rdf:first")]
    MissingFirst { node: RdfNode },
    #[error("list cell {node} has no rdf:rest")]
    MissingRest { node: RdfNode },
}

#[derive(Debug, Clone, Default)]
pub struct Store {
    statements: Vec<RdfStatement>,
    by_subject: HashMap<RdfNode, Vec<usize>>,
    subjects: Vec<RdfNode>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_statements(statements: impl IntoIterator<Item = RdfStatement>) -> Self {
        let mut store = Self::new();
        for statement in statements {
            store.insert(statement.subject, statement.predicate_iri, statement.object);
        }
        store
    }

    pub fn insert(&mut self, subject: RdfNode, predicate_iri: impl Into<String>, object: RdfObject) {
        let index = self.statements.len();
        match self.by_subject.get_mut(&subject) {
            Some(indices) => indices.push(index),
            None => {
                self.subjects.push(subject.clone());
                self.by_subject.insert(subject.clone(), vec![index]);
            }
        }
        self.statements.push(RdfStatement {
            index,
            subject,
            predicate_iri: predicate_iri.into(),
            object,
            graph_name: None,
        });
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn statements(&self) -> &[RdfStatement] {
        &self.statements
    }

    /// Subjects in first-seen order.
    pub fn subjects(&self) -> impl Iterator<Item = &RdfNode> {
        self.subjects.iter()
    }

    pub fn has_subject(&self, subject: &RdfNode) -> bool {
        self.by_subject.contains_key(subject)
    }

    pub fn has_iri_subject(&self, iri: &str) -> bool {
        self.has_subject(&RdfNode::Iri(iri.to_string()))
    }

    /// All statements about `subject`, in load order.
    pub fn statements_about<'a>(
        &'a self,
        subject: &RdfNode,
    ) -> impl Iterator<Item = &'a RdfStatement> + 'a {
        self.by_subject
            .get(subject)
            .map(|indices| indices.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&i| &self.statements[i])
    }

    /// Objects of `subject predicate_iri ?o`, in load order.
    pub fn objects<'a>(
        &'a self,
        subject: &RdfNode,
        predicate_iri: &str,
    ) -> impl Iterator<Item = &'a RdfObject> + 'a {
        let predicate_iri = predicate_iri.to_string();
        self.statements_about(subject)
            .filter(move |s| s.predicate_iri == predicate_iri)
            .map(|s| &s.object)
    }

    pub fn object(&self, subject: &RdfNode, predicate_iri: &str) -> Option<&RdfObject> {
        self.objects(subject, predicate_iri).next()
    }

    pub fn literal(&self, subject: &RdfNode, predicate_iri: &str) -> Option<&RdfLiteral> {
        self.objects(subject, predicate_iri)
            .find_map(RdfObject::as_literal)
    }

    pub fn has_predicate(&self, subject: &RdfNode, predicate_iri: &str) -> bool {
        self.object(subject, predicate_iri).is_some()
    }

    /// First declared `rdf:type` IRI of `subject`.
    pub fn type_of(&self, subject: &RdfNode) -> Option<&str> {
        self.objects(subject, RDF_TYPE_IRI).find_map(RdfObject::as_iri)
    }

    pub fn is_blank_node(object: &RdfObject) -> bool {
        matches!(object, RdfObject::Node(RdfNode::BlankNode(_)))
    }

    pub fn is_literal(object: &RdfObject) -> bool {
        matches!(object, RdfObject::Literal(_))
    }

    pub fn locale_tag(object: &RdfObject) -> Option<&str> {
        object.as_literal().and_then(|lit| lit.language.as_deref())
    }

    /// Whether `object` is the head of an RDF list (`rdf:nil` or a cell with `rdf:first`).
    pub fn is_list(&self, object: &RdfObject) -> bool {
        match object {
            RdfObject::Node(RdfNode::Iri(iri)) => iri == RDF_NIL_IRI,
            RdfObject::Node(node @ RdfNode::BlankNode(_)) => {
                self.has_predicate(node, RDF_FIRST_IRI)
            }
            RdfObject::Literal(_) => false,
        }
    }

    /// Expand the list whose head is `head` into its members, in order.
    ///
    /// `rdf:nil` yields an empty list. Chains that revisit a cell or lack
    /// `rdf:first`/`rdf:rest` are rejected.
    pub fn resolve_list_chain(&self, head: &RdfObject) -> Result<Vec<&RdfObject>, ListError> {
        let mut out = Vec::new();
        let mut seen: HashSet<&RdfNode> = HashSet::new();
        let mut current = match head {
            RdfObject::Node(node) => node,
            RdfObject::Literal(_) => return Ok(out),
        };

        loop {
            if current.as_iri() == Some(RDF_NIL_IRI) {
                return Ok(out);
            }
            if !seen.insert(current) {
                return Err(ListError::Cycle {
                    node: current.clone(),
                });
            }
            let first = self
                .object(current, RDF_FIRST_IRI)
                .ok_or_else(|| ListError::MissingFirst {
                    node: current.clone(),
                })?;
            out.push(first);
            current = self
                .object(current, RDF_REST_IRI)
                .and_then(RdfObject::as_node)
                .ok_or_else(|| ListError::MissingRest {
                    node: current.clone(),
                })?;
        }
    }
}
