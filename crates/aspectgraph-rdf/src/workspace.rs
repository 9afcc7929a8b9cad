//! A set of loaded documents.
//!
//! Documents are immutable once added. Which of them have already been
//! instantiated is tracked by the engine's load session, not here.

use crate::{namespace_of, parse_statements, RdfError, RdfFormat, RdfNode, Store};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub u32);

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    /// Where the document came from (file path, URL or a test label).
    pub location: String,
    /// Model namespace (`urn:samm:<org>:<version>#`), when one could be detected.
    pub namespace: Option<String>,
    pub store: Store,
}

impl Document {
    /// Whether this document has statements about the IRI `iri`.
    pub fn defines(&self, iri: &str) -> bool {
        self.store.has_iri_subject(iri)
    }
}

/// Namespace of the first typed IRI subject.
fn detect_namespace(store: &Store) -> Option<String> {
    store
        .subjects()
        .filter_map(RdfNode::as_iri)
        .filter(|iri| store.type_of(&RdfNode::Iri(iri.to_string())).is_some())
        .find_map(namespace_of)
        .map(str::to_string)
}

#[derive(Debug, Clone, Default)]
pub struct Workspace {
    documents: Vec<Document>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_document(&mut self, location: impl Into<String>, store: Store) -> DocumentId {
        let id = DocumentId(self.documents.len() as u32);
        let namespace = detect_namespace(&store);
        let location = location.into();
        tracing::debug!(%id, %location, namespace = ?namespace, statements = store.len(), "added document");
        self.documents.push(Document {
            id,
            location,
            namespace,
            store,
        });
        id
    }

    pub fn load_str(
        &mut self,
        location: impl Into<String>,
        text: &str,
        format: RdfFormat,
    ) -> Result<DocumentId, RdfError> {
        let statements = parse_statements(text.as_bytes(), format)?;
        Ok(self.add_document(location, Store::from_statements(statements)))
    }

    pub fn load_file(&mut self, path: &Path) -> Result<DocumentId, RdfError> {
        let format = RdfFormat::from_path(path)?;
        let bytes = std::fs::read(path)?;
        let statements = parse_statements(&bytes, format)?;
        Ok(self.add_document(path.display().to_string(), Store::from_statements(statements)))
    }

    /// Load every RDF file below `dir`, in sorted path order.
    ///
    /// Files with extensions that are not RDF serializations are skipped.
    pub fn load_dir(&mut self, dir: &Path) -> Result<Vec<DocumentId>, RdfError> {
        let mut paths = Vec::new();
        for entry in walkdir::WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| RdfError::Walk {
                path: dir.display().to_string(),
                message: e.to_string(),
            })?;
            if entry.file_type().is_file() && RdfFormat::from_path(entry.path()).is_ok() {
                paths.push(entry.into_path());
            }
        }

        paths.iter().map(|path| self.load_file(path)).collect()
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(id.0 as usize)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents with statements about `iri`, in load order.
    pub fn documents_defining<'a>(&'a self, iri: &'a str) -> impl Iterator<Item = &'a Document> + 'a {
        self.documents.iter().filter(move |doc| doc.defines(iri))
    }
}
