//! Symbol cache: the canonical-instance registry plus per-document indices.

use aspectgraph_model::{ElementId, ModelElement, ModelGraph};
use aspectgraph_rdf::DocumentId;
use std::collections::HashMap;

/// Owns the [`ModelGraph`] while a session runs.
///
/// Named elements are registered once, globally, under their URN. Anonymous
/// elements are additionally keyed by `(document, blank label)`, since blank
/// labels are only meaningful inside the document that declared them.
#[derive(Debug, Default)]
pub(crate) struct SymbolCache {
    graph: ModelGraph,
    per_document: HashMap<DocumentId, Vec<ElementId>>,
    anonymous: HashMap<(DocumentId, String), ElementId>,
}

impl SymbolCache {
    pub(crate) fn graph(&self) -> &ModelGraph {
        &self.graph
    }

    pub(crate) fn graph_mut(&mut self) -> &mut ModelGraph {
        &mut self.graph
    }

    pub(crate) fn into_graph(self) -> ModelGraph {
        self.graph
    }

    /// Canonical instance registered for `urn`.
    pub(crate) fn get(&self, urn: &str) -> Option<ElementId> {
        self.graph.lookup(urn)
    }

    pub(crate) fn anonymous(&self, document: DocumentId, label: &str) -> Option<ElementId> {
        self.anonymous.get(&(document, label.to_string())).copied()
    }

    /// Register `element`, or return the instance already registered under its URN.
    pub(crate) fn resolve(&mut self, element: ModelElement) -> ElementId {
        let origin = element.base.origin;
        let (id, inserted) = self.graph.upsert(element);
        if inserted {
            if let Some(document) = origin {
                self.per_document.entry(document).or_default().push(id);
            }
        }
        id
    }

    /// Register an anonymous element under its synthesized URN and its blank label.
    pub(crate) fn resolve_anonymous(
        &mut self,
        element: ModelElement,
        document: DocumentId,
        label: &str,
    ) -> ElementId {
        if let Some(id) = self.anonymous(document, label) {
            return id;
        }
        let id = self.resolve(element);
        self.anonymous.insert((document, label.to_string()), id);
        id
    }

    /// Elements that originate from `document`, in registration order.
    pub(crate) fn document_elements(&self, document: DocumentId) -> &[ElementId] {
        self.per_document
            .get(&document)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
