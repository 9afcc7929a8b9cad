//! The load session: per-run state and the public engine API.

use crate::cache::SymbolCache;
use crate::config::InstantiatorConfig;
use crate::deferred::{DeferredQueue, Slot};
use crate::notify::{Notification, NotificationKind, Notifications, Severity};
use crate::resolver::Resolution;
use crate::InstantiateError;
use aspectgraph_model::{ElementId, ModelElement, ModelGraph, Vocabulary};
use aspectgraph_rdf::{DocumentId, RdfNode, Store, Workspace};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentState {
    InProgress,
    Done,
}

/// Document-level context threaded through every handler.
#[derive(Debug, Clone)]
pub(crate) struct Scope {
    pub(crate) document: DocumentId,
    pub(crate) vocab: Vocabulary,
    /// Namespace synthesized URNs are minted in.
    pub(crate) namespace: String,
    /// Set when the document was pulled in to satisfy a reference from another one.
    pub(crate) external: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub documents_instantiated: usize,
    /// References that had to look beyond the current document.
    pub cross_document_lookups: usize,
    pub deferred: usize,
    pub resumed: usize,
}

/// Final result of a session.
#[derive(Debug, Serialize)]
pub struct LoadOutcome {
    pub graph: ModelGraph,
    pub notifications: Vec<Notification>,
    pub stats: LoadStats,
}

/// One instantiation run over a [`Workspace`].
///
/// The session owns the symbol cache, the document ledger and the deferred
/// queue; the workspace is only borrowed. Every public entry point drains
/// the deferred queue before it returns, so between calls
/// [`pending`](Self::pending) is zero.
pub struct LoadSession<'w> {
    pub(crate) workspace: &'w Workspace,
    pub(crate) config: InstantiatorConfig,
    pub(crate) cache: SymbolCache,
    pub(crate) queue: DeferredQueue,
    pub(crate) notifications: Notifications,
    pub(crate) stats: LoadStats,
    pub(crate) anonymous_counter: u64,
    ledger: HashMap<DocumentId, DocumentState>,
    scopes: HashMap<DocumentId, Scope>,
}

impl<'w> LoadSession<'w> {
    pub fn new(workspace: &'w Workspace, config: InstantiatorConfig) -> Self {
        Self {
            workspace,
            config,
            cache: SymbolCache::default(),
            queue: DeferredQueue::default(),
            notifications: Notifications::default(),
            stats: LoadStats::default(),
            anonymous_counter: 0,
            ledger: HashMap::new(),
            scopes: HashMap::new(),
        }
    }

    /// Instantiate every named element of `document`.
    ///
    /// Calling this again for the same document is a no-op.
    pub fn instantiate_document(&mut self, document: DocumentId) -> Result<(), InstantiateError> {
        self.workspace
            .document(document)
            .ok_or(InstantiateError::UnknownDocument(document))?;
        if !self.ledger.contains_key(&document) {
            self.run_document(document, false);
        }
        self.drain();
        Ok(())
    }

    /// Instantiate all documents in workspace order.
    pub fn instantiate_all(&mut self) {
        let workspace = self.workspace;
        for document in workspace.documents() {
            if !self.ledger.contains_key(&document.id) {
                self.run_document(document.id, false);
            }
            self.drain();
        }
        info!(
            documents = self.stats.documents_instantiated,
            elements = self.cache.graph().len(),
            notifications = self.notifications.as_slice().len(),
            "workspace instantiated"
        );
    }

    /// Instantiate a single element (and whatever it references) on demand.
    pub fn instantiate_element(
        &mut self,
        document: DocumentId,
        urn: &str,
    ) -> Result<Option<ElementId>, InstantiateError> {
        let workspace = self.workspace;
        let doc = workspace
            .document(document)
            .ok_or(InstantiateError::UnknownDocument(document))?;
        let scope = self.scope(document);
        let node = RdfNode::Iri(urn.to_string());
        let id = if doc.store.has_subject(&node) {
            self.route(&scope, &node)
        } else {
            match self.resolve_iri(&scope, urn) {
                Resolution::Resolved(id) => Some(id),
                _ => None,
            }
        };
        self.drain();
        Ok(id)
    }

    /// Resume deferred continuations until none are left.
    ///
    /// Resuming may instantiate further documents and enqueue more work; the
    /// loop runs to a fixpoint.
    pub fn drain(&mut self) {
        while let Some(continuation) = self.queue.pop() {
            self.stats.resumed += 1;
            let scope = self.scope(continuation.document);
            debug!(owner = %continuation.owner, target = %continuation.target, "resuming deferred reference");
            match continuation.slot {
                Slot::AssignmentStatement { statement } => {
                    self.resume_assignment(&scope, continuation.owner, statement)
                }
                slot => {
                    self.resolve_iri_into(&scope, continuation.owner, slot, &continuation.target);
                }
            }
        }
    }

    pub fn lookup(&self, urn: &str) -> Option<ElementId> {
        self.cache.get(urn)
    }

    pub fn element(&self, id: ElementId) -> Option<&ModelElement> {
        self.cache.graph().get(id)
    }

    pub fn graph(&self) -> &ModelGraph {
        self.cache.graph()
    }

    /// Elements that originate from `document`.
    pub fn document_elements(&self, document: DocumentId) -> &[ElementId] {
        self.cache.document_elements(document)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.as_slice()
    }

    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }

    pub fn is_instantiated(&self, document: DocumentId) -> bool {
        self.ledger.get(&document) == Some(&DocumentState::Done)
    }

    /// Documents that were instantiated only because another document referenced them.
    pub fn external_documents(&self) -> Vec<DocumentId> {
        let mut out: Vec<_> = self
            .scopes
            .values()
            .filter(|scope| scope.external)
            .map(|scope| scope.document)
            .collect();
        out.sort();
        out
    }

    pub fn finish(self) -> LoadOutcome {
        LoadOutcome {
            graph: self.cache.into_graph(),
            notifications: self.notifications.into_vec(),
            stats: self.stats,
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Primary pass over one document: route every named subject in store order.
    pub(crate) fn run_document(&mut self, document: DocumentId, external: bool) {
        let workspace = self.workspace;
        let Some(doc) = workspace.document(document) else {
            return;
        };
        self.ledger.insert(document, DocumentState::InProgress);
        let scope = self.enter_scope(document, external);
        debug!(%document, location = %doc.location, external, "instantiating document");

        for subject in doc.store.subjects() {
            if subject.is_blank() || self.cached(&scope, subject).is_some() {
                continue;
            }
            self.route(&scope, subject);
        }

        self.ledger.insert(document, DocumentState::Done);
        self.stats.documents_instantiated += 1;
        debug!(
            %document,
            elements = self.cache.document_elements(document).len(),
            "document instantiated"
        );
    }

    pub(crate) fn in_progress(&self, document: DocumentId) -> bool {
        self.ledger.get(&document) == Some(&DocumentState::InProgress)
    }

    pub(crate) fn started(&self, document: DocumentId) -> bool {
        self.ledger.contains_key(&document)
    }

    fn enter_scope(&mut self, document: DocumentId, external: bool) -> Scope {
        let (vocab, namespace) = match self.workspace.document(document) {
            Some(doc) => (
                Vocabulary::detect(&doc.store),
                doc.namespace.clone(),
            ),
            None => (Vocabulary::default(), None),
        };
        let scope = Scope {
            document,
            vocab,
            namespace: namespace.unwrap_or_else(|| self.config.fallback_namespace.clone()),
            external,
        };
        self.scopes.insert(document, scope.clone());
        scope
    }

    pub(crate) fn scope(&mut self, document: DocumentId) -> Scope {
        match self.scopes.get(&document) {
            Some(scope) => scope.clone(),
            None => self.enter_scope(document, false),
        }
    }

    pub(crate) fn store(&self, document: DocumentId) -> &'w Store {
        static EMPTY: OnceLock<Store> = OnceLock::new();
        let workspace = self.workspace;
        match workspace.document(document) {
            Some(doc) => &doc.store,
            None => EMPTY.get_or_init(Store::new),
        }
    }

    pub(crate) fn report(
        &mut self,
        kind: NotificationKind,
        severity: Severity,
        scope: &Scope,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.notifications.report(Notification {
            kind,
            severity,
            document: Some(scope.document),
            subject: subject.into(),
            message: message.into(),
        });
    }

    pub(crate) fn report_structure(
        &mut self,
        scope: &Scope,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.report(
            NotificationKind::StructuralInconsistency,
            Severity::Error,
            scope,
            subject,
            message,
        );
    }
}
