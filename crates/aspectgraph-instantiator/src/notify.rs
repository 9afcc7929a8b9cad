//! Recoverable problems found while instantiating.

use aspectgraph_rdf::DocumentId;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NotificationKind {
    /// A referenced IRI could not be found in any document or the catalog.
    UnresolvedReference,
    /// A subject's type matched no handler.
    UnrecognizedType,
    /// Malformed structure: broken lists, literals where references belong.
    StructuralInconsistency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub severity: Severity,
    pub document: Option<DocumentId>,
    /// IRI or blank-node key the problem is about.
    pub subject: String,
    pub message: String,
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {}: {}", self.kind, self.subject, self.message)
    }
}

/// Collector that reports each `(kind, document, subject)` once.
///
/// Structural problems also key on the message: one subject can be broken
/// in more than one way.
#[derive(Debug, Default)]
pub(crate) struct Notifications {
    items: Vec<Notification>,
    seen: HashSet<(NotificationKind, Option<DocumentId>, String, Option<String>)>,
}

impl Notifications {
    pub(crate) fn report(&mut self, notification: Notification) {
        let detail = (notification.kind == NotificationKind::StructuralInconsistency)
            .then(|| notification.message.clone());
        let key = (
            notification.kind,
            notification.document,
            notification.subject.clone(),
            detail,
        );
        if !self.seen.insert(key) {
            return;
        }
        tracing::warn!(
            kind = ?notification.kind,
            severity = ?notification.severity,
            document = ?notification.document,
            subject = %notification.subject,
            "{}",
            notification.message
        );
        self.items.push(notification);
    }

    pub(crate) fn as_slice(&self) -> &[Notification] {
        &self.items
    }

    pub(crate) fn into_vec(self) -> Vec<Notification> {
        self.items
    }
}
