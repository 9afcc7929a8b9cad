use aspectgraph_rdf::DocumentId;

/// Hard failures of the engine API.
///
/// Problems inside a model (dangling references, unknown types, broken
/// lists) are not errors; they are collected as
/// [`Notification`](crate::Notification)s and loading continues.
#[derive(Debug, thiserror::Error)]
pub enum InstantiateError {
    #[error("unknown document: {0}")]
    UnknownDocument(DocumentId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
