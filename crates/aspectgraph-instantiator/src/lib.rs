//! Aspect model instantiation engine.
//!
//! Turns the statements of one or more loaded documents into a typed,
//! cross-referenced [`ModelGraph`](aspectgraph_model::ModelGraph):
//!
//! ```text
//!   Workspace (documents, statements)
//!        │
//!        ▼
//!   LoadSession ──► router ──► builders / characteristic & constraint chains
//!        │             ▲                 │
//!        │             └── resolver ◄────┘  (registry → catalog → store →
//!        │                    │               declaring document)
//!        │                    └──► deferred queue (document still in progress)
//!        ▼
//!   LoadOutcome { graph, notifications, stats }
//! ```
//!
//! Every element is registered in the session's symbol cache before any of
//! its references are followed, so each URN maps to exactly one instance and
//! cyclic models terminate. Problems inside a model are collected as
//! [`Notification`]s; they never abort a load.
//!
//! ```no_run
//! use aspectgraph_instantiator::{InstantiatorConfig, LoadSession};
//! use aspectgraph_rdf::Workspace;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut workspace = Workspace::new();
//! workspace.load_dir(std::path::Path::new("models"))?;
//! let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
//! session.instantiate_all();
//! let outcome = session.finish();
//! println!("{} elements", outcome.graph.len());
//! # Ok(())
//! # }
//! ```

mod base;
mod cache;
mod characteristic;
mod config;
mod constraint;
mod deferred;
mod error;
mod extends;
mod list;
mod notify;
mod predefined;
mod resolver;
mod router;
mod session;
mod structure;

#[cfg(test)]
mod tests;

pub use config::{AnonymousNaming, InstantiatorConfig};
pub use error::InstantiateError;
pub use notify::{Notification, NotificationKind, Severity};
pub use session::{LoadOutcome, LoadSession, LoadStats};
