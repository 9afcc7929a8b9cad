//! Aspect meta model: vocabulary, typed elements and the predefined catalog.
//!
//! - [`vocab`]: SAMM namespace parsing/construction, version-agnostic.
//! - [`element`]: element kinds and the shared base attributes.
//! - [`graph`]: the flat arena ([`ModelGraph`]) every element lives in.
//! - [`catalog`]: built-in characteristics, entities, units, quantity kinds.
//!
//! This crate only describes the model; building it from statements is the
//! job of `aspectgraph-instantiator`.

pub mod catalog;
pub mod element;
pub mod graph;
pub mod vocab;

pub use catalog::Catalog;
pub use element::*;
pub use graph::ModelGraph;
pub use vocab::{is_scalar_type, Flavor, SammIri, SammNamespace, Vocabulary};
