//! Deferred reference resolution.
//!
//! A reference into a document that is still being instantiated cannot be
//! resolved yet. Instead of recursing into it, the engine records a typed
//! continuation naming the owner element, the field to fill and the target
//! IRI, and resumes it once the top-level load has finished.

use aspectgraph_model::{ElementId, OverrideKeys, Value};
use aspectgraph_rdf::DocumentId;
use std::collections::VecDeque;

/// The field of an owner element a resolved reference is written into.
///
/// List slots carry the position the reference had in its source list, so a
/// late binding lands in the right place.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Slot {
    /// `Property.characteristic`
    Characteristic,
    /// `Property.extends` / `Entity.extends`
    Extends,
    /// `Characteristic.data_type` pointing at an entity.
    DataType,
    TraitBase,
    TraitConstraint { position: usize },
    ElementCharacteristic,
    EitherLeft,
    EitherRight,
    /// Unit of a quantifiable characteristic.
    Unit,
    /// Enumeration or state value.
    Value { position: usize },
    DefaultValue,
    StructuredElement { position: usize },
    /// Aspect/entity properties, operation input or event parameters.
    Property { position: usize, overrides: OverrideKeys },
    Operation { position: usize },
    Event { position: usize },
    OperationOutput,
    /// The entity an entity value instantiates.
    EntityType,
    /// A property assignment of an entity value; the property is the target.
    Assignment { value: Value },
    /// A whole assignment whose value refers into a document still in
    /// progress; `statement` indexes the assigning statement in its store.
    AssignmentStatement { statement: usize },
    ReferenceUnit,
    QuantityKind { position: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Continuation {
    /// Document whose scope the reference appeared in.
    pub(crate) document: DocumentId,
    pub(crate) owner: ElementId,
    pub(crate) slot: Slot,
    pub(crate) target: String,
}

/// FIFO of pending continuations.
#[derive(Debug, Default)]
pub(crate) struct DeferredQueue {
    items: VecDeque<Continuation>,
}

impl DeferredQueue {
    pub(crate) fn enqueue(&mut self, continuation: Continuation) {
        tracing::debug!(
            owner = %continuation.owner,
            slot = ?continuation.slot,
            target = %continuation.target,
            "deferred reference"
        );
        self.items.push_front(continuation);
    }

    /// Oldest pending continuation.
    pub(crate) fn pop(&mut self) -> Option<Continuation> {
        self.items.pop_back()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }
}
