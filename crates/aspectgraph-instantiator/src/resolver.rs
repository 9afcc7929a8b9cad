//! Reference resolution and slot binding.
//!
//! A reference is resolved, in order, against:
//!
//! 1. the registry of already instantiated elements,
//! 2. the predefined catalog, for IRIs in a meta-model namespace (these
//!    never look at other documents),
//! 3. the current document,
//! 4. the document that declares the IRI, instantiating it first if needed,
//! 5. the catalog again, for anything the documents did not cover.
//!
//! Scalar datatypes terminate resolution silently; anything else that is
//! still unresolved is reported once and skipped.

use crate::deferred::{Continuation, Slot};
use crate::list::ListReader;
use crate::notify::{NotificationKind, Severity};
use crate::session::{LoadSession, Scope};
use aspectgraph_model::{
    is_scalar_type, CharacteristicClass, DataType, ElementId, ElementKind, PropertyUse,
    SammIri, StructuredElement, Value,
};
use aspectgraph_rdf::{RdfNode, RdfObject, Store};
use tracing::{debug, trace};

/// Outcome of resolving one IRI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    Resolved(ElementId),
    /// The declaring document is mid-instantiation; retry after the load.
    Pending,
    /// A foundational datatype; there is no element to bind.
    Scalar,
    Unresolved,
}

/// Target IRI of a reference that has to wait for its document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Deferred(pub(crate) String);

impl<'w> LoadSession<'w> {
    /// Resolve a statement object and bind it into `slot` of `owner`.
    pub(crate) fn resolve_object_into(
        &mut self,
        scope: &Scope,
        owner: ElementId,
        slot: Slot,
        object: &RdfObject,
    ) -> Option<ElementId> {
        if Store::is_literal(object) {
            let subject = self.cache.graph().urn_of(owner).unwrap_or_default().to_string();
            self.report_structure(
                scope,
                subject,
                format!("expected a reference for {slot:?}, found literal \"{}\"", object_key(object)),
            );
            return None;
        }
        let node = object.as_node()?;
        self.resolve_into(scope, owner, slot, node)
    }

    pub(crate) fn resolve_into(
        &mut self,
        scope: &Scope,
        owner: ElementId,
        slot: Slot,
        node: &RdfNode,
    ) -> Option<ElementId> {
        match node {
            RdfNode::BlankNode(_) => {
                let id = self.route(scope, node)?;
                self.attach(owner, &slot, id);
                Some(id)
            }
            RdfNode::Iri(iri) => self.resolve_iri_into(scope, owner, slot, iri),
        }
    }

    /// Resolve `iri` and bind it, deferring the binding when the target's
    /// document is still in progress.
    pub(crate) fn resolve_iri_into(
        &mut self,
        scope: &Scope,
        owner: ElementId,
        slot: Slot,
        iri: &str,
    ) -> Option<ElementId> {
        match self.resolve_iri(scope, iri) {
            Resolution::Resolved(id) => {
                self.attach(owner, &slot, id);
                Some(id)
            }
            Resolution::Pending => {
                self.stats.deferred += 1;
                self.queue.enqueue(Continuation {
                    document: scope.document,
                    owner,
                    slot,
                    target: iri.to_string(),
                });
                None
            }
            Resolution::Scalar | Resolution::Unresolved => None,
        }
    }

    /// Resolve a node without binding it anywhere.
    ///
    /// A reference into a document still in progress comes back as
    /// [`Deferred`] so the caller can queue whatever it was building.
    pub(crate) fn resolve_node(
        &mut self,
        scope: &Scope,
        node: &RdfNode,
    ) -> Result<Option<ElementId>, Deferred> {
        match node {
            RdfNode::BlankNode(_) => Ok(self.route(scope, node)),
            RdfNode::Iri(iri) => match self.resolve_iri(scope, iri) {
                Resolution::Resolved(id) => Ok(Some(id)),
                Resolution::Pending => Err(Deferred(iri.clone())),
                Resolution::Scalar | Resolution::Unresolved => Ok(None),
            },
        }
    }

    pub(crate) fn resolve_iri(&mut self, scope: &Scope, iri: &str) -> Resolution {
        if let Some(id) = self.cache.get(iri) {
            return Resolution::Resolved(id);
        }
        if SammIri::parse(iri).is_some() {
            return match self.predefined(iri) {
                Some(id) => Resolution::Resolved(id),
                None if is_scalar_type(iri) => Resolution::Scalar,
                None => {
                    self.report_unresolved(scope, iri);
                    Resolution::Unresolved
                }
            };
        }
        let node = RdfNode::Iri(iri.to_string());
        if self.store(scope.document).has_subject(&node) {
            return match self.route(scope, &node) {
                Some(id) => Resolution::Resolved(id),
                None => Resolution::Unresolved,
            };
        }
        self.resolve_external(scope, iri)
    }

    /// Fallback chain for references the current document does not declare.
    pub(crate) fn resolve_external(&mut self, scope: &Scope, iri: &str) -> Resolution {
        self.stats.cross_document_lookups += 1;
        trace!(target_iri = %iri, document = %scope.document, "cross-document lookup");

        if let Some(id) = self.cache.get(iri) {
            return Resolution::Resolved(id);
        }
        let node = RdfNode::Iri(iri.to_string());
        if self.store(scope.document).has_subject(&node) {
            return self
                .route(scope, &node)
                .map_or(Resolution::Unresolved, Resolution::Resolved);
        }

        let workspace = self.workspace;
        let declaring = workspace
            .documents_defining(iri)
            .map(|doc| doc.id)
            .find(|&id| id != scope.document);
        if let Some(document) = declaring {
            if self.in_progress(document) {
                return Resolution::Pending;
            }
            if !self.started(document) {
                debug!(%document, target_iri = %iri, "instantiating referenced document");
                self.run_document(document, true);
                if let Some(id) = self.cache.get(iri) {
                    return Resolution::Resolved(id);
                }
            }
            let declaring_scope = self.scope(document);
            return self
                .route(&declaring_scope, &node)
                .map_or(Resolution::Unresolved, Resolution::Resolved);
        }

        if let Some(id) = self.predefined(iri) {
            return Resolution::Resolved(id);
        }
        if is_scalar_type(iri) {
            return Resolution::Scalar;
        }
        self.report_unresolved(scope, iri);
        Resolution::Unresolved
    }

    fn report_unresolved(&mut self, scope: &Scope, iri: &str) {
        self.report(
            NotificationKind::UnresolvedReference,
            Severity::Error,
            scope,
            iri,
            "reference not found in any loaded document or the predefined catalog",
        );
    }

    /// Read a list-valued object; a broken list is reported and reads as empty.
    pub(crate) fn read_list(&mut self, scope: &Scope, object: &'w RdfObject) -> ListReader<'w> {
        let store = self.store(scope.document);
        match ListReader::new(store, &scope.vocab, object) {
            Ok(reader) => reader,
            Err(err) => {
                self.report_structure(scope, object_key(object), err.to_string());
                ListReader::empty(store, &scope.vocab)
            }
        }
    }

    /// Mutate the kind-specific part of `id` in place.
    pub(crate) fn update(&mut self, id: ElementId, f: impl FnOnce(&mut ElementKind)) {
        if let Some(element) = self.cache.graph_mut().get_mut(id) {
            f(&mut element.kind);
        }
    }

    /// Write `target` into `slot` of `owner` and record the traversal edge.
    ///
    /// List slots insert at their recorded position, clamped to the current
    /// length, so bindings that arrive late keep source order where possible.
    pub(crate) fn attach(&mut self, owner: ElementId, slot: &Slot, target: ElementId) {
        let bound = match self.cache.graph_mut().get_mut(owner) {
            Some(element) => bind(&mut element.kind, slot, target),
            None => false,
        };
        if bound {
            self.cache.graph_mut().link(owner, target);
        } else {
            debug!(%owner, ?slot, %target, "slot does not apply to owner");
        }
    }
}

fn object_key(object: &RdfObject) -> String {
    match object {
        RdfObject::Node(node) => node.key().to_string(),
        RdfObject::Literal(lit) => lit.lexical.clone(),
    }
}

fn insert_at<T>(items: &mut Vec<T>, position: usize, item: T) {
    let position = position.min(items.len());
    items.insert(position, item);
}

fn property_use(slot_overrides: &aspectgraph_model::OverrideKeys, target: ElementId) -> PropertyUse {
    PropertyUse {
        property: target,
        overrides: slot_overrides.clone(),
    }
}

fn bind(kind: &mut ElementKind, slot: &Slot, target: ElementId) -> bool {
    match (kind, slot) {
        (ElementKind::Property(p), Slot::Characteristic) => p.characteristic = Some(target),
        (ElementKind::Property(p), Slot::Extends) => p.extends = Some(target),
        (ElementKind::Entity(e), Slot::Extends) => e.extends = Some(target),
        (ElementKind::Characteristic(c), Slot::DataType) => {
            c.data_type = Some(DataType::Entity(target))
        }
        (ElementKind::Characteristic(c), slot) => return bind_characteristic(&mut c.class, slot, target),
        (ElementKind::Aspect(a), Slot::Property { position, overrides }) => {
            insert_at(&mut a.properties, *position, property_use(overrides, target))
        }
        (ElementKind::Aspect(a), Slot::Operation { position }) => {
            insert_at(&mut a.operations, *position, target)
        }
        (ElementKind::Aspect(a), Slot::Event { position }) => insert_at(&mut a.events, *position, target),
        (ElementKind::Entity(e), Slot::Property { position, overrides }) => {
            insert_at(&mut e.properties, *position, property_use(overrides, target))
        }
        (ElementKind::Operation(o), Slot::Property { position, overrides }) => {
            insert_at(&mut o.input, *position, property_use(overrides, target))
        }
        (ElementKind::Operation(o), Slot::OperationOutput) => o.output = Some(target),
        (ElementKind::Event(e), Slot::Property { position, overrides }) => {
            insert_at(&mut e.parameters, *position, property_use(overrides, target))
        }
        (ElementKind::EntityValue(v), Slot::EntityType) => v.entity = Some(target),
        (ElementKind::EntityValue(v), Slot::Assignment { value }) => {
            v.assignments.push(aspectgraph_model::Assignment {
                property: target,
                value: value.clone(),
            })
        }
        (ElementKind::Unit(u), Slot::ReferenceUnit) => u.reference_unit = Some(target),
        (ElementKind::Unit(u), Slot::QuantityKind { position }) => {
            insert_at(&mut u.quantity_kinds, *position, target)
        }
        _ => return false,
    }
    true
}

fn bind_characteristic(class: &mut CharacteristicClass, slot: &Slot, target: ElementId) -> bool {
    match (class, slot) {
        (CharacteristicClass::Trait { base, .. }, Slot::TraitBase) => *base = Some(target),
        (CharacteristicClass::Trait { constraints, .. }, Slot::TraitConstraint { position }) => {
            insert_at(constraints, *position, target)
        }
        (
            CharacteristicClass::Collection {
                element_characteristic,
                ..
            },
            Slot::ElementCharacteristic,
        ) => *element_characteristic = Some(target),
        (CharacteristicClass::Either { left, .. }, Slot::EitherLeft) => *left = Some(target),
        (CharacteristicClass::Either { right, .. }, Slot::EitherRight) => *right = Some(target),
        (CharacteristicClass::Enumeration { values }, Slot::Value { position })
        | (CharacteristicClass::State { values, .. }, Slot::Value { position }) => {
            insert_at(values, *position, Value::Element(target))
        }
        (CharacteristicClass::State { default_value, .. }, Slot::DefaultValue) => {
            *default_value = Some(Value::Element(target))
        }
        (CharacteristicClass::Quantifiable { unit, .. }, Slot::Unit) => *unit = Some(target),
        (CharacteristicClass::StructuredValue { elements, .. }, Slot::StructuredElement { position }) => {
            insert_at(elements, *position, StructuredElement::Property(target))
        }
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use aspectgraph_model::{Aspect, CollectionKind, OverrideKeys};

    #[test]
    fn list_slots_insert_at_clamped_position() {
        let mut kind = ElementKind::Aspect(Aspect::default());
        let slot = |position| Slot::Property {
            position,
            overrides: OverrideKeys::default(),
        };
        assert!(bind(&mut kind, &slot(1), ElementId(2)));
        assert!(bind(&mut kind, &slot(0), ElementId(1)));
        assert!(bind(&mut kind, &slot(2), ElementId(3)));
        let ElementKind::Aspect(aspect) = kind else {
            panic!("not an aspect")
        };
        let order: Vec<_> = aspect.properties.iter().map(|u| u.property.0).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn mismatched_slot_is_rejected() {
        let mut kind = ElementKind::Characteristic(aspectgraph_model::Characteristic::new(
            CharacteristicClass::Collection {
                kind: CollectionKind::List,
                element_characteristic: None,
            },
        ));
        assert!(!bind(&mut kind, &Slot::TraitBase, ElementId(0)));
        assert!(bind(&mut kind, &Slot::ElementCharacteristic, ElementId(0)));
        assert!(!bind(&mut ElementKind::QuantityKind, &Slot::Extends, ElementId(0)));
    }
}
