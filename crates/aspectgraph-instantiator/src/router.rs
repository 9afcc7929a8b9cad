//! Classifying subjects and dispatching them to builders.
//!
//! Classification is by declared `rdf:type` and follows a fixed priority
//! order; the first match wins:
//!
//! 1. `samm:Aspect`
//! 2. `samm:Property` / `samm:AbstractProperty`
//! 3. any type whose local name ends in `Constraint`
//! 4. characteristic classes, `samm:Characteristic` and predefined characteristics
//! 5. `samm:Operation`, `samm:Event`, `samm:Unit`, `samm:QuantityKind`
//! 6. `samm:Entity` / `samm:AbstractEntity`
//! 7. a type that is itself an entity: the subject is an entity value
//! 8. an untyped blank node with `samm:extends`: an anonymous refining property

use crate::notify::{NotificationKind, Severity};
use crate::session::{LoadSession, Scope};
use aspectgraph_model::vocab::CHARACTERISTIC_CLASSES;
use aspectgraph_model::{Catalog, ElementId, ElementKind, SammIri, SammNamespace};
use aspectgraph_rdf::RdfNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Classification {
    Aspect,
    Property { is_abstract: bool },
    Constraint,
    Characteristic,
    Operation,
    Event,
    Unit,
    QuantityKind,
    Entity { is_abstract: bool },
    EntityValue,
}

/// Classification of a meta-model type IRI.
fn classify_meta_type(samm: &SammIri<'_>) -> Option<Classification> {
    use SammNamespace::{Characteristic, Entity, MetaModel};
    let local = samm.local;
    match samm.namespace {
        MetaModel => {
            if local == "Aspect" {
                Some(Classification::Aspect)
            } else if local == "Property" || local == "AbstractProperty" {
                Some(Classification::Property {
                    is_abstract: local == "AbstractProperty",
                })
            } else if local.ends_with("Constraint") {
                Some(Classification::Constraint)
            } else if local == "Characteristic" {
                Some(Classification::Characteristic)
            } else {
                match local {
                    "Operation" => Some(Classification::Operation),
                    "Event" => Some(Classification::Event),
                    "Unit" => Some(Classification::Unit),
                    "QuantityKind" => Some(Classification::QuantityKind),
                    "Entity" => Some(Classification::Entity { is_abstract: false }),
                    "AbstractEntity" => Some(Classification::Entity { is_abstract: true }),
                    _ => None,
                }
            }
        }
        Characteristic => {
            if local.ends_with("Constraint") {
                Some(Classification::Constraint)
            } else if CHARACTERISTIC_CLASSES.contains(&local)
                || Catalog::get().characteristic(local).is_some()
            {
                Some(Classification::Characteristic)
            } else {
                None
            }
        }
        Entity => Catalog::get()
            .entity(local)
            .map(|_| Classification::EntityValue),
        SammNamespace::Unit => None,
    }
}

impl<'w> LoadSession<'w> {
    /// Cached instance for `node` in `scope`, if it was already instantiated.
    pub(crate) fn cached(&self, scope: &Scope, node: &RdfNode) -> Option<ElementId> {
        match node {
            RdfNode::Iri(iri) => self.cache.get(iri),
            RdfNode::BlankNode(label) => self.cache.anonymous(scope.document, label),
        }
    }

    pub(crate) fn classify(&self, scope: &Scope, node: &RdfNode) -> Option<Classification> {
        let store = self.store(scope.document);
        let Some(type_iri) = store.type_of(node) else {
            let refines = node.is_blank() && store.has_predicate(node, &scope.vocab.samm("extends"));
            return refines.then_some(Classification::Property { is_abstract: false });
        };
        match SammIri::parse(type_iri) {
            Some(samm) => classify_meta_type(&samm),
            None if self.is_entity_type(type_iri) => Some(Classification::EntityValue),
            None => None,
        }
    }

    /// Whether `type_iri` names an entity in the registry or in any loaded document.
    fn is_entity_type(&self, type_iri: &str) -> bool {
        if let Some(element) = self.cache.get(type_iri).and_then(|id| self.cache.graph().get(id)) {
            return matches!(element.kind, ElementKind::Entity(_));
        }
        let node = RdfNode::Iri(type_iri.to_string());
        self.workspace.documents().iter().any(|doc| {
            doc.store
                .type_of(&node)
                .and_then(SammIri::parse)
                .is_some_and(|samm| {
                    samm.is(SammNamespace::MetaModel, "Entity")
                        || samm.is(SammNamespace::MetaModel, "AbstractEntity")
                })
        })
    }

    /// Instantiate `node` in `scope`, or return its cached instance.
    pub(crate) fn route(&mut self, scope: &Scope, node: &RdfNode) -> Option<ElementId> {
        if let Some(id) = self.cached(scope, node) {
            return Some(id);
        }
        let Some(classification) = self.classify(scope, node) else {
            if let Some(id) = node.as_iri().and_then(|iri| self.predefined(iri)) {
                return Some(id);
            }
            self.report_unrecognized(scope, node);
            return None;
        };
        tracing::trace!(subject = %node, ?classification, document = %scope.document, "routing");

        let id = match classification {
            Classification::Aspect => self.build_aspect(scope, node),
            Classification::Property { is_abstract } => self.build_property(scope, node, is_abstract),
            Classification::Constraint => self.create_constraint(scope, node),
            Classification::Characteristic => self.create_characteristic(scope, node),
            Classification::Operation => self.build_operation(scope, node),
            Classification::Event => self.build_event(scope, node),
            Classification::Unit => self.build_unit(scope, node),
            Classification::QuantityKind => self.build_quantity_kind(scope, node),
            Classification::Entity { is_abstract } => self.build_entity(scope, node, is_abstract),
            Classification::EntityValue => self.build_entity_value(scope, node),
        };
        Some(id)
    }

    fn report_unrecognized(&mut self, scope: &Scope, node: &RdfNode) {
        if !self.config.report_unrecognized_types {
            return;
        }
        let store = self.store(scope.document);
        let message = match store.type_of(node) {
            Some(type_iri) => format!("no handler for type <{type_iri}>"),
            None => "subject has no rdf:type".to_string(),
        };
        self.report(
            NotificationKind::UnrecognizedType,
            Severity::Warning,
            scope,
            node.key(),
            message,
        );
    }
}
