//! Builders for the structural element kinds.

use crate::deferred::{Continuation, Slot};
use crate::resolver::Deferred;
use crate::session::{LoadSession, Scope};
use aspectgraph_model::{
    Aspect, ElementId, ElementKind, Entity, EntityValue, Event, Operation, Property, SammIri,
    SammNamespace, Unit, Value,
};
use aspectgraph_rdf::{RdfNode, RdfObject, RdfStatement, RDFS_NS, RDF_TYPE_IRI};

impl<'w> LoadSession<'w> {
    /// Bind each entry of the list under `predicate` as a property use of `owner`.
    fn bind_property_list(&mut self, scope: &Scope, node: &RdfNode, owner: ElementId, predicate: &str) {
        let store = self.store(scope.document);
        let Some(list) = store.object(node, &scope.vocab.samm(predicate)) else {
            return;
        };
        let entries: Vec<_> = self.read_list(scope, list).collect();
        for (position, entry) in entries.into_iter().enumerate() {
            let slot = Slot::Property {
                position,
                overrides: entry.overrides,
            };
            self.resolve_object_into(scope, owner, slot, entry.target);
        }
    }

    pub(crate) fn build_aspect(&mut self, scope: &Scope, node: &RdfNode) -> ElementId {
        let id = self.reserve_element(scope, node, "Aspect", ElementKind::Aspect(Aspect::default()));
        self.bind_property_list(scope, node, id, "properties");

        let store = self.store(scope.document);
        if let Some(list) = store.object(node, &scope.vocab.samm("operations")) {
            let entries: Vec<_> = self.read_list(scope, list).collect();
            for (position, entry) in entries.into_iter().enumerate() {
                self.resolve_object_into(scope, id, Slot::Operation { position }, entry.target);
            }
        }
        if let Some(list) = store.object(node, &scope.vocab.samm("events")) {
            let entries: Vec<_> = self.read_list(scope, list).collect();
            for (position, entry) in entries.into_iter().enumerate() {
                self.resolve_object_into(scope, id, Slot::Event { position }, entry.target);
            }
        }
        id
    }

    pub(crate) fn build_property(&mut self, scope: &Scope, node: &RdfNode, is_abstract: bool) -> ElementId {
        let store = self.store(scope.document);
        let property = Property {
            is_abstract,
            characteristic: None,
            example_value: store.literal(node, &scope.vocab.samm("exampleValue")).cloned(),
            extends: None,
        };
        let id = self.reserve_element(scope, node, "Property", ElementKind::Property(property));
        if let Some(characteristic) = store.object(node, &scope.vocab.samm("characteristic")) {
            self.resolve_object_into(scope, id, Slot::Characteristic, characteristic);
        }
        self.resolve_extends(scope, node, id);
        id
    }

    pub(crate) fn build_entity(&mut self, scope: &Scope, node: &RdfNode, is_abstract: bool) -> ElementId {
        let entity = Entity {
            is_abstract,
            properties: Vec::new(),
            extends: None,
        };
        let id = self.reserve_element(scope, node, "Entity", ElementKind::Entity(entity));
        self.bind_property_list(scope, node, id, "properties");
        self.resolve_extends(scope, node, id);
        id
    }

    /// An instance of an entity: its type is the entity, every other
    /// non-meta-model predicate is a property assignment.
    pub(crate) fn build_entity_value(&mut self, scope: &Scope, node: &RdfNode) -> ElementId {
        let value = EntityValue {
            entity: None,
            assignments: Vec::new(),
        };
        let id = self.reserve_element(scope, node, "EntityValue", ElementKind::EntityValue(value));
        let store = self.store(scope.document);
        if let Some(entity) = store.type_of(node) {
            self.resolve_iri_into(scope, id, Slot::EntityType, entity);
        }

        for statement in store.statements_about(node) {
            let predicate = statement.predicate_iri.as_str();
            if predicate == RDF_TYPE_IRI
                || predicate.starts_with(RDFS_NS)
                || SammIri::parse(predicate).is_some_and(|samm| samm.namespace == SammNamespace::MetaModel)
            {
                continue;
            }
            self.assign(scope, id, statement);
        }
        id
    }

    /// Bind one `predicate value` statement of an entity value as an assignment.
    ///
    /// When the value refers into a document still in progress the whole
    /// statement is queued and assigned again on resume.
    fn assign(&mut self, scope: &Scope, owner: ElementId, statement: &'w RdfStatement) {
        match self.value_of(scope, owner, &statement.object) {
            Ok(Some(value)) => {
                self.resolve_iri_into(scope, owner, Slot::Assignment { value }, &statement.predicate_iri);
            }
            Ok(None) => {}
            Err(Deferred(target)) => {
                self.stats.deferred += 1;
                self.queue.enqueue(Continuation {
                    document: scope.document,
                    owner,
                    slot: Slot::AssignmentStatement {
                        statement: statement.index,
                    },
                    target,
                });
            }
        }
    }

    pub(crate) fn resume_assignment(&mut self, scope: &Scope, owner: ElementId, statement: usize) {
        let store = self.store(scope.document);
        if let Some(statement) = store.statements().get(statement) {
            self.assign(scope, owner, statement);
        }
    }

    /// Convert an object into a value; references are resolved and linked to `owner`.
    fn value_of(
        &mut self,
        scope: &Scope,
        owner: ElementId,
        object: &'w RdfObject,
    ) -> Result<Option<Value>, Deferred> {
        let node = match object {
            RdfObject::Literal(lit) => return Ok(Some(Value::Literal(lit.clone()))),
            RdfObject::Node(node) => node,
        };
        if self.store(scope.document).is_list(object) {
            let entries: Vec<_> = self.read_list(scope, object).collect();
            let mut values = Vec::with_capacity(entries.len());
            for entry in entries {
                if let Some(value) = self.value_of(scope, owner, entry.target)? {
                    values.push(value);
                }
            }
            return Ok(Some(Value::Collection(values)));
        }
        let Some(id) = self.resolve_node(scope, node)? else {
            return Ok(None);
        };
        self.cache.graph_mut().link(owner, id);
        Ok(Some(Value::Element(id)))
    }

    pub(crate) fn build_operation(&mut self, scope: &Scope, node: &RdfNode) -> ElementId {
        let id = self.reserve_element(scope, node, "Operation", ElementKind::Operation(Operation::default()));
        self.bind_property_list(scope, node, id, "input");
        let store = self.store(scope.document);
        if let Some(output) = store.object(node, &scope.vocab.samm("output")) {
            self.resolve_object_into(scope, id, Slot::OperationOutput, output);
        }
        id
    }

    pub(crate) fn build_event(&mut self, scope: &Scope, node: &RdfNode) -> ElementId {
        let id = self.reserve_element(scope, node, "Event", ElementKind::Event(Event::default()));
        self.bind_property_list(scope, node, id, "parameters");
        id
    }

    pub(crate) fn build_unit(&mut self, scope: &Scope, node: &RdfNode) -> ElementId {
        let store = self.store(scope.document);
        let v = &scope.vocab;
        let text = |predicate: &str| store.literal(node, &v.samm(predicate)).map(|lit| lit.lexical.clone());
        let unit = Unit {
            symbol: text("symbol"),
            code: text("commonCode"),
            reference_unit: None,
            conversion_factor: text("conversionFactor"),
            quantity_kinds: Vec::new(),
        };
        let id = self.reserve_element(scope, node, "Unit", ElementKind::Unit(unit));
        if let Some(reference) = store.object(node, &v.samm("referenceUnit")) {
            self.resolve_object_into(scope, id, Slot::ReferenceUnit, reference);
        }
        for (position, kind) in store.objects(node, &v.samm("quantityKind")).enumerate() {
            self.resolve_object_into(scope, id, Slot::QuantityKind { position }, kind);
        }
        id
    }

    pub(crate) fn build_quantity_kind(&mut self, scope: &Scope, node: &RdfNode) -> ElementId {
        self.reserve_element(scope, node, "QuantityKind", ElementKind::QuantityKind)
    }
}
