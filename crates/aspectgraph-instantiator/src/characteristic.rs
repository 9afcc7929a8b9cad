//! The characteristic resolution chain.

use crate::deferred::Slot;
use crate::session::{LoadSession, Scope};
use aspectgraph_model::{
    is_scalar_type, Characteristic, CharacteristicClass, CollectionKind, DataType, ElementId,
    ElementKind, QuantifiableKind, SammIri, StructuredElement, Value,
};
use aspectgraph_rdf::{RdfNode, RdfObject};

/// Shape of a characteristic class: which fields it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Trait,
    Collection(CollectionKind),
    Either,
    State,
    Enumeration,
    Quantifiable(QuantifiableKind),
    SingleEntity,
    Code,
    StructuredValue,
    Generic,
}

#[derive(Debug, Clone, Copy)]
struct CharacteristicHandler {
    /// Local name of the type this handler accepts; `None` accepts anything.
    type_name: Option<&'static str>,
    shape: Shape,
}

impl CharacteristicHandler {
    fn accepts(&self, type_name: &str) -> bool {
        self.type_name.map_or(true, |name| name == type_name)
    }
}

/// Most specific first; the generic handler at the end never declines.
const CHAIN: &[CharacteristicHandler] = &[
    CharacteristicHandler { type_name: Some("Trait"), shape: Shape::Trait },
    CharacteristicHandler { type_name: Some("TimeSeries"), shape: Shape::Collection(CollectionKind::TimeSeries) },
    CharacteristicHandler { type_name: Some("SortedSet"), shape: Shape::Collection(CollectionKind::SortedSet) },
    CharacteristicHandler { type_name: Some("Set"), shape: Shape::Collection(CollectionKind::Set) },
    CharacteristicHandler { type_name: Some("List"), shape: Shape::Collection(CollectionKind::List) },
    CharacteristicHandler { type_name: Some("Collection"), shape: Shape::Collection(CollectionKind::Collection) },
    CharacteristicHandler { type_name: Some("Either"), shape: Shape::Either },
    CharacteristicHandler { type_name: Some("State"), shape: Shape::State },
    CharacteristicHandler { type_name: Some("Enumeration"), shape: Shape::Enumeration },
    CharacteristicHandler { type_name: Some("Duration"), shape: Shape::Quantifiable(QuantifiableKind::Duration) },
    CharacteristicHandler { type_name: Some("Measurement"), shape: Shape::Quantifiable(QuantifiableKind::Measurement) },
    CharacteristicHandler { type_name: Some("Quantifiable"), shape: Shape::Quantifiable(QuantifiableKind::Quantifiable) },
    CharacteristicHandler { type_name: Some("SingleEntity"), shape: Shape::SingleEntity },
    CharacteristicHandler { type_name: Some("Code"), shape: Shape::Code },
    CharacteristicHandler { type_name: Some("StructuredValue"), shape: Shape::StructuredValue },
    CharacteristicHandler { type_name: None, shape: Shape::Generic },
];

fn skeleton(shape: Shape) -> CharacteristicClass {
    match shape {
        Shape::Trait => CharacteristicClass::Trait {
            base: None,
            constraints: Vec::new(),
        },
        Shape::Collection(kind) => CharacteristicClass::Collection {
            kind,
            element_characteristic: None,
        },
        Shape::Either => CharacteristicClass::Either {
            left: None,
            right: None,
        },
        Shape::State => CharacteristicClass::State {
            values: Vec::new(),
            default_value: None,
        },
        Shape::Enumeration => CharacteristicClass::Enumeration { values: Vec::new() },
        Shape::Quantifiable(kind) => CharacteristicClass::Quantifiable { kind, unit: None },
        Shape::SingleEntity => CharacteristicClass::SingleEntity,
        Shape::Code => CharacteristicClass::Code,
        Shape::StructuredValue => CharacteristicClass::StructuredValue {
            deconstruction_rule: None,
            elements: Vec::new(),
        },
        Shape::Generic => CharacteristicClass::Characteristic,
    }
}

impl<'w> LoadSession<'w> {
    /// Instantiate the characteristic described by `node`.
    pub(crate) fn create_characteristic(&mut self, scope: &Scope, node: &RdfNode) -> ElementId {
        if let Some(id) = self.cached(scope, node) {
            return id;
        }
        if let Some(id) = node.as_iri().and_then(|iri| self.predefined(iri)) {
            return id;
        }

        let store = self.store(scope.document);
        let type_name = store
            .type_of(node)
            .and_then(SammIri::parse)
            .map_or("Characteristic", |samm| samm.local);
        let shape = CHAIN
            .iter()
            .find(|handler| handler.accepts(type_name))
            .map_or(Shape::Generic, |handler| handler.shape);
        tracing::trace!(subject = %node, ?shape, "characteristic handler");

        let mut class = skeleton(shape);
        if let CharacteristicClass::StructuredValue { deconstruction_rule, .. } = &mut class {
            *deconstruction_rule = store
                .literal(node, &scope.vocab.samm_c("deconstructionRule"))
                .map(|lit| lit.lexical.clone());
        }
        let id = self.reserve_element(
            scope,
            node,
            "Characteristic",
            ElementKind::Characteristic(Characteristic::new(class)),
        );
        self.fill_data_type(scope, node, id);
        self.fill_characteristic(scope, node, id, shape);
        id
    }

    fn fill_data_type(&mut self, scope: &Scope, node: &RdfNode, id: ElementId) {
        let store = self.store(scope.document);
        let Some(data_type) = store.object(node, &scope.vocab.samm("dataType")) else {
            return;
        };
        if let Some(iri) = data_type.as_iri().filter(|iri| is_scalar_type(iri)) {
            let scalar = DataType::Scalar(iri.to_string());
            self.update(id, |kind| {
                if let ElementKind::Characteristic(c) = kind {
                    c.data_type = Some(scalar);
                }
            });
            return;
        }
        self.resolve_object_into(scope, id, Slot::DataType, data_type);
    }

    fn fill_characteristic(&mut self, scope: &Scope, node: &RdfNode, id: ElementId, shape: Shape) {
        let store = self.store(scope.document);
        let c = |local: &str| scope.vocab.samm_c(local);
        match shape {
            Shape::Trait => {
                if let Some(base) = store.object(node, &c("baseCharacteristic")) {
                    self.resolve_object_into(scope, id, Slot::TraitBase, base);
                }
                for (position, constraint) in store.objects(node, &c("constraint")).enumerate() {
                    self.resolve_object_into(scope, id, Slot::TraitConstraint { position }, constraint);
                }
            }
            Shape::Collection(_) => {
                if let Some(element) = store.object(node, &c("elementCharacteristic")) {
                    self.resolve_object_into(scope, id, Slot::ElementCharacteristic, element);
                }
            }
            Shape::Either => {
                if let Some(left) = store.object(node, &c("left")) {
                    self.resolve_object_into(scope, id, Slot::EitherLeft, left);
                }
                if let Some(right) = store.object(node, &c("right")) {
                    self.resolve_object_into(scope, id, Slot::EitherRight, right);
                }
            }
            Shape::Enumeration | Shape::State => {
                if let Some(values) = store.object(node, &c("values")) {
                    self.fill_values(scope, id, values);
                }
                if shape == Shape::State {
                    if let Some(default) = store.object(node, &c("defaultValue")) {
                        self.fill_default_value(scope, id, default);
                    }
                }
            }
            Shape::Quantifiable(_) => {
                if let Some(unit) = store.object(node, &c("unit")) {
                    self.resolve_object_into(scope, id, Slot::Unit, unit);
                }
            }
            Shape::StructuredValue => {
                if let Some(elements) = store.object(node, &c("elements")) {
                    self.fill_structured_elements(scope, id, elements);
                }
            }
            Shape::SingleEntity | Shape::Code | Shape::Generic => {}
        }
    }

    /// Enumeration/state values: literals are stored in place, references
    /// (entity values) are resolved into their list position.
    fn fill_values(&mut self, scope: &Scope, id: ElementId, values: &'w RdfObject) {
        let entries: Vec<_> = self.read_list(scope, values).collect();
        for (position, entry) in entries.into_iter().enumerate() {
            match entry.target {
                RdfObject::Literal(lit) => {
                    let value = Value::Literal(lit.clone());
                    self.update(id, |kind| {
                        if let Some(values) = values_of(kind) {
                            let position = position.min(values.len());
                            values.insert(position, value);
                        }
                    });
                }
                RdfObject::Node(node) => {
                    self.resolve_into(scope, id, Slot::Value { position }, node);
                }
            }
        }
    }

    fn fill_default_value(&mut self, scope: &Scope, id: ElementId, default: &RdfObject) {
        match default {
            RdfObject::Literal(lit) => {
                let value = Value::Literal(lit.clone());
                self.update(id, |kind| {
                    if let ElementKind::Characteristic(Characteristic {
                        class: CharacteristicClass::State { default_value, .. },
                        ..
                    }) = kind
                    {
                        *default_value = Some(value);
                    }
                });
            }
            RdfObject::Node(node) => {
                self.resolve_into(scope, id, Slot::DefaultValue, node);
            }
        }
    }

    fn fill_structured_elements(&mut self, scope: &Scope, id: ElementId, elements: &'w RdfObject) {
        let entries: Vec<_> = self.read_list(scope, elements).collect();
        for (position, entry) in entries.into_iter().enumerate() {
            match entry.target {
                RdfObject::Literal(lit) => {
                    let text = StructuredElement::Text(lit.lexical.clone());
                    self.update(id, |kind| {
                        if let ElementKind::Characteristic(Characteristic {
                            class: CharacteristicClass::StructuredValue { elements, .. },
                            ..
                        }) = kind
                        {
                            let position = position.min(elements.len());
                            elements.insert(position, text);
                        }
                    });
                }
                RdfObject::Node(node) => {
                    self.resolve_into(scope, id, Slot::StructuredElement { position }, node);
                }
            }
        }
    }
}

fn values_of(kind: &mut ElementKind) -> Option<&mut Vec<Value>> {
    match kind {
        ElementKind::Characteristic(Characteristic {
            class: CharacteristicClass::Enumeration { values } | CharacteristicClass::State { values, .. },
            ..
        }) => Some(values),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aspectgraph_model::vocab::CHARACTERISTIC_CLASSES;

    #[test]
    fn chain_covers_every_characteristic_class_in_order() {
        let named: Vec<_> = CHAIN.iter().filter_map(|h| h.type_name).collect();
        assert_eq!(named, CHARACTERISTIC_CLASSES);
        assert!(CHAIN.last().is_some_and(|h| h.accepts("Anything")));
    }

    #[test]
    fn specific_handler_wins_over_generic() {
        let shape = |name: &str| CHAIN.iter().find(|h| h.accepts(name)).map(|h| h.shape);
        assert_eq!(shape("SortedSet"), Some(Shape::Collection(CollectionKind::SortedSet)));
        assert_eq!(shape("Measurement"), Some(Shape::Quantifiable(QuantifiableKind::Measurement)));
        assert_eq!(shape("Characteristic"), Some(Shape::Generic));
    }
}
