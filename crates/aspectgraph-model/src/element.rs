//! Typed model elements.
//!
//! Every element shares [`BaseAttributes`]; the kind-specific part lives in
//! [`ElementKind`]. Composite fields never own other elements: they hold
//! [`ElementId`]s into the [`ModelGraph`](crate::ModelGraph) arena, which is
//! what lets cyclic models (self-extending entities, property → characteristic
//! → entity → property) share one instance per URN.

use aspectgraph_rdf::{DocumentId, RdfLiteral};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u32);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Attributes shared by every element kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseAttributes {
    /// Canonical URN; the identity key across all loaded documents.
    pub urn: String,
    pub name: String,
    pub meta_model_version: String,
    /// Locale → preferred name.
    pub preferred_names: BTreeMap<String, String>,
    /// Locale → description.
    pub descriptions: BTreeMap<String, String>,
    pub see: Vec<String>,
    /// IRI of the declared `rdf:type`, when there is one.
    pub declared_type: Option<String>,
    pub is_anonymous: bool,
    pub is_external_reference: bool,
    pub is_predefined: bool,
    pub origin: Option<DocumentId>,
    pub parents: Vec<ElementId>,
    pub children: Vec<ElementId>,
}

impl BaseAttributes {
    pub fn new(urn: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            urn: urn.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn preferred_name(&self, locale: &str) -> Option<&str> {
        self.preferred_names.get(locale).map(String::as_str)
    }

    pub fn description(&self, locale: &str) -> Option<&str> {
        self.descriptions.get(locale).map(String::as_str)
    }
}

/// Per-use-site metadata for one reference to a shared property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverrideKeys {
    pub optional: bool,
    pub not_in_payload: bool,
    pub payload_name: Option<String>,
}

/// A property at one list position under one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyUse {
    pub property: ElementId,
    pub overrides: OverrideKeys,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// XSD / RDF scalar type IRI.
    Scalar(String),
    Entity(ElementId),
}

/// A value in an enumeration, a state or an entity value assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// Plain, typed or language-tagged literal.
    Literal(RdfLiteral),
    /// An entity value (or any other element) by reference.
    Element(ElementId),
    Collection(Vec<Value>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    Collection,
    List,
    Set,
    SortedSet,
    TimeSeries,
}

impl CollectionKind {
    /// Whether element order is significant.
    pub fn is_ordered(self) -> bool {
        matches!(self, Self::List | Self::SortedSet | Self::TimeSeries)
    }

    /// Whether duplicates are excluded.
    pub fn is_unique(self) -> bool {
        matches!(self, Self::Set | Self::SortedSet | Self::TimeSeries)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantifiableKind {
    Quantifiable,
    Measurement,
    Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructuredElement {
    /// Literal separator text between parts.
    Text(String),
    Property(ElementId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacteristicClass {
    Characteristic,
    Trait {
        base: Option<ElementId>,
        constraints: Vec<ElementId>,
    },
    Collection {
        kind: CollectionKind,
        element_characteristic: Option<ElementId>,
    },
    Either {
        left: Option<ElementId>,
        right: Option<ElementId>,
    },
    Enumeration {
        values: Vec<Value>,
    },
    State {
        values: Vec<Value>,
        default_value: Option<Value>,
    },
    Quantifiable {
        kind: QuantifiableKind,
        unit: Option<ElementId>,
    },
    SingleEntity,
    Code,
    StructuredValue {
        deconstruction_rule: Option<String>,
        elements: Vec<StructuredElement>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristic {
    pub data_type: Option<DataType>,
    pub class: CharacteristicClass,
}

impl Characteristic {
    pub fn new(class: CharacteristicClass) -> Self {
        Self {
            data_type: None,
            class,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundDefinition {
    Open,
    AtLeast,
    GreaterThan,
    AtMost,
    LessThan,
}

impl BoundDefinition {
    pub fn from_local_name(local: &str) -> Option<Self> {
        match local {
            "OPEN" => Some(Self::Open),
            "AT_LEAST" => Some(Self::AtLeast),
            "GREATER_THAN" => Some(Self::GreaterThan),
            "AT_MOST" => Some(Self::AtMost),
            "LESS_THAN" => Some(Self::LessThan),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintClass {
    Constraint,
    Range {
        min_value: Option<RdfLiteral>,
        max_value: Option<RdfLiteral>,
        lower_bound: Option<BoundDefinition>,
        upper_bound: Option<BoundDefinition>,
    },
    Length {
        min_value: Option<u64>,
        max_value: Option<u64>,
    },
    RegularExpression {
        pattern: Option<String>,
    },
    Encoding {
        encoding: Option<String>,
    },
    Language {
        language_code: Option<String>,
    },
    Locale {
        locale_code: Option<String>,
    },
    FixedPoint {
        scale: Option<u32>,
        integer: Option<u32>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub is_abstract: bool,
    pub characteristic: Option<ElementId>,
    pub example_value: Option<RdfLiteral>,
    pub extends: Option<ElementId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub is_abstract: bool,
    pub properties: Vec<PropertyUse>,
    pub extends: Option<ElementId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub property: ElementId,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityValue {
    pub entity: Option<ElementId>,
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub symbol: Option<String>,
    pub code: Option<String>,
    pub reference_unit: Option<ElementId>,
    pub conversion_factor: Option<String>,
    pub quantity_kinds: Vec<ElementId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aspect {
    pub properties: Vec<PropertyUse>,
    pub operations: Vec<ElementId>,
    pub events: Vec<ElementId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub input: Vec<PropertyUse>,
    pub output: Option<ElementId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub parameters: Vec<PropertyUse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Aspect(Aspect),
    Property(Property),
    Characteristic(Characteristic),
    Constraint(ConstraintClass),
    Entity(Entity),
    EntityValue(EntityValue),
    Unit(Unit),
    QuantityKind,
    Operation(Operation),
    Event(Event),
}

impl ElementKind {
    /// Short kind label used in logs and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Aspect(_) => "Aspect",
            Self::Property(p) if p.is_abstract => "AbstractProperty",
            Self::Property(_) => "Property",
            Self::Characteristic(_) => "Characteristic",
            Self::Constraint(_) => "Constraint",
            Self::Entity(e) if e.is_abstract => "AbstractEntity",
            Self::Entity(_) => "Entity",
            Self::EntityValue(_) => "EntityValue",
            Self::Unit(_) => "Unit",
            Self::QuantityKind => "QuantityKind",
            Self::Operation(_) => "Operation",
            Self::Event(_) => "Event",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelElement {
    pub base: BaseAttributes,
    pub kind: ElementKind,
}

impl ModelElement {
    pub fn new(base: BaseAttributes, kind: ElementKind) -> Self {
        Self { base, kind }
    }

    pub fn urn(&self) -> &str {
        &self.base.urn
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }

    pub fn as_aspect(&self) -> Option<&Aspect> {
        match &self.kind {
            ElementKind::Aspect(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&Property> {
        match &self.kind {
            ElementKind::Property(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_characteristic(&self) -> Option<&Characteristic> {
        match &self.kind {
            ElementKind::Characteristic(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_constraint(&self) -> Option<&ConstraintClass> {
        match &self.kind {
            ElementKind::Constraint(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match &self.kind {
            ElementKind::Entity(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_entity_value(&self) -> Option<&EntityValue> {
        match &self.kind {
            ElementKind::EntityValue(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_unit(&self) -> Option<&Unit> {
        match &self.kind {
            ElementKind::Unit(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_operation(&self) -> Option<&Operation> {
        match &self.kind {
            ElementKind::Operation(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_event(&self) -> Option<&Event> {
        match &self.kind {
            ElementKind::Event(e) => Some(e),
            _ => None,
        }
    }

    /// The `extends` target of an entity or property.
    pub fn extended_element(&self) -> Option<ElementId> {
        match &self.kind {
            ElementKind::Entity(e) => e.extends,
            ElementKind::Property(p) => p.extends,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_kinds_know_order_and_uniqueness() {
        assert!(CollectionKind::SortedSet.is_ordered() && CollectionKind::SortedSet.is_unique());
        assert!(CollectionKind::List.is_ordered() && !CollectionKind::List.is_unique());
        assert!(!CollectionKind::Set.is_ordered() && CollectionKind::Set.is_unique());
        assert!(!CollectionKind::Collection.is_ordered());
    }

    #[test]
    fn element_serializes_with_ids_not_nested_elements() {
        let mut base = BaseAttributes::new("urn:x#speed", "speed");
        base.preferred_names.insert("en".into(), "Speed".into());
        let element = ModelElement::new(
            base,
            ElementKind::Property(Property {
                is_abstract: false,
                characteristic: Some(ElementId(7)),
                example_value: None,
                extends: None,
            }),
        );

        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["base"]["preferred_names"]["en"], "Speed");
        assert_eq!(json["kind"]["Property"]["characteristic"], 7);

        let back: ModelElement = serde_json::from_value(json).unwrap();
        assert_eq!(back, element);
        assert_eq!(back.kind.label(), "Property");
    }
}
