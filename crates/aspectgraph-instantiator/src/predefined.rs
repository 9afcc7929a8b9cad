//! Materializing catalog elements.
//!
//! Predefined characteristics, entities, entity properties, units and
//! quantity kinds have no statements in any document. The first reference
//! to one builds it from the catalog tables and registers it like any other
//! element; later references hit the registry.

use crate::base::DEFAULT_LOCALE;
use crate::deferred::Slot;
use crate::session::LoadSession;
use aspectgraph_model::catalog::{
    CharacteristicDescriptor, EntityDescriptor, PropertyDescriptor, QuantityKindDescriptor,
    UnitDescriptor,
};
use aspectgraph_model::{
    BaseAttributes, Catalog, Characteristic, CharacteristicClass, DataType, ElementId, ElementKind,
    Entity, ModelElement, OverrideKeys, Property, SammIri, SammNamespace, Unit, Vocabulary,
};

impl<'w> LoadSession<'w> {
    /// The catalog element named by the meta-model IRI `iri`, materialized on first use.
    ///
    /// Returns `None` for IRIs outside the meta-model namespaces and for
    /// names the catalog does not know.
    pub(crate) fn predefined(&mut self, iri: &str) -> Option<ElementId> {
        let samm = SammIri::parse(iri)?;
        if let Some(id) = self.cache.get(iri) {
            return Some(id);
        }
        let vocab = Vocabulary::new(samm.flavor, samm.version);
        let catalog = Catalog::get();
        match samm.namespace {
            SammNamespace::Characteristic => catalog
                .characteristic(samm.local)
                .map(|d| self.predefined_characteristic(&vocab, iri, d)),
            SammNamespace::Entity => {
                if let Some(d) = catalog.entity(samm.local) {
                    Some(self.predefined_entity(&vocab, iri, d))
                } else {
                    catalog
                        .property(samm.local)
                        .map(|d| self.predefined_property(&vocab, iri, d))
                }
            }
            SammNamespace::Unit => {
                if let Some(d) = catalog.unit(samm.local) {
                    Some(self.predefined_unit(&vocab, iri, d))
                } else {
                    catalog
                        .quantity_kind(samm.local)
                        .map(|d| self.predefined_quantity_kind(&vocab, iri, d))
                }
            }
            SammNamespace::MetaModel => None,
        }
    }

    fn predefined_characteristic(
        &mut self,
        vocab: &Vocabulary,
        iri: &str,
        d: &CharacteristicDescriptor,
    ) -> ElementId {
        let mut characteristic = Characteristic::new(CharacteristicClass::Characteristic);
        characteristic.data_type = Some(DataType::Scalar(vocab.expand(d.data_type)));
        let base = predefined_base(vocab, iri, d.name, d.preferred_name, Some(d.description), "Characteristic");
        self.cache.resolve(ModelElement::new(base, ElementKind::Characteristic(characteristic)))
    }

    fn predefined_entity(&mut self, vocab: &Vocabulary, iri: &str, d: &EntityDescriptor) -> ElementId {
        let entity_type = if d.is_abstract { "AbstractEntity" } else { "Entity" };
        let base = predefined_base(vocab, iri, d.name, d.preferred_name, Some(d.description), entity_type);
        let id = self.cache.resolve(ModelElement::new(
            base,
            ElementKind::Entity(Entity {
                is_abstract: d.is_abstract,
                properties: Vec::new(),
                extends: None,
            }),
        ));
        for (position, property) in d.properties.iter().enumerate() {
            if let Some(property_id) = self.predefined(&vocab.samm_e(property)) {
                let slot = Slot::Property {
                    position,
                    overrides: OverrideKeys::default(),
                };
                self.attach(id, &slot, property_id);
            }
        }
        id
    }

    fn predefined_property(&mut self, vocab: &Vocabulary, iri: &str, d: &PropertyDescriptor) -> ElementId {
        let property_type = if d.is_abstract { "AbstractProperty" } else { "Property" };
        let base = predefined_base(vocab, iri, d.name, d.preferred_name, Some(d.description), property_type);
        let id = self.cache.resolve(ModelElement::new(
            base,
            ElementKind::Property(Property {
                is_abstract: d.is_abstract,
                characteristic: None,
                example_value: None,
                extends: None,
            }),
        ));
        if let Some(characteristic) = d.characteristic {
            if let Some(characteristic_id) = self.predefined(&vocab.expand(characteristic)) {
                self.attach(id, &Slot::Characteristic, characteristic_id);
            }
        }
        id
    }

    fn predefined_unit(&mut self, vocab: &Vocabulary, iri: &str, d: &UnitDescriptor) -> ElementId {
        let base = predefined_base(vocab, iri, d.name, d.preferred_name, None, "Unit");
        let id = self.cache.resolve(ModelElement::new(
            base,
            ElementKind::Unit(Unit {
                symbol: Some(d.symbol.to_string()),
                code: Some(d.code.to_string()),
                reference_unit: None,
                conversion_factor: d.conversion_factor.map(str::to_string),
                quantity_kinds: Vec::new(),
            }),
        ));
        if let Some(reference) = d.reference_unit {
            if let Some(reference_id) = self.predefined(&vocab.unit(reference)) {
                self.attach(id, &Slot::ReferenceUnit, reference_id);
            }
        }
        for (position, kind) in d.quantity_kinds.iter().enumerate() {
            if let Some(kind_id) = self.predefined(&vocab.unit(kind)) {
                self.attach(id, &Slot::QuantityKind { position }, kind_id);
            }
        }
        id
    }

    fn predefined_quantity_kind(
        &mut self,
        vocab: &Vocabulary,
        iri: &str,
        d: &QuantityKindDescriptor,
    ) -> ElementId {
        let base = predefined_base(vocab, iri, d.name, d.preferred_name, None, "QuantityKind");
        self.cache.resolve(ModelElement::new(base, ElementKind::QuantityKind))
    }
}

fn predefined_base(
    vocab: &Vocabulary,
    iri: &str,
    name: &str,
    preferred_name: &str,
    description: Option<&str>,
    meta_type: &str,
) -> BaseAttributes {
    let mut base = BaseAttributes::new(iri, name);
    base.meta_model_version = vocab.version().to_string();
    base.preferred_names
        .insert(DEFAULT_LOCALE.to_string(), preferred_name.to_string());
    if let Some(description) = description {
        base.descriptions
            .insert(DEFAULT_LOCALE.to_string(), description.to_string());
    }
    base.declared_type = Some(vocab.samm(meta_type));
    base.is_predefined = true;
    base
}
