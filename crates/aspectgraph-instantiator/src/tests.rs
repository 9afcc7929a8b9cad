//! End-to-end tests: Turtle fixtures through a full load session.

use crate::{AnonymousNaming, InstantiatorConfig, LoadSession, NotificationKind};
use aspectgraph_model::{
    CharacteristicClass, CollectionKind, ConstraintClass, DataType, ElementId, ElementKind,
    ModelElement, QuantifiableKind, StructuredElement, Value,
};
use aspectgraph_rdf::{DocumentId, RdfFormat, Workspace, XSD_NS};
use proptest::prelude::*;

const PREFIXES: &str = r#"
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix samm: <urn:samm:org.eclipse.esmf.samm:meta-model:2.1.0#> .
@prefix samm-c: <urn:samm:org.eclipse.esmf.samm:characteristic:2.1.0#> .
@prefix samm-e: <urn:samm:org.eclipse.esmf.samm:entity:2.1.0#> .
@prefix unit: <urn:samm:org.eclipse.esmf.samm:unit:2.1.0#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix : <urn:samm:org.example.movement:1.0.0#> .
"#;

const NS: &str = "urn:samm:org.example.movement:1.0.0#";
const SAMM_C: &str = "urn:samm:org.eclipse.esmf.samm:characteristic:2.1.0#";
const SAMM_E: &str = "urn:samm:org.eclipse.esmf.samm:entity:2.1.0#";
const UNIT: &str = "urn:samm:org.eclipse.esmf.samm:unit:2.1.0#";

fn workspace(documents: &[&str]) -> Workspace {
    let mut workspace = Workspace::new();
    for (i, body) in documents.iter().enumerate() {
        workspace
            .load_str(format!("doc{i}.ttl"), &format!("{PREFIXES}{body}"), RdfFormat::Turtle)
            .unwrap();
    }
    workspace
}

fn urn(local: &str) -> String {
    format!("{NS}{local}")
}

fn element<'a>(session: &'a LoadSession<'_>, urn: &str) -> &'a ModelElement {
    let id = session
        .lookup(urn)
        .unwrap_or_else(|| panic!("{urn} was not instantiated"));
    session.element(id).unwrap()
}

fn characteristic_of(session: &LoadSession<'_>, property: &str) -> ElementId {
    element(session, &urn(property))
        .as_property()
        .and_then(|p| p.characteristic)
        .unwrap_or_else(|| panic!("{property} has no characteristic"))
}

fn class_of<'a>(session: &'a LoadSession<'_>, id: ElementId) -> &'a CharacteristicClass {
    &session.element(id).unwrap().as_characteristic().unwrap().class
}

fn name(session: &LoadSession<'_>, id: ElementId) -> String {
    session.element(id).unwrap().name().to_string()
}

const MOVEMENT: &str = r#"
:Movement a samm:Aspect ;
    samm:preferredName "movement"@en ;
    samm:preferredName "Bewegung"@de ;
    samm:description "Aspect for movement information" ;
    samm:properties ( :isMoving :speed [ samm:property :position ; samm:optional true ; samm:payloadName "pos" ] ) ;
    samm:operations ( ) ;
    samm:events ( ) .

:isMoving a samm:Property ;
    samm:characteristic samm-c:Boolean .

:speed a samm:Property ;
    samm:characteristic :Speed ;
    samm:exampleValue "0.5"^^xsd:float .

:Speed a samm-c:Measurement ;
    samm:dataType xsd:float ;
    samm-c:unit unit:kilometrePerHour .

:position a samm:Property ;
    samm:characteristic :SpatialPositionCharacteristic .

:SpatialPositionCharacteristic a samm-c:SingleEntity ;
    samm:dataType samm-e:Point3d .
"#;

#[test]
fn movement_aspect_is_fully_linked() {
    let workspace = workspace(&[MOVEMENT]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_document(DocumentId(0)).unwrap();

    let movement = element(&session, &urn("Movement"));
    assert_eq!(movement.base.preferred_name("en"), Some("movement"));
    assert_eq!(movement.base.preferred_name("de"), Some("Bewegung"));
    assert_eq!(
        movement.base.description("en"),
        Some("Aspect for movement information")
    );
    assert_eq!(movement.base.meta_model_version, "2.1.0");

    let aspect = movement.as_aspect().unwrap();
    let names: Vec<_> = aspect
        .properties
        .iter()
        .map(|u| name(&session, u.property))
        .collect();
    assert_eq!(names, vec!["isMoving", "speed", "position"]);
    assert!(aspect.properties[2].overrides.optional);
    assert_eq!(aspect.properties[2].overrides.payload_name.as_deref(), Some("pos"));
    assert!(aspect.operations.is_empty());

    let speed = element(&session, &urn("speed")).as_property().unwrap();
    assert_eq!(speed.example_value.as_ref().unwrap().lexical, "0.5");
    let measurement = session.element(speed.characteristic.unwrap()).unwrap();
    let characteristic = measurement.as_characteristic().unwrap();
    assert_eq!(
        characteristic.data_type,
        Some(DataType::Scalar(format!("{XSD_NS}float")))
    );
    let CharacteristicClass::Quantifiable { kind, unit } = &characteristic.class else {
        panic!("speed is not quantifiable")
    };
    assert_eq!(*kind, QuantifiableKind::Measurement);
    let kmh = session.element(unit.unwrap()).unwrap();
    assert_eq!(kmh.urn(), format!("{UNIT}kilometrePerHour"));
    assert_eq!(kmh.as_unit().unwrap().symbol.as_deref(), Some("km/h"));

    let spatial = element(&session, &urn("SpatialPositionCharacteristic"));
    let Some(DataType::Entity(point)) = spatial.as_characteristic().unwrap().data_type else {
        panic!("no entity data type")
    };
    let point3d = session.element(point).unwrap();
    assert!(point3d.base.is_predefined);
    let coordinates: Vec<_> = point3d
        .as_entity()
        .unwrap()
        .properties
        .iter()
        .map(|u| name(&session, u.property))
        .collect();
    assert_eq!(coordinates, vec!["x", "y", "z"]);

    assert!(session.notifications().is_empty(), "{:?}", session.notifications());
    assert_eq!(session.pending(), 0);
}

#[test]
fn shared_property_is_one_instance() {
    let workspace = workspace(&[r#"
:Movement a samm:Aspect ;
    samm:properties ( :label [ samm:property :label ; samm:optional true ] ) .
:Detail a samm:Entity ;
    samm:properties ( :label ) .
:label a samm:Property ;
    samm:characteristic samm-c:Text .
"#]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_document(DocumentId(0)).unwrap();

    let label = session.lookup(&urn("label")).unwrap();
    let aspect = element(&session, &urn("Movement")).as_aspect().unwrap();
    assert!(aspect.properties.iter().all(|u| u.property == label));
    let entity = element(&session, &urn("Detail")).as_entity().unwrap();
    assert_eq!(entity.properties[0].property, label);

    let count = session
        .graph()
        .iter()
        .filter(|(_, e)| e.urn() == urn("label"))
        .count();
    assert_eq!(count, 1);

    // Override keys live on the use site only.
    assert!(!aspect.properties[0].overrides.optional);
    assert!(aspect.properties[1].overrides.optional);
    assert!(!entity.properties[0].overrides.optional);

    let parents = &session.element(label).unwrap().base.parents;
    assert!(parents.contains(&session.lookup(&urn("Movement")).unwrap()));
    assert!(parents.contains(&session.lookup(&urn("Detail")).unwrap()));
}

#[test]
fn reference_cycles_terminate() {
    let workspace = workspace(&[r#"
:Node a samm:Entity ;
    samm:properties ( :next ) .
:next a samm:Property ;
    samm:characteristic :NodeCharacteristic .
:NodeCharacteristic a samm:Characteristic ;
    samm:dataType :Node .
:Loop a samm:AbstractEntity ;
    samm:extends :Loop .
"#]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_document(DocumentId(0)).unwrap();

    let node = session.lookup(&urn("Node")).unwrap();
    let characteristic = characteristic_of(&session, "next");
    assert_eq!(
        session.element(characteristic).unwrap().as_characteristic().unwrap().data_type,
        Some(DataType::Entity(node))
    );

    let looping = session.lookup(&urn("Loop")).unwrap();
    let entity = session.element(looping).unwrap().as_entity().unwrap();
    assert!(entity.is_abstract);
    assert_eq!(entity.extends, Some(looping));
    assert_eq!(session.graph().len(), 4);
}

#[test]
fn boolean_comes_from_the_catalog_without_cross_document_lookup() {
    let workspace = workspace(&[
        r#"
:Machine a samm:Aspect ;
    samm:properties ( :isOn ) .
:isOn a samm:Property ;
    samm:characteristic samm-c:Boolean .
"#,
        ":Unrelated a samm:Property ; samm:characteristic samm-c:Text .",
    ]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_document(DocumentId(0)).unwrap();

    assert_eq!(session.stats().cross_document_lookups, 0);
    assert!(!session.is_instantiated(DocumentId(1)));

    let boolean = element(&session, &format!("{SAMM_C}Boolean"));
    assert!(boolean.base.is_predefined);
    assert!(boolean.base.origin.is_none());
    assert_eq!(boolean.base.preferred_name("en"), Some("Boolean"));
    assert_eq!(
        boolean.as_characteristic().unwrap().data_type,
        Some(DataType::Scalar(format!("{XSD_NS}boolean")))
    );
}

const CROSS_A: &str = r#"
:Movement a samm:Aspect ;
    samm:properties ( :speed ) .
:speed a samm:Property ;
    samm:characteristic :SpeedTrait .
:SpeedBase a samm-c:Measurement ;
    samm:dataType xsd:float ;
    samm-c:unit unit:metrePerSecond .
"#;

const CROSS_B: &str = r#"
:SpeedTrait a samm-c:Trait ;
    samm-c:baseCharacteristic :SpeedBase ;
    samm-c:constraint :SpeedRange .
:SpeedRange a samm-c:RangeConstraint ;
    samm-c:minValue "0"^^xsd:float ;
    samm-c:lowerBoundDefinition samm-c:AT_LEAST .
"#;

#[test]
fn back_reference_into_document_in_progress_is_deferred() {
    let workspace = workspace(&[CROSS_A, CROSS_B]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_document(DocumentId(0)).unwrap();

    assert_eq!(session.stats().deferred, 1);
    assert_eq!(session.stats().resumed, 1);
    assert_eq!(session.pending(), 0);

    let trait_id = characteristic_of(&session, "speed");
    let CharacteristicClass::Trait { base, constraints } = class_of(&session, trait_id) else {
        panic!("not a trait")
    };
    assert_eq!(*base, session.lookup(&urn("SpeedBase")));
    assert_eq!(constraints.len(), 1);
    let range = session.element(constraints[0]).unwrap().as_constraint().unwrap();
    assert!(matches!(range, ConstraintClass::Range { min_value: Some(_), .. }));

    assert!(session.is_instantiated(DocumentId(1)));
    assert_eq!(session.external_documents(), vec![DocumentId(1)]);
    assert!(session.element(trait_id).unwrap().base.is_external_reference);
    assert!(!element(&session, &urn("speed")).base.is_external_reference);
    assert!(session.notifications().is_empty(), "{:?}", session.notifications());
}

#[test]
fn three_document_cycle_reaches_fixpoint() {
    let workspace = workspace(&[
        r#"
:first a samm:Property ; samm:characteristic :SecondList .
:FirstText a samm:Characteristic ; samm:dataType xsd:string .
"#,
        r#"
:SecondList a samm-c:List ; samm-c:elementCharacteristic :ThirdTrait .
"#,
        r#"
:ThirdTrait a samm-c:Trait ; samm-c:baseCharacteristic :FirstText .
"#,
    ]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_document(DocumentId(0)).unwrap();

    let list = characteristic_of(&session, "first");
    let CharacteristicClass::Collection {
        kind,
        element_characteristic,
    } = class_of(&session, list)
    else {
        panic!("not a collection")
    };
    assert_eq!(*kind, CollectionKind::List);
    let third = element_characteristic.unwrap();
    let CharacteristicClass::Trait { base, .. } = class_of(&session, third) else {
        panic!("not a trait")
    };
    assert_eq!(*base, session.lookup(&urn("FirstText")));
    assert_eq!(session.pending(), 0);
    assert!((0..3).all(|i| session.is_instantiated(DocumentId(i))));
}

#[test]
fn entity_value_assignment_into_document_in_progress_is_resumed() {
    let workspace = workspace(&[
        r#"
:prop a samm:Property ; samm:characteristic :OuterValues .
:innerValue a :Inner .
:Inner a samm:Entity ; samm:properties ( ) .
:child a samm:Property .
:siblings a samm:Property .
"#,
        r#"
:OuterValues a samm-c:Enumeration ;
    samm:dataType :Outer ;
    samm-c:values ( :outerValue ) .
:Outer a samm:Entity ; samm:properties ( :child ) .
:outerValue a :Outer ;
    :child :innerValue ;
    :siblings ( :innerValue "loose" ) .
"#,
    ]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_all();

    assert!(session.notifications().is_empty(), "{:?}", session.notifications());
    assert_eq!(session.pending(), 0);
    // `:child` in the entity's property list plus both assignments.
    assert_eq!(session.stats().deferred, 3);
    assert_eq!(session.stats().resumed, 3);

    let inner = session.lookup(&urn("innerValue")).unwrap();
    let outer_value = session.lookup(&urn("outerValue")).unwrap();
    let value = session.element(outer_value).unwrap().as_entity_value().unwrap();
    assert_eq!(value.entity, session.lookup(&urn("Outer")));

    let names: Vec<_> = value
        .assignments
        .iter()
        .map(|a| name(&session, a.property))
        .collect();
    assert_eq!(names, vec!["child", "siblings"]);
    assert_eq!(value.assignments[0].value, Value::Element(inner));
    let Value::Collection(siblings) = &value.assignments[1].value else {
        panic!("siblings is not a collection")
    };
    assert_eq!(siblings.len(), 2);
    assert_eq!(siblings[0], Value::Element(inner));
    assert!(matches!(&siblings[1], Value::Literal(lit) if lit.lexical == "loose"));
    assert!(session.element(inner).unwrap().base.parents.contains(&outer_value));

    let CharacteristicClass::Enumeration { values } = class_of(&session, characteristic_of(&session, "prop"))
    else {
        panic!("not an enumeration")
    };
    assert_eq!(values, &vec![Value::Element(outer_value)]);
}

#[test]
fn mutual_extends_across_documents_terminates() {
    let workspace = workspace(&[
        ":A a samm:AbstractEntity ; samm:extends :B .",
        ":B a samm:AbstractEntity ; samm:extends :A .",
    ]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_all();

    let a = session.lookup(&urn("A")).unwrap();
    let b = session.lookup(&urn("B")).unwrap();
    let base_of = |id: ElementId| session.element(id).unwrap().extended_element();
    assert_eq!(base_of(a), Some(b));
    assert_eq!(base_of(b), Some(a));
    assert_eq!(base_of(base_of(a).unwrap()), Some(a));

    assert_eq!(session.graph().len(), 2);
    assert!(session.element(a).unwrap().base.children.contains(&b));
    assert!(session.element(b).unwrap().base.children.contains(&a));
    assert!(session.element(b).unwrap().base.is_external_reference);
    assert_eq!(session.pending(), 0);
    assert!(session.notifications().is_empty(), "{:?}", session.notifications());
}

#[test]
fn override_keys_stay_with_their_use_site() {
    let workspace = workspace(&[r#"
:Movement a samm:Aspect ;
    samm:properties ( [ samm:property :p ; samm:optional true ] ) .
:Detail a samm:Entity ;
    samm:properties ( [ samm:property :p ; samm:notInPayload true ] ) .
:p a samm:Property ;
    samm:characteristic samm-c:Text .
"#]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_all();

    let p = session.lookup(&urn("p")).unwrap();
    let movement = session.lookup(&urn("Movement")).unwrap();
    let detail = session.lookup(&urn("Detail")).unwrap();
    let mut graph = session.finish().graph;

    let aspect_use = graph.get(movement).unwrap().as_aspect().unwrap().properties[0].clone();
    let entity_use = graph.get(detail).unwrap().as_entity().unwrap().properties[0].clone();
    assert_eq!(aspect_use.property, p);
    assert_eq!(entity_use.property, p);
    assert!(aspect_use.overrides.optional && !aspect_use.overrides.not_in_payload);
    assert!(!entity_use.overrides.optional && entity_use.overrides.not_in_payload);

    let Some(ElementKind::Aspect(aspect)) = graph.get_mut(movement).map(|e| &mut e.kind) else {
        panic!("Movement is not an aspect")
    };
    aspect.properties[0].overrides.optional = false;

    let entity_use = &graph.get(detail).unwrap().as_entity().unwrap().properties[0];
    assert!(entity_use.overrides.not_in_payload);
    assert!(!entity_use.overrides.optional);
    assert!(graph.get(p).unwrap().as_property().unwrap().characteristic.is_some());
}

#[test]
fn anonymous_characteristic_converges_to_one_instance() {
    let workspace = workspace(&[r#"
:a a samm:Property ; samm:characteristic _:shared .
:b a samm:Property ; samm:characteristic _:shared .
_:shared a samm-c:Trait ;
    samm-c:baseCharacteristic samm-c:Text ;
    samm-c:constraint [ a samm-c:LengthConstraint ; samm-c:maxValue "10"^^xsd:nonNegativeInteger ] .
"#]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_document(DocumentId(0)).unwrap();

    let shared = characteristic_of(&session, "a");
    assert_eq!(shared, characteristic_of(&session, "b"));
    let trait_element = session.element(shared).unwrap();
    assert!(trait_element.base.is_anonymous);
    assert_eq!(trait_element.name(), "Trait1");
    assert_eq!(trait_element.urn(), urn("Trait1"));
    assert_eq!(session.lookup(&urn("Trait1")), Some(shared));

    let CharacteristicClass::Trait { constraints, .. } = class_of(&session, shared) else {
        panic!("not a trait")
    };
    let length = session.element(constraints[0]).unwrap();
    assert_eq!(length.name(), "LengthConstraint2");
    assert_eq!(
        length.as_constraint(),
        Some(&ConstraintClass::Length {
            min_value: None,
            max_value: Some(10)
        })
    );
}

#[test]
fn random_naming_uses_hex_suffix() {
    let workspace = workspace(&[
        ":a a samm:Property ; samm:characteristic [ a samm-c:Code ; samm:dataType xsd:string ] .",
    ]);
    let config = InstantiatorConfig {
        anonymous_naming: AnonymousNaming::Random,
        ..InstantiatorConfig::default()
    };
    let mut session = LoadSession::new(&workspace, config);
    session.instantiate_document(DocumentId(0)).unwrap();

    let code = name(&session, characteristic_of(&session, "a"));
    let suffix = code.strip_prefix("Code").unwrap();
    assert_eq!(suffix.len(), 8);
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn one_dangling_reference_is_one_notification() {
    let workspace = workspace(&[r#"
:Movement a samm:Aspect ;
    samm:properties ( :good :broken ) .
:good a samm:Property ; samm:characteristic samm-c:Text .
:broken a samm:Property ; samm:characteristic :Missing .
"#]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_document(DocumentId(0)).unwrap();

    let notifications = session.notifications();
    assert_eq!(notifications.len(), 1, "{notifications:?}");
    assert_eq!(notifications[0].kind, NotificationKind::UnresolvedReference);
    assert_eq!(notifications[0].subject, urn("Missing"));

    assert!(element(&session, &urn("good")).as_property().unwrap().characteristic.is_some());
    assert!(element(&session, &urn("broken")).as_property().unwrap().characteristic.is_none());
    assert_eq!(
        element(&session, &urn("Movement")).as_aspect().unwrap().properties.len(),
        2
    );
}

#[test]
fn enumeration_of_entity_values() {
    let workspace = workspace(&[r#"
:status a samm:Property ; samm:characteristic :StatusEnum .
:StatusEnum a samm-c:Enumeration ;
    samm:dataType :StatusEntity ;
    samm-c:values ( :Ready :Busy ) .
:StatusEntity a samm:Entity ; samm:properties ( :statusCode :statusLabel ) .
:statusCode a samm:Property ; samm:characteristic samm-c:Text .
:statusLabel a samm:Property ; samm:characteristic samm-c:MultiLanguageText .
:Ready a :StatusEntity ; :statusCode "R" ; :statusLabel "ready"@en .
:Busy a :StatusEntity ; :statusCode "B" ; :statusLabel "busy"@en .
:Color a samm-c:Enumeration ; samm:dataType xsd:string ; samm-c:values ( "red" "green" ) .
"#]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_document(DocumentId(0)).unwrap();

    let status = characteristic_of(&session, "status");
    let CharacteristicClass::Enumeration { values } = class_of(&session, status) else {
        panic!("not an enumeration")
    };
    let ready = session.lookup(&urn("Ready")).unwrap();
    let busy = session.lookup(&urn("Busy")).unwrap();
    assert_eq!(values, &vec![Value::Element(ready), Value::Element(busy)]);

    let ready_value = session.element(ready).unwrap().as_entity_value().unwrap();
    assert_eq!(ready_value.entity, session.lookup(&urn("StatusEntity")));
    assert_eq!(ready_value.assignments.len(), 2);
    let code = ready_value
        .assignments
        .iter()
        .find(|a| Some(a.property) == session.lookup(&urn("statusCode")))
        .unwrap();
    assert!(matches!(&code.value, Value::Literal(lit) if lit.lexical == "R"));

    let color = session.lookup(&urn("Color")).unwrap();
    let CharacteristicClass::Enumeration { values } = class_of(&session, color) else {
        panic!("not an enumeration")
    };
    let literals: Vec<_> = values
        .iter()
        .filter_map(|v| match v {
            Value::Literal(lit) => Some(lit.lexical.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(literals, vec!["red", "green"]);
}

#[test]
fn state_either_and_structured_value() {
    let workspace = workspace(&[r#"
:Phase a samm-c:State ;
    samm:dataType xsd:string ;
    samm-c:values ( "idle" "running" ) ;
    samm-c:defaultValue "idle" .
:Result a samm-c:Either ;
    samm-c:left samm-c:Text ;
    samm-c:right :Numbers .
:Numbers a samm-c:Set ;
    samm:dataType xsd:int ;
    samm-c:elementCharacteristic samm-c:Text .
:Email a samm-c:StructuredValue ;
    samm:dataType xsd:string ;
    samm-c:deconstructionRule "([a-z]+)@([a-z.]+)" ;
    samm-c:elements ( :user "@" :domain ) .
:user a samm:Property ; samm:characteristic samm-c:Text .
:domain a samm:Property ; samm:characteristic samm-c:Text .
"#]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_document(DocumentId(0)).unwrap();

    let phase = session.lookup(&urn("Phase")).unwrap();
    let CharacteristicClass::State {
        values,
        default_value,
    } = class_of(&session, phase)
    else {
        panic!("not a state")
    };
    assert_eq!(values.len(), 2);
    assert!(matches!(default_value, Some(Value::Literal(lit)) if lit.lexical == "idle"));

    let result = session.lookup(&urn("Result")).unwrap();
    let CharacteristicClass::Either { left, right } = class_of(&session, result) else {
        panic!("not an either")
    };
    assert_eq!(*left, session.lookup(&format!("{SAMM_C}Text")));
    assert_eq!(*right, session.lookup(&urn("Numbers")));
    let CharacteristicClass::Collection { kind, .. } = class_of(&session, right.unwrap()) else {
        panic!("not a collection")
    };
    assert!(kind.is_unique() && !kind.is_ordered());

    let email = session.lookup(&urn("Email")).unwrap();
    let CharacteristicClass::StructuredValue {
        deconstruction_rule,
        elements,
    } = class_of(&session, email)
    else {
        panic!("not a structured value")
    };
    assert_eq!(deconstruction_rule.as_deref(), Some("([a-z]+)@([a-z.]+)"));
    assert_eq!(
        elements,
        &vec![
            StructuredElement::Property(session.lookup(&urn("user")).unwrap()),
            StructuredElement::Text("@".to_string()),
            StructuredElement::Property(session.lookup(&urn("domain")).unwrap()),
        ]
    );
}

#[test]
fn time_series_entity_refines_abstract_value() {
    let workspace = workspace(&[r#"
:Reading a samm:Entity ;
    samm:extends samm-e:TimeSeriesEntity ;
    samm:properties ( [ samm:extends samm-e:value ; samm:characteristic :Temperature ] ) .
:Temperature a samm-c:Measurement ;
    samm:dataType xsd:float ;
    samm-c:unit unit:degreeCelsius .
"#]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_document(DocumentId(0)).unwrap();

    let reading = element(&session, &urn("Reading")).as_entity().unwrap();
    let series = session.element(reading.extends.unwrap()).unwrap();
    assert_eq!(series.urn(), format!("{SAMM_E}TimeSeriesEntity"));
    assert!(series.as_entity().unwrap().is_abstract);
    assert_eq!(series.as_entity().unwrap().properties.len(), 2);

    let refined = session.element(reading.properties[0].property).unwrap();
    assert!(refined.base.is_anonymous);
    assert_eq!(refined.name(), "value");
    let property = refined.as_property().unwrap();
    let value = session.element(property.extends.unwrap()).unwrap();
    assert_eq!(value.urn(), format!("{SAMM_E}value"));
    assert!(value.as_property().unwrap().is_abstract);
    assert_eq!(property.characteristic, session.lookup(&urn("Temperature")));
    assert!(session.notifications().is_empty(), "{:?}", session.notifications());
}

#[test]
fn operations_and_events() {
    let workspace = workspace(&[r#"
:Machine a samm:Aspect ;
    samm:properties ( ) ;
    samm:operations ( :toggle ) ;
    samm:events ( :toggled ) .
:toggle a samm:Operation ;
    samm:input ( :on ) ;
    samm:output :result .
:toggled a samm:Event ;
    samm:parameters ( :on ) .
:on a samm:Property ; samm:characteristic samm-c:Boolean .
:result a samm:Property ; samm:characteristic samm-c:Text .
"#]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_document(DocumentId(0)).unwrap();

    let on = session.lookup(&urn("on")).unwrap();
    let machine = element(&session, &urn("Machine")).as_aspect().unwrap();
    assert_eq!(machine.operations, vec![session.lookup(&urn("toggle")).unwrap()]);
    assert_eq!(machine.events, vec![session.lookup(&urn("toggled")).unwrap()]);

    let toggle = element(&session, &urn("toggle")).as_operation().unwrap();
    assert_eq!(toggle.input[0].property, on);
    assert_eq!(toggle.output, session.lookup(&urn("result")));
    let toggled = element(&session, &urn("toggled")).as_event().unwrap();
    assert_eq!(toggled.parameters[0].property, on);
}

#[test]
fn custom_unit_links_catalog_units() {
    let workspace = workspace(&[r#"
:furlong a samm:Unit ;
    samm:preferredName "furlong"@en ;
    samm:symbol "fur" ;
    samm:referenceUnit unit:metre ;
    samm:conversionFactor "201.168" ;
    samm:quantityKind unit:length .
"#]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_document(DocumentId(0)).unwrap();

    let furlong = element(&session, &urn("furlong")).as_unit().unwrap();
    assert_eq!(furlong.symbol.as_deref(), Some("fur"));
    assert_eq!(furlong.conversion_factor.as_deref(), Some("201.168"));
    assert_eq!(furlong.reference_unit, session.lookup(&format!("{UNIT}metre")));
    assert_eq!(
        furlong.quantity_kinds,
        vec![session.lookup(&format!("{UNIT}length")).unwrap()]
    );
    let metre = element(&session, &format!("{UNIT}metre")).as_unit().unwrap();
    assert_eq!(metre.quantity_kinds.len(), 3);
}

#[test]
fn unknown_types_are_reported_unless_disabled() {
    let body = r#"
:thing a samm:Gadget .
:speed a samm:Property ; samm:characteristic samm-c:Text .
"#;
    let workspace = workspace(&[body]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_document(DocumentId(0)).unwrap();
    let kinds: Vec<_> = session.notifications().iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![NotificationKind::UnrecognizedType]);
    assert!(session.lookup(&urn("speed")).is_some());

    let config = InstantiatorConfig {
        report_unrecognized_types: false,
        ..InstantiatorConfig::default()
    };
    let mut quiet = LoadSession::new(&workspace, config);
    quiet.instantiate_document(DocumentId(0)).unwrap();
    assert!(quiet.notifications().is_empty());
}

#[test]
fn broken_list_is_a_structural_notification() {
    let workspace = workspace(&[r#"
:Movement a samm:Aspect ;
    samm:properties _:cell .
_:cell rdf:first :speed .
"#]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_document(DocumentId(0)).unwrap();

    let notifications = session.notifications();
    assert_eq!(notifications.len(), 1, "{notifications:?}");
    assert_eq!(notifications[0].kind, NotificationKind::StructuralInconsistency);
    assert!(element(&session, &urn("Movement")).as_aspect().unwrap().properties.is_empty());
}

#[test]
fn single_element_on_demand() {
    let workspace = workspace(&[MOVEMENT]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    let id = session
        .instantiate_element(DocumentId(0), &urn("speed"))
        .unwrap()
        .unwrap();

    assert_eq!(session.lookup(&urn("speed")), Some(id));
    assert!(session.lookup(&urn("Speed")).is_some());
    assert!(session.lookup(&urn("Movement")).is_none());
    assert!(!session.is_instantiated(DocumentId(0)));
}

#[test]
fn repeated_and_unknown_documents() {
    let workspace = workspace(&[MOVEMENT]);
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_document(DocumentId(0)).unwrap();
    let before = session.graph().len();
    session.instantiate_document(DocumentId(0)).unwrap();
    assert_eq!(session.graph().len(), before);
    assert_eq!(session.stats().documents_instantiated, 1);

    assert!(matches!(
        session.instantiate_document(DocumentId(7)),
        Err(crate::InstantiateError::UnknownDocument(DocumentId(7)))
    ));
}

#[test]
fn legacy_bamm_models_load() {
    let mut workspace = Workspace::new();
    workspace
        .load_str(
            "legacy.ttl",
            r#"
@prefix bamm: <urn:bamm:io.openmanufacturing:meta-model:1.0.0#> .
@prefix bamm-c: <urn:bamm:io.openmanufacturing:characteristic:1.0.0#> .
@prefix : <urn:bamm:com.example:1.0.0#> .
:Legacy a bamm:Aspect ; bamm:properties ( :name ) .
:name a bamm:Property ; bamm:characteristic bamm-c:Text .
"#,
            RdfFormat::Turtle,
        )
        .unwrap();
    let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
    session.instantiate_all();

    let legacy = element(&session, "urn:bamm:com.example:1.0.0#Legacy");
    assert_eq!(legacy.base.meta_model_version, "1.0.0");
    assert_eq!(legacy.as_aspect().unwrap().properties.len(), 1);
    let text = element(&session, "urn:bamm:io.openmanufacturing:characteristic:1.0.0#Text");
    assert!(text.base.is_predefined);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn aspect_properties_keep_list_order(
        names in proptest::sample::subsequence(
            vec!["alpha", "bravo", "charlie", "delta", "echo", "foxtrot"],
            1..=6,
        ).prop_shuffle()
    ) {
        let list = names.iter().map(|n| format!(":{n}")).collect::<Vec<_>>().join(" ");
        let mut body = format!(":Ordered a samm:Aspect ; samm:properties ( {list} ) .\n");
        // Declare the properties in reverse so store order differs from list order.
        for n in names.iter().rev() {
            body.push_str(&format!(":{n} a samm:Property ; samm:characteristic samm-c:Text .\n"));
        }
        let workspace = workspace(&[body.as_str()]);
        let mut session = LoadSession::new(&workspace, InstantiatorConfig::default());
        session.instantiate_document(DocumentId(0)).unwrap();

        let aspect = element(&session, &urn("Ordered")).as_aspect().unwrap();
        let order: Vec<_> = aspect.properties.iter().map(|u| name(&session, u.property)).collect();
        prop_assert_eq!(order, names);
    }
}
