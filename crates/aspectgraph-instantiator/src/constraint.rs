//! The constraint resolution chain.
//!
//! Constraints only carry literal parameters, so a handler reads everything
//! it needs before the element is registered.

use crate::session::{LoadSession, Scope};
use aspectgraph_model::{BoundDefinition, ConstraintClass, ElementId, ElementKind, SammIri, Vocabulary};
use aspectgraph_rdf::{local_name, RdfNode, Store};

type Read = fn(&Store, &Vocabulary, &RdfNode) -> ConstraintClass;

struct ConstraintHandler {
    type_name: Option<&'static str>,
    read: Read,
}

const CHAIN: &[ConstraintHandler] = &[
    ConstraintHandler { type_name: Some("RangeConstraint"), read: read_range },
    ConstraintHandler { type_name: Some("LengthConstraint"), read: read_length },
    ConstraintHandler { type_name: Some("RegularExpressionConstraint"), read: read_regular_expression },
    ConstraintHandler { type_name: Some("EncodingConstraint"), read: read_encoding },
    ConstraintHandler { type_name: Some("LanguageConstraint"), read: read_language },
    ConstraintHandler { type_name: Some("LocaleConstraint"), read: read_locale },
    ConstraintHandler { type_name: Some("FixedPointConstraint"), read: read_fixed_point },
    ConstraintHandler { type_name: None, read: read_generic },
];

fn text(store: &Store, node: &RdfNode, predicate: &str) -> Option<String> {
    store.literal(node, predicate).map(|lit| lit.lexical.clone())
}

fn number<T: std::str::FromStr>(store: &Store, node: &RdfNode, predicate: &str) -> Option<T> {
    store
        .literal(node, predicate)
        .and_then(|lit| lit.lexical.trim().parse().ok())
}

fn bound(store: &Store, node: &RdfNode, predicate: &str) -> Option<BoundDefinition> {
    store
        .object(node, predicate)
        .and_then(|object| object.as_iri())
        .and_then(|iri| BoundDefinition::from_local_name(local_name(iri)))
}

fn read_range(store: &Store, v: &Vocabulary, node: &RdfNode) -> ConstraintClass {
    ConstraintClass::Range {
        min_value: store.literal(node, &v.samm_c("minValue")).cloned(),
        max_value: store.literal(node, &v.samm_c("maxValue")).cloned(),
        lower_bound: bound(store, node, &v.samm_c("lowerBoundDefinition")),
        upper_bound: bound(store, node, &v.samm_c("upperBoundDefinition")),
    }
}

fn read_length(store: &Store, v: &Vocabulary, node: &RdfNode) -> ConstraintClass {
    ConstraintClass::Length {
        min_value: number(store, node, &v.samm_c("minValue")),
        max_value: number(store, node, &v.samm_c("maxValue")),
    }
}

fn read_regular_expression(store: &Store, v: &Vocabulary, node: &RdfNode) -> ConstraintClass {
    ConstraintClass::RegularExpression {
        pattern: text(store, node, &v.samm("value")),
    }
}

fn read_encoding(store: &Store, v: &Vocabulary, node: &RdfNode) -> ConstraintClass {
    let encoding = store
        .object(node, &v.samm("value"))
        .map(|object| match object.as_iri() {
            Some(iri) => local_name(iri).to_string(),
            None => object.as_literal().map(|lit| lit.lexical.clone()).unwrap_or_default(),
        });
    ConstraintClass::Encoding { encoding }
}

fn read_language(store: &Store, v: &Vocabulary, node: &RdfNode) -> ConstraintClass {
    ConstraintClass::Language {
        language_code: text(store, node, &v.samm_c("languageCode")),
    }
}

fn read_locale(store: &Store, v: &Vocabulary, node: &RdfNode) -> ConstraintClass {
    ConstraintClass::Locale {
        locale_code: text(store, node, &v.samm_c("localeCode")),
    }
}

fn read_fixed_point(store: &Store, v: &Vocabulary, node: &RdfNode) -> ConstraintClass {
    ConstraintClass::FixedPoint {
        scale: number(store, node, &v.samm_c("scale")),
        integer: number(store, node, &v.samm_c("integer")),
    }
}

fn read_generic(_: &Store, _: &Vocabulary, _: &RdfNode) -> ConstraintClass {
    ConstraintClass::Constraint
}

impl<'w> LoadSession<'w> {
    /// Instantiate the constraint described by `node`.
    pub(crate) fn create_constraint(&mut self, scope: &Scope, node: &RdfNode) -> ElementId {
        if let Some(id) = self.cached(scope, node) {
            return id;
        }
        let store = self.store(scope.document);
        let type_name = store
            .type_of(node)
            .and_then(SammIri::parse)
            .map_or("Constraint", |samm| samm.local);
        let read = CHAIN
            .iter()
            .find(|handler| handler.type_name.map_or(true, |name| name == type_name))
            .map_or(read_generic as Read, |handler| handler.read);
        let class = read(store, &scope.vocab, node);
        self.reserve_element(scope, node, "Constraint", ElementKind::Constraint(class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aspectgraph_rdf::{RdfLiteral, RdfObject};

    fn literal(lexical: &str) -> RdfObject {
        RdfObject::Literal(RdfLiteral::plain(lexical))
    }

    #[test]
    fn reads_range_with_bound_definitions() {
        let v = Vocabulary::default();
        let node = RdfNode::BlankNode("r".to_string());
        let mut store = Store::new();
        store.insert(node.clone(), v.samm_c("minValue"), literal("0"));
        store.insert(node.clone(), v.samm_c("maxValue"), literal("100"));
        store.insert(
            node.clone(),
            v.samm_c("lowerBoundDefinition"),
            RdfObject::Node(RdfNode::iri(v.samm_c("AT_LEAST"))),
        );

        let ConstraintClass::Range {
            min_value,
            max_value,
            lower_bound,
            upper_bound,
        } = read_range(&store, &v, &node)
        else {
            panic!("not a range")
        };
        assert_eq!(min_value.unwrap().lexical, "0");
        assert_eq!(max_value.unwrap().lexical, "100");
        assert_eq!(lower_bound, Some(BoundDefinition::AtLeast));
        assert_eq!(upper_bound, None);
    }

    #[test]
    fn unparsable_numbers_read_as_absent() {
        let v = Vocabulary::default();
        let node = RdfNode::BlankNode("l".to_string());
        let mut store = Store::new();
        store.insert(node.clone(), v.samm_c("minValue"), literal("five"));
        store.insert(node.clone(), v.samm_c("maxValue"), literal(" 12 "));
        assert_eq!(
            read_length(&store, &v, &node),
            ConstraintClass::Length {
                min_value: None,
                max_value: Some(12)
            }
        );
    }

    #[test]
    fn encoding_accepts_iri_or_literal() {
        let v = Vocabulary::default();
        let node = RdfNode::BlankNode("e".to_string());
        let mut store = Store::new();
        store.insert(
            node.clone(),
            v.samm("value"),
            RdfObject::Node(RdfNode::iri(v.samm("UTF-8"))),
        );
        assert_eq!(
            read_encoding(&store, &v, &node),
            ConstraintClass::Encoding {
                encoding: Some("UTF-8".to_string())
            }
        );
    }
}
