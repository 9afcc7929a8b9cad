//! Reading ordered reference lists.
//!
//! Property lists (`samm:properties`, `samm:input`, `samm:parameters`) may
//! hold a plain property reference or a blank node carrying use-site
//! overrides:
//!
//! ```text
//! samm:properties ( :speed [ samm:property :position ; samm:optional true ] )
//! ```
//!
//! A blank entry without `samm:property` is an element in its own right
//! (typically an anonymous property refining an abstract one) and is yielded
//! as is; any override keys on it still apply.

use aspectgraph_model::{OverrideKeys, Vocabulary};
use aspectgraph_rdf::{ListError, RdfObject, Store};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ListEntry<'w> {
    pub(crate) target: &'w RdfObject,
    pub(crate) overrides: OverrideKeys,
}

#[derive(Debug, Clone)]
struct OverridePredicates {
    property: String,
    optional: String,
    not_in_payload: String,
    payload_name: String,
}

impl OverridePredicates {
    fn new(vocab: &Vocabulary) -> Self {
        Self {
            property: vocab.samm("property"),
            optional: vocab.samm("optional"),
            not_in_payload: vocab.samm("notInPayload"),
            payload_name: vocab.samm("payloadName"),
        }
    }
}

/// Iterator over the entries of one list, in list order.
pub(crate) struct ListReader<'w> {
    store: &'w Store,
    predicates: OverridePredicates,
    items: std::vec::IntoIter<&'w RdfObject>,
}

impl<'w> ListReader<'w> {
    /// Read `object` as a list; a value that is not a list head reads as a
    /// one-element list.
    pub(crate) fn new(
        store: &'w Store,
        vocab: &Vocabulary,
        object: &'w RdfObject,
    ) -> Result<Self, ListError> {
        let items = if store.is_list(object) {
            store.resolve_list_chain(object)?
        } else {
            vec![object]
        };
        Ok(Self::from_items(store, vocab, items))
    }

    pub(crate) fn empty(store: &'w Store, vocab: &Vocabulary) -> Self {
        Self::from_items(store, vocab, Vec::new())
    }

    fn from_items(store: &'w Store, vocab: &Vocabulary, items: Vec<&'w RdfObject>) -> Self {
        Self {
            store,
            predicates: OverridePredicates::new(vocab),
            items: items.into_iter(),
        }
    }

    fn entry(&self, item: &'w RdfObject) -> ListEntry<'w> {
        let Some(node) = item.as_node().filter(|_| Store::is_blank_node(item)) else {
            return ListEntry {
                target: item,
                overrides: OverrideKeys::default(),
            };
        };
        let p = &self.predicates;
        let flag = |predicate: &str| {
            self.store
                .literal(node, predicate)
                .is_some_and(|lit| lit.as_bool())
        };
        let overrides = OverrideKeys {
            optional: flag(&p.optional),
            not_in_payload: flag(&p.not_in_payload),
            payload_name: self
                .store
                .literal(node, &p.payload_name)
                .map(|lit| lit.lexical.clone()),
        };
        let target = self.store.object(node, &p.property).unwrap_or(item);
        ListEntry { target, overrides }
    }
}

impl<'w> Iterator for ListReader<'w> {
    type Item = ListEntry<'w>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.items.next()?;
        Some(self.entry(item))
    }
}
