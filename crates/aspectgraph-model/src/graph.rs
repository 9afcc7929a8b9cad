//! Flat element arena keyed by canonical URN.

use crate::{ElementId, ModelElement};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelGraph {
    elements: Vec<ModelElement>,
    #[serde(skip)]
    by_urn: HashMap<String, ElementId>,
}

impl ModelGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `element` unless its URN is already present.
    ///
    /// Returns the id of the canonical instance and whether it was newly
    /// inserted; an existing element is never replaced.
    pub fn upsert(&mut self, element: ModelElement) -> (ElementId, bool) {
        if let Some(&id) = self.by_urn.get(&element.base.urn) {
            return (id, false);
        }
        let id = ElementId(self.elements.len() as u32);
        self.by_urn.insert(element.base.urn.clone(), id);
        self.elements.push(element);
        (id, true)
    }

    pub fn lookup(&self, urn: &str) -> Option<ElementId> {
        self.by_urn.get(urn).copied()
    }

    pub fn get(&self, id: ElementId) -> Option<&ModelElement> {
        self.elements.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut ModelElement> {
        self.elements.get_mut(id.0 as usize)
    }

    pub fn by_urn(&self, urn: &str) -> Option<&ModelElement> {
        self.lookup(urn).and_then(|id| self.get(id))
    }

    /// Record a traversal edge `parent → child`; repeated edges are ignored.
    pub fn link(&mut self, parent: ElementId, child: ElementId) {
        if let Some(p) = self.get_mut(parent) {
            if !p.base.children.contains(&child) {
                p.base.children.push(child);
            }
        }
        if let Some(c) = self.get_mut(child) {
            if !c.base.parents.contains(&parent) {
                c.base.parents.push(parent);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &ModelElement)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementId(i as u32), e))
    }

    pub fn urn_of(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(ModelElement::urn)
    }
}
