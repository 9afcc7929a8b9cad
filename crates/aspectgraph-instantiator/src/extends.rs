//! `samm:extends` resolution for entities and properties.

use crate::deferred::Slot;
use crate::session::{LoadSession, Scope};
use aspectgraph_model::{ElementId, ElementKind};
use aspectgraph_rdf::{RdfNode, RdfObject};

impl<'w> LoadSession<'w> {
    /// Bind the `samm:extends` target of `node` to `owner`.
    ///
    /// Predefined bases (`samm-e:TimeSeriesEntity`, `samm-e:value`) come from
    /// the catalog; everything else goes through regular reference resolution.
    /// An anonymous property that refines another one takes over its name.
    pub(crate) fn resolve_extends(&mut self, scope: &Scope, node: &RdfNode, owner: ElementId) -> Option<ElementId> {
        let store = self.store(scope.document);
        let target = store.object(node, &scope.vocab.samm("extends"))?;
        let base = match target {
            RdfObject::Node(RdfNode::Iri(iri)) => match self.predefined(iri) {
                Some(id) => {
                    self.attach(owner, &Slot::Extends, id);
                    Some(id)
                }
                None => self.resolve_iri_into(scope, owner, Slot::Extends, iri),
            },
            _ => self.resolve_object_into(scope, owner, Slot::Extends, target),
        }?;
        self.inherit_name(owner, base);
        Some(base)
    }

    fn inherit_name(&mut self, owner: ElementId, base: ElementId) {
        let graph = self.cache.graph();
        let Some(base_name) = graph
            .get(base)
            .filter(|element| matches!(element.kind, ElementKind::Property(_)))
            .map(|element| element.base.name.clone())
        else {
            return;
        };
        if let Some(element) = self.cache.graph_mut().get_mut(owner) {
            if element.base.is_anonymous && matches!(element.kind, ElementKind::Property(_)) {
                element.base.name = base_name;
            }
        }
    }
}
