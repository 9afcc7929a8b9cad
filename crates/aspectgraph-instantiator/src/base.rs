//! Shared attribute population and anonymous element naming.

use crate::config::AnonymousNaming;
use crate::session::{LoadSession, Scope};
use aspectgraph_model::{BaseAttributes, ElementId, ElementKind, ModelElement, SammIri};
use aspectgraph_rdf::{local_name, RdfNode, RdfObject, Store};
use std::collections::BTreeMap;

/// Locale assumed for untagged preferred names and descriptions.
pub(crate) const DEFAULT_LOCALE: &str = "en";

impl<'w> LoadSession<'w> {
    /// Register the element described by `node` with its shared attributes.
    ///
    /// `kind` is the skeleton of the kind-specific part: scalar fields may be
    /// filled in already, references are bound afterwards. Registering before
    /// following any reference is what makes reference cycles terminate.
    pub(crate) fn reserve_element(
        &mut self,
        scope: &Scope,
        node: &RdfNode,
        default_name: &str,
        kind: ElementKind,
    ) -> ElementId {
        let base = self.base_attributes(scope, node, default_name);
        let element = ModelElement::new(base, kind);
        let id = match node {
            RdfNode::Iri(_) => self.cache.resolve(element),
            RdfNode::BlankNode(label) => {
                self.cache
                    .resolve_anonymous(element, scope.document, label)
            }
        };
        tracing::trace!(subject = %node, %id, "registered element");
        id
    }

    fn base_attributes(&mut self, scope: &Scope, node: &RdfNode, default_name: &str) -> BaseAttributes {
        let store = self.store(scope.document);
        let vocab = &scope.vocab;
        let declared_type = store.type_of(node).map(str::to_string);

        let mut base = match node {
            RdfNode::Iri(iri) => BaseAttributes::new(iri.as_str(), local_name(iri)),
            RdfNode::BlankNode(_) => {
                let prefix = declared_type.as_deref().map_or(default_name, local_name);
                let (name, urn) = self.synthesize_name(scope, prefix);
                let mut base = BaseAttributes::new(urn, name);
                base.is_anonymous = true;
                base
            }
        };

        base.meta_model_version = declared_type
            .as_deref()
            .and_then(SammIri::parse)
            .map_or_else(|| vocab.version().to_string(), |samm| samm.version.to_string());
        base.preferred_names =
            localized(store.objects(node, &vocab.samm("preferredName")));
        base.descriptions = localized(store.objects(node, &vocab.samm("description")));
        base.see = store
            .objects(node, &vocab.samm("see"))
            .map(|object| match object {
                RdfObject::Node(node) => node.key().to_string(),
                RdfObject::Literal(lit) => lit.lexical.clone(),
            })
            .collect();
        base.declared_type = declared_type;
        base.is_external_reference = scope.external;
        base.origin = Some(scope.document);
        base
    }

    /// Mint a fresh `(name, urn)` pair for an anonymous element.
    ///
    /// The suffix is advanced until the URN collides with nothing already
    /// registered or declared in any loaded document.
    fn synthesize_name(&mut self, scope: &Scope, prefix: &str) -> (String, String) {
        loop {
            let suffix = match self.config.anonymous_naming {
                AnonymousNaming::Counter => {
                    self.anonymous_counter += 1;
                    self.anonymous_counter.to_string()
                }
                AnonymousNaming::Random => {
                    let mut hex = uuid::Uuid::new_v4().simple().to_string();
                    hex.truncate(8);
                    hex
                }
            };
            let name = format!("{prefix}{suffix}");
            let urn = format!("{}{name}", scope.namespace);
            let taken = self.cache.get(&urn).is_some()
                || self.workspace.documents_defining(&urn).next().is_some();
            if !taken {
                return (name, urn);
            }
        }
    }
}

/// Collect language-tagged literals into a locale map; untagged ones count as English.
fn localized<'a>(objects: impl Iterator<Item = &'a RdfObject>) -> BTreeMap<String, String> {
    objects
        .filter_map(|object| {
            let lit = object.as_literal()?;
            let locale = Store::locale_tag(object).unwrap_or(DEFAULT_LOCALE);
            Some((locale.to_string(), lit.lexical.clone()))
        })
        .collect()
}
