//! SAMM vocabulary: version-agnostic parsing and construction of meta-model IRIs.
//!
//! Meta-model IRIs look like
//! `urn:samm:org.eclipse.esmf.samm:<kind>:<version>#<LocalName>`, with
//! `<kind>` one of `meta-model`, `characteristic`, `entity`, `unit`. The
//! legacy `urn:bamm:io.openmanufacturing:` prefix is accepted as well.

use aspectgraph_rdf::{RdfObject, Store, RDF_LANG_STRING_IRI, RDF_TYPE_IRI, XSD_NS};
use serde::{Deserialize, Serialize};

pub const DEFAULT_META_MODEL_VERSION: &str = "2.1.0";

const SAMM_PREFIX: &str = "urn:samm:org.eclipse.esmf.samm:";
const BAMM_PREFIX: &str = "urn:bamm:io.openmanufacturing:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flavor {
    Samm,
    Bamm,
}

impl Flavor {
    fn prefix(self) -> &'static str {
        match self {
            Self::Samm => SAMM_PREFIX,
            Self::Bamm => BAMM_PREFIX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SammNamespace {
    MetaModel,
    Characteristic,
    Entity,
    Unit,
}

impl SammNamespace {
    fn segment(self) -> &'static str {
        match self {
            Self::MetaModel => "meta-model",
            Self::Characteristic => "characteristic",
            Self::Entity => "entity",
            Self::Unit => "unit",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "meta-model" => Some(Self::MetaModel),
            "characteristic" => Some(Self::Characteristic),
            "entity" => Some(Self::Entity),
            "unit" => Some(Self::Unit),
            _ => None,
        }
    }
}

/// A parsed meta-model IRI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SammIri<'a> {
    pub flavor: Flavor,
    pub namespace: SammNamespace,
    pub version: &'a str,
    pub local: &'a str,
}

impl<'a> SammIri<'a> {
    pub fn parse(iri: &'a str) -> Option<Self> {
        let (flavor, rest) = if let Some(rest) = iri.strip_prefix(SAMM_PREFIX) {
            (Flavor::Samm, rest)
        } else if let Some(rest) = iri.strip_prefix(BAMM_PREFIX) {
            (Flavor::Bamm, rest)
        } else {
            return None;
        };
        let (segment, rest) = rest.split_once(':')?;
        let (version, local) = rest.split_once('#')?;
        Some(Self {
            flavor,
            namespace: SammNamespace::from_segment(segment)?,
            version,
            local,
        })
    }

    pub fn is(&self, namespace: SammNamespace, local: &str) -> bool {
        self.namespace == namespace && self.local == local
    }
}

/// Characteristic classes of the `samm-c` namespace, most specific first.
pub const CHARACTERISTIC_CLASSES: &[&str] = &[
    "Trait",
    "TimeSeries",
    "SortedSet",
    "Set",
    "List",
    "Collection",
    "Either",
    "State",
    "Enumeration",
    "Duration",
    "Measurement",
    "Quantifiable",
    "SingleEntity",
    "Code",
    "StructuredValue",
];

/// IRI builder for one meta-model flavor and version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vocabulary {
    flavor: Flavor,
    version: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(Flavor::Samm, DEFAULT_META_MODEL_VERSION)
    }
}

impl Vocabulary {
    pub fn new(flavor: Flavor, version: impl Into<String>) -> Self {
        Self {
            flavor,
            version: version.into(),
        }
    }

    /// Vocabulary of the meta-model IRI `iri`, if it is one.
    pub fn of_iri(iri: &str) -> Option<Self> {
        SammIri::parse(iri).map(|samm| Self::new(samm.flavor, samm.version))
    }

    /// Detect the meta-model version a store is written against.
    ///
    /// The first `rdf:type` object in the meta-model namespaces decides; a
    /// store without one gets the default vocabulary.
    pub fn detect(store: &Store) -> Self {
        store
            .statements()
            .iter()
            .filter(|s| s.predicate_iri == RDF_TYPE_IRI)
            .filter_map(|s| s.object.as_iri())
            .find_map(Self::of_iri)
            .unwrap_or_default()
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn namespace(&self, namespace: SammNamespace) -> String {
        format!(
            "{}{}:{}#",
            self.flavor.prefix(),
            namespace.segment(),
            self.version
        )
    }

    pub fn iri(&self, namespace: SammNamespace, local: &str) -> String {
        format!("{}{local}", self.namespace(namespace))
    }

    /// `samm:` meta-model IRI.
    pub fn samm(&self, local: &str) -> String {
        self.iri(SammNamespace::MetaModel, local)
    }

    /// `samm-c:` characteristic IRI.
    pub fn samm_c(&self, local: &str) -> String {
        self.iri(SammNamespace::Characteristic, local)
    }

    /// `samm-e:` entity IRI.
    pub fn samm_e(&self, local: &str) -> String {
        self.iri(SammNamespace::Entity, local)
    }

    pub fn unit(&self, local: &str) -> String {
        self.iri(SammNamespace::Unit, local)
    }

    /// Expand catalog shorthand (`xsd:string`, `rdf:langString`, `samm:curie`).
    pub fn expand(&self, short: &str) -> String {
        match short.split_once(':') {
            Some(("xsd", local)) => format!("{XSD_NS}{local}"),
            Some(("rdf", "langString")) => RDF_LANG_STRING_IRI.to_string(),
            Some(("samm", local)) => self.samm(local),
            Some(("samm-c", local)) => self.samm_c(local),
            Some(("samm-e", local)) => self.samm_e(local),
            Some(("unit", local)) => self.unit(local),
            _ => short.to_string(),
        }
    }

    pub fn is_type(&self, object: &RdfObject, namespace: SammNamespace, local: &str) -> bool {
        object
            .as_iri()
            .and_then(SammIri::parse)
            .is_some_and(|samm| samm.is(namespace, local))
    }
}

/// Foundational scalar types: terminal, never reported as unresolved.
pub fn is_scalar_type(iri: &str) -> bool {
    iri.starts_with(XSD_NS)
        || iri == RDF_LANG_STRING_IRI
        || SammIri::parse(iri).is_some_and(|samm| samm.is(SammNamespace::MetaModel, "curie"))
}
