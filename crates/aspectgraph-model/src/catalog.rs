//! Predefined vocabulary catalog.
//!
//! Built-in characteristics (`samm-c`), entities and their properties
//! (`samm-e`), units and quantity kinds (`unit`) are owned by the meta model
//! and have no backing statements in user documents. They are described here
//! as static tables, indexed once per process, and addressed by local name.
//! Datatypes and references use prefixed shorthand (`xsd:dateTime`,
//! `samm-c:Timestamp`) that [`Vocabulary::expand`](crate::Vocabulary::expand)
//! turns into full IRIs for a given meta-model version.

use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacteristicDescriptor {
    pub name: &'static str,
    pub preferred_name: &'static str,
    pub description: &'static str,
    pub data_type: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub preferred_name: &'static str,
    pub description: &'static str,
    pub is_abstract: bool,
    pub characteristic: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub name: &'static str,
    pub preferred_name: &'static str,
    pub description: &'static str,
    pub is_abstract: bool,
    pub properties: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitDescriptor {
    pub name: &'static str,
    pub preferred_name: &'static str,
    pub symbol: &'static str,
    pub code: &'static str,
    pub reference_unit: Option<&'static str>,
    pub conversion_factor: Option<&'static str>,
    pub quantity_kinds: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityKindDescriptor {
    pub name: &'static str,
    pub preferred_name: &'static str,
}

const CHARACTERISTICS: &[CharacteristicDescriptor] = &[
    CharacteristicDescriptor {
        name: "Timestamp",
        preferred_name: "Timestamp",
        description: "Describes a Property which contains the date and time with an optional timezone.",
        data_type: "xsd:dateTime",
    },
    CharacteristicDescriptor {
        name: "Text",
        preferred_name: "Text",
        description: "Describes a Property which contains plain text. This is intended exclusively for human readable strings, not for identifiers, measurement values, etc.",
        data_type: "xsd:string",
    },
    CharacteristicDescriptor {
        name: "MultiLanguageText",
        preferred_name: "Multi-Language Text",
        description: "Describes a Property which contains plain text in multiple languages. This is intended exclusively for human readable strings, not for identifiers, measurement values, etc.",
        data_type: "rdf:langString",
    },
    CharacteristicDescriptor {
        name: "Boolean",
        preferred_name: "Boolean",
        description: "Represents a boolean value (i.e. a \"flag\").",
        data_type: "xsd:boolean",
    },
    CharacteristicDescriptor {
        name: "Locale",
        preferred_name: "Locale",
        description: "Describes a Property containing a locale according to IETF BCP 47, for example \"de-DE\".",
        data_type: "xsd:string",
    },
    CharacteristicDescriptor {
        name: "Language",
        preferred_name: "Language",
        description: "Describes a Property containing a language according to ISO 639-1, for example \"de\".",
        data_type: "xsd:string",
    },
    CharacteristicDescriptor {
        name: "UnitReference",
        preferred_name: "Unit Reference",
        description: "Describes a Property containing a reference to one of the units in the Unit Catalog.",
        data_type: "samm:curie",
    },
    CharacteristicDescriptor {
        name: "ResourcePath",
        preferred_name: "Resource Path",
        description: "The path of a resource.",
        data_type: "xsd:anyURI",
    },
    CharacteristicDescriptor {
        name: "MimeType",
        preferred_name: "MIME Type",
        description: "A MIME type as defined in RFC 2046, for example \"application/pdf\".",
        data_type: "xsd:string",
    },
];

const ENTITY_PROPERTIES: &[PropertyDescriptor] = &[
    PropertyDescriptor {
        name: "timestamp",
        preferred_name: "Timestamp",
        description: "The specific point in time when the corresponding value was recorded.",
        is_abstract: false,
        characteristic: Some("samm-c:Timestamp"),
    },
    PropertyDescriptor {
        name: "value",
        preferred_name: "Value",
        description: "Any value.",
        is_abstract: true,
        characteristic: None,
    },
    PropertyDescriptor {
        name: "x",
        preferred_name: "x",
        description: "The position along the X axis.",
        is_abstract: false,
        characteristic: None,
    },
    PropertyDescriptor {
        name: "y",
        preferred_name: "y",
        description: "The position along the Y axis.",
        is_abstract: false,
        characteristic: None,
    },
    PropertyDescriptor {
        name: "z",
        preferred_name: "z",
        description: "The position along the Z axis.",
        is_abstract: false,
        characteristic: None,
    },
    PropertyDescriptor {
        name: "resource",
        preferred_name: "Resource",
        description: "Location of a resource.",
        is_abstract: false,
        characteristic: Some("samm-c:ResourcePath"),
    },
    PropertyDescriptor {
        name: "mimeType",
        preferred_name: "MIME Type",
        description: "A MIME type as defined in RFC 2046.",
        is_abstract: false,
        characteristic: Some("samm-c:MimeType"),
    },
];

const ENTITIES: &[EntityDescriptor] = &[
    EntityDescriptor {
        name: "TimeSeriesEntity",
        preferred_name: "Time Series Entity",
        description: "An Entity which represents a key/value pair. The key is the timestamp when the value was recorded and the value is the value which was recorded.",
        is_abstract: true,
        properties: &["timestamp", "value"],
    },
    EntityDescriptor {
        name: "Point3d",
        preferred_name: "Point 3D",
        description: "Defines a position in a three dimensional space.",
        is_abstract: false,
        properties: &["x", "y", "z"],
    },
    EntityDescriptor {
        name: "FileResource",
        preferred_name: "File Resource",
        description: "A file in a specific format.",
        is_abstract: false,
        properties: &["resource", "mimeType"],
    },
];

const QUANTITY_KINDS: &[QuantityKindDescriptor] = &[
    QuantityKindDescriptor { name: "length", preferred_name: "length" },
    QuantityKindDescriptor { name: "distance", preferred_name: "distance" },
    QuantityKindDescriptor { name: "diameter", preferred_name: "diameter" },
    QuantityKindDescriptor { name: "time", preferred_name: "time" },
    QuantityKindDescriptor { name: "period", preferred_name: "period" },
    QuantityKindDescriptor { name: "mass", preferred_name: "mass" },
    QuantityKindDescriptor { name: "thermodynamicTemperature", preferred_name: "thermodynamic temperature" },
    QuantityKindDescriptor { name: "celsiusTemperature", preferred_name: "Celsius temperature" },
    QuantityKindDescriptor { name: "electricCurrent", preferred_name: "electric current" },
    QuantityKindDescriptor { name: "voltage", preferred_name: "voltage" },
    QuantityKindDescriptor { name: "power", preferred_name: "power" },
    QuantityKindDescriptor { name: "energy", preferred_name: "energy" },
    QuantityKindDescriptor { name: "pressure", preferred_name: "pressure" },
    QuantityKindDescriptor { name: "frequency", preferred_name: "frequency" },
    QuantityKindDescriptor { name: "velocity", preferred_name: "velocity" },
    QuantityKindDescriptor { name: "acceleration", preferred_name: "acceleration" },
    QuantityKindDescriptor { name: "area", preferred_name: "area" },
    QuantityKindDescriptor { name: "volume", preferred_name: "volume" },
    QuantityKindDescriptor { name: "angleOfRotation", preferred_name: "angle of rotation" },
    QuantityKindDescriptor { name: "force", preferred_name: "force" },
    QuantityKindDescriptor { name: "torque", preferred_name: "torque" },
    QuantityKindDescriptor { name: "luminousIntensity", preferred_name: "luminous intensity" },
    QuantityKindDescriptor { name: "illuminance", preferred_name: "illuminance" },
    QuantityKindDescriptor { name: "amountOfSubstance", preferred_name: "amount of substance" },
    QuantityKindDescriptor { name: "dimensionless", preferred_name: "dimensionless" },
    QuantityKindDescriptor { name: "informationEntropy", preferred_name: "information entropy" },
];

macro_rules! unit {
    ($name:literal, $label:literal, $symbol:literal, $code:literal, [$($kind:literal),*]) => {
        UnitDescriptor {
            name: $name,
            preferred_name: $label,
            symbol: $symbol,
            code: $code,
            reference_unit: None,
            conversion_factor: None,
            quantity_kinds: &[$($kind),*],
        }
    };
    ($name:literal, $label:literal, $symbol:literal, $code:literal, $reference:literal * $factor:literal, [$($kind:literal),*]) => {
        UnitDescriptor {
            name: $name,
            preferred_name: $label,
            symbol: $symbol,
            code: $code,
            reference_unit: Some($reference),
            conversion_factor: Some($factor),
            quantity_kinds: &[$($kind),*],
        }
    };
}

const UNITS: &[UnitDescriptor] = &[
    unit!("metre", "metre", "m", "MTR", ["length", "distance", "diameter"]),
    unit!("kilometre", "kilometre", "km", "KMT", "metre" * "1000", ["length", "distance"]),
    unit!("centimetre", "centimetre", "cm", "CMT", "metre" * "0.01", ["length", "distance", "diameter"]),
    unit!("millimetre", "millimetre", "mm", "MMT", "metre" * "0.001", ["length", "distance", "diameter"]),
    unit!("micrometreMicron", "micrometre (micron)", "µm", "4H", "metre" * "1E-6", ["length", "diameter"]),
    unit!("second", "second [unit of time]", "s", "SEC", ["time", "period"]),
    unit!("millisecond", "millisecond", "ms", "C26", "second" * "1E-3", ["time", "period"]),
    unit!("minuteUnitOfTime", "minute [unit of time]", "min", "MIN", "second" * "60", ["time"]),
    unit!("hour", "hour", "h", "HUR", "second" * "3600", ["time"]),
    unit!("day", "day", "d", "DAY", "second" * "86400", ["time"]),
    unit!("kilogram", "kilogram", "kg", "KGM", ["mass"]),
    unit!("gram", "gram", "g", "GRM", "kilogram" * "1E-3", ["mass"]),
    unit!("tonneMetricTon", "tonne (metric ton)", "t", "TNE", "kilogram" * "1E3", ["mass"]),
    unit!("kelvin", "kelvin", "K", "KEL", ["thermodynamicTemperature"]),
    unit!("degreeCelsius", "degree Celsius", "°C", "CEL", "kelvin" * "1 × K", ["celsiusTemperature"]),
    unit!("degreeFahrenheit", "degree Fahrenheit", "°F", "FAH", "kelvin" * "5/9 × K", ["celsiusTemperature"]),
    unit!("ampere", "ampere", "A", "AMP", ["electricCurrent"]),
    unit!("milliampere", "milliampere", "mA", "4K", "ampere" * "1E-3", ["electricCurrent"]),
    unit!("volt", "volt", "V", "VLT", ["voltage"]),
    unit!("millivolt", "millivolt", "mV", "2Z", "volt" * "1E-3", ["voltage"]),
    unit!("kilovolt", "kilovolt", "kV", "KVT", "volt" * "1E3", ["voltage"]),
    unit!("watt", "watt", "W", "WTT", ["power"]),
    unit!("kilowatt", "kilowatt", "kW", "KWT", "watt" * "1E3", ["power"]),
    unit!("megawatt", "megawatt", "MW", "MAW", "watt" * "1E6", ["power"]),
    unit!("joule", "joule", "J", "JOU", ["energy"]),
    unit!("kilojoule", "kilojoule", "kJ", "KJO", "joule" * "1E3", ["energy"]),
    unit!("kilowattHour", "kilowatt hour", "kW·h", "KWH", "joule" * "3.6E6", ["energy"]),
    unit!("pascal", "pascal", "Pa", "PAL", ["pressure"]),
    unit!("kilopascal", "kilopascal", "kPa", "KPA", "pascal" * "1E3", ["pressure"]),
    unit!("bar", "bar [unit of pressure]", "bar", "BAR", "pascal" * "1E5", ["pressure"]),
    unit!("hertz", "hertz", "Hz", "HTZ", ["frequency"]),
    unit!("kilohertz", "kilohertz", "kHz", "KHZ", "hertz" * "1E3", ["frequency"]),
    unit!("megahertz", "megahertz", "MHz", "MHZ", "hertz" * "1E6", ["frequency"]),
    unit!("metrePerSecond", "metre per second", "m/s", "MTS", ["velocity"]),
    unit!("kilometrePerHour", "kilometre per hour", "km/h", "KMH", "metrePerSecond" * "0.277778", ["velocity"]),
    unit!("metrePerSecondSquared", "metre per second squared", "m/s²", "MSK", ["acceleration"]),
    unit!("squareMetre", "square metre", "m²", "MTK", ["area"]),
    unit!("cubicMetre", "cubic metre", "m³", "MTQ", ["volume"]),
    unit!("litre", "litre", "l", "LTR", "cubicMetre" * "1E-3", ["volume"]),
    unit!("radian", "radian", "rad", "C81", ["angleOfRotation"]),
    unit!("degreeUnitOfAngle", "degree [unit of angle]", "°", "DD", "radian" * "1.745329E-2", ["angleOfRotation"]),
    unit!("newton", "newton", "N", "NEU", ["force"]),
    unit!("newtonMetre", "newton metre", "N·m", "NU", ["torque"]),
    unit!("candela", "candela", "cd", "CDL", ["luminousIntensity"]),
    unit!("lux", "lux", "lx", "LUX", ["illuminance"]),
    unit!("mole", "mole", "mol", "C34", ["amountOfSubstance"]),
    unit!("percent", "percent", "%", "P1", ["dimensionless"]),
    unit!("one", "one", "1", "C62", ["dimensionless"]),
    unit!("bit", "bit", "bit", "A99", ["informationEntropy"]),
    unit!("byte", "byte", "B", "AD", "bit" * "8", ["informationEntropy"]),
    unit!("kilobyte", "kilobyte", "kB", "2P", "byte" * "1E3", ["informationEntropy"]),
    unit!("megabyte", "megabyte", "MB", "4L", "byte" * "1E6", ["informationEntropy"]),
];

/// Index over the static tables.
#[derive(Debug)]
pub struct Catalog {
    characteristics: HashMap<&'static str, &'static CharacteristicDescriptor>,
    properties: HashMap<&'static str, &'static PropertyDescriptor>,
    entities: HashMap<&'static str, &'static EntityDescriptor>,
    units: HashMap<&'static str, &'static UnitDescriptor>,
    quantity_kinds: HashMap<&'static str, &'static QuantityKindDescriptor>,
}

impl Catalog {
    /// The process-wide catalog.
    pub fn get() -> &'static Catalog {
        static CATALOG: OnceLock<Catalog> = OnceLock::new();
        CATALOG.get_or_init(|| Catalog {
            characteristics: CHARACTERISTICS.iter().map(|c| (c.name, c)).collect(),
            properties: ENTITY_PROPERTIES.iter().map(|p| (p.name, p)).collect(),
            entities: ENTITIES.iter().map(|e| (e.name, e)).collect(),
            units: UNITS.iter().map(|u| (u.name, u)).collect(),
            quantity_kinds: QUANTITY_KINDS.iter().map(|q| (q.name, q)).collect(),
        })
    }

    pub fn characteristic(&self, name: &str) -> Option<&'static CharacteristicDescriptor> {
        self.characteristics.get(name).copied()
    }

    pub fn property(&self, name: &str) -> Option<&'static PropertyDescriptor> {
        self.properties.get(name).copied()
    }

    pub fn entity(&self, name: &str) -> Option<&'static EntityDescriptor> {
        self.entities.get(name).copied()
    }

    pub fn unit(&self, name: &str) -> Option<&'static UnitDescriptor> {
        self.units.get(name).copied()
    }

    pub fn quantity_kind(&self, name: &str) -> Option<&'static QuantityKindDescriptor> {
        self.quantity_kinds.get(name).copied()
    }

    pub fn characteristics(&self) -> &'static [CharacteristicDescriptor] {
        CHARACTERISTICS
    }

    pub fn units(&self) -> &'static [UnitDescriptor] {
        UNITS
    }

    pub fn quantity_kinds(&self) -> &'static [QuantityKindDescriptor] {
        QUANTITY_KINDS
    }

    /// Units measuring `quantity_kind`, in table order.
    pub fn units_with_quantity_kind<'a>(
        &'a self,
        quantity_kind: &'a str,
    ) -> impl Iterator<Item = &'static UnitDescriptor> + 'a {
        UNITS
            .iter()
            .filter(move |u| u.quantity_kinds.iter().any(|k| *k == quantity_kind))
    }

    /// Reference-unit chain starting at `name` (inclusive), ending at a base unit.
    pub fn conversion_path(&self, name: &str) -> Vec<&'static UnitDescriptor> {
        let mut path: Vec<&'static UnitDescriptor> = Vec::new();
        let mut current = self.unit(name);
        while let Some(unit) = current {
            if path.iter().any(|u| u.name == unit.name) {
                break;
            }
            path.push(unit);
            current = unit.reference_unit.and_then(|r| self.unit(r));
        }
        path
    }
}
