use std::fmt::Display;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

/// DNA strand of a pileup site.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, PartialOrd, Ord)]
pub enum Strand {
    /// Forward strand.
    Forward,
    /// Reverse strand.
    Reverse,
}

impl Strand {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Strand::Forward => "+",
            Strand::Reverse => "-",
        }
    }
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            other => Err(format!("invalid strand '{}'", other)),
        }
    }
}

impl Display for Strand {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Strand {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Strand {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        Strand::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Bisulfite readout category of a counted base.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug)]
pub enum BaseType {
    Converted,
    Unconverted,
}

impl BaseType {
    pub const ALL: [BaseType; 2] = [BaseType::Converted, BaseType::Unconverted];

    /// Column name of this count in a raw pileup table.
    pub const fn col_name(&self) -> &'static str {
        match self {
            BaseType::Converted => "convertedBaseCount",
            BaseType::Unconverted => "unconvertedBaseCount",
        }
    }
}

/// Whether reads were counted before or after quality filtering.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug)]
pub enum FilterClass {
    Unfiltered,
    Filtered,
}

impl FilterClass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            FilterClass::Unfiltered => "unfiltered",
            FilterClass::Filtered => "filtered",
        }
    }
}

/// Whether reads map to a single or to multiple genomic locations.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug)]
pub enum MappingClass {
    Uniq,
    Multi,
}

impl MappingClass {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MappingClass::Uniq => "uniq",
            MappingClass::Multi => "multi",
        }
    }
}

/// Filter class and mapping class of one pileup table.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug)]
pub struct CountClass {
    pub filter:  FilterClass,
    pub mapping: MappingClass,
}

impl CountClass {
    /// Classes in the order the combiner expects its inputs.
    pub const ALL: [CountClass; 4] = [
        CountClass::new(FilterClass::Unfiltered, MappingClass::Uniq),
        CountClass::new(FilterClass::Unfiltered, MappingClass::Multi),
        CountClass::new(FilterClass::Filtered, MappingClass::Uniq),
        CountClass::new(FilterClass::Filtered, MappingClass::Multi),
    ];

    pub const fn new(
        filter: FilterClass,
        mapping: MappingClass,
    ) -> Self {
        Self { filter, mapping }
    }

    /// Suffix appended to count columns, e.g. `filtered_uniq`.
    pub fn suffix(&self) -> String {
        format!("{}_{}", self.filter.as_str(), self.mapping.as_str())
    }
}

impl Display for CountClass {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.suffix())
    }
}
