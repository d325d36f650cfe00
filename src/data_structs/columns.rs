use std::fmt::Display;

use itertools::Itertools;
use polars::prelude::*;

use super::enums::{
    BaseType,
    CountClass,
    FilterClass,
    MappingClass,
};

/// Column names shared by every table in the pipeline.
pub mod colnames {
    pub const REF_NAME: &str = "ref";
    pub const POS_NAME: &str = "pos";
    pub const STRAND_NAME: &str = "strand";

    /// Columns forming the site identity.
    pub const KEY_NAMES: [&str; 3] = [REF_NAME, POS_NAME, STRAND_NAME];

    pub const UNCONVERTED_SUM_NAME: &str = "u";
    pub const DEPTH_NAME: &str = "d";
    pub const TOTAL_NAME: &str = "_t";
    pub const UNCONVERTED_RATIO_NAME: &str = "ur";
    pub const MULTI_RATIO_NAME: &str = "mr";
    pub const CLIPPED_RATIO_NAME: &str = "cr";
}

/// Key columns as expressions, in join order.
pub fn key_exprs() -> Vec<Expr> {
    colnames::KEY_NAMES.iter().map(|name| col(*name)).collect_vec()
}

/// Normalises key dtypes so that tables from different sources can be joined.
pub fn key_cast_exprs() -> Vec<Expr> {
    vec![
        col(colnames::REF_NAME).cast(DataType::String),
        col(colnames::POS_NAME).strict_cast(DataType::Int64),
        col(colnames::STRAND_NAME).cast(DataType::String),
    ]
}

/// Name of a count column in a combined or multi-sample table.
///
/// Renders as `<base>_<filter>_<mapping>[_<sample>]`, e.g.
/// `unconvertedBaseCount_filtered_uniq_S1`. [`CountColumn::parse`] recovers
/// all parts from a rendered name, sample ids may themselves contain `_`.
#[derive(Eq, Hash, PartialEq, Clone, Debug)]
pub struct CountColumn {
    pub base:   BaseType,
    pub class:  CountClass,
    pub sample: Option<String>,
}

impl CountColumn {
    pub fn new(
        base: BaseType,
        class: CountClass,
    ) -> Self {
        Self {
            base,
            class,
            sample: None,
        }
    }

    pub fn with_sample<S: Into<String>>(
        mut self,
        sample: S,
    ) -> Self {
        self.sample = Some(sample.into());
        self
    }

    /// The 8 columns of a combined table, in output order.
    pub fn combined() -> Vec<CountColumn> {
        CountClass::ALL
            .iter()
            .cartesian_product(BaseType::ALL.iter())
            .map(|(class, base)| CountColumn::new(*base, *class))
            .collect_vec()
    }

    pub fn name(&self) -> String {
        match &self.sample {
            Some(sample) => {
                format!("{}_{}_{}", self.base.col_name(), self.class, sample)
            },
            None => format!("{}_{}", self.base.col_name(), self.class),
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let (base, rest) = BaseType::ALL.iter().find_map(|base| {
            name.strip_prefix(base.col_name())
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|rest| (*base, rest))
        })?;

        let (filter, rest) =
            [FilterClass::Unfiltered, FilterClass::Filtered]
                .iter()
                .find_map(|filter| {
                    rest.strip_prefix(filter.as_str())
                        .and_then(|rest| rest.strip_prefix('_'))
                        .map(|rest| (*filter, rest))
                })?;

        let (mapping, rest) = [MappingClass::Uniq, MappingClass::Multi]
            .iter()
            .find_map(|mapping| {
                rest.strip_prefix(mapping.as_str())
                    .map(|rest| (*mapping, rest))
            })?;

        let sample = match rest {
            "" => None,
            _ => {
                let sample = rest.strip_prefix('_')?;
                if sample.is_empty() {
                    return None;
                }
                Some(sample.to_string())
            },
        };

        Some(Self {
            base,
            class: CountClass::new(filter, mapping),
            sample,
        })
    }

    pub fn expr(&self) -> Expr {
        col(self.name())
    }
}

impl Display for CountColumn {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
