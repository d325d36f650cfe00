use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use itertools::Itertools;
use log::{
    debug,
    info,
};
use polars::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use super::join::{
    describe,
    join_sequential,
};
use crate::data_structs::colnames::*;
use crate::data_structs::{
    key_exprs,
    BaseType,
    CountClass,
    CountColumn,
    FilterClass,
    MappingClass,
    SiteKey,
};
use crate::error::{
    PileupError,
    Result,
};
use crate::io::combined::scan_combined;
use crate::utils::sample_id_from_path;
use crate::with_field_fn;

/// Minimal filtered-uniq depth summed over samples.
pub const TOTAL_DEPTH: i64 = 20;
/// Minimal filtered-uniq unconverted count summed over samples.
pub const TOTAL_SUPPORT: i64 = 3;
/// Minimal unconverted ratio.
pub const AVERAGE_UNC_RATIO: f64 = 0.02;
/// Clipped ratio must stay below this value.
pub const AVERAGE_CLU_RATIO: f64 = 0.5;
/// Multi-mapping ratio must stay below this value.
pub const AVERAGE_MUL_RATIO: f64 = 0.2;
/// Replaces zero or null ratio denominators.
pub const DENOMINATOR_FLOOR: f64 = 1e-9;

/// Thresholds a site must meet, jointly over all samples, to be selected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteFilter {
    pub min_depth:             i64,
    pub min_support:           i64,
    pub min_unconverted_ratio: f64,
    pub max_clipped_ratio:     f64,
    pub max_multi_ratio:       f64,
}

impl Default for SiteFilter {
    fn default() -> Self {
        Self {
            min_depth:             TOTAL_DEPTH,
            min_support:           TOTAL_SUPPORT,
            min_unconverted_ratio: AVERAGE_UNC_RATIO,
            max_clipped_ratio:     AVERAGE_CLU_RATIO,
            max_multi_ratio:       AVERAGE_MUL_RATIO,
        }
    }
}

impl SiteFilter {
    with_field_fn!(min_depth, i64);
    with_field_fn!(min_support, i64);
    with_field_fn!(min_unconverted_ratio, f64);
    with_field_fn!(max_clipped_ratio, f64);
    with_field_fn!(max_multi_ratio, f64);

    /// Reads thresholds from a JSON object. Absent fields keep defaults.
    pub fn from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| PileupError::io(path, e))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| PileupError::format(path, e))
    }

    /// Boolean expression retaining sites that meet every threshold.
    pub fn expr(&self) -> Expr {
        col(DEPTH_NAME)
            .gt_eq(lit(self.min_depth))
            .and(col(UNCONVERTED_SUM_NAME).gt_eq(lit(self.min_support)))
            .and(col(UNCONVERTED_RATIO_NAME).gt_eq(lit(self.min_unconverted_ratio)))
            .and(col(CLIPPED_RATIO_NAME).lt(lit(self.max_clipped_ratio)))
            .and(col(MULTI_RATIO_NAME).lt(lit(self.max_multi_ratio)))
    }
}

/// Null-ignoring horizontal sum of sample columns.
fn sum_columns(columns: impl IntoIterator<Item = CountColumn>) -> Expr {
    columns
        .into_iter()
        .map(|column| column.expr().fill_null(lit(0)))
        .reduce(|acc, expr| acc + expr)
        .unwrap_or_else(|| lit(0))
}

/// Denominator with zero and null replaced by [`DENOMINATOR_FLOOR`].
fn floored(expr: Expr) -> Expr {
    when(expr.clone().is_null().or(expr.clone().eq(lit(0))))
        .then(lit(DENOMINATOR_FLOOR))
        .otherwise(expr.cast(DataType::Float64))
}

/// Count columns of `samples` matching the given classes and bases.
fn sample_columns<'a>(
    samples: &'a [String],
    filters: &'a [FilterClass],
    mappings: &'a [MappingClass],
    bases: &'a [BaseType],
) -> impl Iterator<Item = CountColumn> + 'a {
    samples.iter().flat_map(move |sample| {
        filters
            .iter()
            .cartesian_product(mappings.iter())
            .cartesian_product(bases.iter())
            .map(move |((filter, mapping), base)| {
                CountColumn::new(*base, CountClass::new(*filter, *mapping))
                    .with_sample(sample.clone())
            })
    })
}

const BOTH_FILTERS: [FilterClass; 2] = [FilterClass::Unfiltered, FilterClass::Filtered];
const BOTH_MAPPINGS: [MappingClass; 2] = [MappingClass::Uniq, MappingClass::Multi];

/// Adds the per-site metrics `u`, `d`, `_t`, `ur`, `mr` and `cr` to a
/// multi-sample wide table.
///
/// * `u`: filtered-uniq unconverted counts.
/// * `d`: filtered-uniq converted and unconverted counts.
/// * `_t`: all unfiltered counts.
/// * `ur = u / d`.
/// * `mr`: unfiltered-multi counts over `_t`.
/// * `cr`: one minus all filtered counts over `_t`.
///
/// Every sum runs over all `samples`. Zero or null denominators are replaced
/// by [`DENOMINATOR_FLOOR`].
pub fn with_site_metrics(
    lf: LazyFrame,
    samples: &[String],
) -> LazyFrame {
    let unconverted = sum_columns(sample_columns(
        samples,
        &[FilterClass::Filtered],
        &[MappingClass::Uniq],
        &[BaseType::Unconverted],
    ));
    let depth = sum_columns(sample_columns(
        samples,
        &[FilterClass::Filtered],
        &[MappingClass::Uniq],
        &BaseType::ALL,
    ));
    let total = sum_columns(sample_columns(
        samples,
        &[FilterClass::Unfiltered],
        &BOTH_MAPPINGS,
        &BaseType::ALL,
    ));
    let multi = sum_columns(sample_columns(
        samples,
        &[FilterClass::Unfiltered],
        &[MappingClass::Multi],
        &BaseType::ALL,
    ));
    let filtered = sum_columns(sample_columns(
        samples,
        &[FilterClass::Filtered],
        &BOTH_MAPPINGS,
        &BaseType::ALL,
    ));

    lf.with_columns([
        unconverted.alias(UNCONVERTED_SUM_NAME),
        depth.alias(DEPTH_NAME),
        total.alias(TOTAL_NAME),
    ])
    .with_columns([
        (col(UNCONVERTED_SUM_NAME).cast(DataType::Float64) / floored(col(DEPTH_NAME)))
            .alias(UNCONVERTED_RATIO_NAME),
        (multi.cast(DataType::Float64) / floored(col(TOTAL_NAME)))
            .alias(MULTI_RATIO_NAME),
        (lit(1.0) - filtered.cast(DataType::Float64) / floored(col(TOTAL_NAME)))
            .alias(CLIPPED_RATIO_NAME),
    ])
}

/// Key and metric columns, in output order.
pub fn metric_exprs() -> Vec<Expr> {
    let mut exprs = key_exprs();
    exprs.extend(
        [
            UNCONVERTED_SUM_NAME,
            DEPTH_NAME,
            TOTAL_NAME,
            UNCONVERTED_RATIO_NAME,
            MULTI_RATIO_NAME,
            CLIPPED_RATIO_NAME,
        ]
        .into_iter()
        .map(col),
    );
    exprs
}

/// Selects sites passing a [`SiteFilter`] jointly over several samples.
#[derive(Debug, Clone, Default)]
pub struct SiteSelector {
    filter: SiteFilter,
}

impl SiteSelector {
    pub fn new(filter: SiteFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> &SiteFilter {
        &self.filter
    }

    /// Derives sample ids from paths, rejecting empty or ambiguous inputs.
    pub fn sample_ids<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<String>> {
        if paths.is_empty() {
            return Err(PileupError::Argument(
                "at least one input file is required".into(),
            ));
        }

        let samples = paths
            .iter()
            .map(sample_id_from_path)
            .collect::<Result<Vec<_>>>()?;

        let mut seen = HashSet::new();
        if let Some(duplicate) = samples.iter().find(|s| !seen.insert(s.as_str())) {
            return Err(PileupError::Argument(format!(
                "sample id '{}' is derived from more than one input",
                duplicate
            )));
        }
        Ok(samples)
    }

    /// Joins all samples and adds site metrics, ordered by site key.
    pub fn metrics<P: AsRef<Path>>(
        &self,
        paths: &[P],
    ) -> Result<LazyFrame> {
        let samples = Self::sample_ids(paths)?;
        debug!("Samples: {}", samples.iter().join(", "));

        let frames = paths
            .iter()
            .zip(samples.iter())
            .map(|(path, sample)| scan_combined(path, sample))
            .collect::<Result<Vec<_>>>()?;
        let joined = join_sequential(frames)?.sort_by_exprs(
            key_exprs(),
            SortMultipleOptions::default().with_maintain_order(true),
        );

        Ok(with_site_metrics(joined, &samples))
    }

    /// Filters a table carrying site metrics, keeping the first row per key.
    pub fn apply(
        &self,
        lf: LazyFrame,
    ) -> LazyFrame {
        lf.filter(self.filter.expr())
            .select(key_exprs())
            .unique_stable(None, UniqueKeepStrategy::First)
    }

    /// Site keys passing the filter, as a (ref, pos, strand) table.
    pub fn select<P: AsRef<Path>>(
        &self,
        paths: &[P],
    ) -> Result<DataFrame> {
        let selected = self.apply(self.metrics(paths)?).collect()?;
        info!(
            "Selected {} sites from {}",
            selected.height(),
            describe(paths)
        );
        Ok(selected)
    }

    /// Metrics of the sites passing the filter.
    pub fn select_with_metrics<P: AsRef<Path>>(
        &self,
        paths: &[P],
    ) -> Result<DataFrame> {
        let selected = self
            .metrics(paths)?
            .filter(self.filter.expr())
            .select(metric_exprs())
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()?;
        Ok(selected)
    }

    pub fn select_keys<P: AsRef<Path>>(
        &self,
        paths: &[P],
    ) -> Result<Vec<SiteKey>> {
        Ok(SiteKey::from_df(&self.select(paths)?)?)
    }
}
