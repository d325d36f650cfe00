use std::path::Path;

use itertools::Itertools;
use log::{
    debug,
    info,
};
use polars::prelude::*;
use rayon::prelude::*;

use super::join::{
    describe,
    JoinStrategy,
};
use crate::data_structs::{
    colnames,
    key_exprs,
    CountClass,
    CountColumn,
};
use crate::error::{
    PileupError,
    Result,
};
use crate::io::pileup::read_pileup;
use crate::utils::{
    n_threads,
    THREAD_POOL,
};
use crate::with_field_fn;

/// Merges the four per-class pileup tables of one sample into one wide
/// table.
///
/// Inputs are expected in [`CountClass::ALL`] order: unfiltered-uniq,
/// unfiltered-multi, filtered-uniq, filtered-multi. The output holds every
/// site seen in any input, with the 8 count columns zero-filled where a
/// class did not observe the site, sorted by site key.
#[derive(Debug, Clone, Default)]
pub struct PileupCombiner {
    strategy: JoinStrategy,
}

impl PileupCombiner {
    pub fn new() -> Self {
        Self::default()
    }

    with_field_fn!(strategy, JoinStrategy);

    pub fn strategy(&self) -> JoinStrategy {
        self.strategy
    }

    /// Reads the four inputs concurrently.
    pub fn load<P: AsRef<Path> + Sync>(
        &self,
        paths: &[P],
    ) -> Result<Vec<DataFrame>> {
        if paths.len() != CountClass::ALL.len() {
            return Err(PileupError::Argument(format!(
                "expected {} input files ({}), got {}",
                CountClass::ALL.len(),
                CountClass::ALL.iter().join(", "),
                paths.len()
            )));
        }

        debug!("Reading {} inputs on {} threads", paths.len(), n_threads());
        THREAD_POOL.install(|| {
            paths
                .par_iter()
                .enumerate()
                .map(|(idx, path)| read_pileup(path, CountClass::ALL[idx]))
                .collect::<Result<Vec<_>>>()
        })
    }

    /// Joins loaded per-class tables and zero-fills the absent counts.
    pub fn merge(
        &self,
        frames: Vec<DataFrame>,
    ) -> Result<DataFrame> {
        let joined = self.strategy.join(frames)?;

        let columns = CountColumn::combined();
        let mut exprs = key_exprs();
        exprs.extend(
            columns
                .iter()
                .map(|column| column.expr().fill_null(lit(0)).alias(column.name())),
        );

        let merged = joined
            .lazy()
            .select(exprs)
            .sort_by_exprs(
                key_exprs(),
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .collect()?;
        Ok(merged)
    }

    pub fn combine<P: AsRef<Path> + Sync>(
        &self,
        paths: &[P],
    ) -> Result<DataFrame> {
        let frames = self.load(paths)?;
        info!(
            "Loaded {} sites from {}",
            frames.iter().map(DataFrame::height).sum::<usize>(),
            describe(paths)
        );

        let merged = self.merge(frames)?;
        info!(
            "Combined into {} sites ({:?} join)",
            merged.height(),
            self.strategy
        );
        debug_assert_eq!(merged.width(), colnames::KEY_NAMES.len() + 8);
        Ok(merged)
    }
}
