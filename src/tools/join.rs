//! Outer joins with key coalescing over the (ref, pos, strand) site key.
//!
//! The result of joining any number of tables holds each key present in at
//! least one of them exactly once. Columns of tables lacking a key are null
//! for that key. Joins are associative and commutative on the key set, so
//! [`join_sequential`] and [`join_tree`] produce the same rows.

use std::collections::HashSet;
use std::path::Path;

use itertools::Itertools;
use log::debug;
use polars::prelude::*;
use rayon::prelude::*;

use crate::data_structs::{
    colnames,
    key_exprs,
};
use crate::error::{
    PileupError,
    Result,
};
use crate::utils::THREAD_POOL;

/// How a set of tables is reduced into one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JoinStrategy {
    /// Join pairs concurrently, then join the pair results.
    #[default]
    Tree,
    /// Fold left to right.
    Sequential,
}

impl JoinStrategy {
    pub fn join(
        &self,
        frames: Vec<DataFrame>,
    ) -> Result<DataFrame> {
        match self {
            JoinStrategy::Tree => join_tree(frames),
            JoinStrategy::Sequential => {
                Ok(join_sequential(frames.into_iter().map(IntoLazy::lazy).collect())?
                    .collect()?)
            },
        }
    }
}

pub fn join_args() -> JoinArgs {
    JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns)
}

/// Full outer join of two tables on the site key, keys coalesced.
pub fn outer_coalesce(
    left: LazyFrame,
    right: LazyFrame,
) -> LazyFrame {
    left.join(right, key_exprs(), key_exprs(), join_args())
}

/// Fails if two tables share a non-key column, which would make the joined
/// column ambiguous.
fn check_disjoint<I>(tables: I) -> Result<()>
where
    I: IntoIterator<Item = Vec<String>>, {
    let mut seen = HashSet::new();
    for name in tables.into_iter().flatten() {
        if colnames::KEY_NAMES.contains(&name.as_str()) {
            continue;
        }
        if !seen.insert(name.clone()) {
            return Err(PileupError::Argument(format!(
                "column '{}' is present in more than one table",
                name
            )));
        }
    }
    Ok(())
}

/// Joins lazy tables left to right.
pub fn join_sequential(frames: Vec<LazyFrame>) -> Result<LazyFrame> {
    let mut frames = frames;
    let schemas = frames
        .iter_mut()
        .map(|lf| lf.collect_schema())
        .collect::<PolarsResult<Vec<_>>>()?;
    check_disjoint(schemas.iter().map(|schema| {
        schema.iter_names().map(|name| name.to_string()).collect_vec()
    }))?;

    frames
        .into_iter()
        .reduce(outer_coalesce)
        .ok_or_else(|| PileupError::Argument("no tables to join".into()))
}

/// Joins tables pairwise on the worker pool until one table remains.
///
/// With four inputs this joins (0, 1) and (2, 3) concurrently and then
/// joins both results.
pub fn join_tree(frames: Vec<DataFrame>) -> Result<DataFrame> {
    if frames.is_empty() {
        return Err(PileupError::Argument("no tables to join".into()));
    }
    check_disjoint(frames.iter().map(|df| {
        df.get_column_names_str()
            .into_iter()
            .map(String::from)
            .collect_vec()
    }))?;

    let mut level = frames;
    while level.len() > 1 {
        debug!("Joining {} tables pairwise", level.len());
        level = THREAD_POOL.install(|| {
            level
                .into_par_iter()
                .chunks(2)
                .map(|pair| {
                    let mut pair = pair.into_iter();
                    match (pair.next(), pair.next()) {
                        (Some(left), Some(right)) => {
                            outer_coalesce(left.lazy(), right.lazy()).collect()
                        },
                        (Some(left), None) => Ok(left),
                        _ => unreachable!("chunks are never empty"),
                    }
                })
                .collect::<PolarsResult<Vec<_>>>()
        })?;
    }
    Ok(level.remove(0))
}

/// Labels a path for log messages.
pub(crate) fn describe<P: AsRef<Path>>(paths: &[P]) -> String {
    paths
        .iter()
        .map(|p| p.as_ref().display().to_string())
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(
        keys: &[(&str, i64, &str)],
        column: &str,
        values: &[i64],
    ) -> DataFrame {
        df!(
            "ref" => keys.iter().map(|k| k.0).collect_vec(),
            "pos" => keys.iter().map(|k| k.1).collect_vec(),
            "strand" => keys.iter().map(|k| k.2).collect_vec(),
            column => values.to_vec()
        )
        .unwrap()
    }

    fn sorted(df: DataFrame) -> DataFrame {
        df.lazy()
            .sort_by_exprs(key_exprs(), SortMultipleOptions::default())
            .collect()
            .unwrap()
    }

    #[test]
    fn test_key_union() {
        let a = table(&[("chr1", 1, "+"), ("chr1", 2, "+")], "a", &[1, 2]);
        let b = table(&[("chr1", 2, "+"), ("chr1", 2, "-")], "b", &[3, 4]);

        let joined = sorted(outer_coalesce(a.lazy(), b.lazy()).collect().unwrap());
        assert_eq!(joined.height(), 3);
        assert_eq!(joined.width(), 5);

        let a_col = joined.column("a").unwrap().as_materialized_series().i64().unwrap();
        let b_col = joined.column("b").unwrap().as_materialized_series().i64().unwrap();
        assert_eq!(a_col.into_iter().collect_vec(), vec![Some(1), Some(2), None]);
        assert_eq!(b_col.into_iter().collect_vec(), vec![None, Some(3), Some(4)]);
    }

    #[test]
    fn test_tree_matches_sequential() {
        let frames = vec![
            table(&[("chr1", 1, "+")], "a", &[1]),
            table(&[("chr1", 2, "+"), ("chr1", 1, "+")], "b", &[2, 3]),
            table(&[("chr2", 5, "-")], "c", &[4]),
            table(&[("chr1", 2, "+"), ("chr2", 5, "-")], "d", &[5, 6]),
        ];
        let tree = sorted(JoinStrategy::Tree.join(frames.clone()).unwrap());
        let seq = sorted(JoinStrategy::Sequential.join(frames.clone()).unwrap());
        assert!(tree.equals_missing(&seq));

        let reversed = frames.into_iter().rev().collect_vec();
        let rev = sorted(JoinStrategy::Tree.join(reversed).unwrap())
            .select(tree.get_column_names_str())
            .unwrap();
        assert!(tree.equals_missing(&rev));
        assert_eq!(tree.height(), 3);
    }

    #[test]
    fn test_odd_number_of_tables() {
        let frames = vec![
            table(&[("chr1", 1, "+")], "a", &[1]),
            table(&[("chr1", 2, "+")], "b", &[2]),
            table(&[("chr1", 3, "+")], "c", &[3]),
        ];
        assert_eq!(join_tree(frames).unwrap().height(), 3);
    }

    #[test]
    fn test_shared_column_rejected() {
        let frames = vec![
            table(&[("chr1", 1, "+")], "a", &[1]),
            table(&[("chr1", 2, "+")], "a", &[2]),
        ];
        assert!(matches!(join_tree(frames.clone()), Err(PileupError::Argument(_))));
        assert!(matches!(
            join_sequential(frames.into_iter().map(IntoLazy::lazy).collect()),
            Err(PileupError::Argument(_))
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(join_tree(vec![]).is_err());
        assert!(join_sequential(vec![]).is_err());
    }
}
