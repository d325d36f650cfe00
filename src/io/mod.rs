//! Readers and writers for the tables flowing through the pipelines.
//!
//! * [`pileup`]: raw per-class pileup tables (tab-separated, with header).
//! * [`combined`]: per-sample combined tables (Arrow IPC).
//! * [`sites`]: selected site lists and their metrics (tab-separated).

pub mod combined;
pub mod pileup;
pub mod sites;

use std::path::Path;
use std::str::FromStr;

use polars::prelude::*;

use crate::data_structs::{
    colnames,
    Strand,
};
use crate::error::{
    PileupError,
    Result,
};

/// Checks that every required column is present in `schema`.
pub(crate) fn check_columns<'a, I>(
    schema: &Schema,
    required: I,
    path: &Path,
) -> Result<()>
where
    I: IntoIterator<Item = &'a str>, {
    for name in required {
        if schema.get(name).is_none() {
            return Err(PileupError::schema(path, name));
        }
    }
    Ok(())
}

/// Checks key values of a loaded table: non-null references, non-negative
/// positions, `+`/`-` strands and unique keys.
pub(crate) fn validate_keys(
    df: &DataFrame,
    path: &Path,
) -> Result<()> {
    let refs = df.column(colnames::REF_NAME)?.as_materialized_series();
    if refs.null_count() > 0 {
        return Err(PileupError::format(path, "null reference name"));
    }

    let positions = df.column(colnames::POS_NAME)?.as_materialized_series().i64()?;
    if positions.null_count() > 0 {
        return Err(PileupError::format(path, "null position"));
    }
    if let Some(pos) = positions.into_iter().flatten().find(|pos| *pos < 0) {
        return Err(PileupError::format(path, format!("negative position {}", pos)));
    }

    let strands = df.column(colnames::STRAND_NAME)?.as_materialized_series().str()?;
    if let Some(strand) = strands
        .into_iter()
        .find(|s| s.map_or(true, |s| Strand::from_str(s).is_err()))
    {
        return Err(PileupError::format(
            path,
            format!("invalid strand {:?}", strand.unwrap_or("null")),
        ));
    }

    let n_unique = df
        .clone()
        .lazy()
        .select(crate::data_structs::key_exprs())
        .unique(None, UniqueKeepStrategy::Any)
        .collect()?
        .height();
    if n_unique != df.height() {
        return Err(PileupError::format(
            path,
            format!("{} duplicated site keys", df.height() - n_unique),
        ));
    }
    Ok(())
}

/// Checks that a count column holds no negative values.
pub(crate) fn validate_counts(
    df: &DataFrame,
    column: &str,
    path: &Path,
) -> Result<()> {
    let counts = df.column(column)?.as_materialized_series().i64()?;
    if let Some(count) = counts.into_iter().flatten().find(|count| *count < 0) {
        return Err(PileupError::format(
            path,
            format!("negative count {} in column '{}'", count, column),
        ));
    }
    Ok(())
}
