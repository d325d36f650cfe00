use std::path::Path;

use itertools::Itertools;
use log::{
    debug,
    info,
};
use polars::prelude::*;

use super::check_columns;
use crate::data_structs::{
    colnames,
    key_cast_exprs,
    CountColumn,
};
use crate::error::{
    PileupError,
    Result,
};
use crate::utils::{
    validate_input,
    write_atomic,
};

/// Lazily scans a combined (Arrow IPC) table and suffixes its 8 count
/// columns with `_<sample>`.
///
/// Only the key and count columns are kept. Missing counts stay null.
pub fn scan_combined<P: AsRef<Path>>(
    path: P,
    sample: &str,
) -> Result<LazyFrame> {
    let path = validate_input(path)?;

    let mut lf = LazyFrame::scan_ipc(&path, ScanArgsIpc::default())
        .map_err(|e| PileupError::format(&path, e))?;
    let schema = lf
        .collect_schema()
        .map_err(|e| PileupError::format(&path, e))?;

    let columns = CountColumn::combined();
    let column_names = columns.iter().map(CountColumn::name).collect_vec();
    check_columns(
        &schema,
        colnames::KEY_NAMES
            .iter()
            .copied()
            .chain(column_names.iter().map(String::as_str)),
        &path,
    )?;

    let mut exprs = key_cast_exprs();
    exprs.extend(columns.into_iter().map(|column| {
        column
            .expr()
            .strict_cast(DataType::Int64)
            .alias(column.with_sample(sample).name())
    }));

    debug!("Scanning {} as sample '{}'", path.display(), sample);
    Ok(lf.select(exprs))
}

/// Writes a combined table as Arrow IPC.
pub fn write_combined<P: AsRef<Path>>(
    df: &mut DataFrame,
    path: P,
    compression: Option<IpcCompression>,
) -> Result<()> {
    let path = path.as_ref();
    write_atomic(path, |file| {
        IpcWriter::new(file)
            .with_compression(compression)
            .finish(df)?;
        Ok(())
    })?;
    info!("Wrote {} sites to {}", df.height(), path.display());
    Ok(())
}
