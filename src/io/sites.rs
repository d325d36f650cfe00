use std::path::Path;
use std::sync::Arc;

use log::info;
use polars::prelude::*;

use crate::data_structs::{
    colnames,
    SiteKey,
};
use crate::error::{
    PileupError,
    Result,
};
use crate::utils::{
    validate_input,
    write_atomic,
};

/// Schema of a site list: reference, position and strand.
pub fn sites_schema() -> Schema {
    Schema::from_iter([
        (PlSmallStr::from_static(colnames::REF_NAME), DataType::String),
        (PlSmallStr::from_static(colnames::POS_NAME), DataType::Int64),
        (PlSmallStr::from_static(colnames::STRAND_NAME), DataType::String),
    ])
}

fn write_tsv<P: AsRef<Path>>(
    df: &mut DataFrame,
    path: P,
    include_header: bool,
) -> Result<()> {
    write_atomic(path, |file| {
        CsvWriter::new(file)
            .include_header(include_header)
            .with_separator(b'\t')
            .finish(df)?;
        Ok(())
    })
}

/// Writes selected sites as a headerless three-column TSV.
pub fn write_sites<P: AsRef<Path>>(
    df: &mut DataFrame,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let mut keys = df.select(colnames::KEY_NAMES)?;
    write_tsv(&mut keys, path, false)?;
    info!("Wrote {} sites to {}", keys.height(), path.display());
    Ok(())
}

/// Writes per-site metrics as a TSV with header.
pub fn write_site_stats<P: AsRef<Path>>(
    df: &mut DataFrame,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    write_tsv(df, path, true)?;
    info!("Wrote metrics of {} sites to {}", df.height(), path.display());
    Ok(())
}

/// Reads a site list written by [`write_sites`].
pub fn read_sites<P: AsRef<Path>>(path: P) -> Result<Vec<SiteKey>> {
    let path = validate_input(path)?;
    let is_empty = std::fs::metadata(&path)
        .map_err(|e| PileupError::io(&path, e))?
        .len()
        == 0;
    if is_empty {
        return Ok(Vec::new());
    }

    let keys = CsvReadOptions::default()
        .with_has_header(false)
        .with_schema(Some(Arc::new(sites_schema())))
        .with_parse_options(CsvParseOptions::default().with_separator(b'\t'))
        .try_into_reader_with_file_path(Some(path.clone()))
        .and_then(|reader| reader.finish())
        .and_then(|df| SiteKey::from_df(&df))
        .map_err(|e| PileupError::format(&path, e))?;
    Ok(keys)
}
