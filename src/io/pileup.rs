use std::path::Path;

use itertools::Itertools;
use log::debug;
use polars::prelude::*;

use super::{
    check_columns,
    validate_counts,
    validate_keys,
};
use crate::data_structs::{
    colnames,
    BaseType,
    CountClass,
    CountColumn,
};
use crate::error::{
    PileupError,
    Result,
};
use crate::utils::validate_input;

/// Columns read from a raw pileup table. Any other column is ignored.
pub const PILEUP_COLUMNS: [&str; 5] = [
    colnames::REF_NAME,
    colnames::POS_NAME,
    colnames::STRAND_NAME,
    BaseType::Converted.col_name(),
    BaseType::Unconverted.col_name(),
];

/// CSV options for raw pileup tables.
///
/// Every column is read as a string and cast afterwards, so that values
/// which fail to parse surface as format errors naming the table.
pub fn read_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(b'\t')
                .with_try_parse_dates(false),
        )
}

/// Reads one raw pileup table and suffixes its count columns with `class`,
/// e.g. `convertedBaseCount` becomes `convertedBaseCount_filtered_uniq`.
pub fn read_pileup<P: AsRef<Path>>(
    path: P,
    class: CountClass,
) -> Result<DataFrame> {
    let path = validate_input(path)?;

    let raw = read_options()
        .try_into_reader_with_file_path(Some(path.clone()))
        .and_then(|reader| reader.finish())
        .map_err(|e| PileupError::format(&path, e))?;
    check_columns(&raw.schema(), PILEUP_COLUMNS, &path)?;

    let count_columns = BaseType::ALL
        .iter()
        .map(|base| CountColumn::new(*base, class))
        .collect_vec();

    let mut exprs = vec![
        col(colnames::REF_NAME),
        col(colnames::POS_NAME).strict_cast(DataType::Int64),
        col(colnames::STRAND_NAME),
    ];
    exprs.extend(count_columns.iter().map(|column| {
        col(column.base.col_name())
            .strict_cast(DataType::Int64)
            .alias(column.name())
    }));

    let df = raw
        .lazy()
        .select(exprs)
        .collect()
        .map_err(|e| PileupError::format(&path, e))?;

    validate_keys(&df, &path)?;
    for column in count_columns.iter() {
        validate_counts(&df, &column.name(), &path)?;
    }

    debug!(
        "Read {} sites from {} as {}",
        df.height(),
        path.display(),
        class
    );
    Ok(df)
}
