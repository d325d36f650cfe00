#![allow(dead_code)]
use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};

use pileup_sites::prelude::*;
use polars::prelude::*;

pub type Site = (&'static str, i64, &'static str);

/// Converted and unconverted counts of one class.
pub type Pair = (i64, i64);

/// Counts of one site in all four classes, in [`CountClass::ALL`] order.
#[derive(Debug, Clone, Copy)]
pub struct SiteCounts {
    pub unfiltered_uniq:  Pair,
    pub unfiltered_multi: Pair,
    pub filtered_uniq:    Pair,
    pub filtered_multi:   Pair,
}

impl SiteCounts {
    /// Site without multi-mapped or discarded reads.
    pub fn clean(
        converted: i64,
        unconverted: i64,
    ) -> Self {
        Self {
            unfiltered_uniq:  (converted, unconverted),
            unfiltered_multi: (0, 0),
            filtered_uniq:    (converted, unconverted),
            filtered_multi:   (0, 0),
        }
    }

    pub fn flat(&self) -> [i64; 8] {
        [
            self.unfiltered_uniq.0,
            self.unfiltered_uniq.1,
            self.unfiltered_multi.0,
            self.unfiltered_multi.1,
            self.filtered_uniq.0,
            self.filtered_uniq.1,
            self.filtered_multi.0,
            self.filtered_multi.1,
        ]
    }
}

pub fn write_pileup(
    dir: &Path,
    name: &str,
    rows: &[(Site, Pair)],
) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        "ref\tpos\tstrand\tconvertedBaseCount\tunconvertedBaseCount"
    )
    .unwrap();
    for ((reference, pos, strand), (converted, unconverted)) in rows {
        writeln!(
            file,
            "{}\t{}\t{}\t{}\t{}",
            reference, pos, strand, converted, unconverted
        )
        .unwrap();
    }
    path
}

pub fn combined_df(rows: &[(Site, SiteCounts)]) -> DataFrame {
    let mut columns = vec![
        Column::new("ref".into(), rows.iter().map(|r| r.0 .0).collect::<Vec<_>>()),
        Column::new("pos".into(), rows.iter().map(|r| r.0 .1).collect::<Vec<_>>()),
        Column::new("strand".into(), rows.iter().map(|r| r.0 .2).collect::<Vec<_>>()),
    ];
    for (idx, column) in CountColumn::combined().into_iter().enumerate() {
        columns.push(Column::new(
            column.name().into(),
            rows.iter().map(|r| r.1.flat()[idx]).collect::<Vec<_>>(),
        ));
    }
    DataFrame::new(columns).unwrap()
}

/// Writes a combined table named `<sample>_genome.arrow`.
pub fn write_sample(
    dir: &Path,
    sample: &str,
    rows: &[(Site, SiteCounts)],
) -> PathBuf {
    let path = dir.join(format!("{}_genome.arrow", sample));
    write_combined(&mut combined_df(rows), &path, None).unwrap();
    path
}

pub fn i64_column(
    df: &DataFrame,
    name: &str,
) -> Vec<Option<i64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .i64()
        .unwrap()
        .into_iter()
        .collect()
}

pub fn f64_column(
    df: &DataFrame,
    name: &str,
) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}
