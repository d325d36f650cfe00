use std::fmt::Display;
use std::str::FromStr;

use itertools::izip;
use polars::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use super::columns::colnames;
use super::enums::Strand;

/// Identity of a pileup site.
#[derive(Eq, Hash, PartialEq, Clone, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteKey {
    pub reference: String,
    pub position:  u64,
    pub strand:    Strand,
}

impl SiteKey {
    pub fn new<S: Into<String>>(
        reference: S,
        position: u64,
        strand: Strand,
    ) -> Self {
        Self {
            reference: reference.into(),
            position,
            strand,
        }
    }

    /// Reads the key columns of `df` row by row.
    ///
    /// Fails on null keys, negative positions or strands other than `+`/`-`.
    pub fn from_df(df: &DataFrame) -> PolarsResult<Vec<SiteKey>> {
        let refs = df.column(colnames::REF_NAME)?.as_materialized_series().str()?;
        let positions = df
            .column(colnames::POS_NAME)?
            .as_materialized_series()
            .cast(&DataType::Int64)?;
        let positions = positions.i64()?;
        let strands = df
            .column(colnames::STRAND_NAME)?
            .as_materialized_series()
            .str()?;

        izip!(refs.into_iter(), positions.into_iter(), strands.into_iter())
            .map(|(reference, position, strand)| {
                match (reference, position, strand) {
                    (Some(reference), Some(position), Some(strand))
                        if position >= 0 =>
                    {
                        let strand = Strand::from_str(strand)
                            .map_err(|e| PolarsError::ComputeError(e.into()))?;
                        Ok(SiteKey::new(reference, position as u64, strand))
                    },
                    other => {
                        Err(PolarsError::ComputeError(
                            format!("invalid site key {:?}", other).into(),
                        ))
                    },
                }
            })
            .collect()
    }
}

impl Display for SiteKey {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}\t{}\t{}", self.reference, self.position, self.strand)
    }
}
