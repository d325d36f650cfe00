//! # pileup-sites
//!
//! `pileup-sites` computes per-site conversion statistics from
//! bisulfite-style pileup tables and selects genomic sites passing quality
//! thresholds.
//!
//! Every table is keyed by (`ref`, `pos`, `strand`) and carries converted
//! and unconverted base counts, scoped by filter class (unfiltered or
//! filtered) and mapping class (uniq or multi). Two pipelines operate on
//! such tables:
//!
//! * **Combiner** ([`PileupCombiner`]): merges the four per-class pileup
//!   tables of one sample into one wide Arrow IPC table with 8 count columns,
//!   zero-filled where a class did not observe a site.
//! * **Selector** ([`SiteSelector`]): joins the combined tables of any number
//!   of samples, derives depth, support and ratio metrics summed over all
//!   samples and keeps the sites meeting every [`SiteFilter`] threshold.
//!
//! Tables are processed with Polars. Joins are full outer joins with
//! coalesced keys, so each site appears once in any joined table.
//!
//! Number of threads used for loading and joining can be configured with
//! the `PILEUP_NUM_THREADS` environment variable.
//!
//! ## Usage
//!
//! ```no_run
//! use pileup_sites::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut combined = PileupCombiner::new().combine(&[
//!         "S1.unfiltered.uniq.tsv",
//!         "S1.unfiltered.multi.tsv",
//!         "S1.filtered.uniq.tsv",
//!         "S1.filtered.multi.tsv",
//!     ])?;
//!     write_combined(&mut combined, "S1_genome.arrow", None)?;
//!
//!     let mut sites = SiteSelector::default().select(&["S1_genome.arrow"])?;
//!     write_sites(&mut sites, "prefilter.tsv")?;
//!     Ok(())
//! }
//! ```

#[ctor::ctor]
fn init() {
    if let Ok(n) = std::env::var(utils::NUM_THREADS_ENV) {
        std::env::set_var("POLARS_MAX_THREADS", n)
    }
}

pub mod data_structs;
pub mod error;
pub mod io;
pub mod prelude;
pub mod tools;
pub mod utils;

pub use crate::data_structs::{
    CountClass,
    CountColumn,
    SiteKey,
    Strand,
};
pub use crate::error::PileupError;
pub use crate::tools::{
    JoinStrategy,
    PileupCombiner,
    SiteFilter,
    SiteSelector,
};
