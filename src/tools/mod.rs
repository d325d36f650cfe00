//! The two pipelines and the join they share.
//!
//! * [`combine`]: merges the four per-class pileup tables of one sample.
//! * [`select`]: joins per-sample combined tables and selects sites passing
//!   joint quality thresholds.
//! * [`join`]: outer-join-coalesce over the site key.

pub mod combine;
pub mod join;
pub mod select;

pub use combine::PileupCombiner;
pub use join::JoinStrategy;
pub use select::{
    SiteFilter,
    SiteSelector,
};
