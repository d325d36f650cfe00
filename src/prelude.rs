pub use polars::prelude::IpcCompression;

pub use crate::data_structs::{
    colnames,
    BaseType,
    CountClass,
    CountColumn,
    FilterClass,
    MappingClass,
    SiteKey,
    Strand,
};
pub use crate::error::{
    PileupError,
    Result,
};
pub use crate::io::combined::{
    scan_combined,
    write_combined,
};
pub use crate::io::pileup::read_pileup;
pub use crate::io::sites::{
    read_sites,
    write_site_stats,
    write_sites,
};
pub use crate::tools::{
    JoinStrategy,
    PileupCombiner,
    SiteFilter,
    SiteSelector,
};
pub use crate::utils::sample_id_from_path;
