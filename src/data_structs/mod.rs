//! Core types describing pileup sites and the count columns attached to
//! them.
//!
//! A pileup table is keyed by ([`colnames::REF_NAME`],
//! [`colnames::POS_NAME`], [`colnames::STRAND_NAME`]). Count columns are
//! scoped by a [`CountClass`] (filter class x mapping class) and, once
//! several samples are joined into one wide table, by a sample id. The
//! [`CountColumn`] type renders and parses those names.

mod columns;
mod enums;
mod key;

pub use columns::{
    colnames,
    key_cast_exprs,
    key_exprs,
    CountColumn,
};
pub use enums::{
    BaseType,
    CountClass,
    FilterClass,
    MappingClass,
    Strand,
};
pub use key::SiteKey;
