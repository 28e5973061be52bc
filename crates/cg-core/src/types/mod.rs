//! Core data types: the ordered market [`Record`] and canonical field names.
//!
//! Records are loosely typed on purpose. The upstream API adds, removes and
//! nulls fields freely, so every stage must tolerate absent values rather
//! than rely on a fixed struct layout.

pub mod fields;
pub mod record;

pub use record::*;
