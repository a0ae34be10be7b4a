//! CLI command implementations for fqdemux.
//!
//! - [`demux`] - Split a dual-indexed paired-end run into per-index FASTQs

pub mod command;
pub mod demux;
