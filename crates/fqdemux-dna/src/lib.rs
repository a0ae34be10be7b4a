#![deny(unsafe_code)]

//! DNA sequence utilities for index handling.
//!
//! This crate provides the base-level operations used when comparing index reads:
//! - Complement and reverse-complement of DNA sequences
//! - Canonical-alphabet checks for index sequences

pub mod dna;

pub use dna::{complement_base, is_acgt, reverse_complement_str};
