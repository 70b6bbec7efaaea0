//! Common utilities for Vesna.
//!
//! This crate provides the foundational pieces shared by the Vesna crates:
//!
//! - [`BinaryReader`] - position-aware little-endian reading over byte slices
//! - [`Error`] / [`Result`] - the shared low-level error type

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::BinaryReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
