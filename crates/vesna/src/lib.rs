//! Vesna - SNG song package extraction library.
//!
//! This crate provides a unified interface to the Vesna crates for
//! working with SNG song packages.
//!
//! # Crates
//!
//! - [`vesna_common`] - Common utilities (binary reading, shared errors)
//! - [`vesna_sng`] - SNG archive decoding, keystream, extraction
//!
//! # Example
//!
//! ```no_run
//! use vesna::prelude::*;
//!
//! let archive = SngArchive::open("song.sng")?;
//! println!("{:?} payloads, version {}", archive.payload_count(), archive.version());
//!
//! extract(&archive, "out/song")?;
//! # Ok::<(), vesna::sng::Error>(())
//! ```

// Re-export all sub-crates
pub use vesna_common as common;
pub use vesna_sng as sng;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use vesna_common::BinaryReader;
    pub use vesna_sng::{
        extract, extract_with, DecodeObserver, ExtractReport, MemFs, NativeFs, SngArchive, Vfs,
        MANIFEST_NAME,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
