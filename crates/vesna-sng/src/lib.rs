//! SNG song package decoding and extraction.
//!
//! An SNG package is a single-file container for one song's chart, audio,
//! and artwork. The layout is:
//!
//! - a 6-byte `SNGPKG` identifier, a format version, and a 16-byte mask
//! - a string-to-string metadata dictionary
//! - a file index mapping payload names to absolute byte ranges
//! - the payloads themselves, byte-obfuscated with a position-keyed
//!   XOR schedule (see [`keystream`])
//!
//! Decoding is all-or-nothing: any truncation or malformed length aborts
//! with no partial archive. Extraction writes a `song.ini` manifest plus
//! every payload under a destination root and is best-effort per file.
//!
//! # Example
//!
//! ```no_run
//! use vesna_sng::{extract, SngArchive};
//!
//! let archive = SngArchive::open("song.sng")?;
//! for name in archive.payload_names() {
//!     println!("{name}");
//! }
//! extract(&archive, "out/song")?;
//! # Ok::<(), vesna_sng::Error>(())
//! ```

mod archive;
mod entry;
mod error;
mod extract;
mod format;
mod observer;
mod sniff;
mod vfs;

pub mod keystream;

#[cfg(test)]
pub(crate) mod testutil;

pub use archive::SngArchive;
pub use error::{Error, Result};
pub use extract::{extract, extract_with, ExtractReport, MANIFEST_NAME};
pub use format::SngHeader;
pub use observer::{DecodeObserver, SilentObserver};
pub use vfs::{MemFs, NativeFs, Vfs};
