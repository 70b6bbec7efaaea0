//! Decode-time diagnostics.
//!
//! Decoding is silent unless the caller supplies an observer; there is no
//! global debug flag or logger. Warnings are advisory and never change
//! the decode result.

/// Hooks invoked while an archive is decoded.
///
/// All methods default to no-ops, so implementors only override what
/// they care about.
pub trait DecodeObserver {
    /// The fixed header parsed successfully.
    fn header(&mut self, version: u32) {
        let _ = version;
    }

    /// A section boundary was reached. `declared_len` is the section
    /// length as stored in the stream; it is informational only and not
    /// used to bound parsing.
    fn section(&mut self, name: &'static str, declared_len: u64) {
        let _ = (name, declared_len);
    }

    /// A payload was de-obfuscated and added to the archive.
    fn entry_decoded(&mut self, name: &str, len: usize, offset: u64) {
        let _ = (name, len, offset);
    }

    /// An advisory diagnostic, e.g. a payload whose bytes do not match
    /// the signature its name suggests.
    fn warning(&mut self, message: &str) {
        let _ = message;
    }
}

/// Observer that discards everything; the default for plain decodes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl DecodeObserver for SilentObserver {}
