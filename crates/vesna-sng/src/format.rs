//! Wire-format structures for the SNG container.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Fixed header fields following the identifier.
///
/// The 6-byte `SNGPKG` identifier at offset 0 is read and validated
/// separately before this struct. All multi-byte fields are
/// little-endian.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct SngHeader {
    /// Format version, stored as-is; every version parses identically.
    pub version: u32,
    /// Mask seeding the payload keystream, reused by every payload.
    pub mask: [u8; 16],
}

impl SngHeader {
    /// Identifier bytes at offset 0 of every SNG package.
    pub const IDENTIFIER: [u8; 6] = *b"SNGPKG";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        // identifier (6) + header (20) = the 26-byte fixed prefix
        assert_eq!(std::mem::size_of::<SngHeader>(), 20);
    }
}
