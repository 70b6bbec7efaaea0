//! File-index records.

/// One record of the archive's file index.
///
/// Maps a payload name to the absolute byte range holding its obfuscated
/// content. The index only drives content resolution during decode; it is
/// not retained on the decoded archive.
#[derive(Debug, Clone)]
pub(crate) struct IndexEntry {
    /// Payload name; `/`-separated components imply subdirectories.
    pub name: String,
    /// Obfuscated content length in bytes.
    pub length: u64,
    /// Absolute offset of the content within the archive.
    pub offset: u64,
}
