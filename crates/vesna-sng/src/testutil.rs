//! Test helpers for building SNG wire streams.

use crate::format::SngHeader;
use crate::keystream;

/// Builds byte-exact SNG streams for decoder and extractor tests.
pub(crate) struct ArchiveBuilder {
    version: u32,
    mask: [u8; 16],
    metadata: Vec<(String, String)>,
    files: Vec<(String, Vec<u8>)>,
    data_padding: usize,
    bogus_section_lens: bool,
    reverse_index: bool,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            version: 1,
            mask: [0u8; 16],
            metadata: Vec::new(),
            files: Vec::new(),
            data_padding: 0,
            bogus_section_lens: false,
            reverse_index: false,
        }
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn mask(mut self, mask: [u8; 16]) -> Self {
        self.mask = mask;
        self
    }

    pub fn meta(mut self, key: &str, value: &str) -> Self {
        self.metadata.push((key.to_string(), value.to_string()));
        self
    }

    pub fn file(mut self, name: &str, data: &[u8]) -> Self {
        self.files.push((name.to_string(), data.to_vec()));
        self
    }

    /// Insert zero padding before the first payload so that content
    /// offsets land at arbitrary (misaligned) positions.
    pub fn pad_data(mut self, padding: usize) -> Self {
        self.data_padding = padding;
        self
    }

    /// Write garbage into the declared section length fields.
    pub fn bogus_section_lens(mut self) -> Self {
        self.bogus_section_lens = true;
        self
    }

    /// Emit index entries in reverse order while leaving content layout
    /// untouched, forcing a backward seek during content resolution.
    pub fn reverse_index(mut self) -> Self {
        self.reverse_index = true;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut meta_entries = Vec::new();
        for (key, value) in &self.metadata {
            meta_entries.extend_from_slice(&(key.len() as i32).to_le_bytes());
            meta_entries.extend_from_slice(key.as_bytes());
            meta_entries.extend_from_slice(&(value.len() as i32).to_le_bytes());
            meta_entries.extend_from_slice(value.as_bytes());
        }

        let index_entry_bytes: usize = self
            .files
            .iter()
            .map(|(name, _)| 1 + name.len() + 16)
            .sum();
        let content_total: usize = self.files.iter().map(|(_, data)| data.len()).sum();

        // identifier + fixed header, metadata section, index section,
        // data-section length field, then padding and contents.
        let content_start = SngHeader::IDENTIFIER.len()
            + std::mem::size_of::<SngHeader>()
            + 16
            + meta_entries.len()
            + 16
            + index_entry_bytes
            + 8
            + self.data_padding;

        let mut offset = content_start as u64;
        let mut index_entries: Vec<Vec<u8>> = Vec::with_capacity(self.files.len());
        for (name, data) in &self.files {
            let mut entry = Vec::new();
            entry.push(name.len() as u8);
            entry.extend_from_slice(name.as_bytes());
            entry.extend_from_slice(&(data.len() as u64).to_le_bytes());
            entry.extend_from_slice(&offset.to_le_bytes());
            index_entries.push(entry);
            offset += data.len() as u64;
        }
        if self.reverse_index {
            index_entries.reverse();
        }

        let (meta_decl, index_decl) = if self.bogus_section_lens {
            (0xDEAD_BEEF_u64, 0xBAAD_F00D_u64)
        } else {
            (
                (8 + meta_entries.len()) as u64,
                (8 + index_entry_bytes) as u64,
            )
        };

        let mut out = Vec::new();
        out.extend_from_slice(&SngHeader::IDENTIFIER);
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.mask);

        out.extend_from_slice(&meta_decl.to_le_bytes());
        out.extend_from_slice(&(self.metadata.len() as u64).to_le_bytes());
        out.extend_from_slice(&meta_entries);

        out.extend_from_slice(&index_decl.to_le_bytes());
        out.extend_from_slice(&(self.files.len() as u64).to_le_bytes());
        for entry in &index_entries {
            out.extend_from_slice(entry);
        }

        out.extend_from_slice(&((self.data_padding + content_total) as u64).to_le_bytes());
        out.resize(out.len() + self.data_padding, 0);
        for (_, data) in &self.files {
            out.extend_from_slice(&keystream::apply(data, &self.mask));
        }

        out
    }
}
