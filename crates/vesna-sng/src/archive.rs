//! SNG archive decoding.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use vesna_common::BinaryReader;

use crate::entry::IndexEntry;
use crate::format::SngHeader;
use crate::keystream;
use crate::observer::{DecodeObserver, SilentObserver};
use crate::sniff;
use crate::{Error, Result};

/// A decoded SNG package.
///
/// Holds the format version, the metadata dictionary, and every payload
/// in de-obfuscated form. Decoding is all-or-nothing: a value of this
/// type only exists for archives that parsed completely.
pub struct SngArchive {
    version: u32,
    metadata: HashMap<String, String>,
    payloads: HashMap<String, Vec<u8>>,
}

impl SngArchive {
    /// Open and decode an archive from a file.
    ///
    /// The file is memory-mapped for the duration of the decode and
    /// released before this returns; the decoded archive owns all of its
    /// data.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        Self::parse(&mmap)
    }

    /// Check whether `data` starts with the SNG identifier.
    ///
    /// Looks at the first 6 bytes only, so it is cheap enough for format
    /// probing; it never errors.
    #[inline]
    pub fn is_sng(data: &[u8]) -> bool {
        data.len() >= SngHeader::IDENTIFIER.len()
            && data[..SngHeader::IDENTIFIER.len()] == SngHeader::IDENTIFIER
    }

    /// Decode an archive from a byte slice.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_with(data, &mut SilentObserver)
    }

    /// Decode an archive, reporting diagnostics to `observer`.
    ///
    /// Parsing is strictly sequential: identifier, fixed header, metadata
    /// dictionary, file index, then a seek-and-read pass that
    /// de-obfuscates every indexed payload. The section length fields in
    /// the stream are consumed but never used to bound parsing; when one
    /// disagrees with the decoded contents the mismatch is reported as a
    /// warning only.
    pub fn parse_with(data: &[u8], observer: &mut dyn DecodeObserver) -> Result<Self> {
        let mut reader = BinaryReader::new(data);

        let identifier = reader.read_bytes(SngHeader::IDENTIFIER.len())?;
        if identifier != SngHeader::IDENTIFIER {
            return Err(Error::InvalidIdentifier {
                actual: identifier.to_vec(),
            });
        }

        let header: SngHeader = reader.read_struct()?;
        let version = header.version;
        let mask = header.mask;
        observer.header(version);

        let metadata = Self::read_metadata(&mut reader, observer)?;
        let index = Self::read_index(&mut reader, observer)?;

        // Structural marker only; consumed to keep the cursor aligned.
        let data_section_len = reader.read_u64()?;
        observer.section("data", data_section_len);

        let mut payloads = HashMap::new();
        for entry in index {
            reader.seek(entry.offset as usize);
            let masked = reader.read_bytes(entry.length as usize)?;
            let plain = keystream::apply(masked, &mask);

            if let Some(warning) = sniff::check(&entry.name, &plain) {
                observer.warning(&warning);
            }

            observer.entry_decoded(&entry.name, plain.len(), entry.offset);
            payloads.insert(entry.name, plain);
        }

        Ok(Self {
            version,
            metadata,
            payloads,
        })
    }

    fn read_metadata(
        reader: &mut BinaryReader,
        observer: &mut dyn DecodeObserver,
    ) -> Result<HashMap<String, String>> {
        let declared_len = reader.read_u64()?;
        observer.section("metadata", declared_len);

        let section_start = reader.position();
        let entry_count = reader.read_u64()?;

        let mut metadata = HashMap::new();
        for _ in 0..entry_count {
            let key = Self::read_prefixed_string(reader, "metadata key")?;
            let value = Self::read_prefixed_string(reader, "metadata value")?;
            metadata.insert(key, value);
        }

        let consumed = (reader.position() - section_start) as u64;
        if consumed != declared_len {
            observer.warning(&format!(
                "metadata section declared {declared_len} bytes but entries span {consumed}"
            ));
        }

        Ok(metadata)
    }

    fn read_prefixed_string(reader: &mut BinaryReader, field: &'static str) -> Result<String> {
        let length = reader.read_i32()?;
        if length < 0 {
            return Err(Error::NegativeLength {
                field,
                value: length,
            });
        }
        let bytes = reader.read_bytes(length as usize)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    fn read_index(
        reader: &mut BinaryReader,
        observer: &mut dyn DecodeObserver,
    ) -> Result<Vec<IndexEntry>> {
        let declared_len = reader.read_u64()?;
        observer.section("file index", declared_len);

        let section_start = reader.position();
        let file_count = reader.read_u64()?;

        let mut index = Vec::new();
        for _ in 0..file_count {
            let name_len = reader.read_u8()?;
            let name = String::from_utf8_lossy(reader.read_bytes(name_len as usize)?).into_owned();
            let length = reader.read_u64()?;
            let offset = reader.read_u64()?;
            index.push(IndexEntry {
                name,
                length,
                offset,
            });
        }

        let consumed = (reader.position() - section_start) as u64;
        if consumed != declared_len {
            observer.warning(&format!(
                "file index section declared {declared_len} bytes but entries span {consumed}"
            ));
        }

        Ok(index)
    }

    /// Get the format version.
    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Get the metadata dictionary.
    #[inline]
    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// Look up a single metadata value.
    pub fn get_meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Get the number of payloads.
    #[inline]
    pub fn payload_count(&self) -> usize {
        self.payloads.len()
    }

    /// Iterate over payload names, in no particular order.
    pub fn payload_names(&self) -> impl Iterator<Item = &str> {
        self.payloads.keys().map(String::as_str)
    }

    /// Iterate over `(name, bytes)` payload pairs, in no particular order.
    pub fn payloads(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.payloads
            .iter()
            .map(|(name, data)| (name.as_str(), data.as_slice()))
    }

    /// Get a payload's decoded bytes by name.
    pub fn payload(&self, name: &str) -> Option<&[u8]> {
        self.payloads.get(name).map(Vec::as_slice)
    }

    /// Like [`payload`](Self::payload), but an absent name is an error
    /// suitable for propagation.
    pub fn get(&self, name: &str) -> Result<&[u8]> {
        self.payload(name)
            .ok_or_else(|| Error::PayloadNotFound(name.to_string()))
    }

    /// Total decoded payload size in bytes.
    pub fn total_payload_size(&self) -> u64 {
        self.payloads.values().map(|data| data.len() as u64).sum()
    }
}

impl std::fmt::Debug for SngArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SngArchive")
            .field("version", &self.version)
            .field("metadata_entries", &self.metadata.len())
            .field("payloads", &self.payloads.len())
            .finish()
    }
}
