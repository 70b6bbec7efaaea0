//! Archive extraction.

use std::io;
use std::path::{Path, PathBuf};

use crate::archive::SngArchive;
use crate::vfs::{NativeFs, Vfs};
use crate::{Error, Result};

/// Manifest file name written under the destination root.
pub const MANIFEST_NAME: &str = "song.ini";

/// Outcome of an extraction run.
#[derive(Debug, Default)]
pub struct ExtractReport {
    /// Number of files written successfully, manifest included.
    pub written: usize,
    /// Per-path failures: (archive-relative path, error message).
    pub failed: Vec<(String, String)>,
}

impl ExtractReport {
    /// Whether every write succeeded.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Extract `archive` under `dest` on the native filesystem.
///
/// See [`extract_with`].
pub fn extract<P: AsRef<Path>>(archive: &SngArchive, dest: P) -> Result<ExtractReport> {
    extract_with(archive, dest, &mut NativeFs)
}

/// Extract `archive` under `dest` on `fs`.
///
/// Writes the metadata dictionary as a `song.ini` manifest and every
/// payload to its `/`-implied relative path, creating missing
/// directories along the way. Existing files are replaced silently.
///
/// Writes are best-effort: one failure does not stop the remaining
/// payloads, but any failure makes the overall call return
/// [`Error::ExtractionIncomplete`] carrying the full report. Only a
/// failure to create the destination root itself aborts up front.
pub fn extract_with<P: AsRef<Path>>(
    archive: &SngArchive,
    dest: P,
    fs: &mut dyn Vfs,
) -> Result<ExtractReport> {
    let dest = dest.as_ref();
    if !fs.exists(dest) {
        fs.create_dir_all(dest)?;
    }

    let mut report = ExtractReport::default();

    let manifest = render_manifest(archive);
    record(
        &mut report,
        MANIFEST_NAME,
        fs.write_file(&dest.join(MANIFEST_NAME), manifest.as_bytes()),
    );

    // Stable order keeps failure reports reproducible.
    let mut payloads: Vec<(&str, &[u8])> = archive.payloads().collect();
    payloads.sort_unstable_by_key(|(name, _)| *name);

    for (name, data) in payloads {
        let target = dest.join(relative_path(name));
        record(&mut report, name, write_one(fs, &target, data));
    }

    if report.is_complete() {
        Ok(report)
    } else {
        Err(Error::ExtractionIncomplete { report })
    }
}

fn record(report: &mut ExtractReport, name: &str, result: io::Result<()>) {
    match result {
        Ok(()) => report.written += 1,
        Err(e) => report.failed.push((name.to_string(), e.to_string())),
    }
}

fn write_one(fs: &mut dyn Vfs, target: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        if !fs.exists(parent) {
            fs.create_dir_all(parent)?;
        }
    }
    fs.write_file(target, data)
}

/// Payload names use `/` separators regardless of platform.
fn relative_path(name: &str) -> PathBuf {
    name.split('/').filter(|part| !part.is_empty()).collect()
}

/// Render the metadata dictionary as a `song.ini` manifest.
///
/// A `[song]` section header followed by one `key = value` line per
/// entry, keys sorted.
fn render_manifest(archive: &SngArchive) -> String {
    let mut keys: Vec<&str> = archive.metadata().keys().map(String::as_str).collect();
    keys.sort_unstable();

    let mut out = String::from("[song]\n");
    for key in keys {
        out.push_str(key);
        out.push_str(" = ");
        out.push_str(archive.get_meta(key).unwrap_or_default());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ArchiveBuilder;
    use crate::vfs::MemFs;

    fn sample_archive() -> SngArchive {
        let data = ArchiveBuilder::new()
            .meta("name", "Through the Fire and Flames")
            .meta("artist", "DragonForce")
            .file("notes.chart", b"[Song]\n")
            .file("audio/guitar.ogg", b"OggS fake")
            .file("sub/dir/file.bin", b"\x00\x01\x02")
            .build();
        SngArchive::parse(&data).unwrap()
    }

    #[test]
    fn test_extract_writes_manifest_and_nested_payloads() {
        let archive = sample_archive();
        let mut fs = MemFs::new();

        let report = extract_with(&archive, "out", &mut fs).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.written, 4); // manifest + 3 payloads

        let manifest = String::from_utf8(fs.read_file(Path::new("out/song.ini")).unwrap()).unwrap();
        assert_eq!(
            manifest,
            "[song]\nartist = DragonForce\nname = Through the Fire and Flames\n"
        );

        assert_eq!(fs.file("out/notes.chart"), Some(&b"[Song]\n"[..]));
        assert_eq!(fs.file("out/audio/guitar.ogg"), Some(&b"OggS fake"[..]));
        assert_eq!(fs.file("out/sub/dir/file.bin"), Some(&[0u8, 1, 2][..]));
        assert!(fs.exists(Path::new("out/sub/dir")));
    }

    #[test]
    fn test_extract_replaces_existing_files() {
        let archive = sample_archive();
        let mut fs = MemFs::new();

        fs.create_dir_all(Path::new("out")).unwrap();
        fs.write_file(Path::new("out/notes.chart"), b"stale").unwrap();

        extract_with(&archive, "out", &mut fs).unwrap();
        assert_eq!(fs.file("out/notes.chart"), Some(&b"[Song]\n"[..]));
    }

    #[test]
    fn test_failed_write_does_not_stop_remaining_payloads() {
        // Fails every write whose file name matches, passes the rest
        // through.
        struct FailOn<'a> {
            inner: MemFs,
            file_name: &'a str,
        }

        impl Vfs for FailOn<'_> {
            fn exists(&self, path: &Path) -> bool {
                self.inner.exists(path)
            }

            fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
                self.inner.create_dir_all(path)
            }

            fn write_file(&mut self, path: &Path, data: &[u8]) -> io::Result<()> {
                if path.file_name().and_then(|n| n.to_str()) == Some(self.file_name) {
                    return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
                }
                self.inner.write_file(path, data)
            }

            fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
                self.inner.read_file(path)
            }
        }

        let archive = sample_archive();
        let mut fs = FailOn {
            inner: MemFs::new(),
            file_name: "guitar.ogg",
        };

        match extract_with(&archive, "out", &mut fs) {
            Err(Error::ExtractionIncomplete { report }) => {
                assert_eq!(report.written, 3);
                assert_eq!(report.failed.len(), 1);
                assert_eq!(report.failed[0].0, "audio/guitar.ogg");
            }
            other => panic!("expected ExtractionIncomplete, got {other:?}"),
        }

        // Payloads after the failing one were still written.
        assert_eq!(fs.inner.file("out/notes.chart"), Some(&b"[Song]\n"[..]));
        assert_eq!(fs.inner.file("out/sub/dir/file.bin"), Some(&[0u8, 1, 2][..]));
    }

    #[test]
    fn test_extract_to_native_filesystem() {
        let archive = sample_archive();
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("song");

        let report = extract(&archive, &dest).unwrap();
        assert!(report.is_complete());

        let manifest = std::fs::read_to_string(dest.join("song.ini")).unwrap();
        assert!(manifest.starts_with("[song]\n"));
        assert_eq!(
            std::fs::read(dest.join("sub").join("dir").join("file.bin")).unwrap(),
            [0u8, 1, 2]
        );
    }

    #[test]
    fn test_manifest_of_empty_metadata_is_just_the_section_header() {
        let data = ArchiveBuilder::new().build();
        let archive = SngArchive::parse(&data).unwrap();
        let mut fs = MemFs::new();

        extract_with(&archive, "out", &mut fs).unwrap();
        assert_eq!(fs.read_file(Path::new("out/song.ini")).unwrap(), b"[song]\n");
    }
}
