//! Best-effort payload signature checks.
//!
//! After a payload is de-obfuscated, its first bytes can be compared
//! against the signature its file extension implies. The check is purely
//! advisory: a mismatch produces an observer warning and never fails the
//! decode.

use std::path::Path;

/// Expected leading bytes per payload extension.
const SIGNATURES: &[(&str, &[u8])] = &[
    ("png", &[0x89, b'P']),
    ("jpg", &[0xFF, 0xD8]),
    ("jpeg", &[0xFF, 0xD8]),
    ("mid", b"MThd\x00\x00\x00\x06"),
    ("midi", b"MThd\x00\x00\x00\x06"),
    ("ogg", b"OggS"),
    ("opus", b"OggS"),
    ("wav", b"RIFF"),
];

/// Check `data` against the signature implied by `name`'s extension.
///
/// Returns a warning message when the payload does not start with the
/// expected signature, `None` when it matches or the extension is not
/// one we know.
pub(crate) fn check(name: &str, data: &[u8]) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    let (_, signature) = SIGNATURES.iter().find(|(e, _)| *e == ext)?;

    if data.starts_with(signature) {
        None
    } else {
        Some(format!(
            "payload '{name}' does not start with the expected .{ext} signature"
        ))
    }
}
