//! Payload de-obfuscation for SNG containers.
//!
//! Payload bytes are XOR-masked with a keystream derived from the
//! archive's 16-byte mask and each byte's position *within that payload*:
//!
//! ```text
//! key[i] = mask[i mod 16] ^ (i & 0xFF)
//! ```
//!
//! Indices restart at zero for every payload; the mask is shared by all
//! payloads in an archive. XOR makes the schedule its own inverse, so the
//! same routine both obfuscates and de-obfuscates.

/// Apply the keystream to `data` in place.
///
/// Byte `i` of `data` is XORed with `mask[i % 16] ^ (i & 0xFF)`, where
/// `i` counts from the start of `data`. Applying this twice with the same
/// mask restores the original bytes.
pub fn apply_in_place(data: &mut [u8], mask: &[u8; 16]) {
    for (i, byte) in data.iter_mut().enumerate() {
        *byte ^= mask[i & 0x0F] ^ (i & 0xFF) as u8;
    }
}

/// Apply the keystream to `data`, returning a new buffer.
pub fn apply(data: &[u8], mask: &[u8; 16]) -> Vec<u8> {
    let mut buffer = data.to_vec();
    apply_in_place(&mut buffer, mask);
    buffer
}
