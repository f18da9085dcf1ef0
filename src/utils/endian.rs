//! Both-endian field helpers
//!
//! ECMA-119 stores multi-byte numbers twice, little-endian then
//! big-endian. Decoding trusts the little-endian half and ignores the
//! mirrored copy; encoding regenerates both halves from the one value.

pub(crate) fn le_u16(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

pub(crate) fn le_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

pub(crate) fn be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

pub(crate) fn write_both_u16(out: &mut [u8], value: u16) {
    out[0..2].copy_from_slice(&value.to_le_bytes());
    out[2..4].copy_from_slice(&value.to_be_bytes());
}

pub(crate) fn write_both_u32(out: &mut [u8], value: u32) {
    out[0..4].copy_from_slice(&value.to_le_bytes());
    out[4..8].copy_from_slice(&value.to_be_bytes());
}
