//! String handling utilities
//!
//! ISO9660 uses various string encodings: ASCII, d-characters, a-characters.

use alloc::string::String;

/// Trim trailing spaces from byte slice
pub fn trim_trailing_spaces(bytes: &[u8]) -> &[u8] {
    let mut end = bytes.len();
    while end > 0 && bytes[end - 1] == b' ' {
        end -= 1;
    }
    &bytes[..end]
}

/// Convert ISO9660 d-characters to string
///
/// d-characters: A-Z, 0-9, _
pub fn dchars_to_str(bytes: &[u8]) -> Result<&str, core::str::Utf8Error> {
    let trimmed = trim_trailing_spaces(bytes);
    core::str::from_utf8(trimmed)
}

/// Convert ISO9660 a-characters to string
///
/// a-characters: A-Z, 0-9, space, !, ", %, &, ', (, ), *, +, ,, -, ., /, :, ;, <, =, >, ?
pub fn achars_to_str(bytes: &[u8]) -> Result<&str, core::str::Utf8Error> {
    let trimmed = trim_trailing_spaces(bytes);
    core::str::from_utf8(trimmed)
}

/// Strip version suffix from filename (e.g., "FILE.TXT;1" -> "FILE.TXT")
/// Also removes trailing dot if present (e.g., "FILE.;1" -> "FILE")
pub fn strip_version(name: &str) -> &str {
    let base = name.split(';').next().unwrap_or(name);
    if let Some(stripped) = base.strip_suffix('.') {
        stripped
    } else {
        base
    }
}

/// Decode a file identifier into a display name, stripping the version
/// suffix; identifiers that are not clean UTF-8 fall back to a lossy
/// conversion.
pub fn identifier_to_name(bytes: &[u8]) -> String {
    match core::str::from_utf8(bytes) {
        Ok(s) => String::from(strip_version(s)),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}
