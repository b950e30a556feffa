//! Small shared helpers: text decoding, escaping, identifiers.

use std::borrow::Cow;

/// Get a time-based seed value for pseudo-random number generation.
pub fn time_seed_nanos() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(12345)
}

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from `<?xml encoding="..."?>`
///    or a `<meta charset>` declaration)
/// 3. Falls back to Windows-1252 (common in old wiki dumps)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract the encoding name from an XML declaration or a `<meta charset>`.
///
/// Only the first 1024 bytes are checked.
pub fn extract_encoding_hint(bytes: &[u8]) -> Option<&str> {
    let check_len = bytes.len().min(1024);
    let prefix = &bytes[..check_len];

    find_quoted_after(prefix, b"encoding=").or_else(|| find_unquoted_charset(prefix))
}

fn find_quoted_after<'a>(prefix: &'a [u8], key: &[u8]) -> Option<&'a str> {
    let pos = prefix
        .windows(key.len())
        .position(|w| w.eq_ignore_ascii_case(key))?;
    let after = &prefix[pos + key.len()..];

    let quote = *after.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }

    let value_end = after[1..].iter().position(|&b| b == quote)? + 1;
    std::str::from_utf8(&after[1..value_end]).ok()
}

fn find_unquoted_charset(prefix: &[u8]) -> Option<&str> {
    const KEY: &[u8] = b"charset=";
    let pos = prefix
        .windows(KEY.len())
        .position(|w| w.eq_ignore_ascii_case(KEY))?;
    let after = &prefix[pos + KEY.len()..];
    let after = after.strip_prefix(b"\"").unwrap_or(after);
    let after = after.strip_prefix(b"'").unwrap_or(after);

    let end = after
        .iter()
        .position(|&b| !(b.is_ascii_alphanumeric() || b == b'-' || b == b'_'))
        .unwrap_or(after.len());
    if end == 0 {
        return None;
    }
    std::str::from_utf8(&after[..end]).ok()
}

/// Escape text for inclusion in XML content or attribute values.
///
/// Characters XML 1.0 does not allow (most C0 controls, U+FFFE, U+FFFF)
/// are dropped.
pub fn escape_xml(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            c if !is_xml_char(c) => {}
            _ => result.push(c),
        }
    }
    result
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Generate a simple UUID v4 (random, not cryptographically secure).
pub fn uuid_v4() -> String {
    let mut state = time_seed_nanos();
    let mut bytes = [0u8; 16];
    for byte in &mut bytes {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        *byte = (state >> 33) as u8;
    }

    // Set version (4) and variant (2)
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}
