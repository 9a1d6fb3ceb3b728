//! Minimal HTML entity decoding for text and attribute values.
//!
//! Contract:
//! - Named entities are limited to a small fixed table (`&amp;`, `&lt;`,
//!   `&gt;`, `&quot;`, `&apos;`, `&nbsp;`).
//! - Numeric entities (`&#215;`, `&#xD7;`) decode only when semicolon
//!   terminated, within digit limits, and naming a valid scalar value.
//! - Anything else passes through unchanged, byte for byte.
//!
//! Intentionally not HTML5-complete; the narrow subset keeps behavior stable
//! under malformed input.

use memchr::memchr;

const NAMED: &[(&[u8], char)] = &[
    (b"amp;", '&'),
    (b"lt;", '<'),
    (b"gt;", '>'),
    (b"quot;", '"'),
    (b"apos;", '\''),
    (b"nbsp;", '\u{00A0}'),
];

// Large enough for 0x10FFFF in either base.
const MAX_DIGITS: usize = 7;

pub(crate) fn decode_entities(input: &str) -> String {
    let bytes = input.as_bytes();
    let Some(first) = memchr(b'&', bytes) else {
        return input.to_string();
    };

    let mut out = String::with_capacity(input.len());
    out.push_str(&input[..first]);
    let mut i = first;

    while i < bytes.len() {
        if bytes[i] != b'&' {
            let run_end = memchr(b'&', &bytes[i..]).map_or(bytes.len(), |rel| i + rel);
            out.push_str(&input[i..run_end]);
            i = run_end;
            continue;
        }

        if let Some(consumed) = decode_one(&mut out, input, i) {
            i += consumed;
        } else {
            out.push('&');
            i += 1;
        }
    }

    out
}

/// Decodes the entity starting at `input[at]` (which is `&`), appending the
/// replacement to `out`. Returns the byte length consumed, or `None` when the
/// sequence is not a recognized entity.
fn decode_one(out: &mut String, input: &str, at: usize) -> Option<usize> {
    let rest = &input.as_bytes()[at + 1..];

    for (name, ch) in NAMED {
        if rest.len() >= name.len() && rest[..name.len()].eq_ignore_ascii_case(name) {
            out.push(*ch);
            return Some(1 + name.len());
        }
    }

    if rest.first() != Some(&b'#') {
        return None;
    }
    let hex = matches!(rest.get(1), Some(b'x' | b'X'));
    let digits_at = if hex { 2 } else { 1 };
    let mut len = 0;
    while len < MAX_DIGITS {
        match rest.get(digits_at + len) {
            Some(b) if (hex && b.is_ascii_hexdigit()) || (!hex && b.is_ascii_digit()) => len += 1,
            _ => break,
        }
    }
    if len == 0 || rest.get(digits_at + len) != Some(&b';') {
        return None;
    }

    let digits = &input[at + 1 + digits_at..at + 1 + digits_at + len];
    let radix = if hex { 16 } else { 10 };
    let ch = u32::from_str_radix(digits, radix).ok().and_then(char::from_u32)?;
    out.push(ch);
    Some(1 + digits_at + len + 1)
}
