//! Simplified HTML tokenizer with a constrained, practical tag-name character set.
//!
//! Supported tag/attribute name characters (ASCII only): `[A-Za-z0-9:_-]`.
//! A `<` not followed by a letter, `/`, `!--`, or `!doctype` is literal text.
//!
//! Known limitations (intentional):
//! - Not a full HTML5 state machine; no spec parse-error recovery.
//! - Only `<script>` and `<style>` get rawtext treatment; other CDATA-like
//!   constructs tokenize as text.
//! - Rawtext close-tag scanning accepts only ASCII whitespace before `>`.
//!
//! TODO(dom/tokenizer): RCDATA handling for `<textarea>` and `<title>` so
//! markup-looking text inside them is kept verbatim.

use crate::entities::decode_entities;
use memchr::memchr;

#[derive(Debug, PartialEq)]
pub(crate) enum Token {
    Doctype(String),
    StartTag {
        name: String,
        attributes: Vec<(String, Option<String>)>,
        self_closing: bool,
    },
    EndTag(String),
    Comment(String),
    Text(String),
}

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

pub(crate) fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_rawtext_element(name: &str) -> bool {
    matches!(name, "script" | "style")
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

pub(crate) fn starts_with_ignore_ascii_case_at(haystack: &[u8], at: usize, needle: &[u8]) -> bool {
    haystack
        .get(at..at + needle.len())
        .is_some_and(|slice| slice.eq_ignore_ascii_case(needle))
}

/// Finds `</name ... >` in `haystack`, returning the index where the close tag
/// starts and the index just past its `>`.
fn find_close_tag(haystack: &str, name: &str) -> Option<(usize, usize)> {
    let bytes = haystack.as_bytes();
    debug_assert!(name.bytes().all(|b| b.is_ascii_lowercase()));
    let mut i = 0;
    while let Some(rel) = memchr(b'<', &bytes[i..]) {
        let at = i + rel;
        if bytes.get(at + 1) == Some(&b'/')
            && starts_with_ignore_ascii_case_at(bytes, at + 2, name.as_bytes())
        {
            let mut k = at + 2 + name.len();
            while k < bytes.len() && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < bytes.len() && bytes[k] == b'>' {
                return Some((at, k + 1));
            }
        }
        i = at + 1;
    }
    None
}

pub(crate) fn tokenize(input: &str) -> Vec<Token> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;

    // Invariant: slices are cut only at ASCII structural bytes or positions
    // reached by scanning ASCII tokens, so endpoints stay UTF-8 boundaries.
    while i < bytes.len() {
        if bytes[i] != b'<' || !tag_opens_at(bytes, i) {
            let scan_from = i + usize::from(bytes[i] == b'<');
            let end = memchr(b'<', &bytes[scan_from..])
                .map(|rel| {
                    let mut at = scan_from + rel;
                    while at < bytes.len() && bytes[at] == b'<' && !tag_opens_at(bytes, at) {
                        at = match memchr(b'<', &bytes[at + 1..]) {
                            Some(next) => at + 1 + next,
                            None => bytes.len(),
                        };
                    }
                    at
                })
                .unwrap_or(bytes.len());
            debug_assert!(input.is_char_boundary(i) && input.is_char_boundary(end));
            let decoded = decode_entities(&input[i..end]);
            if !decoded.is_empty() {
                out.push(Token::Text(decoded));
            }
            i = end;
            continue;
        }

        if input[i..].starts_with(COMMENT_START) {
            let body_start = i + COMMENT_START.len();
            match input[body_start..].find(COMMENT_END) {
                Some(rel) => {
                    out.push(Token::Comment(input[body_start..body_start + rel].to_string()));
                    i = body_start + rel + COMMENT_END.len();
                }
                None => {
                    out.push(Token::Comment(input[body_start..].to_string()));
                    i = bytes.len();
                }
            }
            continue;
        }

        if starts_with_ignore_ascii_case_at(bytes, i, b"<!doctype") {
            let rest = &input[i + 2..];
            let Some(end) = rest.find('>') else {
                break;
            };
            out.push(Token::Doctype(rest[..end].trim().to_string()));
            i += 2 + end + 1;
            continue;
        }

        if bytes[i + 1] == b'/' {
            let name_start = i + 2;
            let mut j = name_start;
            while j < bytes.len() && is_name_byte(bytes[j]) {
                j += 1;
            }
            let name = input[name_start..j].to_ascii_lowercase();
            while j < bytes.len() && bytes[j] != b'>' {
                j += 1;
            }
            out.push(Token::EndTag(name));
            i = (j + 1).min(bytes.len());
            continue;
        }

        let (token, next) = scan_start_tag(input, i);
        let rawtext = match &token {
            Token::StartTag {
                name, self_closing, ..
            } if !self_closing && is_rawtext_element(name) => Some(name.clone()),
            _ => None,
        };
        out.push(token);
        i = next;

        if let Some(name) = rawtext {
            match find_close_tag(&input[i..], &name) {
                Some((content_end, resume)) => {
                    if content_end > 0 {
                        out.push(Token::Text(input[i..i + content_end].to_string()));
                    }
                    out.push(Token::EndTag(name));
                    i += resume;
                }
                None => {
                    if i < bytes.len() {
                        out.push(Token::Text(input[i..].to_string()));
                    }
                    i = bytes.len();
                }
            }
        }
    }

    out
}

/// True when the `<` at `at` begins markup we recognize rather than text.
fn tag_opens_at(bytes: &[u8], at: usize) -> bool {
    debug_assert_eq!(bytes[at], b'<');
    match bytes.get(at + 1) {
        Some(b) if b.is_ascii_alphabetic() => true,
        Some(b'/') => true,
        Some(b'!') => {
            starts_with_ignore_ascii_case_at(bytes, at, b"<!--")
                || starts_with_ignore_ascii_case_at(bytes, at, b"<!doctype")
        }
        _ => false,
    }
}

fn scan_start_tag(input: &str, at: usize) -> (Token, usize) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let name_start = at + 1;
    let mut j = name_start;
    while j < len && is_name_byte(bytes[j]) {
        j += 1;
    }
    debug_assert!(input.is_char_boundary(name_start) && input.is_char_boundary(j));
    let name = input[name_start..j].to_ascii_lowercase();

    let mut attributes: Vec<(String, Option<String>)> = Vec::new();
    let mut self_closing = false;
    let mut k = j;

    loop {
        while k < len && bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        if k >= len {
            break;
        }
        if bytes[k] == b'>' {
            k += 1;
            break;
        }
        if bytes[k] == b'/' {
            if k + 1 < len && bytes[k + 1] == b'>' {
                self_closing = true;
                k += 2;
                break;
            }
            k += 1;
            continue;
        }

        let attr_start = k;
        while k < len && is_name_byte(bytes[k]) {
            k += 1;
        }
        if attr_start == k {
            // Not a name byte and not tag punctuation; skip it.
            k += 1;
            continue;
        }
        let attr_name = input[attr_start..k].to_ascii_lowercase();

        while k < len && bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        let value = if k < len && bytes[k] == b'=' {
            k += 1;
            while k < len && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                let quote = bytes[k];
                k += 1;
                let value_start = k;
                while k < len && bytes[k] != quote {
                    k += 1;
                }
                debug_assert!(input.is_char_boundary(value_start) && input.is_char_boundary(k));
                let raw = &input[value_start..k];
                if k < len {
                    k += 1;
                }
                Some(decode_entities(raw))
            } else {
                let value_start = k;
                while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                    k += 1;
                }
                Some(decode_entities(&input[value_start..k]))
            }
        } else {
            None
        };
        attributes.push((attr_name, value));
    }

    (
        Token::StartTag {
            name,
            attributes,
            self_closing,
        },
        k,
    )
}
