//! Tokenizer pass: locate marker sites in free text.
//!
//! # Responsibility
//! - Find `@` mention candidates, `#tag` words and stable `@[id]` tokens.
//! - Delimit tag words and stable ids; leave `@Name` extents to the
//!   resolver pass, which needs the roster to decide them.
//!
//! # Invariants
//! - Marker offsets are byte offsets into the scanned text, strictly
//!   increasing.
//! - A marker inside a word is literal text, so e-mail addresses and
//!   anchors like `foo#bar` stay untouched.

use once_cell::sync::Lazy;
use regex::Regex;

/// Stable persisted reference token: `@[id]`.
static STABLE_REF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@\[([A-Za-z0-9_:.-]+)\]").expect("valid stable ref regex"));

/// One marker site found by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Marker<'a> {
    /// Byte offset of the `@`/`#` character.
    pub offset: usize,
    pub kind: MarkerKind<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkerKind<'a> {
    /// `@` followed by word text; extent decided by the resolver.
    At,
    /// `#` followed by a delimited tag word.
    Tag { word: &'a str },
    /// `@[id]` stable reference; `end` is the byte offset one past `]`.
    StableRef { id: &'a str, end: usize },
}

/// Returns true for characters that may appear in a tag word.
pub(crate) fn is_tag_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Scans text left-to-right for marker sites.
///
/// A bare trailing `@`/`#`, or one followed by whitespace/punctuation, is
/// not a marker.
pub(crate) fn scan_markers(text: &str) -> Vec<Marker<'_>> {
    let mut markers = Vec::new();
    let mut prev: Option<char> = None;

    let mut iter = text.char_indices().peekable();
    while let Some((offset, c)) = iter.next() {
        let at_word_start = prev.map_or(true, |p| !p.is_alphanumeric());
        match c {
            '@' if at_word_start => {
                let rest = &text[offset..];
                if let Some(caps) = STABLE_REF_RE.captures(rest) {
                    let whole = caps.get(0).expect("regex match has group 0");
                    let id = caps.get(1).expect("stable ref regex has one group");
                    markers.push(Marker {
                        offset,
                        kind: MarkerKind::StableRef {
                            id: id.as_str(),
                            end: offset + whole.end(),
                        },
                    });
                } else if iter.peek().is_some_and(|(_, next)| next.is_alphanumeric()) {
                    markers.push(Marker {
                        offset,
                        kind: MarkerKind::At,
                    });
                }
            }
            '#' if at_word_start => {
                let word_start = offset + c.len_utf8();
                let word = leading_tag_word(&text[word_start..]);
                if !word.is_empty() {
                    markers.push(Marker {
                        offset,
                        kind: MarkerKind::Tag { word },
                    });
                }
            }
            _ => {}
        }
        prev = Some(c);
    }

    markers
}

fn leading_tag_word(rest: &str) -> &str {
    let end = rest
        .char_indices()
        .find(|(_, c)| !is_tag_char(*c))
        .map_or(rest.len(), |(idx, _)| idx);
    &rest[..end]
}
