//! Display rendering of stored journal text.
//!
//! # Responsibility
//! - Substitute stable `@[id]` tokens with the *current* display name, so
//!   renamed clients/projects show correctly in historical entries without
//!   rewriting stored content.
//!
//! # Invariants
//! - Rendering is idempotent: rendered output contains no stable tokens
//!   for resolvable ids, so a second pass is a no-op.
//! - An unresolvable id (referent deleted) keeps its literal token; never
//!   an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static STABLE_REF_ANY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@\[([A-Za-z0-9_:.-]+)\]").expect("valid stable ref regex"));

/// One piece of rendered output, safe for structured display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum Segment {
    /// Literal text, including any unresolvable tokens.
    Text(String),
    /// A resolved mention carrying the id for link targets.
    Mention { id: String, name: String },
}

/// Splits stored text into literal and mention segments.
///
/// Callers that render links (rather than plain text) consume this form so
/// mention targets stay attached to their display names.
pub fn render_segments(text: &str, names: &HashMap<String, String>) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut copied_until = 0usize;

    for caps in STABLE_REF_ANY_RE.captures_iter(text) {
        let whole = caps.get(0).expect("regex match has group 0");
        let id = &caps[1];
        literal.push_str(&text[copied_until..whole.start()]);
        copied_until = whole.end();

        match names.get(id) {
            Some(name) => {
                if !literal.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Mention {
                    id: id.to_string(),
                    name: name.clone(),
                });
            }
            // Referent unknown: keep the literal token.
            None => literal.push_str(whole.as_str()),
        }
    }

    literal.push_str(&text[copied_until..]);
    if !literal.is_empty() {
        segments.push(Segment::Text(literal));
    }

    segments
}

/// Renders stored text to a plain display string.
///
/// Resolved mentions render as `@Name` using the current name from the map.
pub fn render_mentions(text: &str, names: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in render_segments(text, names) {
        match segment {
            Segment::Text(value) => out.push_str(&value),
            Segment::Mention { name, .. } => {
                out.push('@');
                out.push_str(&name);
            }
        }
    }
    out
}
