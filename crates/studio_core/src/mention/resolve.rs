//! Resolver pass: match `@` candidates against a roster snapshot.
//!
//! # Responsibility
//! - Resolve `@Name` candidates case-insensitively, preferring the longest
//!   roster name at each site.
//! - Collect mentioned entity ids and normalized tags in insertion order.
//! - Rewrite resolvable mentions into the stable `@[id]` persistence form.
//!
//! # Invariants
//! - Given the same text and roster, output is deterministic.
//! - Two roster entries with the same name resolve to the earlier entry;
//!   a documented limitation, not an error.
//! - Unmatched `@` text is left untouched.

use crate::mention::token::{scan_markers, MarkerKind};
use crate::model::roster::RosterEntry;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Result of scanning one journal text against a roster snapshot.
///
/// This is what callers persist alongside the raw text; the transient match
/// details are discarded after the call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionScan {
    /// Resolved entity ids, deduplicated, in first-seen order.
    pub mentioned_ids: Vec<String>,
    /// Lowercased tag words, deduplicated, in first-seen order.
    pub tags: Vec<String>,
}

/// Extracts mentioned entity ids and tags from free text.
///
/// Accepts both raw `@Name` text and already-annotated `@[id]` text, so a
/// re-parse of persisted content yields the same link set.
pub fn parse_mentions(text: &str, roster: &[RosterEntry]) -> MentionScan {
    let mut scan = MentionScan::default();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut seen_tags: HashSet<String> = HashSet::new();
    let mut consumed_until = 0usize;

    for marker in scan_markers(text) {
        // Markers swallowed by an earlier multi-word name match.
        if marker.offset < consumed_until {
            continue;
        }
        match marker.kind {
            MarkerKind::At => {
                let rest = &text[marker.offset + 1..];
                if let Some((len, entry)) = match_roster_name(rest, roster) {
                    consumed_until = marker.offset + 1 + len;
                    if seen_ids.insert(entry.id.clone()) {
                        scan.mentioned_ids.push(entry.id.clone());
                    }
                }
            }
            MarkerKind::StableRef { id, end } => {
                consumed_until = end;
                if seen_ids.insert(id.to_string()) {
                    scan.mentioned_ids.push(id.to_string());
                }
            }
            MarkerKind::Tag { word } => {
                let normalized = word.to_lowercase();
                if seen_tags.insert(normalized.clone()) {
                    scan.tags.push(normalized);
                }
            }
        }
    }

    scan
}

/// Rewrites resolvable `@Name` mentions into stable `@[id]` tokens.
///
/// Unmatched text and existing stable tokens pass through unchanged, so the
/// rewrite is idempotent and safe to run on mixed-form text.
pub fn annotate_mentions(text: &str, roster: &[RosterEntry]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied_until = 0usize;

    for marker in scan_markers(text) {
        if marker.offset < copied_until {
            continue;
        }
        if let MarkerKind::At = marker.kind {
            let rest = &text[marker.offset + 1..];
            if let Some((len, entry)) = match_roster_name(rest, roster) {
                out.push_str(&text[copied_until..marker.offset]);
                out.push_str("@[");
                out.push_str(&entry.id);
                out.push(']');
                copied_until = marker.offset + 1 + len;
            }
        }
    }

    out.push_str(&text[copied_until..]);
    out
}

/// Longest case-insensitive roster name matching a prefix of `rest`.
///
/// Returns the consumed byte length of `rest` and the winning entry. Ties
/// on length keep the earliest roster entry. The match must end at a word
/// boundary so a shorter name never bites into a longer word.
fn match_roster_name<'r>(
    rest: &str,
    roster: &'r [RosterEntry],
) -> Option<(usize, &'r RosterEntry)> {
    let mut best: Option<(usize, &RosterEntry)> = None;
    for entry in roster {
        let name = entry.name.trim();
        if name.is_empty() {
            continue;
        }
        let Some(len) = caseless_prefix_len(rest, name) else {
            continue;
        };
        if !ends_at_word_boundary(rest, len) {
            continue;
        }
        if best.is_none_or(|(best_len, _)| len > best_len) {
            best = Some((len, entry));
        }
    }
    best
}

/// Byte length of the prefix of `rest` matching `name` case-insensitively.
///
/// Comparison is per-character with full unicode case folding, so names
/// like "Müller Media" match "@müller media".
fn caseless_prefix_len(rest: &str, name: &str) -> Option<usize> {
    let mut rest_iter = rest.char_indices();
    for name_char in name.chars() {
        match rest_iter.next() {
            Some((_, rest_char)) if chars_eq_ignore_case(rest_char, name_char) => {}
            _ => return None,
        }
    }
    Some(rest_iter.next().map_or(rest.len(), |(idx, _)| idx))
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn ends_at_word_boundary(rest: &str, len: usize) -> bool {
    rest[len..].chars().next().is_none_or(|c| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::{annotate_mentions, parse_mentions};
    use crate::model::roster::{EntityKind, RosterEntry};

    fn roster() -> Vec<RosterEntry> {
        vec![
            RosterEntry::new("c_acme", "Acme", EntityKind::Client),
            RosterEntry::new("c_acme_corp", "Acme Corp", EntityKind::Client),
            RosterEntry::new("p_launch", "Launch Plan", EntityKind::Project),
        ]
    }

    #[test]
    fn empty_text_yields_empty_scan() {
        let scan = parse_mentions("", &roster());
        assert!(scan.mentioned_ids.is_empty());
        assert!(scan.tags.is_empty());
    }

    #[test]
    fn resolves_known_name_case_insensitively() {
        let scan = parse_mentions("call @acme tomorrow", &roster());
        assert_eq!(scan.mentioned_ids, vec!["c_acme".to_string()]);
    }

    #[test]
    fn longest_name_wins_over_shorter_prefix() {
        let scan = parse_mentions("met @Acme Corp onsite", &roster());
        assert_eq!(scan.mentioned_ids, vec!["c_acme_corp".to_string()]);
    }

    #[test]
    fn boundary_blocks_partial_word_match() {
        // "Acmeville" must not resolve to "Acme".
        let scan = parse_mentions("trip to @Acmeville", &roster());
        assert!(scan.mentioned_ids.is_empty());
    }

    #[test]
    fn duplicate_names_resolve_to_first_roster_entry() {
        let twins = vec![
            RosterEntry::new("first", "Nova", EntityKind::Client),
            RosterEntry::new("second", "Nova", EntityKind::Project),
        ];
        let scan = parse_mentions("sync with @Nova", &twins);
        assert_eq!(scan.mentioned_ids, vec!["first".to_string()]);
    }

    #[test]
    fn mention_ids_dedupe_in_first_seen_order() {
        let scan = parse_mentions("@Acme Corp then @Acme then @Acme Corp", &roster());
        assert_eq!(
            scan.mentioned_ids,
            vec!["c_acme_corp".to_string(), "c_acme".to_string()]
        );
    }

    #[test]
    fn tags_lowercase_and_dedupe_in_order() {
        let scan = parse_mentions("#Marketing #marketing #Q3", &[]);
        assert_eq!(scan.tags, vec!["marketing".to_string(), "q3".to_string()]);
    }

    #[test]
    fn unknown_mention_is_not_an_error() {
        let scan = parse_mentions("ping @Nobody about #followup", &roster());
        assert!(scan.mentioned_ids.is_empty());
        assert_eq!(scan.tags, vec!["followup".to_string()]);
    }

    #[test]
    fn stable_refs_in_persisted_text_are_collected() {
        let scan = parse_mentions("met @[c_acme] and @Launch Plan", &roster());
        assert_eq!(
            scan.mentioned_ids,
            vec!["c_acme".to_string(), "p_launch".to_string()]
        );
    }

    #[test]
    fn unicode_names_match_with_case_folding() {
        let entries = vec![RosterEntry::new("c_mueller", "Müller Media", EntityKind::Client)];
        let scan = parse_mentions("brief für @müller media heute", &entries);
        assert_eq!(scan.mentioned_ids, vec!["c_mueller".to_string()]);
    }

    #[test]
    fn blank_roster_names_are_skipped() {
        let entries = vec![RosterEntry::new("x", "   ", EntityKind::Client)];
        let scan = parse_mentions("hello @world", &entries);
        assert!(scan.mentioned_ids.is_empty());
    }

    #[test]
    fn annotate_rewrites_matches_to_stable_form() {
        let out = annotate_mentions("met @Acme Corp re #launch", &roster());
        assert_eq!(out, "met @[c_acme_corp] re #launch");
    }

    #[test]
    fn annotate_leaves_unmatched_text_untouched() {
        let out = annotate_mentions("ping @Nobody please", &roster());
        assert_eq!(out, "ping @Nobody please");
    }

    #[test]
    fn annotate_is_idempotent() {
        let once = annotate_mentions("met @Acme Corp", &roster());
        let twice = annotate_mentions(&once, &roster());
        assert_eq!(once, twice);
    }
}
