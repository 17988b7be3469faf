use std::collections::HashMap;
use studio_core::{
    annotate_mentions, parse_mentions, render_mentions, render_segments, EntityKind, RosterEntry,
    Segment,
};

fn roster() -> Vec<RosterEntry> {
    vec![
        RosterEntry::new("c_acme", "Acme", EntityKind::Client),
        RosterEntry::new("c_acme_corp", "Acme Corp", EntityKind::Client),
        RosterEntry::new("p_redesign", "Website Redesign", EntityKind::Project),
    ]
}

fn names() -> HashMap<String, String> {
    roster()
        .into_iter()
        .map(|entry| (entry.id, entry.name))
        .collect()
}

#[test]
fn text_without_markers_yields_empty_scan() {
    for text in ["", "plain status update", "meeting at 3pm, no links"] {
        let scan = parse_mentions(text, &roster());
        assert!(scan.mentioned_ids.is_empty(), "text: {text}");
        assert!(scan.tags.is_empty(), "text: {text}");
    }
}

#[test]
fn every_roster_name_resolves_when_mentioned() {
    for entry in roster() {
        let text = format!("hello @{}", entry.name);
        let scan = parse_mentions(&text, &roster());
        assert_eq!(scan.mentioned_ids, vec![entry.id.clone()], "name: {}", entry.name);
    }
}

#[test]
fn longest_match_takes_precedence_over_prefix() {
    let scan = parse_mentions("@Acme Corp kickoff", &roster());
    assert_eq!(scan.mentioned_ids, vec!["c_acme_corp".to_string()]);

    // The shorter name still resolves when the longer one does not apply.
    let scan = parse_mentions("@Acme kickoff", &roster());
    assert_eq!(scan.mentioned_ids, vec!["c_acme".to_string()]);
}

#[test]
fn tag_case_normalization_and_dedupe() {
    let scan = parse_mentions("#Marketing #marketing", &[]);
    assert_eq!(scan.tags, vec!["marketing".to_string()]);
}

#[test]
fn render_is_idempotent_over_any_stored_form() {
    let stored = [
        "met @[c_acme_corp] re @[p_redesign]",
        "unknown @[ghost_1] stays literal",
        "raw @Acme text with #tag",
        "",
    ];
    for text in stored {
        let once = render_mentions(text, &names());
        let twice = render_mentions(&once, &names());
        assert_eq!(once, twice, "text: {text}");
    }
}

#[test]
fn annotate_then_render_round_trips_display_text() {
    let raw = "kickoff with @Acme Corp on @Website Redesign #q3";
    let stable = annotate_mentions(raw, &roster());
    assert_eq!(stable, "kickoff with @[c_acme_corp] on @[p_redesign] #q3");
    assert_eq!(render_mentions(&stable, &names()), raw);
}

#[test]
fn segments_serialize_for_response_payloads() {
    let segments = render_segments("see @[c_acme]", &names());
    let json = serde_json::to_string(&segments).unwrap();
    assert!(json.contains("\"mention\""));
    let back: Vec<Segment> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, segments);
}

#[test]
fn parse_is_deterministic_for_same_inputs() {
    let text = "status @Acme Corp #Weekly #weekly @[p_redesign] @nobody";
    let first = parse_mentions(text, &roster());
    let second = parse_mentions(text, &roster());
    assert_eq!(first, second);
    assert_eq!(
        first.mentioned_ids,
        vec!["c_acme_corp".to_string(), "p_redesign".to_string()]
    );
    assert_eq!(first.tags, vec!["weekly".to_string()]);
}
