//! Effective-form merge of global definitions and client overrides.
//!
//! # Responsibility
//! - Compute effective enabled/sort_order/label values (override field wins
//!   when present, global value otherwise).
//! - Impose a stable total order on the output.
//!
//! # Invariants
//! - A disabled section drops all of its questions, regardless of
//!   question-level overrides.
//! - An override referencing an unknown target is ignored; one bad row must
//!   not break the whole form for a client.
//! - Duplicate override rows for one target: the first row wins.

use crate::model::questionnaire::{
    OverridePatch, QuestionDef, QuestionOverride, ResolvedQuestion, ResolvedSection, SectionDef,
    SectionOverride,
};
use log::warn;
use std::collections::HashMap;

/// Resolves the effective ordered section list for one client.
///
/// Sections whose effective `enabled` is false are dropped. Output is
/// sorted ascending by effective sort order, ties broken by section id, so
/// the order is total and deterministic.
pub fn resolve_sections(
    global: &[SectionDef],
    overrides: &[SectionOverride],
) -> Vec<ResolvedSection> {
    let patches = index_patches(
        overrides.iter().map(|o| (o.section_id.as_str(), &o.patch)),
        global.iter().map(|s| s.id.as_str()),
        "section",
    );

    let mut resolved: Vec<ResolvedSection> = global
        .iter()
        .filter_map(|section| {
            let patch = patches.get(section.id.as_str()).copied();
            let enabled = patch
                .and_then(|p| p.enabled)
                .unwrap_or(section.enabled);
            if !enabled {
                return None;
            }
            Some(ResolvedSection {
                id: section.id.clone(),
                title: patch
                    .and_then(|p| p.label.clone())
                    .unwrap_or_else(|| section.title.clone()),
                sort_order: patch
                    .and_then(|p| p.sort_order)
                    .unwrap_or(section.sort_order),
            })
        })
        .collect();

    resolved.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.id.cmp(&b.id))
    });
    resolved
}

/// Resolves the effective ordered question list for one client.
///
/// `sections` is the output of [`resolve_sections`]: it carries both the
/// enabled set and the section order, so questions come out grouped by
/// section order, then question order within section (ties by question id).
/// A question whose parent section is absent is dropped; section
/// disablement dominates question-level overrides.
pub fn resolve_questions(
    global: &[QuestionDef],
    overrides: &[QuestionOverride],
    sections: &[ResolvedSection],
) -> Vec<ResolvedQuestion> {
    let patches = index_patches(
        overrides.iter().map(|o| (o.question_id.as_str(), &o.patch)),
        global.iter().map(|q| q.id.as_str()),
        "question",
    );
    let section_rank: HashMap<&str, usize> = sections
        .iter()
        .enumerate()
        .map(|(rank, section)| (section.id.as_str(), rank))
        .collect();

    let mut resolved: Vec<(usize, ResolvedQuestion)> = global
        .iter()
        .filter_map(|question| {
            let rank = *section_rank.get(question.section_id.as_str())?;
            let patch = patches.get(question.id.as_str()).copied();
            let enabled = patch
                .and_then(|p| p.enabled)
                .unwrap_or(question.enabled);
            if !enabled {
                return None;
            }
            Some((
                rank,
                ResolvedQuestion {
                    id: question.id.clone(),
                    section_id: question.section_id.clone(),
                    prompt: patch
                        .and_then(|p| p.label.clone())
                        .unwrap_or_else(|| question.prompt.clone()),
                    sort_order: patch
                        .and_then(|p| p.sort_order)
                        .unwrap_or(question.sort_order),
                },
            ))
        })
        .collect();

    resolved.sort_by(|(rank_a, a), (rank_b, b)| {
        rank_a
            .cmp(rank_b)
            .then_with(|| a.sort_order.cmp(&b.sort_order))
            .then_with(|| a.id.cmp(&b.id))
    });
    resolved.into_iter().map(|(_, question)| question).collect()
}

/// Indexes override patches by target id, first row wins.
///
/// Rows referencing ids outside `known` are dropped with a warning.
fn index_patches<'a>(
    rows: impl Iterator<Item = (&'a str, &'a OverridePatch)>,
    known: impl Iterator<Item = &'a str>,
    target_kind: &str,
) -> HashMap<&'a str, &'a OverridePatch> {
    let known: std::collections::HashSet<&str> = known.collect();
    let mut patches: HashMap<&str, &OverridePatch> = HashMap::new();
    for (target_id, patch) in rows {
        if !known.contains(target_id) {
            warn!(
                "event=override_ignored module=questionnaire status=skip target_kind={target_kind} target_id={target_id} reason=unknown_target"
            );
            continue;
        }
        patches.entry(target_id).or_insert(patch);
    }
    patches
}
