//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `studio_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use studio_core::{parse_mentions, EntityKind, RosterEntry};

fn main() {
    println!("studio_core version={}", studio_core::core_version());

    let roster = [RosterEntry::new("c_demo", "Demo Client", EntityKind::Client)];
    let scan = parse_mentions("smoke check @Demo Client #ok", &roster);
    println!(
        "studio_core parse mentions={} tags={}",
        scan.mentioned_ids.len(),
        scan.tags.len()
    );
}
