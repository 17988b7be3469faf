//! Mention parsing, resolution and rendering for journal free text.
//!
//! # Responsibility
//! - Scan free text for `@Name` mentions, `#tag` tokens and stable `@[id]`
//!   references (tokenizer pass).
//! - Resolve `@Name` candidates against a caller-supplied roster snapshot
//!   (longest-match pass) and rewrite them to stable form.
//! - Render stored stable form back to current display names.
//!
//! # Invariants
//! - Every function here is pure and synchronous; no shared state, safe to
//!   call from any number of threads.
//! - Unresolvable mentions are never an error; the literal text survives.
//! - Rendering is idempotent.
//!
//! # See also
//! - docs/architecture/mention-links.md

mod render;
mod resolve;
mod token;

pub use render::{render_mentions, render_segments, Segment};
pub use resolve::{annotate_mentions, parse_mentions, MentionScan};
