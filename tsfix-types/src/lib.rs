//! Shared DTOs for the tsfix workspace.
//!
//! # Design constraints
//! - Run summaries are serialized into the session cache and onto stdout.
//! - Prefer adding optional fields over changing semantics.

pub mod diagnostic;
pub mod fix;
pub mod run;

/// Schema identifiers.
pub mod schema {
    pub const TSFIX_RUN_V1: &str = "tsfix.run.v1";
}

/// Sentinel written in place of `fixed_line` when a fix removed the whole line.
pub const LINE_REMOVED: &str = "[LINE REMOVED]";
