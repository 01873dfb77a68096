//! Checker output ingestion.
//!
//! The checker is run with `--pretty false`, so every error is a single line of the form
//! `<file>(<line>,<column>): error TS<code>: <message>`. Anything else in the combined
//! stdout/stderr stream (banners, summaries, blank lines) is ignored without complaint.

mod parse;

pub use parse::{Diagnostics, load_output, parse_all, parse_line, parse_output};
