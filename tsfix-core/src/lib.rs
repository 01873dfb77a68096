//! Embeddable core library for tsfix.
//!
//! Provides a clap-free entry point for one resolve-and-verify cycle.
//!
//! # Port traits
//!
//! I/O is abstracted behind traits in [`ports`]:
//! - [`Checker`](ports::Checker): run the type-checker and hand back its text output
//! - [`WritePort`](ports::WritePort): write session artifacts
//!
//! Source files are read through the domain's [`SourceView`] and rewritten by `tsfix-edit`.
//! The [`adapters`] module provides process- and filesystem-backed implementations plus
//! scripted ones for tests.
//!
//! # Entry points
//!
//! - [`run_resolve`](pipeline::run_resolve): check, fix, re-check
//! - [`write_resolve_artifacts`](pipeline::write_resolve_artifacts): dump output and summaries

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

pub use pipeline::{ResolveOutcome, ToolError, run_resolve, write_resolve_artifacts};
pub use tsfix_domain::{FsSourceView, InMemorySourceView, SourceView};
