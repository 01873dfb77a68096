//! Domain logic: decide how a single diagnostic's source line should change.
//!
//! This crate owns *what* a fix looks like. Writing the result to disk is the job of
//! `tsfix-edit`, and sequencing a whole run belongs to `tsfix-core`.

mod dispatch;
mod fixers;
mod ports;
mod symbols;

pub use dispatch::{Dispatcher, LineChange, Proposal, split_lines};
pub use fixers::{FixInput, FixSafety, Fixer, FixerMeta, builtin_fixer_metas, find_fixer_meta};
pub use ports::{FsSourceView, InMemorySourceView, SourceView};
pub use symbols::indicates_unused;
