//! Session cache for editor/agent hooks.
//!
//! Each agent session owns a directory under the cache root holding an edit log, the set of
//! affected project areas and the build/type-check commands those areas need. One writer per
//! session at a time is enforced with a lock file; different sessions never share files.

mod area;
mod cache;
mod commands;
mod hook;
mod lock;
mod stop;

pub use area::{Area, classify};
pub use cache::{
    AFFECTED_AREAS_FILE, COMMANDS_FILE, DEFAULT_CACHE_DIR, DEFAULT_SESSION, EDITED_FILES_LOG,
    EditedFile, SessionCache, sanitize_session_id,
};
pub use commands::{PackageManager, build_command, tsc_command};
pub use hook::{HookInput, ToolInput, TrackOutcome, parse_hook_input, record_edit};
pub use lock::SessionLock;
pub use stop::{StopDecision, StopSettings, cleanup_sessions, decide, is_typescript_like};
