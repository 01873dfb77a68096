//! Post-edit tracker: records which files an agent touched and what should be rebuilt.

use crate::area::{Area, classify};
use crate::cache::{AFFECTED_AREAS_FILE, COMMANDS_FILE, DEFAULT_SESSION, SessionCache};
use crate::commands::{build_command, tsc_command};
use crate::lock::SessionLock;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use tracing::debug;

const TRACKED_TOOLS: &[&str] = &["Edit", "MultiEdit", "Write"];

/// Payload the agent sends on stdin after a tool call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: ToolInput,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub file_path: Option<Utf8PathBuf>,
}

pub fn parse_hook_input(text: &str) -> anyhow::Result<HookInput> {
    serde_json::from_str(text).context("parse hook input")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    Ignored(&'static str),
    Recorded {
        session: String,
        area: Area,
        commands: Vec<String>,
    },
}

fn is_markdown(path: &Utf8Path) -> bool {
    matches!(
        path.extension().map(str::to_ascii_lowercase).as_deref(),
        Some("md" | "markdown")
    )
}

/// Record one tool call in its session cache.
pub fn record_edit(
    project_dir: &Utf8Path,
    cache_root: &Utf8Path,
    input: &HookInput,
    timestamp_ms: i64,
) -> anyhow::Result<TrackOutcome> {
    if !TRACKED_TOOLS.contains(&input.tool_name.as_str()) {
        return Ok(TrackOutcome::Ignored("tool does not edit files"));
    }
    let Some(file) = input.tool_input.file_path.as_deref() else {
        return Ok(TrackOutcome::Ignored("no file path"));
    };
    if is_markdown(file) {
        return Ok(TrackOutcome::Ignored("markdown file"));
    }
    let Some(area) = classify(project_dir, file) else {
        return Ok(TrackOutcome::Ignored("file outside project"));
    };

    let session = SessionCache::open(
        cache_root,
        input.session_id.as_deref().unwrap_or(DEFAULT_SESSION),
    );
    let dir = session.ensure_dir()?;
    let _lock = SessionLock::acquire(&dir)?;

    session.append_edit(timestamp_ms, &input.tool_name, file)?;
    session.merge_lines(AFFECTED_AREAS_FILE, &[area.as_str().to_string()])?;

    let mut commands = Vec::new();
    if let Some(cmd) = build_command(project_dir, area) {
        commands.push(format!("{area}:build:{cmd}"));
    }
    if let Some(cmd) = tsc_command(project_dir, area) {
        commands.push(format!("{area}:tsc:{cmd}"));
    }
    session.merge_lines(COMMANDS_FILE, &commands)?;

    debug!(session = session.id(), %area, file = %file, "edit recorded");
    Ok(TrackOutcome::Recorded {
        session: session.id().to_string(),
        area,
        commands,
    })
}
