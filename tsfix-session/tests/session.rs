use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use pretty_assertions::assert_eq;
use tsfix_session::{
    AFFECTED_AREAS_FILE, Area, HookInput, SessionCache, SessionLock, StopDecision, StopSettings,
    ToolInput,
    TrackOutcome, cleanup_sessions, decide, parse_hook_input, record_edit, sanitize_session_id,
};

struct Project {
    _tmp: tempfile::TempDir,
    root: Utf8PathBuf,
    cache: Utf8PathBuf,
}

fn project() -> Project {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8");
    fs::write(
        root.join("package.json"),
        r#"{"scripts":{"build":"vite build","build-only":"vite build","type-check":"vue-tsc"}}"#,
    )
    .expect("package.json");
    fs::write(root.join("pnpm-lock.yaml"), "").expect("lockfile");
    fs::write(root.join("tsconfig.json"), "{}").expect("tsconfig");
    fs::write(root.join("tsconfig.app.json"), "{}").expect("tsconfig.app");
    let cache = root.join(".tsfix/cache");
    Project {
        _tmp: tmp,
        root,
        cache,
    }
}

fn edit(tool: &str, path: &Utf8Path, session: Option<&str>) -> HookInput {
    HookInput {
        tool_name: tool.to_string(),
        tool_input: ToolInput {
            file_path: Some(path.to_path_buf()),
        },
        session_id: session.map(str::to_string),
    }
}

#[test]
fn hook_input_parses_agent_payload() {
    let input = parse_hook_input(
        r#"{"tool_name":"MultiEdit","tool_input":{"file_path":"/p/src/a.ts","edits":[]},"session_id":"s1"}"#,
    )
    .expect("parse");
    assert_eq!(input.tool_name, "MultiEdit");
    assert_eq!(input.tool_input.file_path.as_deref(), Some(Utf8Path::new("/p/src/a.ts")));
    assert_eq!(input.session_id.as_deref(), Some("s1"));

    let bare = parse_hook_input("{}").expect("parse empty object");
    assert!(bare.tool_input.file_path.is_none());
    assert!(parse_hook_input("not json").is_err());
}

#[test]
fn tracked_edit_writes_log_areas_and_commands() {
    let p = project();
    let file = p.root.join("src/views/UserList.vue");

    let outcome = record_edit(&p.root, &p.cache, &edit("Edit", &file, Some("s1")), 1000)
        .expect("record");
    assert_eq!(
        outcome,
        TrackOutcome::Recorded {
            session: "s1".to_string(),
            area: Area::Source,
            commands: vec![
                "source:build:pnpm run build-only".to_string(),
                "source:tsc:pnpm exec vue-tsc --project tsconfig.app.json --noEmit".to_string(),
            ],
        }
    );

    record_edit(&p.root, &p.cache, &edit("Write", &file, Some("s1")), 2000).expect("record");
    record_edit(
        &p.root,
        &p.cache,
        &edit("Edit", &p.root.join("vite.config.ts"), Some("s1")),
        3000,
    )
    .expect("record");

    let session = SessionCache::open(&p.cache, "s1");
    let edited = session.edited_files().expect("log");
    assert_eq!(edited.len(), 3);
    assert_eq!(edited[1].tool, "Write");
    assert_eq!(edited[1].timestamp_ms, 2000);
    assert_eq!(
        session.affected_areas().expect("areas"),
        vec!["source".to_string(), "config".to_string()]
    );
    assert_eq!(
        session.commands().expect("commands"),
        vec![
            "source:build:pnpm run build-only".to_string(),
            "source:tsc:pnpm exec vue-tsc --project tsconfig.app.json --noEmit".to_string(),
            "config:build:pnpm run type-check".to_string(),
            "config:tsc:pnpm exec vue-tsc --project tsconfig.app.json --noEmit".to_string(),
        ]
    );
    assert!(!session.dir().join(".lock").exists());
}

#[test]
fn untracked_calls_leave_no_trace() {
    let p = project();
    let cases = [
        edit("Read", &p.root.join("src/a.ts"), None),
        edit("Edit", &p.root.join("README.md"), None),
        edit("Edit", Utf8Path::new("/somewhere/else/a.ts"), None),
        HookInput {
            tool_name: "Edit".to_string(),
            ..HookInput::default()
        },
    ];
    for input in &cases {
        let outcome = record_edit(&p.root, &p.cache, input, 1).expect("record");
        assert!(matches!(outcome, TrackOutcome::Ignored(_)), "{outcome:?}");
    }
    assert!(!p.cache.exists());
}

#[test]
fn sessions_are_isolated_and_default_when_missing() {
    let p = project();
    let file = p.root.join("src/a.ts");
    record_edit(&p.root, &p.cache, &edit("Edit", &file, Some("a")), 1).expect("a");
    record_edit(&p.root, &p.cache, &edit("Edit", &file, None), 2).expect("default");

    assert_eq!(SessionCache::open(&p.cache, "a").edited_files().expect("a").len(), 1);
    assert_eq!(
        SessionCache::open(&p.cache, "default")
            .edited_files()
            .expect("default")
            .len(),
        1
    );
    assert!(
        fs::read_to_string(p.cache.join("a").join(AFFECTED_AREAS_FILE))
            .expect("areas")
            .contains("source")
    );
}

#[test]
fn latest_falls_back_to_default() {
    let p = project();
    let latest = SessionCache::latest(&p.cache).expect("latest");
    assert_eq!(latest.id(), "default");

    fs::create_dir_all(p.cache.join("only")).expect("mkdir");
    assert_eq!(SessionCache::latest(&p.cache).expect("latest").id(), "only");
}

#[test]
fn stop_runs_only_for_typescript_changes() {
    let p = project();
    let settings = StopSettings {
        exclude: vec!["src/generated/**".to_string()],
        ..StopSettings::default()
    };
    let session = SessionCache::open(&p.cache, "s");

    assert_eq!(
        decide(&session, &p.root, &settings).expect("decide"),
        StopDecision::Skip("no modified files")
    );

    record_edit(&p.root, &p.cache, &edit("Edit", &p.root.join("src/app.css"), Some("s")), 1)
        .expect("css");
    record_edit(
        &p.root,
        &p.cache,
        &edit("Edit", &p.root.join("src/generated/api.ts"), Some("s")),
        2,
    )
    .expect("generated");
    assert_eq!(
        decide(&session, &p.root, &settings).expect("decide"),
        StopDecision::Skip("no TypeScript changes")
    );

    let vue = p.root.join("src/views/UserList.vue");
    record_edit(&p.root, &p.cache, &edit("Edit", &vue, Some("s")), 3).expect("vue");
    record_edit(&p.root, &p.cache, &edit("Edit", &vue, Some("s")), 4).expect("vue again");
    assert_eq!(
        decide(&session, &p.root, &settings).expect("decide"),
        StopDecision::Run { files: vec![vue] }
    );

    let disabled = StopSettings {
        enabled: false,
        ..StopSettings::default()
    };
    assert_eq!(
        decide(&session, &p.root, &disabled).expect("decide"),
        StopDecision::Skip("auto-fix disabled")
    );
}

#[cfg(unix)]
#[test]
fn cleanup_keeps_newest_sessions() {
    use std::fs::{File, FileTimes};
    use std::time::{Duration, SystemTime};

    let p = project();
    let base = SystemTime::now() - Duration::from_secs(3600);
    for (i, name) in ["s1", "s2", "s3", "s4", "s5"].iter().enumerate() {
        let dir = p.cache.join(name);
        fs::create_dir_all(&dir).expect("mkdir");
        let when = base + Duration::from_secs(60 * i as u64);
        File::open(&dir)
            .expect("open dir")
            .set_times(FileTimes::new().set_modified(when))
            .expect("set mtime");
    }
    fs::write(p.cache.join("stray.txt"), "x").expect("stray file");

    assert_eq!(SessionCache::latest(&p.cache).expect("latest").id(), "s5");

    let mut removed = cleanup_sessions(&p.cache, 3).expect("cleanup");
    removed.sort();
    assert_eq!(removed, vec!["s1".to_string(), "s2".to_string()]);
    for kept in ["s3", "s4", "s5"] {
        assert!(p.cache.join(kept).is_dir());
    }
    assert!(p.cache.join("stray.txt").is_file());
    assert!(cleanup_sessions(&p.root.join("missing"), 3).expect("missing").is_empty());
}

#[cfg(unix)]
#[test]
fn cleanup_leaves_sessions_that_are_locked() {
    use std::fs::{File, FileTimes};
    use std::time::{Duration, SystemTime};

    let p = project();
    fs::create_dir_all(p.cache.join("s1")).expect("mkdir");
    let held = SessionLock::acquire(&p.cache.join("s1")).expect("lock s1");

    let base = SystemTime::now() - Duration::from_secs(3600);
    for (i, name) in ["s1", "s2", "s3", "s4"].iter().enumerate() {
        let dir = p.cache.join(name);
        fs::create_dir_all(&dir).expect("mkdir");
        let when = base + Duration::from_secs(60 * i as u64);
        File::open(&dir)
            .expect("open dir")
            .set_times(FileTimes::new().set_modified(when))
            .expect("set mtime");
    }

    let removed = cleanup_sessions(&p.cache, 2).expect("cleanup");
    assert_eq!(removed, vec!["s2".to_string()]);
    assert!(p.cache.join("s1").is_dir());
    assert!(held.path().is_file());

    drop(held);
    // Releasing the lock touched the directory; make it the oldest again.
    File::open(p.cache.join("s1"))
        .expect("open dir")
        .set_times(FileTimes::new().set_modified(base))
        .expect("set mtime");
    let removed = cleanup_sessions(&p.cache, 2).expect("cleanup");
    assert_eq!(removed, vec!["s1".to_string()]);
}

proptest::proptest! {
    #[test]
    fn sanitized_session_id_is_a_single_safe_component(raw in "\\PC{0,40}") {
        let id = sanitize_session_id(&raw);
        proptest::prop_assert!(!id.is_empty());
        proptest::prop_assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')));
        proptest::prop_assert!(!id.chars().all(|c| c == '.'));
    }
}
