mod config;
mod explain;

use anyhow::{Context, anyhow};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use chrono::{Local, Utc};
use clap::{Args, Parser, Subcommand};
use config::{CliOverrides, ConfigMerger, MergedConfig, load_or_default};
use std::io::{Read, Write};
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use tsfix_core::adapters::{FsWritePort, ProcessChecker};
use tsfix_core::{FsSourceView, ResolveOutcome, ToolError, run_resolve, write_resolve_artifacts};
use tsfix_diagnostics::{load_output, parse_all};
use tsfix_domain::{builtin_fixer_metas, find_fixer_meta};
use tsfix_render::{SessionReport, render_run_text, render_session_report};
use tsfix_session::{
    DEFAULT_SESSION, SessionCache, SessionLock, StopDecision, TrackOutcome, cleanup_sessions,
    decide, parse_hook_input, record_edit,
};

#[derive(Debug, Parser)]
#[command(
    name = "tsfix",
    version,
    about = "Diagnostic-driven auto-fixer for TypeScript and Vue projects."
)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the type-checker, fix what can be fixed, and run it again.
    Resolve(ResolveArgs),
    /// Parse checker output (file or stdin) into JSON lines.
    Parse(ParseArgs),
    /// Post-edit hook: record the edited file from the JSON payload on stdin.
    Track(TrackArgs),
    /// Stop hook: resolve when the latest session edited TypeScript sources.
    Stop(StopArgs),
    /// Explain what a fix does and how safe it is.
    Explain(ExplainArgs),
    /// List all available fixes with their safety classifications.
    ListFixes(ListFixesArgs),
}

#[derive(Debug, Args)]
struct ProjectArgs {
    /// Project root (default: current directory).
    #[arg(long, default_value = ".")]
    project_dir: Utf8PathBuf,

    /// Session cache root (default: `[session] cache_dir`, else <project>/.tsfix/cache).
    #[arg(long)]
    cache_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Args)]
struct CheckerArgs {
    /// Checker program (default: npx vue-tsc).
    #[arg(long)]
    checker: Option<String>,

    /// Argument for the checker program; repeat for several.
    #[arg(long = "checker-arg", allow_hyphen_values = true)]
    checker_args: Vec<String>,

    /// Seconds before the checker is killed.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Parser)]
struct ResolveArgs {
    #[command(flatten)]
    project: ProjectArgs,

    #[command(flatten)]
    checker: CheckerArgs,

    /// Show what would change without touching sources.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Glob (relative to the project) whose diagnostics are never fixed.
    #[arg(long)]
    exclude: Vec<String>,

    /// Diagnostic code that is reported but never fixed (e.g. TS2451).
    #[arg(long = "disable")]
    disabled_codes: Vec<String>,

    /// Session directory that receives the run artifacts.
    #[arg(long)]
    session: Option<String>,

    /// Do not write run artifacts.
    #[arg(long, default_value_t = false)]
    no_artifacts: bool,
}

#[derive(Debug, Parser)]
struct ParseArgs {
    /// Checker output file; `-` or absent reads stdin.
    input: Option<Utf8PathBuf>,

    /// Directory checker paths are relative to.
    #[arg(long, default_value = ".")]
    project_dir: Utf8PathBuf,
}

#[derive(Debug, Parser)]
struct TrackArgs {
    #[command(flatten)]
    project: ProjectArgs,
}

#[derive(Debug, Parser)]
struct StopArgs {
    #[command(flatten)]
    project: ProjectArgs,

    #[command(flatten)]
    checker: CheckerArgs,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Fix key or diagnostic code (e.g. "unused-import", "TS6133").
    fix_key: String,
}

#[derive(Debug, Parser)]
struct ListFixesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

/// `Ok(false)` means the command ran but did not succeed.
fn real_main() -> anyhow::Result<bool> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Resolve(args) => cmd_resolve(args),
        Command::Parse(args) => cmd_parse(args),
        Command::Track(args) => cmd_track(args),
        Command::Stop(args) => cmd_stop(args),
        Command::Explain(args) => cmd_explain(args),
        Command::ListFixes(args) => cmd_list_fixes(args),
    }
}

/// Absolute form of `path` without `.` components.
fn absolute(path: &Utf8Path) -> anyhow::Result<Utf8PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().context("current directory")?;
        let cwd = Utf8PathBuf::from_path_buf(cwd)
            .map_err(|p| anyhow!("working directory is not UTF-8: {}", p.display()))?;
        cwd.join(path)
    };
    Ok(joined
        .components()
        .filter(|c| !matches!(c, Utf8Component::CurDir))
        .collect())
}

fn merged_config(project_dir: &Utf8Path, overrides: &CliOverrides) -> anyhow::Result<MergedConfig> {
    let config = load_or_default(project_dir)?;
    Ok(ConfigMerger::new(config).merge(project_dir, overrides))
}

fn checker_overrides(project: &ProjectArgs, checker: &CheckerArgs) -> CliOverrides {
    CliOverrides {
        checker: checker.checker.clone(),
        checker_args: checker.checker_args.clone(),
        timeout_secs: checker.timeout_secs,
        cache_dir: project.cache_dir.clone(),
        ..CliOverrides::default()
    }
}

fn resolve_cycle(merged: &MergedConfig) -> Result<ResolveOutcome, ToolError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    let checker = ProcessChecker::new(merged.checker.clone(), merged.resolve.project_dir.clone());
    runtime.block_on(run_resolve(&merged.resolve, &checker, &FsSourceView))
}

fn print_summary(outcome: &ResolveOutcome) -> anyhow::Result<()> {
    let json = serde_json::to_string(&outcome.run.summary()).context("serialize summary")?;
    println!("{json}");
    Ok(())
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<bool> {
    let project_dir = absolute(&args.project.project_dir)?;
    let overrides = CliOverrides {
        dry_run: args.dry_run,
        exclude: args.exclude.clone(),
        disabled_codes: args.disabled_codes.clone(),
        ..checker_overrides(&args.project, &args.checker)
    };
    let merged = merged_config(&project_dir, &overrides)?;
    info!(
        project = %project_dir,
        checker = %merged.checker.command_line(),
        dry_run = merged.resolve.dry_run,
        "resolving"
    );

    let outcome = resolve_cycle(&merged)?;

    if !args.no_artifacts {
        let session = SessionCache::open(
            &merged.cache_dir,
            args.session.as_deref().unwrap_or(DEFAULT_SESSION),
        );
        let dir = session.ensure_dir()?;
        let _lock = SessionLock::acquire(&dir)?;
        write_resolve_artifacts(&outcome, &dir, &FsWritePort)?;
        debug!(dir = %session.dir(), "run artifacts written");
    }

    eprint!("{}", render_run_text(&outcome.run));
    print_summary(&outcome)?;
    Ok(outcome.run.success)
}

fn read_stdin() -> anyhow::Result<String> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("read stdin")?;
    Ok(raw)
}

fn cmd_parse(args: ParseArgs) -> anyhow::Result<bool> {
    let project_dir = absolute(&args.project_dir)?;
    let diagnostics = match args.input {
        Some(path) if path.as_str() != "-" => load_output(&path, &project_dir)?,
        _ => parse_all(&read_stdin()?, &project_dir),
    };

    let mut out = std::io::stdout().lock();
    for diagnostic in &diagnostics {
        serde_json::to_writer(&mut out, diagnostic).context("serialize diagnostic")?;
        writeln!(out)?;
    }
    debug!(count = diagnostics.len(), "diagnostics parsed");
    Ok(true)
}

/// Never fails the agent: problems are logged and the hook exits 0.
fn cmd_track(args: TrackArgs) -> anyhow::Result<bool> {
    let project_dir = absolute(&args.project.project_dir)?;
    let input = match read_stdin().and_then(|raw| parse_hook_input(&raw)) {
        Ok(input) => input,
        Err(err) => {
            warn!(error = %format!("{err:#}"), "ignoring hook input");
            return Ok(true);
        }
    };
    let overrides = CliOverrides {
        cache_dir: args.project.cache_dir.clone(),
        ..CliOverrides::default()
    };
    let merged = match merged_config(&project_dir, &overrides) {
        Ok(merged) => merged,
        Err(err) => {
            warn!(error = %format!("{err:#}"), "using default configuration");
            ConfigMerger::new(Default::default()).merge(&project_dir, &overrides)
        }
    };

    match record_edit(
        &project_dir,
        &merged.cache_dir,
        &input,
        Utc::now().timestamp_millis(),
    ) {
        Ok(TrackOutcome::Recorded {
            session,
            area,
            commands,
        }) => debug!(%session, %area, commands = commands.len(), "edit tracked"),
        Ok(TrackOutcome::Ignored(reason)) => debug!(reason, "edit not tracked"),
        Err(err) => warn!(error = %format!("{err:#}"), "failed to record edit"),
    }
    Ok(true)
}

fn cmd_stop(args: StopArgs) -> anyhow::Result<bool> {
    let project_dir = absolute(&args.project.project_dir)?;
    let merged = merged_config(
        &project_dir,
        &checker_overrides(&args.project, &args.checker),
    )?;
    if !merged.enabled {
        info!("auto-fix disabled in configuration");
        return Ok(true);
    }

    let session = SessionCache::latest(&merged.cache_dir)?;
    match decide(&session, &project_dir, &merged.stop)? {
        StopDecision::Skip(reason) => {
            info!(session = session.id(), reason, "nothing to resolve");
            return Ok(true);
        }
        StopDecision::Run { files } => {
            info!(session = session.id(), files = files.len(), "TypeScript files edited");
        }
    }

    let project = project_dir.file_name().unwrap_or("project").to_string();
    let session_dir = session.dir();
    let session_rel = session_dir
        .strip_prefix(&project_dir)
        .unwrap_or(&session_dir)
        .to_string();

    let success = match resolve_cycle(&merged) {
        Ok(outcome) => {
            {
                session.ensure_dir()?;
                let _lock = SessionLock::acquire(&session_dir)?;
                write_resolve_artifacts(&outcome, &session_dir, &FsWritePort)?;
            }
            let summary = outcome.run.summary();
            let finished_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
            eprint!(
                "{}",
                render_session_report(&SessionReport {
                    project: &project,
                    finished_at: &finished_at,
                    session_cache: &session_rel,
                    outcome: Ok(&summary),
                })
            );
            print_summary(&outcome)?;
            summary.success || summary.fixed > 0
        }
        Err(err) => {
            let message = err.to_string();
            let finished_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
            eprint!(
                "{}",
                render_session_report(&SessionReport {
                    project: &project,
                    finished_at: &finished_at,
                    session_cache: &session_rel,
                    outcome: Err(&message),
                })
            );
            false
        }
    };

    if !merged.stop.keep_session_cache {
        match cleanup_sessions(&merged.cache_dir, merged.stop.keep_sessions) {
            Ok(removed) if !removed.is_empty() => debug!(?removed, "old sessions removed"),
            Ok(_) => {}
            Err(err) => warn!(error = %format!("{err:#}"), "session cleanup failed"),
        }
    }
    Ok(success)
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<bool> {
    let Some(meta) = find_fixer_meta(&args.fix_key) else {
        let available = explain::list_fix_keys().join(", ");
        anyhow::bail!(
            "Unknown fix key: '{}'\n\nAvailable fixes: {}",
            args.fix_key,
            available
        );
    };
    print!("{}", explain::render_explanation(meta));
    Ok(true)
}

fn cmd_list_fixes(args: ListFixesArgs) -> anyhow::Result<bool> {
    let metas = builtin_fixer_metas();
    match args.format {
        OutputFormat::Text => {
            println!("Available fixes:\n");
            println!("  {:<24} {:<10} {:<20} TITLE", "KEY", "SAFETY", "CODES");
            println!("  {:<24} {:<10} {:<20} -----", "---", "------", "-----");
            for meta in &metas {
                let codes: Vec<String> = meta.codes.iter().map(|c| format!("TS{c}")).collect();
                println!(
                    "  {:<24} {:<10} {:<20} {}",
                    meta.key,
                    explain::format_safety(meta.safety),
                    codes.join(","),
                    meta.title
                );
            }
            println!();
            println!("Use 'tsfix explain <key>' for details.");
        }
        OutputFormat::Json => {
            let fixes: Vec<_> = metas
                .iter()
                .map(|m| {
                    serde_json::json!({
                        "key": m.key,
                        "title": m.title,
                        "codes": m.codes,
                        "safety": m.safety.as_str(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&fixes)?);
        }
    }
    Ok(true)
}
