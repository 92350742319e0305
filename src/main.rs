//! treedoc: browsable tree reports for documented entries

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use globset::GlobSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use treedoc::cache::RenderCache;
use treedoc::config::{build_ignore_set, default_config_json, load_config, Config, CONFIG_FILENAME};
use treedoc::loader::{self, Skipped};
use treedoc::reporter::html::DEFAULT_TITLE;
use treedoc::reporter::{ConsoleReporter, HtmlReporter, JsonReporter};
use treedoc::state::{FilterCriteria, UiState};
use treedoc::tree::ReportTree;
use treedoc::view::View;
use treedoc::watcher::InputWatcher;

/// treedoc: browsable tree reports for documented entries
#[derive(Parser, Debug)]
#[command(name = "treedoc")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Manifest file or directory of entry files (omit when using a subcommand)
    path: Option<PathBuf>,

    /// Write a self-contained HTML report to this file
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Output the rendered tree as JSON
    #[arg(long, short)]
    json: bool,

    /// Only show items with warnings
    #[arg(long)]
    warn: bool,

    /// Only show items with errors
    #[arg(long)]
    err: bool,

    /// Only show items whose name contains TEXT (case-insensitive)
    #[arg(long, value_name = "TEXT")]
    search: Option<String>,

    /// Select the item at PATH and show its description
    #[arg(long, value_name = "PATH")]
    select: Option<String>,

    /// Expand the folders along PATH (repeatable)
    #[arg(long, value_name = "PATH")]
    expand: Vec<String>,

    /// Expand every folder
    #[arg(long)]
    expand_all: bool,

    /// Exit 1 when any item carries an error
    #[arg(long)]
    fail_on_error: bool,

    /// Path to config file (default: search .treedocrc.json in the input dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Quiet mode (summary only, no info/warning messages)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (print the selected description)
    #[arg(long, short)]
    verbose: bool,

    /// Parse entry files in parallel (default for directories with many files)
    #[arg(long)]
    parallel: bool,

    /// Watch the input and re-render on changes
    #[arg(long)]
    watch: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .treedocrc.json with sensible defaults
    Init {
        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    if let Some(Commands::Init { dir }) = &args.command {
        return run_init(dir.as_deref());
    }

    let path = args
        .path
        .clone()
        .context("missing input path: pass a manifest file or an entry directory")?;

    let config = load_config(&work_dir(&path), args.config.as_deref())?
        .merge_with_cli(args.expand_all, args.fail_on_error);
    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };

    if args.watch {
        return run_watch(&args, &path, &config, ignore_set.as_ref());
    }

    render_once(&args, &path, &config, ignore_set.as_ref())
}

/// Directory where config discovery starts, made absolute so parents can be walked
fn work_dir(path: &Path) -> PathBuf {
    let dir = if path.is_file() {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    } else {
        path
    };
    dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf())
}

/// Load, build, apply the requested UI state and emit the report
fn render_once(
    args: &Args,
    path: &Path,
    config: &Config,
    ignore_set: Option<&GlobSet>,
) -> Result<ExitCode> {
    let loaded = loader::load(path, ignore_set, args.parallel)?;
    warn_skipped(&loaded.skipped, args.quiet);

    if loaded.entries.is_empty() {
        eprintln!("{}: No entries found in {}", "Warning".yellow(), path.display());
        return Ok(ExitCode::from(2));
    }

    let (tree, skipped) = loader::build_tree(config.root_name(), &loaded.entries);
    warn_skipped(&skipped, args.quiet);

    let state = build_state(args, config, &tree)?;
    let view = View::render(&tree, &state, &config.render_options());
    let title = config
        .title
        .as_deref()
        .or(loaded.title.as_deref())
        .unwrap_or(DEFAULT_TITLE);

    if let Some(ref out) = args.html {
        let html = HtmlReporter::new().with_title(title).report(&view);
        std::fs::write(out, html)
            .with_context(|| format!("Failed to write report: {}", out.display()))?;
        if !args.quiet {
            eprintln!("{}: Wrote {}", "Info".blue(), out.display());
        }
    }

    if args.json {
        println!("{}", JsonReporter::new().pretty().report(&view, Some(title)));
    } else if args.quiet || args.html.is_some() {
        ConsoleReporter::new().report_quiet(&view);
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        reporter.report(&view);
    }

    if config.fail_on_error.unwrap_or(false) && view.summary.errors > 0 {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

/// UI state requested on the command line
fn build_state(args: &Args, config: &Config, tree: &ReportTree) -> Result<UiState> {
    let mut state = UiState::new();
    if config.expand_all.unwrap_or(false) {
        state.expand_all(tree);
    }
    for path in &args.expand {
        state.expand_path(tree, path)?;
    }
    if let Some(ref path) = args.select {
        let item = state.select_path(tree, path)?;
        state.reveal(tree, item)?;
    }
    state.set_criteria(FilterCriteria::new(
        args.warn,
        args.err,
        args.search.as_deref().unwrap_or(""),
    ));
    Ok(state)
}

fn warn_skipped(skipped: &[Skipped], quiet: bool) {
    if quiet {
        return;
    }
    for s in skipped {
        eprintln!("{}: Skipped {}: {}", "Warning".yellow(), s.source, s.reason);
    }
}

fn run_watch(
    args: &Args,
    path: &Path,
    config: &Config,
    ignore_set: Option<&GlobSet>,
) -> Result<ExitCode> {
    let watcher = InputWatcher::watch(path).context("Failed to create file watcher")?;
    let mut cache = RenderCache::new();
    eprintln!("{}: Watching for changes... (Ctrl+C to stop)", "Info".blue());

    loop {
        let inputs = if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            loader::collect_entry_files(path, ignore_set)
        };
        if cache.is_changed(&inputs) {
            if let Err(e) = render_once(args, path, config, ignore_set) {
                eprintln!("{}: {:#}", "Error".red(), e);
            }
        }

        while watcher.next_changes().is_empty() {}
    }
}

fn run_init(dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    std::fs::write(&config_path, default_config_json())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    eprintln!("{}: Created {}", "Info".blue(), config_path.display());
    Ok(ExitCode::SUCCESS)
}
