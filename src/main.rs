use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use dirtree_sync::config::{AppConfig, GeneralConfig};
use dirtree_sync::error::{self, AppError};
use dirtree_sync::event::EventHandler;
use dirtree_sync::fs::lister::FsLister;
use dirtree_sync::fs::watcher::FsWatcher;
use dirtree_sync::logging::init_logging;
use dirtree_sync::render::{render_json, render_text};
use dirtree_sync::{ApplyOutcome, DirectoryTree, TreeSync};

/// Print a directory tree and optionally keep it in sync with the filesystem.
#[derive(Parser, Debug)]
#[command(name = "dts", version, about)]
struct Cli {
    /// Root path to display (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Reveal and select this path (absolute, or relative to the root)
    #[arg(long)]
    select: Option<PathBuf>,

    /// Keep running and reprint the tree when directories change
    #[arg(long)]
    watch: bool,

    /// Expand directories shallower than this depth (root is 0)
    #[arg(long)]
    depth: Option<usize>,

    /// Include dot-files
    #[arg(long)]
    hidden: bool,

    /// List files as well as directories
    #[arg(long)]
    files: bool,

    /// Print JSON instead of a text tree
    #[arg(long)]
    json: bool,

    /// Explicit config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Config overrides derived from flags; unset flags leave file values alone.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                show_hidden: self.hidden.then_some(true),
                dirs_only: self.files.then_some(false),
                expand_depth: self.depth,
            },
            ..Default::default()
        }
    }
}

fn print_tree<L>(sync: &TreeSync<L>, json: bool) -> error::Result<()>
where
    L: dirtree_sync::fs::lister::DirectoryLister,
{
    let items = sync.tree().flatten();
    if json {
        println!("{}", render_json(&items)?);
    } else {
        print!("{}", render_text(&items));
    }
    Ok(())
}

fn resolve_target(root: &Path, target: &Path) -> error::Result<String> {
    let joined = if target.is_absolute() {
        target.to_path_buf()
    } else {
        root.join(target)
    };
    let resolved = joined
        .canonicalize()
        .map_err(|_| AppError::InvalidPath(format!("{} does not exist", joined.display())))?;
    Ok(resolved.to_string_lossy().to_string())
}

fn report_failures(outcomes: Vec<ApplyOutcome>) {
    for outcome in outcomes {
        if let ApplyOutcome::Failed(err) = outcome {
            warn!("{err}");
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();

    let path = cli.path.canonicalize().map_err(|_| {
        AppError::InvalidPath(format!("{} does not exist", cli.path.display()))
    })?;

    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));
    init_logging(cli.verbose, config.log_level());

    let lister = FsLister::new(config.show_hidden(), config.dirs_only());
    let tree = DirectoryTree::for_path(&path)?.with_auto_expand(config.expand_depth());
    let mut events = EventHandler::new();
    let mut sync = TreeSync::new(tree, lister, events.sender());

    let root = sync.tree().root_identity().to_string();
    sync.refresh(&root);
    if let Some(target) = &cli.select {
        let target = resolve_target(&path, target)?;
        sync.reveal(&target);
    }

    report_failures(sync.settle(&mut events).await?);
    if let Some(target) = &cli.select {
        if sync.tree().selected().is_none() {
            warn!(path = %target.display(), "could not reveal selection");
        }
    }
    print_tree(&sync, cli.json)?;

    if !cli.watch {
        return Ok(());
    }
    if !config.watcher_enabled() {
        return Err(AppError::Config(
            "--watch requested but the watcher is disabled in config".into(),
        ));
    }

    let _watcher = FsWatcher::new(
        &path,
        Duration::from_millis(config.debounce_ms()),
        config.ignore_patterns(),
        config.flood_threshold(),
        events.sender(),
    )
    .map_err(|e| AppError::Config(format!("watcher unavailable: {e}")))?;
    info!(root = %path.display(), "watching for changes");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.next() => {
                match sync.handle_event(event?) {
                    Some(ApplyOutcome::Applied(report)) if !report.is_unchanged() => {
                        print_tree(&sync, cli.json)?;
                    }
                    Some(ApplyOutcome::Failed(err)) => warn!("{err}"),
                    _ => {}
                }
            }
        }
    }

    Ok(())
}
