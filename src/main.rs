//! Pomodoro timer CLI
//!
//! This tool helps you stay focused using the Pomodoro Technique:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 15 minutes of long break after 4 focus sessions

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use pomodoro_engine::cli::{
    Cli, Commands, Display, RunArgs, SettingsArgs, Shortcut, Switch, TaskCommand,
};
use pomodoro_engine::engine::{
    Command, EngineRunner, IntervalTicks, ManualTicks, TimerEngine, TimerEvent,
};
use pomodoro_engine::notification::{
    DesktopNotifier, NotificationPrefs, NotificationPrefsStore, Notifications,
};
use pomodoro_engine::sound::SoundWorker;
use pomodoro_engine::store::{default_data_dir, JsonSettingsStore};
use pomodoro_engine::tasks::{TaskStore, TaskTracker};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if let Some(Commands::Completions { shell }) = cli.command {
        generate_completions(shell);
        return Ok(());
    }

    let data_dir = resolve_data_dir(cli.data_dir)?;
    tracing::debug!(data_dir = %data_dir.display(), "using data directory");

    match cli.command {
        Some(Commands::Run(args)) => run_session(&data_dir, args).await,
        Some(Commands::Settings(args)) => run_settings(&data_dir, &args),
        Some(Commands::Task { command }) => run_task_command(&data_dir, command),
        Some(Commands::Notifications { state }) => run_notifications(&data_dir, state),
        Some(Commands::Completions { .. }) => Ok(()),
        None => run_session(&data_dir, RunArgs::default()).await,
    }
}

/// Returns `--data-dir` if given, else the platform data directory.
fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    match flag {
        Some(dir) => Ok(dir),
        None => Ok(default_data_dir()?),
    }
}

// ============================================================================
// Interactive Session
// ============================================================================

/// Runs the timer until the user quits or stdin closes.
async fn run_session(data_dir: &Path, args: RunArgs) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let engine = TimerEngine::new(
        JsonSettingsStore::in_dir(data_dir),
        IntervalTicks::new(),
        event_tx,
    );
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (runner, mut snapshots) = EngineRunner::new(engine, cmd_rx);
    let runner_handle = tokio::spawn(runner.run());

    let tracker = TaskTracker::new(TaskStore::in_dir(data_dir));
    let sound = if args.no_sound {
        None
    } else {
        match SoundWorker::rodio(args.volume) {
            Ok(worker) => Some(worker),
            Err(e) => {
                tracing::warn!(error = %e, hint = e.suggestion(), "sound disabled");
                None
            }
        }
    };

    let prefs_store = NotificationPrefsStore::in_dir(data_dir);
    let prefs = prefs_store.load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not read notification preference");
        NotificationPrefs::default()
    });
    let notifications = Notifications::new(DesktopNotifier::new(), prefs.enabled);

    match TaskStore::in_dir(data_dir).load() {
        Ok(list) => {
            if let Some(task) = list.current() {
                println!("Current task: {}", task.title);
            }
        }
        Err(e) => tracing::warn!(error = %e, "could not read tasks"),
    }
    Display::show_help();
    Display::show_status_line(&snapshots.borrow());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    tracing::debug!("stdin closed");
                    break;
                };
                match Shortcut::parse(&line) {
                    Some(Shortcut::Help) => Display::show_help(),
                    Some(Shortcut::Notify) => toggle_notifications(&notifications, &prefs_store),
                    Some(Shortcut::Quit) => break,
                    Some(shortcut) => {
                        if let Some(command) = shortcut.to_command() {
                            if cmd_tx.send(command).is_err() {
                                break;
                            }
                        }
                    }
                    None => Display::show_error(&format!("unknown shortcut `{}` (? for help)", line.trim())),
                }
            }
            Some(event) = event_rx.recv() => {
                dispatch_event(&event, &tracker, sound.as_ref(), &notifications);
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                Display::show_status_line(&snapshots.borrow_and_update());
            }
        }
    }

    // The runner may already be gone if the snapshot channel closed.
    let _ = cmd_tx.send(Command::Shutdown);
    let engine = runner_handle.await.context("engine runner failed")?;
    while let Ok(event) = event_rx.try_recv() {
        dispatch_event(&event, &tracker, sound.as_ref(), &notifications);
    }
    drop(engine);

    if let Some(sound) = sound {
        sound.shutdown();
    }
    println!();
    Ok(())
}

/// Hands one engine event to every consumer.
fn dispatch_event(
    event: &TimerEvent,
    tracker: &TaskTracker,
    sound: Option<&SoundWorker>,
    notifications: &Notifications,
) {
    if let Some(sound) = sound {
        sound.handle_event(event);
    }
    if let Some(notice) = notifications.notice_for(event) {
        let notifications = notifications.clone();
        tokio::task::spawn_blocking(move || notifications.send(&notice));
    }
    Display::show_event(event);
    if let Some(task) = tracker.handle_event(event) {
        Display::show_task_credited(&task);
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Shows the settings, applying any requested changes first.
fn run_settings(data_dir: &Path, args: &SettingsArgs) -> Result<()> {
    let update = args.to_update();
    let store = JsonSettingsStore::in_dir(data_dir);
    let (event_tx, _event_rx) = mpsc::unbounded_channel();
    let mut engine = TimerEngine::new(store.clone(), ManualTicks::new(), event_tx);

    if !update.is_empty() {
        if let Err(e) = engine.update_settings(update) {
            bail!("invalid --{}: {e}", flag_for_field(e.field()));
        }

        let saved = store.try_load().context("failed to read settings back")?;
        if saved.as_ref() != Some(engine.get_settings()) {
            bail!("settings could not be saved to {}", store.path().display());
        }
        Display::show_success("Settings saved");
    }

    Display::show_settings(engine.get_settings());
    Ok(())
}

/// Returns the `settings` flag that sets `field`.
fn flag_for_field(field: &str) -> &str {
    match field {
        "shortBreak" => "short-break",
        "longBreak" => "long-break",
        other => other,
    }
}

// ============================================================================
// Tasks
// ============================================================================

/// Applies a task subcommand to the task file.
fn run_task_command(data_dir: &Path, command: TaskCommand) -> Result<()> {
    let store = TaskStore::in_dir(data_dir);
    let mut list = store.load().context("failed to load tasks")?;

    match command {
        TaskCommand::List => {
            Display::show_tasks(&list);
            return Ok(());
        }
        TaskCommand::Add { title } => {
            let task = list.add(&title)?;
            Display::show_success(&format!("Added {} {}", task.short_id(), task.title));
        }
        TaskCommand::Remove { id } => {
            let task = list.remove(&id)?;
            Display::show_success(&format!("Removed {}", task.title));
        }
        TaskCommand::Select { id } => {
            let task = list.select(&id)?;
            Display::show_success(&format!("Current task: {}", task.title));
        }
        TaskCommand::Clear => {
            list.clear_selection();
            Display::show_success("No current task");
        }
    }

    store.save(&list).context("failed to save tasks")?;
    Ok(())
}

// ============================================================================
// Notifications
// ============================================================================

/// Flips the notification toggle for this session and saves it.
fn toggle_notifications(notifications: &Notifications, store: &NotificationPrefsStore) {
    let enabled = notifications.toggle();
    match store.save(NotificationPrefs { enabled }) {
        Ok(()) => println!("\nNotifications {}", on_off(enabled)),
        Err(e) => Display::show_error(&format!("notification preference not saved: {e}")),
    }
}

/// Shows the notification preference, saving `state` first if given.
fn run_notifications(data_dir: &Path, state: Option<Switch>) -> Result<()> {
    let store = NotificationPrefsStore::in_dir(data_dir);
    let mut prefs = store
        .load()
        .context("failed to load notification preference")?;

    if let Some(state) = state {
        prefs.enabled = state.is_on();
        store
            .save(prefs)
            .context("failed to save notification preference")?;
    }

    println!("Notifications: {}", on_off(prefs.enabled));
    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
