//! proxyset - system-wide proxy configuration.
//!
//! The binary parses the command line, gates apply/remove on root, and
//! runs batches on a worker thread while this thread renders progress
//! events and answers confirmation prompts at the terminal.

mod cli;
mod output;
mod prompt;

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use proxyset_core::{
    default_bypass_hosts, prompt_channel, BatchEvent, BatchOutcome, PromptRequest, ProxyManager,
    SystemPaths,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{ApplyArgs, Cli, Commands, RemoveArgs};

fn main() {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit.
    let _log_guard = init_logging(&cli);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    tracing::debug!("Args: {:?}", cli);
    match cli.command {
        Commands::Check => run_check(cli.json),
        Commands::Apply(args) => run_apply(*args, cli.json),
        Commands::Remove(args) => run_remove(args, cli.json),
    }
}

/// Fallback log location when `/var/log` is not writable.
fn fallback_log_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "proxyset", "Proxyset")
        .map(|dirs| dirs.data_local_dir().join("logs"))
}

/// Opens `proxyset.log` under `/var/log`, falling back to the user data dir.
fn open_log_appender() -> Option<RollingFileAppender> {
    let candidates = [Some(PathBuf::from("/var/log")), fallback_log_dir()];
    for dir in candidates.into_iter().flatten() {
        if std::fs::create_dir_all(&dir).is_err() {
            continue;
        }
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix("proxyset")
            .filename_suffix("log")
            .build(&dir)
            .ok();
        if let Some(appender) = appender {
            return Some(appender);
        }
    }
    None
}

/// Initialize file logging, with a console mirror in debug mode.
fn init_logging(cli: &Cli) -> Option<WorkerGuard> {
    let log_level = if cli.debug { "debug" } else { &cli.log_level };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("proxyset_core={0},proxyset_app={0},warn", log_level))
    });

    if let Some(appender) = open_log_appender() {
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        if cli.debug {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                .init();
        } else {
            // Stdout belongs to the event stream, so no console layer here.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                .init();
        }
        return Some(guard);
    }

    // No writable log location; console only.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    None
}

fn system_paths() -> anyhow::Result<SystemPaths> {
    SystemPaths::from_env()
        .ok_or_else(|| anyhow::anyhow!("HOME is not set, cannot locate profile files"))
}

fn require_root() -> anyhow::Result<()> {
    if !nix::unistd::Uid::effective().is_root() {
        anyhow::bail!("this command edits system files, run it as root");
    }
    Ok(())
}

fn exit_code(outcome: &BatchOutcome) -> i32 {
    if outcome.is_completed() {
        0
    } else {
        1
    }
}

fn run_check(json: bool) -> anyhow::Result<i32> {
    let manager = ProxyManager::new(system_paths()?);
    let report = manager.check_all();

    if json {
        println!("{}", output::report_json(&report)?);
    } else {
        println!("{}", output::detection_table(&report));
        println!("{}", output::summary_line(&report));
    }
    Ok(0)
}

fn run_apply(args: ApplyArgs, json: bool) -> anyhow::Result<i32> {
    require_root()?;
    let paths = system_paths()?;

    let mut config = args.to_config()?;
    let bypass = args.bypass_hosts().unwrap_or_else(default_bypass_hosts);
    config = config.with_bypass_hosts(bypass);

    let (event_tx, event_rx) = mpsc::channel();
    let (channel_prompt, prompt_rx) = prompt_channel();
    let assume_yes = args.yes;

    let manager = ProxyManager::new(paths).on_event(move |event: &BatchEvent| {
        let _ = event_tx.send(event.clone());
    });
    let worker = thread::spawn(move || {
        if assume_yes {
            manager.apply_all(&config, true)
        } else {
            manager.apply_with_prompt(&config, &channel_prompt)
        }
    });

    let outcome = pump_batch(worker, &event_rx, &prompt_rx, json)?;
    if json {
        println!("{}", output::outcome_json(&outcome)?);
    } else if outcome.is_completed() {
        println!("{}", output::restart_advisory());
    }
    Ok(exit_code(&outcome))
}

fn run_remove(args: RemoveArgs, json: bool) -> anyhow::Result<i32> {
    require_root()?;
    let paths = system_paths()?;

    if !args.yes && !prompt::confirm("Are you sure you want to remove proxy settings?") {
        let outcome = BatchOutcome::Declined;
        if json {
            println!("{}", output::outcome_json(&outcome)?);
        } else {
            println!("No settings were removed.");
        }
        return Ok(exit_code(&outcome));
    }

    let (event_tx, event_rx) = mpsc::channel();
    let (_prompt, prompt_rx) = prompt_channel();
    let manager = ProxyManager::new(paths).on_event(move |event: &BatchEvent| {
        let _ = event_tx.send(event.clone());
    });
    let worker = thread::spawn(move || manager.remove_all());

    let outcome = pump_batch(worker, &event_rx, &prompt_rx, json)?;
    if json {
        println!("{}", output::outcome_json(&outcome)?);
    }
    Ok(exit_code(&outcome))
}

/// Renders events and answers prompt requests until the worker finishes.
fn pump_batch(
    worker: thread::JoinHandle<BatchOutcome>,
    events: &mpsc::Receiver<BatchEvent>,
    prompts: &mpsc::Receiver<PromptRequest>,
    json: bool,
) -> anyhow::Result<BatchOutcome> {
    loop {
        while let Ok(event) = events.try_recv() {
            if !json {
                output::print_event(&event);
            }
        }
        while let Ok(request) = prompts.try_recv() {
            let overwrite = prompt::confirm(&request.question);
            request.answer(overwrite);
        }
        if worker.is_finished() {
            break;
        }
        thread::sleep(Duration::from_millis(50));
    }

    let outcome = worker
        .join()
        .map_err(|_| anyhow::anyhow!("batch worker panicked"))?;

    // Drain whatever arrived between the last poll and the join.
    while let Ok(event) = events.try_recv() {
        if !json {
            output::print_event(&event);
        }
    }
    Ok(outcome)
}
