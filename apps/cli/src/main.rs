//! CLI entry point for the fast-downloader tool.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use fast_downloader::{
    AlwaysOverwrite, BatchOutcome, ConsoleProgressReporter, ImportOutcome, IntoProgressCallback, LinkError,
    LinkSession, NothingReason, PrintOpener, SessionConfig,
};
use tracing::{debug, info};

mod cli;

use cli::{Args, Command};

fn main() -> Result<()> {
    dotenv::dotenv().ok(); // Ignore error if .env not present

    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (warn)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let mut config = SessionConfig::default()
        .with_links_path(&args.links)
        .with_batch_size(args.batch_size as usize)
        .with_open_delay(Duration::from_millis(args.delay_ms));
    if let Command::Open { dry_run: true, .. } = args.command {
        config = config.with_open_delay(Duration::ZERO);
    }

    let mut session = LinkSession::new(config)?;
    if !args.json && !args.quiet {
        session = session.with_progress_callback(ConsoleProgressReporter::new(args.verbose > 0).into_callback());
    }

    match args.command {
        Command::Extract { ref path, yes } => {
            let session = if yes {
                session.with_consent(AlwaysOverwrite)
            } else {
                session.with_consent(confirm_overwrite)
            };
            extract(session, path, args.json)
        }
        Command::Status => status(session, args.json),
        Command::Open { no_wait, dry_run } => {
            let session = if dry_run {
                session.with_opener(PrintOpener::stdout())
            } else {
                session
            };
            open_batches(session, no_wait, args.json)
        }
    }
}

fn extract(mut session: LinkSession, path: &Path, json: bool) -> Result<()> {
    let summary = match session.extract_file(path) {
        Ok(summary) => summary,
        Err(LinkError::OverwriteDeclined { path }) => {
            println!("Keeping the existing link list at {}", path.display());
            return Ok(());
        }
        Err(e) => {
            eprintln!("{}", e.detailed_report());
            return Err(e).with_context(|| format!("Failed to extract links from {}", path.display()));
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if let Some(name) = &summary.metadata.name {
        match &summary.metadata.version {
            Some(version) => println!("Modlist: {} {}", name, version),
            None => println!("Modlist: {}", name),
        }
    }
    println!(
        "Saved {} URLs ({} batches) to {}",
        summary.total_count,
        summary.total_batches,
        session.store().path().display()
    );
    Ok(())
}

fn status(mut session: LinkSession, json: bool) -> Result<()> {
    let outcome = session.import_existing()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }
    if let ImportOutcome::NothingToImport { reason } = outcome {
        print_nothing(reason, &session);
    }
    Ok(())
}

fn open_batches(mut session: LinkSession, no_wait: bool, json: bool) -> Result<()> {
    if let ImportOutcome::NothingToImport { reason } = session.import_existing()? {
        if json {
            println!("{}", serde_json::to_string(&ImportOutcome::NothingToImport { reason })?);
        } else {
            print_nothing(reason, &session);
        }
        return Ok(());
    }

    loop {
        match session.next_batch()? {
            BatchOutcome::Opened(report) => {
                if json {
                    println!("{}", serde_json::to_string(&report)?);
                }
                if session.tracker().is_complete() {
                    break;
                }
                if !no_wait && !wait_for_next_batch()? {
                    info!(processed = %session.tracker(), "Stopped before the list was finished");
                    break;
                }
            }
            BatchOutcome::Exhausted { .. } | BatchOutcome::NoCursor => break,
        }
    }
    Ok(())
}

fn print_nothing(reason: NothingReason, session: &LinkSession) {
    match reason {
        NothingReason::Missing => println!(
            "No link list at {}. Run `fast-downloader extract <modlist>` first.",
            session.store().path().display()
        ),
        NothingReason::Empty => println!("No URLs found in {}", session.store().path().display()),
    }
}

/// Ask before replacing an existing link list; anything but yes keeps it
fn confirm_overwrite(path: &Path) -> bool {
    let question = format!("{} already exists. Overwrite it? [y/N] ", path.display());
    match prompt(&question) {
        Ok(Some(answer)) => matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"),
        _ => false,
    }
}

/// Returns false when the user asks to stop or input is closed
fn wait_for_next_batch() -> Result<bool> {
    let answer = prompt("Press Enter to open the next batch (q to quit) ")?;
    Ok(matches!(answer.as_deref(), Some(a) if !a.eq_ignore_ascii_case("q")))
}

fn prompt(question: &str) -> io::Result<Option<String>> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", question)?;
    stdout.flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
