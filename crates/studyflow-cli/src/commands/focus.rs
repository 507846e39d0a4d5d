//! Interactive focus session.
//!
//! Ticks once per second and reads single-letter commands from stdin:
//! `p` pause, `r` resume, `s` skip, `c` complete, `q` quit, empty line for
//! a snapshot. Every event is printed as one JSON line on stdout.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Args;
use studyflow_core::storage::{NarrationBackend, NarrationConfig};
use studyflow_core::{
    select_preferred_voice, CommandNarrator, CompletionSink, Config, ConsoleNarrator, Event,
    FocusHandle, FocusRunner, FocusSession, IntervalTicks, LogNarrator, Narrator, Ranker,
    RepositoryCompletionSink, SessionOptions, SilentNarrator,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{open_repository, CliResult, StoreChoice};

#[derive(Args)]
pub struct FocusArgs {
    /// Fixed allocation for the first task, in seconds
    #[arg(long)]
    first_task_secs: Option<u64>,
    /// Disable narration for this run
    #[arg(long)]
    no_voice: bool,
}

pub fn run(args: FocusArgs, store: StoreChoice) -> CliResult {
    let config = Config::load_or_default();
    let repo = open_repository(store)?;
    let tasks = repo.list_tasks()?;
    let ranking = Ranker::with_config(config.ranking.to_ranking_config()).rank(&tasks, Utc::now());
    if ranking.is_empty() {
        println!("No incomplete tasks to focus on.");
        return Ok(());
    }

    let mut options = SessionOptions::from(&config.timer);
    if args.first_task_secs.is_some() {
        options.first_task_secs = args.first_task_secs;
    }
    tracing::debug!(queue_len = ranking.len(), ?options, "starting focus run");
    let session = FocusSession::new(ranking, options);
    let narrator = build_narrator(&config.narration, args.no_voice);
    let sink = Arc::new(RepositoryCompletionSink::new(repo));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(drive(session, narrator, sink));
    // Stdin reads sit on the blocking pool and never return on their own.
    runtime.shutdown_timeout(Duration::from_millis(100));
    let session = result?;

    let summary = serde_json::json!({
        "state": session.state(),
        "completed_task_ids": session.completed_task_ids(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn drive(
    session: FocusSession,
    narrator: Arc<dyn Narrator>,
    sink: Arc<dyn CompletionSink>,
) -> Result<FocusSession, Box<dyn std::error::Error>> {
    let (mut runner, handle) = FocusRunner::new(session, IntervalTicks::every_second(), narrator, sink);
    let mut events = runner.subscribe();
    let join = tokio::spawn(runner.run());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => print_event(&event)?,
                None => break,
            },
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => handle_line(&handle, line.trim()).await?,
                None => stdin_open = false,
            },
        }
    }

    Ok(join.await?)
}

async fn handle_line(handle: &FocusHandle, line: &str) -> CliResult {
    match line {
        "p" => {
            handle.pause().await;
        }
        "r" => {
            handle.resume().await;
        }
        "s" => {
            handle.skip().await;
        }
        "c" => {
            handle.complete_current().await;
        }
        "q" => {
            handle.stop().await;
        }
        "" => {
            if let Some(snapshot) = handle.snapshot().await {
                print_event(&snapshot)?;
            }
        }
        other => eprintln!("unknown command '{other}' (p, r, s, c, q or empty line)"),
    }
    Ok(())
}

fn print_event(event: &Event) -> CliResult {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

fn build_narrator(config: &NarrationConfig, no_voice: bool) -> Arc<dyn Narrator> {
    if no_voice || !config.enabled {
        return Arc::new(SilentNarrator);
    }
    match config.backend {
        NarrationBackend::Log => Arc::new(LogNarrator),
        NarrationBackend::Console => Arc::new(ConsoleNarrator),
        NarrationBackend::Command => {
            let voice = select_preferred_voice(&config.voices, &config.criteria).map(|v| v.name.clone());
            Arc::new(CommandNarrator::new(config.command.clone(), config.args.clone()).with_voice(voice))
        }
    }
}
