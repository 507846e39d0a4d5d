use chrono::Utc;
use clap::Args;
use studyflow_core::{Config, Ranker};

use super::{open_repository, CliResult, StoreChoice};

#[derive(Args)]
pub struct RankArgs {
    /// Print the full ranking as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: RankArgs, store: StoreChoice) -> CliResult {
    let config = Config::load_or_default();
    let repo = open_repository(store)?;
    let tasks = repo.list_tasks()?;
    let ranking = Ranker::with_config(config.ranking.to_ranking_config()).rank(&tasks, Utc::now());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ranking)?);
        return Ok(());
    }
    if ranking.is_empty() {
        println!("No incomplete tasks.");
        return Ok(());
    }
    for entry in &ranking {
        println!(
            "{:>2}. [{:.2}] {} ({} min, {})",
            entry.position + 1,
            entry.score,
            entry.task.title,
            entry.duration_minutes,
            entry.task.priority,
        );
        println!("    {}", entry.reasoning_line());
    }
    Ok(())
}
