use chrono::{Local, NaiveDate, Utc};
use clap::Args;
use studyflow_core::{Config, FlowPlan, Ranker};

use super::{open_repository, CliResult, StoreChoice};

#[derive(Args)]
pub struct PlanArgs {
    /// Day to plan (YYYY-MM-DD, default: today)
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Override the configured day start hour
    #[arg(long)]
    start_hour: Option<u32>,
}

pub fn run(args: PlanArgs, store: StoreChoice) -> CliResult {
    let config = Config::load_or_default();
    let repo = open_repository(store)?;
    let tasks = repo.list_tasks()?;
    let ranking = Ranker::with_config(config.ranking.to_ranking_config()).rank(&tasks, Utc::now());

    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let hour = args.start_hour.unwrap_or(config.plan.day_start_hour);
    let plan = FlowPlan::build(&ranking, FlowPlan::day_start(date, hour));
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
