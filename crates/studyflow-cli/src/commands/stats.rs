use chrono::Local;

use super::{open_repository, CliResult, StoreChoice};

/// Print the task overview as JSON; the overdue alert goes to stderr.
pub fn run(store: StoreChoice) -> CliResult {
    let repo = open_repository(store)?;
    let summary = repo.summary(&Local::now())?;
    if let Some(warning) = summary.overdue_warning() {
        eprintln!("warning: {warning}");
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
