use studyflow_core::{Optimizer, TemplateOptimizer};

use super::CliResult;

pub fn run(text: &str) -> CliResult {
    let suggestions = TemplateOptimizer.optimize(text);
    if suggestions.is_empty() {
        return Err("task text is required".into());
    }
    println!("{}", serde_json::to_string_pretty(&suggestions)?);
    Ok(())
}
