//! Project management commands for CLI.

use clap::Subcommand;
use studyflow_core::Project;

use super::{open_repository, CliResult, StoreChoice};

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a new project
    Create {
        /// Project name
        name: String,
        /// Project description
        #[arg(long)]
        description: Option<String>,
        /// Display colour, e.g. "#10B981"
        #[arg(long)]
        color: Option<String>,
    },
    /// List all projects
    List,
    /// Delete a project (its tasks are kept)
    Delete {
        /// Project ID
        id: String,
    },
}

pub fn run(action: ProjectAction, store: StoreChoice) -> CliResult {
    let repo = open_repository(store)?;

    match action {
        ProjectAction::Create {
            name,
            description,
            color,
        } => {
            let mut project = Project::new(name);
            if let Some(d) = description {
                project.description = d;
            }
            if let Some(c) = color {
                project.color = c;
            }
            let project = repo.create_project(project)?;
            println!("{}", serde_json::to_string_pretty(&project)?);
        }
        ProjectAction::List => {
            let projects = repo.list_projects()?;
            println!("{}", serde_json::to_string_pretty(&projects)?);
        }
        ProjectAction::Delete { id } => {
            if !repo.delete_project(&id)? {
                return Err(format!("project not found: {id}").into());
            }
            println!("Project deleted: {id}");
        }
    }
    Ok(())
}
