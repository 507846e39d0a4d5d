pub mod config;
pub mod focus;
pub mod optimize;
pub mod plan;
pub mod project;
pub mod rank;
pub mod stats;
pub mod task;

use chrono::Utc;
use studyflow_core::error::Result as CoreResult;
use studyflow_core::{Database, KeyValueStore, MemoryStore, TaskRepository};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Where task data lives for this invocation.
#[derive(Debug, Clone, Copy)]
pub enum StoreChoice {
    Disk,
    /// Fresh in-memory store with demo data; nothing is persisted.
    Ephemeral,
}

impl StoreChoice {
    pub fn from_flag(ephemeral: bool) -> Self {
        if ephemeral {
            StoreChoice::Ephemeral
        } else {
            StoreChoice::Disk
        }
    }
}

pub enum Store {
    Disk(Database),
    Memory(MemoryStore),
}

impl KeyValueStore for Store {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        match self {
            Store::Disk(db) => db.get(key),
            Store::Memory(mem) => mem.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        match self {
            Store::Disk(db) => db.set(key, value),
            Store::Memory(mem) => mem.set(key, value),
        }
    }
}

pub fn open_repository(choice: StoreChoice) -> CoreResult<TaskRepository<Store>> {
    tracing::debug!(?choice, "opening task store");
    match choice {
        StoreChoice::Disk => Ok(TaskRepository::new(Store::Disk(Database::open()?))),
        StoreChoice::Ephemeral => {
            let repo = TaskRepository::new(Store::Memory(MemoryStore::new()));
            repo.seed_demo_data(Utc::now())?;
            Ok(repo)
        }
    }
}

pub fn seed(choice: StoreChoice) -> CliResult {
    let repo = open_repository(choice)?;
    let seeded = repo.seed_demo_data(Utc::now())?;
    let body = serde_json::json!({
        "seeded": seeded,
        "tasks": repo.list_tasks()?.len(),
        "projects": repo.list_projects()?.len(),
    });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
