use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "studyflow", version, about = "StudyFlow CLI")]
struct Cli {
    /// Use an in-memory store seeded with demo data instead of the database
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Project management
    Project {
        #[command(subcommand)]
        action: commands::project::ProjectAction,
    },
    /// Rank incomplete tasks
    Rank(commands::rank::RankArgs),
    /// Lay the ranking out over the day
    Plan(commands::plan::PlanArgs),
    /// Suggest better phrasings for a task
    Optimize {
        /// Task text
        text: String,
    },
    /// Run a guided focus session over the ranked queue
    Focus(commands::focus::FocusArgs),
    /// Task counts, overdue alert and per-project tallies
    Stats,
    /// Write demo tasks and projects when the store is empty
    Seed,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("STUDYFLOW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let store = commands::StoreChoice::from_flag(cli.ephemeral);
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action, store),
        Commands::Project { action } => commands::project::run(action, store),
        Commands::Rank(args) => commands::rank::run(args, store),
        Commands::Plan(args) => commands::plan::run(args, store),
        Commands::Optimize { text } => commands::optimize::run(&text),
        Commands::Focus(args) => commands::focus::run(args, store),
        Commands::Stats => commands::stats::run(store),
        Commands::Seed => commands::seed(store),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
