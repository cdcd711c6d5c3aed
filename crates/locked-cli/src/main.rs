use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "locked", version, about = "Locked focus timer")]
struct Cli {
    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a foreground timer controlled from stdin
    Run(commands::run::RunArgs),
    /// Period totals against the previous period
    Stats(commands::stats::StatsArgs),
    /// Minutes per half hour over the past week
    Heatmap(commands::heatmap::HeatmapArgs),
    /// Raw minute history as JSON
    History(commands::history::HistoryArgs),
    /// Set the configured duration of a mode
    Duration(commands::duration::DurationArgs),
    /// Show or toggle the colour theme
    Theme {
        #[command(subcommand)]
        action: Option<commands::theme::ThemeAction>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "locked=debug,locked_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Stats(args) => commands::stats::run(args),
        Commands::Heatmap(args) => commands::heatmap::run(args),
        Commands::History(args) => commands::history::run(args),
        Commands::Duration(args) => commands::duration::run(args),
        Commands::Theme { action } => commands::theme::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
