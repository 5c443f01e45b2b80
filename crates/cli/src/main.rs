use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod categories_cmd;
mod config;
mod report;
mod rules_cmd;

#[derive(Parser)]
#[command(name = "centavo", version, about = "Spending categorization and reports")]
struct Cli {
    /// Configuration file (defaults to ./centavo.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest statement exports and print the spending summary.
    Report(report::ReportArgs),
    /// Inspect and edit categorization rules.
    Rules {
        #[command(subcommand)]
        command: rules_cmd::RulesCommand,
    },
    /// Inspect and edit the category set.
    Categories {
        #[command(subcommand)]
        command: categories_cmd::CategoriesCommand,
    },
    /// Print the rule/category snapshot as plain grounding text.
    Context,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = config::Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Report(args) => report::run(&config, args),
        Command::Rules { command } => rules_cmd::run(&config, command),
        Command::Categories { command } => categories_cmd::run(&config, command),
        Command::Context => {
            let rules = centavo_store::RuleStore::open_or_seed(&config.rules_file)?;
            let categories = centavo_store::CategoryStore::load_or_seed(&config.categories_file)?;
            print!(
                "{}",
                centavo_store::context_text(rules.rules(), categories.categories())
            );
            Ok(())
        }
    }
}
