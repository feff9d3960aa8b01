mod cli;
mod config;
mod logging;
mod prompt;
mod snippet;
mod types;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::snippet::SnippetStore;
use crate::types::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("snipkit: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = cli.load_config()?;
    logging::init(cli.log_level_override(), Some(&config))?;

    let store = SnippetStore::new(cli.snippets_dir(&config))?;

    match cli.command.clone() {
        Commands::Exec(args) => cli::exec_snippet(&config, &store, args).await,
        Commands::New(args) => cli::new_snippet(&store, args),
        Commands::List => cli::list_snippets(&store),
        Commands::Remove(args) => cli::remove_snippet(&store, args),
    }
}
