//! caseflow CLI - Case, document and task workflow for a small legal practice

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use caseflow::cli::{Cli, Commands};
use caseflow::errors::to_exit_code;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over the flags
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            tracing::debug!(code = e.code(), "{}", e);
            eprintln!("Error: {}", e.user_message());
            std::process::exit(to_exit_code(&e));
        }
    }
}

async fn run(cli: Cli) -> caseflow::Result<()> {
    let cwd = cli.cwd.as_deref();
    let actor = cli.actor.as_deref();
    match cli.command {
        Some(Commands::Init { force, staff }) => {
            caseflow::cli::commands::init::run(cwd, force, &staff).await
        }
        Some(Commands::Case(command)) => {
            caseflow::cli::commands::case::run(cwd, actor, command).await
        }
        Some(Commands::Doc(command)) => {
            caseflow::cli::commands::doc::run(cwd, actor, command).await
        }
        Some(Commands::Roles(command)) => {
            caseflow::cli::commands::roles::run(cwd, actor, command).await
        }
        Some(Commands::Due { priority, from }) => {
            caseflow::cli::commands::due::run(cwd, priority, from.as_deref()).await
        }
        None => {
            // Default to showing help - clap handles this
            println!("Use --help for usage information");
            Ok(())
        }
    }
}
