//! Sendlink CLI - share ephemeral, end-to-end encrypted secrets
//!
//! This is the command-line interface for Sendlink. Content is encrypted
//! locally before anything reaches the server; share links carry the key in
//! their URL fragment.

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use sendlink_core::SendError;

mod cli;
mod commands;
mod config;
mod helpers;
mod output;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(exit_code(&err));
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Completions(args) = &cli.command {
        let mut cmd = Cli::command();
        generate(args.shell, &mut cmd, "sendlink", &mut std::io::stdout());
        return Ok(());
    }

    let ctx = config::AppContext::new(&cli)?;
    match &cli.command {
        Commands::Create(args) => commands::create::run(&ctx, args).await,
        Commands::Edit(args) => commands::edit::run(&ctx, args).await,
        Commands::Get(args) => commands::get::run(&ctx, args).await,
        Commands::List(args) => commands::list::run(&ctx, args).await,
        Commands::Receive(args) => commands::receive::run(&ctx, args).await,
        Commands::Delete(args) => commands::delete::run(&ctx, args).await,
        Commands::RemovePassword(args) => commands::remove_password::run(&ctx, args).await,
        Commands::Completions(_) => unreachable!("handled above"),
    }
}

/// Exit codes: 2 usage/validation, 3 unavailable, 4 decryption failure,
/// 1 anything else.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<SendError>() {
        Some(
            SendError::ConflictingAuthGates
            | SendError::TypeImmutable
            | SendError::MissingId
            | SendError::MalformedShareLink(_)
            | SendError::InvalidInput(_),
        ) => 2,
        Some(SendError::AuthDenied(_) | SendError::NotFound(_)) => 3,
        Some(SendError::DecryptionFailed) => 4,
        _ => 1,
    }
}
