//! branford-admin: command-line client for the Branford content API

mod args;
mod commands;
mod io;

use branford_admin::store::{Coaches, Events, Gallery, Spotlights};
use clap::Parser;

use args::{Cli, Commands};
use commands::CliError;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let client = commands::build_client(&cli, cli.command.needs_session()).await?;

    match cli.command {
        Commands::Login => commands::login(client, cli.password_env.as_deref()).await,
        Commands::Events(args) => commands::content::<Events>(client, args.action).await,
        Commands::Spotlights(args) => commands::content::<Spotlights>(client, args.action).await,
        Commands::Gallery(args) => commands::content::<Gallery>(client, args.action).await,
        Commands::Coaches(args) => commands::content::<Coaches>(client, args.action).await,
        Commands::Image(args) => commands::image(client, args).await,
    }
}
