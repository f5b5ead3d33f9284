//! Hearth CLI - household chores, points, and rewards from the terminal
//!
//! All commands work offline against the local store; `hearth sync` pushes
//! and pulls against the configured remote service.

mod cli;
mod commands;
mod error;

use clap::Parser;

use crate::cli::{ChoreCommands, Cli, Commands, MemberCommands, RewardCommands, SyncCommands};
use crate::commands::common::resolve_db_path;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hearth=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();
    let db_path = resolve_db_path(cli.db_path.clone());
    let household = cli.household.as_deref();

    match cli.command {
        Commands::Init { name, admin } => {
            commands::household::run_init(&name, &admin, &db_path).await?;
        }
        Commands::Member { command } => match command {
            MemberCommands::Add { name, admin } => {
                commands::household::run_member_add(&name, admin, household, &db_path).await?;
            }
            MemberCommands::List { json } => {
                commands::household::run_member_list(json, household, &db_path).await?;
            }
        },
        Commands::Chore { command } => match command {
            ChoreCommands::Add {
                title,
                points,
                assign,
                due,
            } => {
                commands::chore::run_chore_add(
                    &title,
                    points,
                    assign.as_deref(),
                    due,
                    household,
                    &db_path,
                )
                .await?;
            }
            ChoreCommands::List { json } => {
                commands::chore::run_chore_list(json, household, &db_path).await?;
            }
            ChoreCommands::Done { id, member } => {
                commands::chore::run_chore_done(&id, &member, household, &db_path).await?;
            }
            ChoreCommands::Delete { id, hard } => {
                commands::chore::run_chore_delete(&id, hard, &db_path).await?;
            }
        },
        Commands::Reward { command } => match command {
            RewardCommands::Add {
                title,
                cost,
                quantity,
            } => {
                commands::reward::run_reward_add(&title, cost, quantity, household, &db_path)
                    .await?;
            }
            RewardCommands::List { json } => {
                commands::reward::run_reward_list(json, household, &db_path).await?;
            }
            RewardCommands::Redeem { id, member } => {
                commands::reward::run_reward_redeem(&id, &member, &db_path).await?;
            }
        },
        Commands::Sync { command } => match command {
            None => commands::sync::run_sync(&db_path).await?,
            Some(SyncCommands::Status { json }) => {
                commands::sync::run_status(json, &db_path).await?;
            }
            Some(SyncCommands::Conflicts { limit, json }) => {
                commands::sync::run_conflicts(limit, json, &db_path).await?;
            }
        },
        Commands::Export { format, output } => {
            commands::export::run_export(format, output.as_deref(), household, &db_path).await?;
        }
        Commands::Completions { shell, output } => {
            commands::completions::run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
