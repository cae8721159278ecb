use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use taskdb::config::Config;
use taskdb::fixtures::{FixtureFactory, TEARDOWN_ORDER};
use taskdb::logger;
use taskdb::storage::{schema, Session};

/// Manage the taskdb schema and fixture data
#[derive(Parser, Debug)]
#[command(name = "taskdb", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Create every table that does not exist yet
    CreateTables,
    /// Drop every table
    DropTables,
    /// Insert a superuser and COUNT rows of every entity
    Seed {
        /// Rows per entity, defaults to `fixtures.batch_size`
        count: Option<usize>,
    },
    /// Delete every row, keeping the tables
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    config.validate()?;
    logger::init(&config.logging)?;

    let url = config.database.uri()?;
    let mut session = Session::connect(&url)
        .await
        .context("Failed to connect to the database")?;

    match cli.command {
        Command::CreateTables => schema::create_all_tables(&session).await?,
        Command::DropTables => schema::drop_all_tables(&session).await?,
        Command::Clear => {
            for table in TEARDOWN_ORDER {
                let removed = table.clear(&session).await?;
                info!("Removed {} rows from {}", removed, table);
            }
        }
        Command::Seed { count } => {
            let count = count.unwrap_or(config.fixtures.batch_size);
            let factory = match config.fixtures.seed {
                Some(seed) => FixtureFactory::with_seed(&session, seed),
                None => FixtureFactory::new(&session),
            };

            schema::create_all_tables(&session).await?;
            factory.create_superuser().await?;
            factory.create_roles(count).await?;
            factory.create_users(count).await?;
            factory.create_priorities(count).await?;
            factory.create_statuses(count).await?;
            factory.create_tasks(count).await?;
            info!("Seeded {} rows per entity", count);
        }
    }

    session.close().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(std::iter::once("taskdb").chain(args.iter().copied())).map(|cli| cli.command)
    }

    #[test]
    fn parses_every_command() {
        assert_eq!(parse(&["create-tables"]).unwrap(), Command::CreateTables);
        assert_eq!(parse(&["drop-tables"]).unwrap(), Command::DropTables);
        assert_eq!(parse(&["clear"]).unwrap(), Command::Clear);
        assert_eq!(parse(&["seed"]).unwrap(), Command::Seed { count: None });
        assert_eq!(parse(&["seed", "10"]).unwrap(), Command::Seed { count: Some(10) });
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["migrate"]).is_err());
        assert!(parse(&["seed", "many"]).is_err());
        assert!(parse(&["clear", "now"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
