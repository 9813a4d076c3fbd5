use crate::{
    commands::{Commands, CursorCommand},
    error::CliError,
};
use clap::Parser;
use connectors::sql::postgres::executor::PgExecutor;
use model::pagination::{cursor::CursorPosition, page::PaginationRequest};
use pager::{Paginator, PagerConfig, SharedConfig, codec::CursorCodec};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

#[derive(Parser, Debug)]
#[command(name = "pager", version = "0.1.0", about = "Keyset pagination over SQL tables")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Page {
            url,
            table,
            sort,
            after,
            before,
            limit,
            config,
            output,
        } => {
            let config = match config {
                Some(path) => PagerConfig::from_file(path)?,
                None => PagerConfig::from_env()?,
            };
            SharedConfig::global().replace(config);

            let executor = PgExecutor::connect(&url).await?;
            let entity = executor.describe_table(&table).await?;
            let paginator = Paginator::new(Arc::new(executor));

            let request = PaginationRequest {
                after,
                before,
                limit,
                sort,
            };
            let page = paginator.paginate(&entity, &request).await?;
            info!(table = %entity.table, rows = page.rows.len(), "Page fetched");

            output::write_json(&page.to_json(), output.as_deref()).await?;
        }
        Commands::Describe { url, table } => {
            let executor = PgExecutor::connect(&url).await?;
            let entity = executor.describe_table(&table).await?;
            output::write_json(&serde_json::to_value(&entity)?, None).await?;
        }
        Commands::Cursor { command } => match command {
            CursorCommand::Decode { token } => {
                let position = CursorCodec::decode(&token)?.unwrap_or_default();
                output::write_json(&serde_json::to_value(&position)?, None).await?;
            }
            CursorCommand::Encode { pairs } => {
                let position = parse_pairs(&pairs)?;
                println!("{}", CursorCodec::encode(&position));
            }
        },
    }

    Ok(())
}

fn parse_pairs(pairs: &[String]) -> Result<CursorPosition, CliError> {
    let mut position = CursorPosition::new();
    for pair in pairs {
        let (column, value) = pair
            .split_once(':')
            .ok_or_else(|| CliError::InvalidCursorPair(pair.clone()))?;
        position.push(column, value);
    }
    Ok(position)
}
