//! Moosend list sync binary
//!
//! Runs one full scan of a mailing list and prints each row as a JSON
//! object on stdout, one per line.

use anyhow::{bail, Context, Result};
use clap::Parser;
use moosend_adapter::{Column, ColumnType, MoosendAdapter, MoosendConfig};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "moosend_sync", about = "Dump a Moosend mailing list as JSON lines")]
struct Args {
    /// Moosend API key
    #[arg(long, env = "MOOSEND_API_KEY")]
    api_key: String,

    /// Mailing list identifier
    #[arg(long, env = "MOOSEND_LIST_ID")]
    list_id: String,

    /// Column serving as the row identifier (must hold email addresses)
    #[arg(long)]
    primary_key: Option<String>,

    /// Subscribers requested per page
    #[arg(long, default_value_t = moosend_adapter::DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// API base URL
    #[arg(long, default_value = moosend_adapter::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Columns to emit, as name:type pairs. Types: integer, text,
    /// timestamptz, timestamp, opaque.
    #[arg(long, value_delimiter = ',', default_value = "Email:text,Name:text")]
    columns: Vec<String>,
}

fn parse_column(spec: &str) -> Result<Column> {
    let (name, ty) = spec
        .split_once(':')
        .with_context(|| format!("column spec {spec:?} is not name:type"))?;
    let ty = match ty {
        "integer" => ColumnType::Integer,
        "text" => ColumnType::Text,
        "timestamptz" => ColumnType::TimestampTz,
        "timestamp" => ColumnType::Timestamp,
        "opaque" => ColumnType::Opaque,
        other => bail!("unknown column type {other:?} in {spec:?}"),
    };
    Ok(Column::new(name, ty))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("moosend_adapter=debug".parse()?),
        )
        .init();

    let args = Args::parse();
    let columns = args
        .columns
        .iter()
        .map(|s| parse_column(s))
        .collect::<Result<Vec<_>>>()?;

    let mut config = MoosendConfig::new(args.api_key, args.list_id)
        .with_page_size(args.page_size)
        .with_endpoint(args.endpoint);
    if let Some(pk) = args.primary_key {
        config = config.with_primary_key(pk);
    }

    info!("starting scan of list {}", config.list_id);
    let adapter = MoosendAdapter::connect(config, columns)?;

    let mut count = 0usize;
    for row in adapter.scan(&[]) {
        println!("{}", serde_json::to_string(&row)?);
        count += 1;
    }

    info!("scan complete, {count} row(s) emitted");
    Ok(())
}
