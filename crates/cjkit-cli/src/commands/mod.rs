mod advertisers;
mod commissions;
mod links;
mod products;

use std::time::Duration;

use cjkit_core::{CjClient, ClientConfig};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    let client = build_client(cli)?;

    match &cli.command {
        Command::Advertisers(args) => advertisers::run(args, &client).await,
        Command::Links(args) => links::run(args, &client).await,
        Command::Products(args) => products::run(args, &client).await,
        Command::Commissions(args) => commissions::run(args, &client).await,
    }
}

fn build_client(cli: &Cli) -> Result<CjClient, CliError> {
    let config = ClientConfig::from_env()?
        .with_timeout(Duration::from_secs(cli.timeout_secs))
        .with_cache(cli.cache)
        .with_cache_ttl(Duration::from_secs(cli.cache_ttl_secs))
        .with_debug(cli.debug);

    Ok(CjClient::new(&config)?)
}
