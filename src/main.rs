use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use figment::{
    providers::{Format, Toml},
    Figment,
};
use round_to_one::{
    cli::{Cli, Commands},
    Config,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    install_tracing();

    let cli = Cli::parse();
    let config = Figment::new()
        .merge(Toml::file(
            cli.config.unwrap_or(PathBuf::from("config.toml")),
        ))
        .extract::<Config>()?;

    match cli.command {
        Commands::Run { account_id } => run(&config, account_id.as_deref()).await?,
        Commands::GetAccounts => get_accounts(&config).await?,
        Commands::GetAccount { account_id } => get_account(&config, &account_id).await?,
        Commands::CreateTransaction { account_id } => {
            create_sandbox_transaction(&config, &account_id).await?
        }
        Commands::GetTransaction {
            account_id,
            transaction_id,
        } => get_transaction(&config, &account_id, &transaction_id).await?,
        Commands::FindCharities { search_term, limit } => {
            find_matching_charities(&config, &search_term, limit).await?
        }
    }

    Ok(())
}

async fn run(config: &Config, account_id: Option<&str>) -> Result<()> {
    let outcome = round_to_one::run_once(config, account_id).await?;
    println!("{outcome}");
    Ok(())
}

async fn get_accounts(config: &Config) -> Result<()> {
    for account in round_to_one::fetch_accounts(config).await? {
        info!("{account:?}")
    }
    Ok(())
}

async fn get_account(config: &Config, account_id: &str) -> Result<()> {
    let account = round_to_one::fetch_account(config, account_id).await?;
    info!("{account:?}");
    Ok(())
}

async fn create_sandbox_transaction(config: &Config, account_id: &str) -> Result<()> {
    let transaction_id = round_to_one::create_transaction(config, account_id).await?;
    info!("created transaction `{transaction_id}` on account `{account_id}`");
    Ok(())
}

async fn get_transaction(config: &Config, account_id: &str, transaction_id: &str) -> Result<()> {
    let transaction = round_to_one::fetch_transaction(config, account_id, transaction_id).await?;
    info!("{transaction:?}");
    Ok(())
}

async fn find_matching_charities(config: &Config, search_term: &str, limit: u32) -> Result<()> {
    for charity in round_to_one::find_charities(config, search_term, limit).await? {
        println!("{charity}\n");
    }
    Ok(())
}

fn install_tracing() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let fmt_layer = fmt::layer();
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("round_to_one=info"))
        .unwrap();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();
}
