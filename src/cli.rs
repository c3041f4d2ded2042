use std::path::PathBuf;

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand)]
#[command(rename_all = "snake_case")]
pub enum Commands {
    /// Runs the round-up pipeline once: one transaction, one donation
    /// decision, one charity recommendation.
    Run {
        /// Account to run against; defaults to the first listed account.
        #[arg(long)]
        account_id: Option<String>,
    },
    /// Fetches all bank accounts.
    GetAccounts,
    /// Fetches a single bank account.
    GetAccount { account_id: String },
    /// Creates a sandbox transaction on an account.
    CreateTransaction { account_id: String },
    /// Fetches a single transaction.
    GetTransaction {
        account_id: String,
        transaction_id: String,
    },
    /// Searches the charity database for a term.
    FindCharities {
        search_term: String,
        /// Maximum number of charities to return.
        #[arg(long, default_value_t = 5)]
        limit: u32,
    },
}
