use clap::{Parser, Subcommand};
use funds_transfer::application::transfer_service::TransferService;
use funds_transfer::domain::ports::SystemClock;
use funds_transfer::domain::principal::Principal;
use funds_transfer::domain::search::{PageRequest, TransactionSearchCriteria, parse_date_bound};
use funds_transfer::domain::transaction::TransferCommand;
use funds_transfer::infrastructure::Stores;
use funds_transfer::interfaces::csv::seed::{import_accounts, import_transactions, load_credentials};
use funds_transfer::interfaces::csv::writer::RecordWriter;
use funds_transfer::interfaces::http::{self, AppState, DEFAULT_MAX_PAGE_SIZE, ServerConfig};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "FUNDS_DB_PATH", global = true)]
    db_path: Option<PathBuf>,

    /// Accounts CSV (`id,username,balance`) loaded before the command runs
    #[arg(long, env = "FUNDS_ACCOUNTS", global = true)]
    accounts: Option<PathBuf>,

    /// Transaction history CSV loaded before the command runs
    #[arg(long, env = "FUNDS_TRANSACTIONS", global = true)]
    transactions: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "FUNDS_BIND", default_value = "127.0.0.1:8080")]
        bind: SocketAddr,

        /// Users CSV (`username,password_sha256`) for HTTP Basic authentication
        #[arg(long, env = "FUNDS_USERS")]
        users: PathBuf,

        #[arg(long, env = "FUNDS_MAX_PAGE_SIZE", default_value_t = DEFAULT_MAX_PAGE_SIZE)]
        max_page_size: u32,
    },
    /// Transfer funds and print the recorded transaction
    Transfer {
        /// User performing the transfer; must own the source account
        #[arg(long)]
        user: String,
        #[arg(long)]
        from: u64,
        #[arg(long)]
        to: u64,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        title: String,
    },
    /// Print transactions matching the filters
    Search {
        /// Matches either side of a transaction
        #[arg(long)]
        account_id: Option<u64>,
        #[arg(long)]
        amount_from: Option<Decimal>,
        #[arg(long)]
        amount_to: Option<Decimal>,
        /// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`
        #[arg(long)]
        date_from: Option<String>,
        /// Inclusive up to the end of that day
        #[arg(long)]
        date_to: Option<String>,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        size: u32,
    },
    /// Print all accounts
    Accounts,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let stores = Stores::open(cli.db_path.as_deref()).into_diagnostic()?;
    if let Some(path) = &cli.accounts {
        let file = File::open(path).into_diagnostic()?;
        import_accounts(file, stores.accounts.as_ref())
            .await
            .into_diagnostic()?;
    }
    if let Some(path) = &cli.transactions {
        let file = File::open(path).into_diagnostic()?;
        import_transactions(file, stores.transactions.as_ref())
            .await
            .into_diagnostic()?;
    }

    let service = TransferService::new(
        stores.accounts,
        stores.transactions,
        stores.ledger,
        Arc::new(SystemClock),
    );

    let stdout = io::stdout();
    match cli.command {
        Command::Serve {
            bind,
            users,
            max_page_size,
        } => {
            let credentials = load_credentials(File::open(users).into_diagnostic()?);
            if credentials.is_empty() {
                tracing::warn!("No users loaded; every request will be rejected");
            }
            let config = ServerConfig {
                bind,
                max_page_size,
            };
            let state = AppState::new(service, credentials, config.max_page_size);
            http::serve(&config, state).await.into_diagnostic()?;
        }
        Command::Transfer {
            user,
            from,
            to,
            amount,
            title,
        } => {
            let command = TransferCommand {
                source_account_id: from,
                destination_account_id: to,
                amount,
                title,
            };
            let tx = service
                .make_transfer(&Principal::new(user), command)
                .await
                .into_diagnostic()?;
            RecordWriter::new(stdout.lock())
                .write_transactions([tx])
                .into_diagnostic()?;
        }
        Command::Search {
            account_id,
            amount_from,
            amount_to,
            date_from,
            date_to,
            page,
            size,
        } => {
            let criteria = TransactionSearchCriteria {
                account_id,
                amount_from,
                amount_to,
                date_from: date_from.as_deref().map(parse_date_bound).transpose().into_diagnostic()?,
                date_to: date_to.as_deref().map(parse_date_bound).transpose().into_diagnostic()?,
            };
            let request = PageRequest::new(page, size).into_diagnostic()?;
            let found = service
                .find_transactions(&criteria, request)
                .await
                .into_diagnostic()?;
            RecordWriter::new(stdout.lock())
                .write_transactions(found.content)
                .into_diagnostic()?;
        }
        Command::Accounts => {
            let accounts = service.list_accounts(None).await.into_diagnostic()?;
            RecordWriter::new(stdout.lock())
                .write_accounts(accounts)
                .into_diagnostic()?;
        }
    }

    Ok(())
}
