use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod state;

use state::Workspace;

#[derive(Parser)]
#[command(name = "sn")]
#[command(about = "Star Notary registry CLI", long_about = None)]
struct Cli {
    /// State directory (holds state.json and journal.jsonl)
    #[arg(long, global = true, default_value = "exports")]
    dir: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the state directory from layered config
    Init {
        /// Config paths in merge order (base -> env -> overrides)
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Overwrite an existing state file
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Star operations
    Star {
        #[command(subcommand)]
        cmd: StarCmd,
    },

    /// Account provisioning and queries
    Account {
        #[command(subcommand)]
        cmd: AccountCmd,
    },

    /// Print registry name + symbol
    Meta,

    /// Journal utilities
    Journal {
        #[command(subcommand)]
        cmd: JournalCmd,
    },
}

#[derive(Subcommand)]
enum StarCmd {
    /// Register a new star owned by the caller
    Create {
        /// Caller identity
        #[arg(long = "as")]
        caller: String,

        /// Star id (caller-chosen, unique)
        #[arg(long)]
        id: u64,

        /// Star name
        #[arg(long)]
        name: String,
    },

    /// Put a star up for sale
    Sell {
        #[arg(long = "as")]
        caller: String,

        #[arg(long)]
        id: u64,

        /// Listing price in units (e.g. 0.01)
        #[arg(long)]
        price: String,
    },

    /// Buy a listed star
    Buy {
        #[arg(long = "as")]
        caller: String,

        #[arg(long)]
        id: u64,

        /// Attached value in units; only the listing price is drawn
        #[arg(long)]
        value: String,
    },

    /// Transfer a star to another identity
    Transfer {
        #[arg(long = "as")]
        caller: String,

        /// Recipient identity
        #[arg(long)]
        to: String,

        #[arg(long)]
        id: u64,
    },

    /// Atomically swap the owners of two stars
    Exchange {
        #[arg(long = "as")]
        caller: String,

        #[arg(long)]
        id_a: u64,

        #[arg(long)]
        id_b: u64,
    },

    /// Show a star (name, owner, listing)
    Info {
        #[arg(long)]
        id: u64,
    },
}

#[derive(Subcommand)]
enum AccountCmd {
    /// Print an account balance
    Balance {
        #[arg(long)]
        id: String,
    },

    /// Credit an account (environment provisioning; not journaled)
    Fund {
        #[arg(long)]
        id: String,

        /// Amount in units (e.g. 1.5)
        #[arg(long)]
        amount: String,
    },
}

#[derive(Subcommand)]
enum JournalCmd {
    /// Verify the journal hash chain
    Verify,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ws = Workspace::new(&cli.dir);

    match cli.cmd {
        Commands::Init {
            config_paths,
            force,
        } => commands::init::run(&ws, &config_paths, force),

        Commands::Star { cmd } => match cmd {
            StarCmd::Create { caller, id, name } => {
                commands::star::create(&ws, &caller, id, &name)
            }
            StarCmd::Sell { caller, id, price } => {
                commands::star::sell(&ws, &caller, id, &price)
            }
            StarCmd::Buy { caller, id, value } => commands::star::buy(&ws, &caller, id, &value),
            StarCmd::Transfer { caller, to, id } => {
                commands::star::transfer(&ws, &caller, &to, id)
            }
            StarCmd::Exchange { caller, id_a, id_b } => {
                commands::star::exchange(&ws, &caller, id_a, id_b)
            }
            StarCmd::Info { id } => commands::star::info(&ws, id),
        },

        Commands::Account { cmd } => match cmd {
            AccountCmd::Balance { id } => commands::account::balance(&ws, &id),
            AccountCmd::Fund { id, amount } => commands::account::fund(&ws, &id, &amount),
        },

        Commands::Meta => commands::meta(&ws),

        Commands::Journal { cmd } => match cmd {
            JournalCmd::Verify => commands::journal::verify(&ws),
        },
    }
}
