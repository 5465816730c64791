//! certledger - certificate lifecycle driver
//!
//! Command-line front end for sellers and the certifying authority.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{ArgGroup, Parser, Subcommand};
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

/// Exit codes for the driver.
pub mod exit_codes {
    /// Success exit code.
    pub const SUCCESS: u8 = 0;
    /// Any failure.
    pub const ERROR: u8 = 1;
}

/// certledger - certificate lifecycle driver
#[derive(Parser, Debug)]
#[command(name = "certledger")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "certledger.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Admin credential for privileged commands
    #[arg(long, env = "CERTLEDGER_CREDENTIAL", hide_env_values = true, global = true)]
    credential: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    // === Setup ===
    /// Create the ledger and load the example assets if it is empty
    Init,

    /// Print the SHA-256 hex digest of the credential, for the config file
    HashCredential,

    // === Seller ===
    /// Submit a product for certification
    Submit {
        /// Seller name
        owner: String,
        /// Product name
        product: String,
        /// Certification type (e.g. D.O.P.)
        cert_type: String,
    },

    /// Ask the authority to renew a certificate
    RequestRenewal {
        /// Asset id
        id: String,
    },

    /// Check whether a certificate is currently valid
    Verify {
        /// Asset id
        id: String,
    },

    /// Show one asset
    Show {
        /// Asset id
        id: String,
    },

    /// List issued certificates, valid or expired
    Certificates,

    // === Authority ===
    /// Approve or reject a pending submission
    #[command(group(ArgGroup::new("decision").required(true).args(["approve", "reject"])))]
    Evaluate {
        /// Asset id
        id: String,
        /// Issue the certificate
        #[arg(long)]
        approve: bool,
        /// Reject and remove the submission
        #[arg(long)]
        reject: bool,
    },

    /// Process an open renewal request
    Renew {
        /// Asset id
        id: String,
    },

    /// Backdate a certificate so it is no longer valid
    Invalidate {
        /// Asset id
        id: String,
    },

    /// List pending submissions and renewal requests
    Pending,

    /// List every asset
    #[command(alias = "ls")]
    List,

    /// Issue an asset directly with an explicit expiry
    Create {
        /// Seller name
        owner: String,
        /// Product name
        product: String,
        /// Certification type
        cert_type: String,
        /// Expiry date (YYYY-MM-DD)
        #[arg(long)]
        expires: NaiveDate,
    },

    /// Replace an asset's fields (the id is re-derived)
    Update {
        /// Current asset id
        id: String,
        /// Seller name
        owner: String,
        /// Product name
        product: String,
        /// Certification type
        cert_type: String,
        /// Expiry date (YYYY-MM-DD)
        #[arg(long)]
        expires: NaiveDate,
    },

    /// Remove an asset
    Delete {
        /// Asset id
        id: String,
    },

    /// Change an asset's owner (the id is kept)
    Transfer {
        /// Asset id
        id: String,
        /// New owner
        new_owner: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let json = cli.json;
    match run(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(err) => {
            commands::output::print_error(json, &err);
            ExitCode::from(exit_codes::ERROR)
        },
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let credential = cli.credential.map(SecretString::from);
    let ctx = commands::Context::new(cli.config, cli.json, credential);

    match cli.command {
        Commands::Init => commands::setup::init(&ctx),
        Commands::HashCredential => commands::setup::hash_credential(&ctx),
        Commands::Submit {
            owner,
            product,
            cert_type,
        } => commands::seller::submit(&ctx, &owner, &product, &cert_type),
        Commands::RequestRenewal { id } => commands::seller::request_renewal(&ctx, &id),
        Commands::Verify { id } => commands::seller::verify(&ctx, &id),
        Commands::Show { id } => commands::seller::show(&ctx, &id),
        Commands::Certificates => commands::seller::certificates(&ctx),
        Commands::Evaluate { id, approve, .. } => {
            commands::authority::evaluate(&ctx, &id, approve)
        },
        Commands::Renew { id } => commands::authority::renew(&ctx, &id),
        Commands::Invalidate { id } => commands::authority::invalidate(&ctx, &id),
        Commands::Pending => commands::authority::pending(&ctx),
        Commands::List => commands::authority::list(&ctx),
        Commands::Create {
            owner,
            product,
            cert_type,
            expires,
        } => commands::authority::create(&ctx, &owner, &product, &cert_type, expires),
        Commands::Update {
            id,
            owner,
            product,
            cert_type,
            expires,
        } => commands::authority::update(&ctx, &id, &owner, &product, &cert_type, expires),
        Commands::Delete { id } => commands::authority::delete(&ctx, &id),
        Commands::Transfer { id, new_owner } => {
            commands::authority::transfer(&ctx, &id, &new_owner)
        },
    }
}
