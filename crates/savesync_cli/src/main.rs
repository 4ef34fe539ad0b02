//! SaveSync CLI
//!
//! Command-line tools for inspecting and editing remote saves.
//!
//! # Commands
//!
//! - `encode` - Encrypt text into a transport token
//! - `decode` - Decrypt a transport token
//! - `fetch` - Load a user's save and print it
//! - `push` - Load a user's save, set values and save it back

mod commands;

use clap::{Args, Parser, Subcommand};
use commands::fetch::OutputFormat;
use tracing_subscriber::EnvFilter;

/// SaveSync command-line tools.
#[derive(Parser)]
#[command(name = "savesync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Key material shared by every command.
#[derive(Args, Debug, Clone)]
pub struct SecretArgs {
    /// Encryption key (at least 16 bytes; only the first 16 are used)
    #[arg(long)]
    key: String,

    /// Initialization vector (at least 16 bytes; only the first 16 are used)
    #[arg(long)]
    iv: String,
}

/// Endpoint and identity for remote commands.
#[derive(Args, Debug, Clone)]
pub struct RemoteArgs {
    #[command(flatten)]
    secrets: SecretArgs,

    /// User identity
    #[arg(short, long)]
    user: String,

    /// Application version sent with saves
    #[arg(long = "app-version", default_value = "0.0.1")]
    app_version: String,

    /// Load endpoint URL
    #[arg(long)]
    load_url: String,

    /// Save endpoint URL
    #[arg(long)]
    save_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt text into a transport token
    Encode {
        #[command(flatten)]
        secrets: SecretArgs,

        /// Text to encrypt
        text: String,
    },

    /// Decrypt a transport token
    Decode {
        #[command(flatten)]
        secrets: SecretArgs,

        /// Base64 token to decrypt
        token: String,
    },

    /// Load a user's save and print it
    Fetch {
        #[command(flatten)]
        remote: RemoteArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Load a user's save, set values and save it back
    Push {
        #[command(flatten)]
        remote: RemoteArgs,

        /// String value to set, as key=value (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        strings: Vec<String>,

        /// Integer value to set, as key=value (repeatable)
        #[arg(long = "int", value_name = "KEY=VALUE")]
        ints: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Encode { secrets, text } => {
            println!("{}", commands::token::encode(&secrets, &text)?);
        }
        Commands::Decode { secrets, token } => {
            println!("{}", commands::token::decode(&secrets, &token)?);
        }
        Commands::Fetch { remote, format } => {
            commands::fetch::run(&remote, format)?;
        }
        Commands::Push {
            remote,
            strings,
            ints,
        } => {
            commands::push::run(&remote, &strings, &ints)?;
        }
    }

    Ok(())
}
