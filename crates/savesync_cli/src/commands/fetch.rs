//! Fetch command implementation.

use crate::RemoteArgs;
use clap::ValueEnum;
use serde::Serialize;

/// How `fetch` prints its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Fetch result.
#[derive(Debug, Serialize)]
pub struct FetchResult {
    /// User identity.
    pub user: String,
    /// Sequence number reported by the server.
    pub sn: u64,
    /// False when the server had no save.
    pub existed: bool,
    /// The decrypted document.
    pub document: serde_json::Value,
}

/// Runs the fetch command.
pub fn run(remote: &RemoteArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let (runtime, session) = super::connect(remote)?;

    let outcome = runtime.block_on(session.load()?)?;
    let document = serde_json::from_str(&session.document_json()?)?;

    let result = FetchResult {
        user: remote.user.clone(),
        sn: outcome.sn,
        existed: outcome.existed,
        document,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => print_text(&result)?,
    }

    Ok(())
}

fn print_text(result: &FetchResult) -> Result<(), Box<dyn std::error::Error>> {
    println!("User:     {}", result.user);
    println!("Sequence: {}", result.sn);
    if !result.existed {
        println!("(no save on server)");
        return Ok(());
    }
    println!("Document:");
    println!("{}", serde_json::to_string_pretty(&result.document)?);
    Ok(())
}
