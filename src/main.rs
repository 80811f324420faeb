//! Command-line front end for tpmstore lookups.

use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tpmstore::backends::tpm::TpmFactory;
use tpmstore::notify::TracingNotifier;
use tpmstore::{lookup, ClientOptions};
use tracing_subscriber::EnvFilter;

/// Look up, create or update a TeamPasswordManager entry.
///
/// TERMS are the API URL, user and password followed by key=value pairs,
/// e.g. `tpmstore https://tpm.example.com ansible s3cret name=db-root`.
#[derive(Debug, Parser)]
#[command(name = "tpmstore", version, about)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the result as a JSON array
    #[arg(long)]
    json: bool,

    /// Per-request timeout in seconds
    #[arg(long, env = "TPMSTORE_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Lookup terms: <url> <user> <password> key=value...
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    terms: Vec<String>,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_env("TPMSTORE_LOG")
        .unwrap_or_else(|_| {
            EnvFilter::new(format!("tpmstore={},tpmstore::notice=info", default_level))
        });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: &Cli) -> anyhow::Result<Vec<String>> {
    let options = ClientOptions::new().with_timeout(Duration::from_secs(cli.timeout));
    let factory = TpmFactory::new(options);

    Ok(lookup::run(&cli.terms, &factory, &TracingNotifier).await?)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli).await {
        Ok(values) => {
            if cli.json {
                match serde_json::to_string(&values) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("error: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                for value in values {
                    println!("{}", value);
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(error = ?e, "lookup failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
