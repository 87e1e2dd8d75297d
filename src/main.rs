//! CLI entry point for vault_env.
//!
//! Resolves `vault:` placeholders in the current environment (or the AWS
//! credential fields of a single path) and prints `export` lines for `eval`.

use std::ffi::OsStr;
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use vault_env::{
    infra::vault::{VaultConfig, VaultStore},
    output::{OutputFormat, write_exports},
    scan::process_environ,
    ResolutionMode, Resolver,
};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\n  Commit: ",
    env!("GIT_COMMIT")
);

const ENV_HELP: &str = "\
Environment Variables:
  VAULT_ADDR            Vault server address
  VAULT_TOKEN           Token to authenticate with (defaults to ~/.vault-token)
  VAULT_NAMESPACE       Vault Enterprise namespace
  VAULT_CLIENT_TIMEOUT  Request timeout in seconds
  VAULT_CACERT          PEM bundle of CA certificates to trust
  VAULT_CAPATH          Directory of PEM CA certificates to trust
  VAULT_SKIP_VERIFY     Disable TLS certificate verification
  LOG_FILE_PATH         Also write JSON logs to this file";

#[derive(Parser)]
#[command(name = "vault_env")]
#[command(about = "Substitute vault: placeholders in the environment with secrets read from Vault", long_about = None)]
#[command(version, long_version = LONG_VERSION, after_help = ENV_HELP)]
struct Cli {
    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,

    /// Separator between the vault path and key, e.g. ':' for vault:aws/creds/role:access_key
    #[arg(long = "keysep", value_name = "SEP")]
    key_separator: Option<String>,

    /// How to render values
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Export)]
    format: OutputFormat,

    /// Read AWS credentials from this path instead of substituting the entire environment
    #[arg(value_name = "PATH")]
    path: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = VaultConfig::from_env()?.with_token_helper();
    debug!(?config, "Vault configuration loaded");

    let store = VaultStore::from_config(&config)?;

    let mode = resolution_mode(cli.path, cli.key_separator, process_environ);

    let env = Resolver::new(&store).resolve(mode).await?;

    let mut stdout = std::io::stdout().lock();
    write_exports(&mut stdout, &env, cli.format)
}

/// An empty `PATH` argument means no path, same as omitting it.
fn resolution_mode(
    path: Option<String>,
    key_separator: Option<String>,
    environ: impl FnOnce() -> Vec<String>,
) -> ResolutionMode {
    match path.filter(|p| !p.is_empty()) {
        Some(path) => ResolutionMode::FixedPath { path },
        None => ResolutionMode::Environment {
            environ: environ(),
            key_separator,
        },
    }
}

/// Logs to stderr (stdout carries the exports), plus a JSON rolling file when
/// `LOG_FILE_PATH` is set. The returned guard flushes the file on drop.
fn init_logging(verbose: bool) -> Option<WorkerGuard> {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(level.into()));

    let (json_layer, guard) = match std::env::var("LOG_FILE_PATH") {
        Ok(log_file_path) => {
            let log_dir = Path::new(&log_file_path)
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let log_file_name = Path::new(&log_file_path)
                .file_name()
                .unwrap_or(OsStr::new("vault_env.log"));

            let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(non_blocking_file)
                .with_filter(
                    EnvFilter::from_env("RUST_LOG_JSON").add_directive(LevelFilter::DEBUG.into()),
                );
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    guard
}
