//! Ocular Rest CLI - focus and eye-rest interval reminder
//!
//! Alternates a focus interval with a short rest:
//! - 20 minutes of focus by default
//! - 20 seconds of looking away from the screen
//! - a cue and a desktop notification at every change

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use ocular_rest::cli::{Cli, Commands, Display, IpcClient, WatchArgs};
use ocular_rest::config::{self, DaemonConfig};
use ocular_rest::daemon;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let data_dir = cli.data_dir.unwrap_or_else(config::default_data_dir);
    tracing::debug!("Using data directory {:?}", data_dir);

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Start => {
            let response = IpcClient::for_data_dir(&data_dir).start().await?;
            Display::show_action(&response);
        }
        Commands::Pause => {
            let response = IpcClient::for_data_dir(&data_dir).pause().await?;
            Display::show_action(&response);
        }
        Commands::Toggle => {
            let response = IpcClient::for_data_dir(&data_dir).toggle().await?;
            Display::show_action(&response);
        }
        Commands::Reset => {
            let response = IpcClient::for_data_dir(&data_dir).reset().await?;
            Display::show_action(&response);
        }
        Commands::Status => {
            let response = IpcClient::for_data_dir(&data_dir).status().await?;
            Display::show_status(&response);
        }
        Commands::Watch(args) => {
            watch(IpcClient::for_data_dir(&data_dir).without_retry(), &args).await?;
        }
        Commands::Settings => {
            let response = IpcClient::for_data_dir(&data_dir).settings().await?;
            Display::show_settings(&response);
        }
        Commands::Set(args) => {
            let patch = args.to_patch();
            if patch.is_empty() {
                anyhow::bail!("Nothing to change. See 'ocular-rest set --help'");
            }
            let response = IpcClient::for_data_dir(&data_dir).update(patch).await?;
            Display::show_settings(&response);
        }
        Commands::Daemon(args) => {
            let mut config = DaemonConfig::load(&data_dir);
            args.apply(&mut config);
            daemon::run_daemon(config).await?;
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
        }
    }

    Ok(())
}

/// Redraws the status line until Ctrl-C.
async fn watch(client: IpcClient, args: &WatchArgs) -> Result<()> {
    let mut ticker = tokio::time::interval(Duration::from_millis(args.interval));
    let mut stdout = std::io::stdout();

    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let response = client.status().await?;
                if let Some(data) = &response.data {
                    write!(stdout, "\r\x1b[2K{}", Display::status_line(data))
                        .context("Failed to write status")?;
                    stdout.flush().context("Failed to flush status")?;
                }
            }
            _ = &mut interrupted => {
                writeln!(stdout)?;
                return Ok(());
            }
        }
    }
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
