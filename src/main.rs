//! searchsh - interactive shell for search clusters
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode against a local cluster
//! searchsh http://localhost:9200
//!
//! # Named datasource from ~/.searchsh/config.toml
//! searchsh -d prod --index logs
//! ```

use std::fs::{self, OpenOptions};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use searchsh::cli::CliInterface;
use searchsh::config::LoggingConfig;
use searchsh::error::Result;
use searchsh::executor::{ExecutionContext, ExecutionResult};
use searchsh::formatter::{Colorizer, Formatter};
use searchsh::parser::Command;
use searchsh::repl::{ReplEngine, SharedState};
use searchsh::search::{HttpSearchService, SearchService};
use searchsh::store::LocalStore;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Parse arguments, set up logging, then run a subcommand or the shell
async fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli.config().logging)?;

    if cli.handle_subcommand()? {
        return Ok(());
    }

    cli.print_banner();
    run_interactive_mode(&cli).await
}

async fn run_interactive_mode(cli: &CliInterface) -> Result<()> {
    let service = create_service(cli)?;
    let shared_state = SharedState::with_config(cli.get_index(), &cli.config().display);
    connect(cli, service.as_ref(), &shared_state).await;

    let config = cli.config();
    let exec_context = ExecutionContext::new(
        service.clone(),
        shared_state.clone(),
        LocalStore::from_config(&config.store),
        config.search.clone(),
    );
    let mut repl = ReplEngine::new(
        shared_state,
        &config.history,
        config.display.syntax_highlighting,
        Some(service),
    )?;

    run_repl_loop(cli, &mut repl, &exec_context).await?;

    if !cli.args().quiet {
        println!("Goodbye!");
    }
    Ok(())
}

/// Build the HTTP service for the resolved cluster URL
fn create_service(cli: &CliInterface) -> Result<Arc<dyn SearchService>> {
    let config = cli.config();
    let url = cli.get_url();
    config.connection.validate_url(&url)?;

    let service = HttpSearchService::new(&url, &config.connection, config.search.sort_clause()?)?;
    Ok(Arc::new(service))
}

/// Ping the cluster unless `--no-connect` was given
///
/// An unreachable cluster is not fatal: the shell starts disconnected and
/// every command still tries the cluster.
async fn connect(cli: &CliInterface, service: &dyn SearchService, shared_state: &SharedState) {
    if cli.args().no_connect {
        debug!("Skipping initial ping");
        return;
    }

    match service.ping().await {
        Ok(info) => {
            cli.print_connection_info(&info.cluster_name, info.version.as_deref());
            shared_state.set_connected(info.cluster_name, info.version);
        }
        Err(e) => {
            warn!("Initial ping failed: {}", e);
            let colorizer = Colorizer::new(shared_state.get_color_enabled());
            eprintln!(
                "{}",
                colorizer.warning(&format!("Could not reach cluster: {}", e))
            );
            shared_state.set_disconnected();
        }
    }
}

async fn run_repl_loop(
    cli: &CliInterface,
    repl: &mut ReplEngine,
    exec_context: &ExecutionContext,
) -> Result<()> {
    while repl.is_running() {
        let mut context = exec_context.clone();
        context.reset_cancel_token();

        let input = match repl.read_line()? {
            Some(line) if !line.trim().is_empty() => line,
            Some(_) => continue,
            None => break,
        };

        let command = match repl.process_input(&input) {
            Ok(command) => command,
            Err(e) => {
                display_result(cli, repl.shared_state(), &ExecutionResult::error(e.to_string()));
                continue;
            }
        };

        if matches!(command, Command::Exit) {
            break;
        }

        // Ctrl+C cancels the command in flight, not the shell
        let cancel_token = context.get_cancel_token();
        let ctrl_c_handle = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => cancel_token.cancel(),
                Err(err) => warn!("Failed to listen for Ctrl+C: {}", err),
            }
        });

        let result = context
            .execute(command)
            .await
            .unwrap_or_else(|e| ExecutionResult::error(e.to_string()));
        display_result(cli, repl.shared_state(), &result);

        ctrl_c_handle.abort();
    }

    Ok(())
}

/// Format with the session's current format and color settings
fn display_result(cli: &CliInterface, shared_state: &SharedState, result: &ExecutionResult) {
    let mut display_config = cli.config().display.clone();
    display_config.format = shared_state.get_format();
    display_config.color_output = shared_state.get_color_enabled();

    match Formatter::from_config(&display_config).format(result) {
        Ok(output) if output.is_empty() => {}
        Ok(output) if result.success => println!("{}", output),
        Ok(output) => eprintln!("{}", output),
        Err(e) => eprintln!("Format error: {}", e),
    }
}

/// Install the tracing subscriber
///
/// Logs go to stderr, or to `logging.file_path` when configured.
fn initialize_logging(config: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(config.level.to_tracing_level())
        .with_target(false);

    match &config.file_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let builder = builder.with_ansi(false).with_writer(Mutex::new(file));
            if config.timestamps {
                builder.init();
            } else {
                builder.without_time().init();
            }
        }
        None => {
            let builder = builder.with_writer(std::io::stderr);
            if config.timestamps {
                builder.init();
            } else {
                builder.without_time().init();
            }
        }
    }

    Ok(())
}
