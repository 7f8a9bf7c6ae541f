//! CLI Command Handlers
//!
//! Each handler takes its CLI args, the resolved config and Output, and
//! returns an ExitCode. One-shots talk to a running backend over HTTP.

use crate::api::{BackendClient, BackendError, MovieBackend};
use crate::cli::{Command, ExitCode, MovieCmd, Output, SearchCmd, ServeCmd, SpikeCmd};
use crate::config::Config;
use crate::server;

/// Route a parsed subcommand to its handler
pub async fn run(command: Command, config: Config, output: &Output) -> ExitCode {
    match command {
        Command::Serve(cmd) => serve_cmd(cmd, config, output).await,
        Command::Search(cmd) => search_cmd(cmd, &backend(&config), output).await,
        Command::Movie(cmd) => movie_cmd(cmd, &backend(&config), output).await,
        Command::Ping => ping_cmd(&backend(&config), output).await,
        Command::Spike(cmd) => spike_cmd(cmd, &backend(&config), output).await,
    }
}

fn backend(config: &Config) -> BackendClient {
    BackendClient::new(config.backend_url())
}

/// Exit code for a failed backend call
pub fn exit_code_for(err: &BackendError) -> ExitCode {
    match err {
        e if e.is_not_found() => ExitCode::NotFound,
        e if e.is_network() => ExitCode::NetworkError,
        BackendError::Api { status: 400, .. } => ExitCode::InvalidArgs,
        _ => ExitCode::Error,
    }
}

// =============================================================================
// Serve Command
// =============================================================================

pub async fn serve_cmd(cmd: ServeCmd, mut config: Config, output: &Output) -> ExitCode {
    if let Some(host) = cmd.host {
        config.server.host = host;
    }
    if let Some(port) = cmd.port {
        config.server.port = port;
    }

    if let Err(e) = config.omdb_key() {
        return output.error(e.to_string(), ExitCode::InvalidArgs);
    }

    match server::start_server(config).await {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Server failed: {:#}", e), ExitCode::Error),
    }
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, client: &dyn MovieBackend, output: &Output) -> ExitCode {
    output.info(format!("Searching for: {}", cmd.query));

    match client.suggestions(&cmd.query).await {
        Ok(results) => {
            let result = if output.json {
                output.print(&results)
            } else {
                if results.is_empty() {
                    output.info("No suggestions");
                }
                for item in &results {
                    println!("{}", item);
                }
                Ok(())
            };
            if let Err(e) = result {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Search failed: {}", e), exit_code_for(&e)),
    }
}

// =============================================================================
// Movie Command
// =============================================================================

pub async fn movie_cmd(cmd: MovieCmd, client: &dyn MovieBackend, output: &Output) -> ExitCode {
    let Some(key) = cmd.lookup_key() else {
        return output.error("Provide --id or --title", ExitCode::InvalidArgs);
    };

    output.info(format!("Looking up: {}", key));

    match client.movie(&key).await {
        Ok(detail) => {
            let result = if output.json {
                output.print(&detail)
            } else {
                println!("{}", detail);
                if let Some(genre) = &detail.genre {
                    println!("  {}", genre);
                }
                if let Some(rated) = &detail.rated {
                    println!("  Rated: {}", rated);
                }
                for actor in &detail.actors {
                    println!("  {} as {}", actor.name, actor.character);
                }
                Ok(())
            };
            if let Err(e) = result {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) if e.is_not_found() => output.error(format!("No movie for {}", key), ExitCode::NotFound),
        Err(e) => output.error(format!("Lookup failed: {}", e), exit_code_for(&e)),
    }
}

// =============================================================================
// Ping / Spike Commands
// =============================================================================

pub async fn ping_cmd(client: &dyn MovieBackend, output: &Output) -> ExitCode {
    match client.ping().await {
        Ok(pong) => {
            let human = format!("ok {}", pong.time);
            if let Err(e) = output.print_or(&pong, human) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Ping failed: {}", e), exit_code_for(&e)),
    }
}

pub async fn spike_cmd(cmd: SpikeCmd, client: &BackendClient, output: &Output) -> ExitCode {
    output.info(format!("Spiking backend CPU for ~{} ms...", cmd.ms));

    match client.spike(cmd.ms).await {
        Ok(report) => {
            let human = format!("spiked {} ms", report.spiked_ms);
            if let Err(e) = output.print_or(&report, human) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Spike failed: {}", e), exit_code_for(&e)),
    }
}
