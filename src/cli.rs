//! CLI - Command Line Interface for Marquee
//!
//! One binary, three roles: the HTTP backend (`serve`), the interactive
//! terminal client (no subcommand), and scriptable one-shots against a
//! running backend.
//!
//! # Examples
//!
//! ```bash
//! # Run the backend
//! OMDB_API_KEY=... marquee serve --port 3000
//!
//! # Smoke-test it
//! marquee ping
//! marquee search "india" --json
//! marquee movie --id tt0118799
//! marquee spike --ms 2000
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::api::LookupKey;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Backend unreachable
    NetworkError = 3,
    /// Movie not found
    NotFound = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Marquee - movie lookup with type-ahead search
///
/// Run without arguments to launch the interactive terminal client.
#[derive(Parser, Debug)]
#[command(
    name = "marquee",
    version,
    about = "Movie lookup with type-ahead search",
    long_about = "Search movies by title as you type and view details with \
                  top-billed cast.\n\n\
                  Run without arguments to launch the terminal client.\n\
                  Use `serve` to run the HTTP backend it talks to.",
    after_help = "EXAMPLES:\n\
                  marquee serve                      Run the backend on :3000\n\
                  marquee                            Launch the terminal client\n\
                  marquee search \"india\"             Suggestions as JSON\n\
                  marquee movie --title Titanic      Full record with cast"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL for the terminal client and one-shots
    #[arg(long, short = 'b', global = true)]
    pub backend: Option<String>,

    /// Debug-level logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Subcommand to run (omit for the terminal client)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP backend
    Serve(ServeCmd),

    /// Title suggestions for a partial query
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Full movie record by IMDb id or exact title
    #[command(visible_alias = "m")]
    Movie(MovieCmd),

    /// Check that the backend is alive
    Ping,

    /// Ask the backend to burn CPU for a while
    Spike(SpikeCmd),
}

/// Run the HTTP backend
#[derive(Args, Debug)]
pub struct ServeCmd {
    /// Listen host (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (overrides config and PORT)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

/// Title suggestions for a partial query
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Partial title
    #[arg(required = true)]
    pub query: String,
}

/// Full movie record
#[derive(Args, Debug)]
#[command(group(clap::ArgGroup::new("key").required(true).args(["id", "title"])))]
pub struct MovieCmd {
    /// IMDb id (e.g., tt0133093)
    #[arg(long, short = 'i')]
    pub id: Option<String>,

    /// Exact title
    #[arg(long, short = 't')]
    pub title: Option<String>,
}

impl MovieCmd {
    /// Lookup key; the id wins when both are given
    pub fn lookup_key(&self) -> Option<LookupKey> {
        LookupKey::from_params(self.id.as_deref(), self.title.as_deref())
    }
}

/// CPU spike request
#[derive(Args, Debug)]
pub struct SpikeCmd {
    /// Duration in milliseconds (the backend clamps to 500..=20000)
    #[arg(long, default_value = "5000")]
    pub ms: u64,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print a human line, or the data as JSON in JSON mode
    pub fn print_or<T: Serialize>(&self, data: T, human: impl std::fmt::Display) -> anyhow::Result<()> {
        if self.json {
            self.print(data)
        } else {
            println!("{}", human);
            Ok(())
        }
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from(["marquee"]);
        assert!(!cli.is_cli_mode());
    }

    #[test]
    fn test_search_command() {
        let cli = Cli::parse_from(["marquee", "search", "india"]);
        assert!(cli.is_cli_mode());
        if let Some(Command::Search(cmd)) = cli.command {
            assert_eq!(cmd.query, "india");
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "marquee",
            "--json",
            "--quiet",
            "--backend",
            "http://10.0.0.2:3000",
            "ping",
        ]);
        assert!(cli.json);
        assert!(cli.quiet);
        assert_eq!(cli.backend.as_deref(), Some("http://10.0.0.2:3000"));
        assert!(matches!(cli.command, Some(Command::Ping)));
    }

    #[test]
    fn test_movie_requires_id_or_title() {
        assert!(Cli::try_parse_from(["marquee", "movie"]).is_err());

        let cli = Cli::parse_from(["marquee", "movie", "--title", "Titanic"]);
        if let Some(Command::Movie(cmd)) = cli.command {
            assert_eq!(cmd.lookup_key(), Some(LookupKey::Title("Titanic".into())));
        } else {
            panic!("Expected Movie command");
        }
    }

    #[test]
    fn test_movie_id_wins() {
        let cmd = MovieCmd {
            id: Some("tt0120338".into()),
            title: Some("Titanic".into()),
        };
        assert_eq!(cmd.lookup_key(), Some(LookupKey::Id("tt0120338".into())));
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from(["marquee", "serve", "--host", "127.0.0.1", "-p", "8080"]);
        if let Some(Command::Serve(cmd)) = cli.command {
            assert_eq!(cmd.host.as_deref(), Some("127.0.0.1"));
            assert_eq!(cmd.port, Some(8080));
        } else {
            panic!("Expected Serve command");
        }
    }

    #[test]
    fn test_spike_default() {
        let cli = Cli::parse_from(["marquee", "spike"]);
        if let Some(Command::Spike(cmd)) = cli.command {
            assert_eq!(cmd.ms, 5000);
        } else {
            panic!("Expected Spike command");
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
        assert_eq!(i32::from(ExitCode::NotFound), 4);
    }
}
