//! CLI definitions using clap.

use clap::{Parser, Subcommand};

pub mod commands;

/// Per-project issue tracker served over HTTP
#[derive(Parser, Debug)]
#[command(name = "issuetracker", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON (version output and errors)
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no logging, errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Listen address, HOST:PORT (default: $ISSUETRACKER_BIND_ADDR, $PORT, or 127.0.0.1:3000)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_with_bind() {
        let cli = Cli::parse_from(["issuetracker", "-vv", "serve", "--bind", "0.0.0.0:8080"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Serve { bind } => assert_eq!(bind.as_deref(), Some("0.0.0.0:8080")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["issuetracker", "version", "--json"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Version));
    }
}
