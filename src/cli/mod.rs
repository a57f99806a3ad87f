//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for PALoSA using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// PALoSA - pseudonymization of log, JSON and XML uploads
#[derive(Parser, Debug)]
#[command(name = "palosa")]
#[command(version, about, long_about = None)]
#[command(author = "PALoSA Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "palosa.toml", env = "PALOSA_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PALOSA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pseudonymize a session's uploads and package them as a ZIP archive
    Run(commands::run::RunArgs),

    /// Create or remove sessions
    Session(commands::session::SessionArgs),

    /// Remove sessions that have been idle longer than the configured TTL
    Sweep(commands::sweep::SweepArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Check the shape of a config definition file
    ValidateDefinition(commands::validate::ValidateDefinitionArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::session::SessionCommand;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from([
            "palosa",
            "run",
            "--session",
            "abc",
            "--settings",
            "settings.json",
        ]);
        assert_eq!(cli.config, "palosa.toml");
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.session, "abc");
                assert_eq!(args.settings, "settings.json");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_run_requires_session() {
        let result = Cli::try_parse_from(["palosa", "run", "--settings", "s.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["palosa", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["palosa", "--log-level", "debug", "sweep"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_session_commands() {
        let cli = Cli::parse_from(["palosa", "session", "create"]);
        assert!(matches!(
            cli.command,
            Commands::Session(ref args) if matches!(args.command, SessionCommand::Create)
        ));

        let cli = Cli::parse_from(["palosa", "session", "cleanup", "--session", "abc"]);
        match cli.command {
            Commands::Session(args) => match args.command {
                SessionCommand::Cleanup { session } => assert_eq!(session, "abc"),
                other => panic!("unexpected session command: {other:?}"),
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_sweep_watch() {
        let cli = Cli::parse_from(["palosa", "sweep", "--watch"]);
        match cli.command {
            Commands::Sweep(args) => assert!(args.watch),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_validate_definition() {
        let cli = Cli::parse_from(["palosa", "validate-definition", "def.json"]);
        match cli.command {
            Commands::ValidateDefinition(args) => assert_eq!(args.file, "def.json"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["palosa", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
