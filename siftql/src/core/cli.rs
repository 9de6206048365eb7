use clap::{Parser, Subcommand};

use std::path::PathBuf;

use crate::filter::UnknownEnumPolicy;

use super::config::Target;
use super::constants::{ENV_CONFIG, ENV_TARGET, ENV_UNKNOWN_ENUM};

#[derive(Parser)]
#[command(name = "siftql")]
#[command(
    version,
    about = "Declarative filter fields and query translation",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Translation target (postgres, sqlite or document)
    #[arg(long, short = 't', global = true, env = ENV_TARGET, value_parser = parse_target)]
    pub target: Option<Target>,

    /// Unknown enumeration literals: match nothing (null) or reject
    #[arg(long, global = true, env = ENV_UNKNOWN_ENUM, value_parser = parse_unknown_enum)]
    pub unknown_enum: Option<UnknownEnumPolicy>,
}

/// Parse translation target from CLI/env string
fn parse_target(s: &str) -> Result<Target, String> {
    match s.to_lowercase().as_str() {
        "postgres" | "postgresql" => Ok(Target::Postgres),
        "sqlite" => Ok(Target::Sqlite),
        "document" | "mongo" | "mongodb" => Ok(Target::Document),
        _ => Err(format!(
            "Invalid target '{}'. Valid options: postgres, sqlite, document",
            s
        )),
    }
}

/// Parse unknown enumeration policy from CLI/env string
fn parse_unknown_enum(s: &str) -> Result<UnknownEnumPolicy, String> {
    match s.to_lowercase().as_str() {
        "null" => Ok(UnknownEnumPolicy::Null),
        "reject" => Ok(UnknownEnumPolicy::Reject),
        _ => Err(format!(
            "Invalid unknown-enum policy '{}'. Valid options: null, reject",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// List registered entities
    Entities,
    /// Print the filter metadata of an entity as JSON
    Metadata {
        /// Entity identifier
        #[arg(long, short = 'e')]
        entity: String,
        /// Group to view the entity through
        #[arg(long, short = 'g')]
        group: Option<String>,
    },
    /// Translate a JSON expression tree into a filter for the target
    Translate {
        /// Entity identifier
        #[arg(long, short = 'e')]
        entity: String,
        /// Group to view the entity through
        #[arg(long, short = 'g')]
        group: Option<String>,
        /// Expression tree as JSON
        #[arg(long)]
        expr: String,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub target: Option<Target>,
    pub unknown_enum: Option<UnknownEnumPolicy>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        target: cli.target,
        unknown_enum: cli.unknown_enum,
    };
    (config, cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("Postgres"), Ok(Target::Postgres));
        assert_eq!(parse_target("sqlite"), Ok(Target::Sqlite));
        assert_eq!(parse_target("mongo"), Ok(Target::Document));
        assert!(parse_target("oracle").is_err());
    }

    #[test]
    fn test_parse_unknown_enum() {
        assert_eq!(parse_unknown_enum("REJECT"), Ok(UnknownEnumPolicy::Reject));
        assert_eq!(parse_unknown_enum("null"), Ok(UnknownEnumPolicy::Null));
        assert!(parse_unknown_enum("ignore").is_err());
    }

    #[test]
    fn test_translate_command_arguments() {
        let cli = Cli::try_parse_from([
            "siftql",
            "translate",
            "--entity",
            "user",
            "--target",
            "document",
            "--expr",
            r#"{"type":"and","children":[]}"#,
        ])
        .unwrap();

        assert_eq!(cli.target, Some(Target::Document));
        match cli.command {
            Commands::Translate {
                entity,
                group,
                expr,
            } => {
                assert_eq!(entity, "user");
                assert!(group.is_none());
                assert!(expr.starts_with('{'));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
