use clap::{Parser, Subcommand};
use std::path::PathBuf;

use synergy_core::{MAX_RATING, MIN_RATING};

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Parse a partner average, accepting only values on the rating scale.
fn parse_average(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    let scale = f64::from(MIN_RATING)..=f64::from(MAX_RATING);
    if scale.contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "average must be between {} and {}",
            MIN_RATING, MAX_RATING
        ))
    }
}

#[derive(Parser, Debug)]
#[command(name = "synergy", version, about = "Relationship synergy assessment CLI")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Assessment file (YAML, or JSON by .json extension); built-in if omitted"
    )]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_LOG_LEVEL,
        help = "Log filter used when RUST_LOG is unset"
    )]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List categories and their attributes
    Categories,
    /// Load and validate the assessment
    Validate,
    /// Advice for one category from two averages
    Advice {
        #[arg(long)]
        category: String,
        #[arg(long, value_parser = parse_average)]
        p1: f64,
        #[arg(long, value_parser = parse_average)]
        p2: f64,
    },
    /// Replay a session file and print results or the waiting state
    Report {
        #[arg(long)]
        session: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_advice() {
        let cli = Cli::parse_from([
            "synergy",
            "--json",
            "advice",
            "--category",
            "Household Management",
            "--p1",
            "4.0",
            "--p2",
            "2",
        ]);
        assert!(cli.json);
        assert_eq!(cli.log_level, DEFAULT_LOG_LEVEL);
        match cli.command {
            Commands::Advice { category, p1, p2 } => {
                assert_eq!(category, "Household Management");
                assert_eq!(p1, 4.0);
                assert_eq!(p2, 2.0);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_off_scale_averages_rejected() {
        for bad in ["9", "0.5", "NaN", "high"] {
            let result = Cli::try_parse_from([
                "synergy", "advice", "--category", "X", "--p1", bad, "--p2", "3",
            ]);
            assert!(result.is_err(), "accepted {}", bad);
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::parse_from(["synergy", "report", "--session", "s.yaml", "--config", "a.json"]);
        assert_eq!(cli.config, Some(PathBuf::from("a.json")));
    }
}
