//! CLI interface for the jobfoyu client

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jobfoyu")]
#[command(about = "Find IT jobs that fit your CV and see which skills to upgrade")]
#[command(long_about = "Upload a CV to the matching service, browse ranked job recommendations and request a CV-vs-job gap analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Service base URL (overrides JOBFOYU_API_BASE and the config file)
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match a CV against the job catalogue
    Match {
        /// Path to the CV (PDF)
        #[arg(long)]
        cv: PathBuf,

        /// Only jobs whose location contains this text
        #[arg(short, long)]
        location: Option<String>,

        /// Only remote jobs
        #[arg(long)]
        remote_only: bool,

        /// Run a gap analysis for result number N
        #[arg(short, long)]
        analyze: Option<usize>,

        /// Show description previews on job cards
        #[arg(short, long)]
        detailed: bool,

        /// Output format: console, json
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Compare a CV with a job description and get improvement advice
    Improve {
        /// Path to the CV (PDF)
        #[arg(long)]
        cv: PathBuf,

        #[command(flatten)]
        job: JobDescriptionSource,

        /// Output format: console, json
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Interactive job matcher session
    Shell {
        /// CV to select at startup
        #[arg(long)]
        cv: Option<PathBuf>,
    },

    /// Check that the service is reachable
    Health,

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct JobDescriptionSource {
    /// Job description file (TXT, MD)
    #[arg(long)]
    pub job_file: Option<PathBuf>,

    /// Job description text
    #[arg(long)]
    pub job_text: Option<String>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("console"), Ok(OutputFormat::Console));
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_match_command_parses() {
        let cli = Cli::try_parse_from([
            "jobfoyu", "match", "--cv", "cv.pdf", "--location", "Jakarta", "--remote-only", "-a", "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Match { cv, location, remote_only, analyze, .. } => {
                assert_eq!(cv, PathBuf::from("cv.pdf"));
                assert_eq!(location.as_deref(), Some("Jakarta"));
                assert!(remote_only);
                assert_eq!(analyze, Some(3));
            }
            _ => panic!("expected match command"),
        }
    }

    #[test]
    fn test_improve_requires_one_job_source() {
        assert!(Cli::try_parse_from(["jobfoyu", "improve", "--cv", "cv.pdf"]).is_err());
        assert!(Cli::try_parse_from([
            "jobfoyu", "improve", "--cv", "cv.pdf", "--job-file", "a.txt", "--job-text", "b"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["jobfoyu", "improve", "--cv", "cv.pdf", "--job-text", "Rust"]).is_ok());
    }
}
