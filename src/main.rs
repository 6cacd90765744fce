//! jobfoyu: match a CV against IT jobs and see which skills to upgrade

use clap::Parser;
use jobfoyu::api::{HttpJobService, MatchCriteria};
use jobfoyu::cli::{self, Cli, Commands, ConfigAction, JobDescriptionSource};
use jobfoyu::config::{Config, OutputFormat, API_BASE_ENV};
use jobfoyu::error::{JobfoyuError, Result};
use jobfoyu::input::{read_job_description, UploadSelection};
use jobfoyu::messages::Messages;
use jobfoyu::output::{formatter_for, spinner};
use jobfoyu::shell::Session;
use jobfoyu::workflow::{ImproverWorkflow, MatcherWorkflow};
use log::{error, info, warn};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

/// Settings shared by every command, resolved once from flags and config.
struct Context {
    config: Config,
    config_path: PathBuf,
    api_base: Option<String>,
    use_colors: bool,
}

impl Context {
    fn service(&self) -> Result<HttpJobService> {
        let base_url = self.config.resolve_base_url(self.api_base.as_deref())?;
        info!("Using service at {}", base_url);
        let timeout = self.config.api.timeout_secs.map(Duration::from_secs);
        Ok(HttpJobService::new(base_url, timeout)?)
    }

    fn messages(&self) -> Messages {
        Messages::for_locale(self.config.output.locale)
    }

    fn output_format(&self, flag: Option<&str>) -> Result<OutputFormat> {
        match flag {
            Some(format) => cli::parse_output_format(format).map_err(JobfoyuError::InvalidInput),
            None => Ok(self.config.output.format),
        }
    }
}

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let use_colors = config.output.color_output && !cli.no_color;
    if !use_colors {
        colored::control::set_override(false);
    }

    let context = Context {
        config,
        config_path,
        api_base: cli.api_base,
        use_colors,
    };

    // Execute command
    if let Err(e) = run_command(cli.command, context).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, context: Context) -> Result<()> {
    match command {
        Commands::Match {
            cv,
            location,
            remote_only,
            analyze,
            detailed,
            output,
        } => {
            let format = context.output_format(output.as_deref())?;
            let service = context.service()?;

            let mut workflow = MatcherWorkflow::new(context.messages())
                .with_criteria(MatchCriteria { location, remote_only });
            workflow.select_upload(UploadSelection::load(&cv).await?);

            let bar = spinner("Searching for jobs...");
            workflow.submit_match(&service).await;
            bar.finish_and_clear();

            if let Some(number) = analyze {
                match workflow.job(number).cloned() {
                    Some(job) => {
                        let bar = spinner(&format!("Analyzing gap for {}...", job.label()));
                        workflow.submit_gap_analysis(&service, &job).await;
                        bar.finish_and_clear();
                    }
                    None => warn!("No result number {} to analyze ({} results)", number, workflow.results().len()),
                }
            }

            let formatter = formatter_for(format, context.use_colors, detailed);
            println!("{}", formatter.format_matcher(&workflow)?);
            if let Some(failure) = workflow.failure() {
                return Err(failure.clone().into());
            }
        }

        Commands::Improve { cv, job, output } => {
            let format = context.output_format(output.as_deref())?;
            let service = context.service()?;

            let description = match job {
                JobDescriptionSource { job_file: Some(path), .. } => read_job_description(&path).await?,
                JobDescriptionSource { job_text: Some(text), .. } => text,
                _ => {
                    return Err(JobfoyuError::InvalidInput(
                        "Provide --job-file or --job-text".to_string(),
                    ))
                }
            };

            let mut workflow = ImproverWorkflow::new(context.messages());
            workflow.select_upload(UploadSelection::load(&cv).await?);
            workflow.set_job_description(description);

            let bar = spinner("Analyzing...");
            workflow.submit_analysis(&service).await;
            bar.finish_and_clear();

            let formatter = formatter_for(format, context.use_colors, false);
            println!("{}", formatter.format_improver(&workflow)?);
            if let Some(failure) = workflow.error() {
                return Err(failure.clone().into());
            }
        }

        Commands::Shell { cv } => {
            let service = context.service()?;
            let mut workflow = MatcherWorkflow::new(context.messages());
            if let Some(path) = cv {
                workflow.select_upload(UploadSelection::load(&path).await?);
            }

            let mut session = Session::new(service, workflow, context.use_colors);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            session.run(stdin, &mut stdout).await?;
        }

        Commands::Health => {
            let service = context.service()?;
            let status = service.health().await?;
            println!("Service at {}: {}", service.base_url(), status);
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let config = &context.config;
                println!("Configuration ({})\n", context.config_path.display());
                println!(
                    "Service base URL: {}",
                    config.api.base_url.as_deref().unwrap_or("(not set)")
                );
                if let Ok(value) = std::env::var(API_BASE_ENV) {
                    println!("  overridden by {}: {}", API_BASE_ENV, value);
                }
                match config.api.timeout_secs {
                    Some(secs) => println!("Request timeout: {}s", secs),
                    None => println!("Request timeout: none"),
                }
                println!("Output format: {:?}", config.output.format);
                println!("Colors: {}", config.output.color_output);
                println!("Locale: {}", config.output.locale);
            }

            Some(ConfigAction::Reset) => {
                Config::default().save_to(&context.config_path)?;
                println!("Configuration reset: {}", context.config_path.display());
            }

            Some(ConfigAction::Path) => println!("{}", context.config_path.display()),
        },
    }

    Ok(())
}
