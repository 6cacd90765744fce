//! Output formatters for the two workflows

use crate::api::JobResult;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::job_card::JobCard;
use crate::output::markdown::MarkdownViewer;
use crate::workflow::{ImproverWorkflow, MatcherWorkflow, RequestOutcome};
use colored::{Color, Colorize};
use serde::Serialize;

/// Trait for rendering workflow state
pub trait OutputFormatter {
    fn format_matcher(&self, workflow: &MatcherWorkflow) -> Result<String>;
    fn format_improver(&self, workflow: &ImproverWorkflow) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors
pub struct ConsoleFormatter {
    use_colors: bool,
    show_actions: bool,
    detailed: bool,
}

/// JSON formatter for scripting
pub struct JsonFormatter {
    pretty: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            show_actions: false,
            detailed: false,
        }
    }

    /// Show the per-job analyze command (interactive session only).
    pub fn with_actions(mut self, show: bool) -> Self {
        self.show_actions = show;
        self
    }

    /// Include description previews on job cards.
    pub fn detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_error(&self, message: &str) -> String {
        format!("{} {}\n", self.colorize("✖", Color::Red), self.colorize(message, Color::Red))
    }

    fn format_results(&self, results: &[JobResult]) -> String {
        let mut output = format!("{} jobs found\n\n", results.len());
        for (idx, job) in results.iter().enumerate() {
            let number = idx + 1;
            let mut card = JobCard::new(job).numbered(number).with_description(self.detailed);
            if self.show_actions {
                card = card.with_analyze_action(format!("analyze {}", number));
            }
            output.push_str(&card.render(self.use_colors));
            output.push('\n');
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_matcher(&self, workflow: &MatcherWorkflow) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("Job Matcher", 1));
        match workflow.upload() {
            Some(upload) => output.push_str(&format!("CV: {}\n", upload.file_name())),
            None => output.push_str(&format!("CV: {}\n", self.colorize("(none selected)", Color::BrightBlack))),
        }
        let criteria = workflow.criteria();
        output.push_str(&format!(
            "Location: {} | Remote only: {}\n",
            criteria.location_filter().unwrap_or("any"),
            if criteria.remote_only { "yes" } else { "no" }
        ));

        output.push_str(&self.format_header("Results", 2));
        match workflow.match_outcome() {
            RequestOutcome::Pending => output.push_str("Searching for jobs...\n"),
            RequestOutcome::Failed(error) => output.push_str(&self.format_error(error.message())),
            RequestOutcome::Succeeded(results) if !results.is_empty() => {
                output.push_str(&self.format_results(results));
            }
            RequestOutcome::Succeeded(_) | RequestOutcome::Idle => {
                output.push_str(&self.colorize(
                    "Upload your CV to see matching job recommendations.\n",
                    Color::BrightBlack,
                ));
            }
        }

        output.push_str(&self.format_header("CV vs Job Gap Analysis", 2));
        if let Some(label) = workflow.gap_label() {
            output.push_str(&format!("Position: {}\n", self.colorize(label, Color::Cyan)));
        }
        match workflow.gap_outcome() {
            RequestOutcome::Pending => output.push_str("Analyzing CV and job description...\n"),
            RequestOutcome::Failed(error) => output.push_str(&self.format_error(error.message())),
            RequestOutcome::Succeeded(markdown) if !markdown.trim().is_empty() => {
                output.push('\n');
                output.push_str(&MarkdownViewer::new(self.use_colors).render(markdown));
            }
            RequestOutcome::Succeeded(_) => {}
            RequestOutcome::Idle => {
                output.push_str(&self.colorize(
                    "Pick one of the jobs above and request a gap analysis to see the details.\n",
                    Color::BrightBlack,
                ));
            }
        }

        Ok(output)
    }

    fn format_improver(&self, workflow: &ImproverWorkflow) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("CV Improver", 1));
        if let Some(upload) = workflow.upload() {
            output.push_str(&format!("CV: {}\n", upload.file_name()));
        }
        output.push_str(&format!(
            "Job description: {} characters\n",
            workflow.job_description().trim().chars().count()
        ));

        if let Some(error) = workflow.error() {
            output.push_str(&self.format_error(error.message()));
        }

        let outcome = workflow.report_outcome();
        if matches!(outcome, RequestOutcome::Pending) {
            output.push_str("Analyzing...\n");
        }

        match workflow.report() {
            Some(markdown) if !markdown.trim().is_empty() => {
                output.push('\n');
                output.push_str(&MarkdownViewer::new(self.use_colors).render(markdown));
            }
            _ => {
                if workflow.error().is_none() && !matches!(outcome, RequestOutcome::Pending) {
                    output.push_str(&self.colorize(
                        "The analysis will appear here once you submit.\n",
                        Color::BrightBlack,
                    ));
                }
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

#[derive(Serialize)]
struct MatcherSnapshot<'a> {
    cv: Option<&'a str>,
    location_filter: Option<&'a str>,
    remote_only: bool,
    total: usize,
    recommendations: &'a [JobResult],
    error: Option<&'a str>,
    gap_analysis: GapSnapshot<'a>,
}

#[derive(Serialize)]
struct GapSnapshot<'a> {
    job: Option<&'a str>,
    markdown: Option<&'a str>,
    error: Option<&'a str>,
}

#[derive(Serialize)]
struct ImproverSnapshot<'a> {
    cv: Option<&'a str>,
    markdown: Option<&'a str>,
    error: Option<&'a str>,
}

fn outcome_error<T>(outcome: &RequestOutcome<T>) -> Option<&str> {
    match outcome {
        RequestOutcome::Failed(error) => Some(error.message()),
        _ => None,
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_matcher(&self, workflow: &MatcherWorkflow) -> Result<String> {
        let results = workflow.results();
        let gap_markdown = match workflow.gap_outcome() {
            RequestOutcome::Succeeded(markdown) => Some(markdown.as_str()),
            _ => None,
        };
        let snapshot = MatcherSnapshot {
            cv: workflow.upload().map(|u| u.file_name()),
            location_filter: workflow.criteria().location_filter(),
            remote_only: workflow.criteria().remote_only,
            total: results.len(),
            recommendations: results,
            error: outcome_error(workflow.match_outcome()),
            gap_analysis: GapSnapshot {
                job: workflow.gap_label(),
                markdown: gap_markdown,
                error: outcome_error(workflow.gap_outcome()),
            },
        };
        self.to_json(&snapshot)
    }

    fn format_improver(&self, workflow: &ImproverWorkflow) -> Result<String> {
        let snapshot = ImproverSnapshot {
            cv: workflow.upload().map(|u| u.file_name()),
            markdown: workflow.report(),
            error: workflow.error().map(|e| e.message()),
        };
        self.to_json(&snapshot)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

/// Pick the formatter for a configured format.
pub fn formatter_for(format: OutputFormat, use_colors: bool, detailed: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Console => Box::new(ConsoleFormatter::new(use_colors).detailed(detailed)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
    }
}
