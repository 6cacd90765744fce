//! Interactive job matcher session

use crate::api::JobService;
use crate::error::Result;
use crate::input::UploadSelection;
use crate::output::{spinner, ConsoleFormatter, OutputFormatter};
use crate::workflow::{MatcherWorkflow, PendingMatch};
use anyhow::{anyhow, bail};
use log::{debug, error};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const HELP: &str = "\
Commands:
  upload <path>      select the CV to match
  location [text]    set the location filter (no text clears it)
  remote on|off      only show remote jobs
  search             match the CV against the job catalogue
  analyze <n>        gap analysis for result number n
  show               redraw the current state
  help               show this help
  quit               leave the session
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Upload(PathBuf),
    Location(Option<String>),
    Remote(bool),
    Search,
    Analyze(usize),
    Show,
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "upload" | "cv" => {
                if rest.is_empty() {
                    bail!("usage: upload <path>");
                }
                ShellCommand::Upload(PathBuf::from(rest))
            }
            "location" | "loc" => ShellCommand::Location((!rest.is_empty()).then(|| rest.to_string())),
            "remote" => match rest.to_lowercase().as_str() {
                "on" | "true" | "yes" => ShellCommand::Remote(true),
                "off" | "false" | "no" => ShellCommand::Remote(false),
                _ => bail!("usage: remote on|off"),
            },
            "search" | "match" => ShellCommand::Search,
            "analyze" | "gap" => {
                let number = rest
                    .parse::<usize>()
                    .map_err(|_| anyhow!("usage: analyze <n>"))?;
                ShellCommand::Analyze(number)
            }
            "show" => ShellCommand::Show,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            other => bail!("unknown command '{}', type 'help'", other),
        };
        Ok(Some(command))
    }
}

/// A matcher workflow driven by typed commands.
pub struct Session<S> {
    service: S,
    workflow: MatcherWorkflow,
    formatter: ConsoleFormatter,
}

impl<S: JobService> Session<S> {
    pub fn new(service: S, workflow: MatcherWorkflow, use_colors: bool) -> Self {
        Self {
            service,
            workflow,
            formatter: ConsoleFormatter::new(use_colors).with_actions(true),
        }
    }

    pub fn workflow(&self) -> &MatcherWorkflow {
        &self.workflow
    }

    /// Read commands until `quit` or end of input.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "{}", HELP)?;
        let mut lines = input.lines();
        loop {
            write!(out, "jobfoyu> ")?;
            out.flush()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            match ShellCommand::parse(&line) {
                Ok(Some(command)) => {
                    if !self.execute(command, out).await? {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => writeln!(out, "{}", e)?,
            }
        }
        Ok(())
    }

    /// Apply one command. Returns `false` when the session should end.
    pub async fn execute<W: Write>(&mut self, command: ShellCommand, out: &mut W) -> Result<bool> {
        debug!("Shell command: {:?}", command);
        match command {
            ShellCommand::Upload(path) => match UploadSelection::load(&path).await {
                Ok(upload) => {
                    writeln!(out, "Selected {}", upload.file_name())?;
                    self.workflow.select_upload(upload);
                }
                Err(e) => {
                    error!("Could not load {}: {}", path.display(), e);
                    writeln!(out, "{}", e)?;
                }
            },
            ShellCommand::Location(location) => {
                let pending = self.workflow.set_location(location);
                self.requery(pending, out).await?;
            }
            ShellCommand::Remote(remote_only) => {
                let pending = self.workflow.set_remote_only(remote_only);
                self.requery(pending, out).await?;
            }
            ShellCommand::Search => {
                if let Some(pending) = self.workflow.begin_match() {
                    self.dispatch(pending).await;
                }
                self.render(out)?;
            }
            ShellCommand::Analyze(number) => {
                let Some(job) = self.workflow.job(number).cloned() else {
                    writeln!(out, "No result number {}", number)?;
                    return Ok(true);
                };
                if let Some(pending) = self.workflow.begin_gap_analysis(&job) {
                    self.render(out)?;
                    let bar = spinner("Analyzing CV and job description...");
                    self.workflow.dispatch_gap_analysis(&self.service, pending).await;
                    bar.finish_and_clear();
                }
                self.render(out)?;
            }
            ShellCommand::Show => self.render(out)?,
            ShellCommand::Help => writeln!(out, "{}", HELP)?,
            ShellCommand::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Run the automatic re-query if changing the filters triggered one.
    async fn requery<W: Write>(&mut self, pending: Option<PendingMatch>, out: &mut W) -> Result<()> {
        match pending {
            Some(pending) => {
                writeln!(out, "Filters changed, searching again...")?;
                self.dispatch(pending).await;
                self.render(out)
            }
            None => {
                let criteria = self.workflow.criteria();
                writeln!(
                    out,
                    "Location: {} | Remote only: {}",
                    criteria.location_filter().unwrap_or("any"),
                    if criteria.remote_only { "yes" } else { "no" }
                )?;
                Ok(())
            }
        }
    }

    async fn dispatch(&mut self, pending: PendingMatch) {
        let bar = spinner("Searching for jobs...");
        self.workflow.dispatch_match(&self.service, pending).await;
        bar.finish_and_clear();
    }

    fn render<W: Write>(&self, out: &mut W) -> Result<()> {
        let view = self.formatter.format_matcher(&self.workflow)?;
        write!(out, "{}", view)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ShellCommand::parse("  ").unwrap(), None);
        assert_eq!(ShellCommand::parse("search").unwrap(), Some(ShellCommand::Search));
        assert_eq!(ShellCommand::parse("remote ON").unwrap(), Some(ShellCommand::Remote(true)));
        assert_eq!(ShellCommand::parse("analyze 3").unwrap(), Some(ShellCommand::Analyze(3)));
        assert_eq!(
            ShellCommand::parse("location South Jakarta").unwrap(),
            Some(ShellCommand::Location(Some("South Jakarta".to_string())))
        );
        assert_eq!(ShellCommand::parse("location").unwrap(), Some(ShellCommand::Location(None)));
        assert_eq!(
            ShellCommand::parse("upload my cv.pdf").unwrap(),
            Some(ShellCommand::Upload(PathBuf::from("my cv.pdf")))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(ShellCommand::parse("remote maybe").is_err());
        assert!(ShellCommand::parse("analyze x").is_err());
        assert!(ShellCommand::parse("upload").is_err());
        assert!(ShellCommand::parse("dance").is_err());
    }
}
