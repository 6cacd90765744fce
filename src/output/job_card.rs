//! Job card presentation

use crate::api::JobResult;
use colored::{Color, Colorize};
use unicode_segmentation::UnicodeSegmentation;

const DESCRIPTION_PREVIEW: usize = 140;

/// Renders one `JobResult`. The analyze action is shown only when the caller provides one.
pub struct JobCard<'a> {
    job: &'a JobResult,
    number: Option<usize>,
    analyze_action: Option<String>,
    show_description: bool,
}

impl<'a> JobCard<'a> {
    pub fn new(job: &'a JobResult) -> Self {
        Self {
            job,
            number: None,
            analyze_action: None,
            show_description: false,
        }
    }

    pub fn numbered(mut self, number: usize) -> Self {
        self.number = Some(number);
        self
    }

    /// Command the user runs to request a gap analysis for this job.
    pub fn with_analyze_action(mut self, action: impl Into<String>) -> Self {
        self.analyze_action = Some(action.into());
        self
    }

    pub fn with_description(mut self, show: bool) -> Self {
        self.show_description = show;
        self
    }

    pub fn render(&self, use_colors: bool) -> String {
        let paint = |text: &str, color: Color| {
            if use_colors {
                text.color(color).to_string()
            } else {
                text.to_string()
            }
        };

        let job = self.job;
        let mut output = String::new();

        let prefix = self.number.map(|n| format!("{:>2}. ", n)).unwrap_or_default();
        let title = if use_colors { job.title.bold().to_string() } else { job.title.clone() };
        output.push_str(&format!(
            "{}{}  {}\n",
            prefix,
            title,
            Self::format_match(job.match_percentage, use_colors)
        ));

        let indent = " ".repeat(prefix.chars().count());
        let mut identity = job.company.clone();
        if !job.location.is_empty() {
            identity.push_str(&format!(" • {}", job.location));
        }
        output.push_str(&format!("{}{}", indent, paint(&identity, Color::BrightBlack)));
        if job.is_remote {
            output.push_str(&format!("  {}", paint("[Remote]", Color::Cyan)));
        }
        output.push('\n');

        if self.show_description {
            if let Some(description) = &job.description {
                output.push_str(&format!("{}{}\n", indent, preview(description, DESCRIPTION_PREVIEW)));
            }
        }

        if let Some(url) = &job.job_url {
            output.push_str(&format!("{}View details ↗ {}\n", indent, paint(url, Color::Blue)));
        }

        if let Some(action) = &self.analyze_action {
            output.push_str(&format!("{}Gap analysis: {}\n", indent, paint(action, Color::Yellow)));
        }

        output
    }

    fn format_match(percentage: u8, use_colors: bool) -> String {
        let text = format!("{}% match", percentage);
        if !use_colors {
            return text;
        }
        let color = match percentage {
            70..=100 => Color::Green,
            40..=69 => Color::Yellow,
            _ => Color::Red,
        };
        text.color(color).bold().to_string()
    }
}

/// Collapse whitespace and cut at a grapheme boundary, preferring a word break.
pub fn preview(text: &str, max_graphemes: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.graphemes(true).count() <= max_graphemes {
        return collapsed;
    }

    let cut: String = collapsed.graphemes(true).take(max_graphemes).collect();
    let truncated = match cut.rfind(' ') {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}...", truncated)
}
