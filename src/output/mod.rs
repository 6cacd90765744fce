//! Terminal rendering: job cards, Markdown reports and workflow views

pub mod formatter;
pub mod job_card;
pub mod markdown;
pub mod progress;

pub use formatter::{formatter_for, ConsoleFormatter, JsonFormatter, OutputFormatter};
pub use job_card::JobCard;
pub use markdown::MarkdownViewer;
pub use progress::spinner;
