//! Workflow state containers
//! Matcher (upload, match, per-result gap analysis) and improver (upload plus job description)

pub mod effect;
pub mod improver;
pub mod matcher;
pub mod outcome;

pub use improver::{ImproverWorkflow, MIN_JOB_DESCRIPTION_CHARS};
pub use matcher::{MatcherWorkflow, PendingAnalysis, PendingMatch};
pub use outcome::{RequestError, RequestOutcome, Ticket, ValidationKind};
