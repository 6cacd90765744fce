//! Request/response contract with the matching and gap-analysis service

pub mod client;
pub mod types;

pub use client::{HttpJobService, JobService, ServiceResult};
pub use types::{AnalysisRequest, JobResult, MatchCriteria, MatchRequest, TOP_N};
