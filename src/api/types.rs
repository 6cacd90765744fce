//! Wire types for the matching/analysis service

use crate::input::UploadSelection;
use serde::{Deserialize, Deserializer, Serialize};

/// Number of recommendations requested per match.
pub const TOP_N: u32 = 10;

/// One recommended job, as returned by `/match-jobs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub is_remote: bool,
    /// Match score, 0-100. The service may send a fractional value; it is rounded.
    #[serde(deserialize_with = "deserialize_percentage")]
    pub match_percentage: u8,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub job_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_non_empty")]
    pub description: Option<String>,
}

impl JobResult {
    /// Label shown next to a gap analysis computed against this job.
    pub fn label(&self) -> String {
        format!("{} @ {}", self.title, self.company)
    }
}

fn deserialize_percentage<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if raw.is_nan() {
        return Ok(0);
    }
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}

fn deserialize_non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Search filters sent alongside the CV.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchCriteria {
    pub location: Option<String>,
    pub remote_only: bool,
}

impl MatchCriteria {
    /// Location to send, if any. Blank input counts as no filter.
    pub fn location_filter(&self) -> Option<&str> {
        self.location.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Payload for `POST /match-jobs`.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub upload: UploadSelection,
    pub criteria: MatchCriteria,
    pub top_n: u32,
}

/// Payload for `POST /analyze-gap`.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub upload: UploadSelection,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct MatchResponse {
    #[serde(default)]
    pub recommendations: Vec<JobResult>,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub markdown: String,
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
}

/// Body of a non-2xx response.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Human-readable detail. Non-string details (e.g. validation arrays) are rendered as JSON.
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::String(_) | serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
