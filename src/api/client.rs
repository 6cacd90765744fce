//! HTTP client for the matching/analysis service

use crate::api::types::*;
use crate::error::ServiceError;
use log::{debug, info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

const MATCH_JOBS_ENDPOINT: &str = "/match-jobs";
const ANALYZE_GAP_ENDPOINT: &str = "/analyze-gap";
const HEALTH_ENDPOINT: &str = "/health";

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// The two calls the workflows depend on.
pub trait JobService {
    fn match_jobs(&self, request: MatchRequest) -> impl Future<Output = ServiceResult<Vec<JobResult>>> + Send;

    fn analyze_gap(&self, request: AnalysisRequest) -> impl Future<Output = ServiceResult<String>> + Send;
}

pub struct HttpJobService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpJobService {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> ServiceResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ServiceError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Use a preconfigured client (proxy, TLS or timeout settings).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// `GET /health`, returns the reported status string.
    pub async fn health(&self) -> ServiceResult<String> {
        let url = self.url(HEALTH_ENDPOINT);
        debug!("Checking service health: {}", url);
        let response = self.client.get(&url).send().await?;
        let body: HealthResponse = decode(response).await?;
        Ok(body.status)
    }

    async fn post_form<T: DeserializeOwned>(&self, endpoint: &str, form: Form) -> ServiceResult<T> {
        let url = self.url(endpoint);
        info!("Calling {}", url);

        let response = self.client.post(&url).multipart(form).send().await?;
        decode(response).await
    }
}

fn file_part(upload: &crate::input::UploadSelection) -> ServiceResult<Part> {
    Part::bytes(upload.content().to_vec())
        .file_name(upload.file_name().to_string())
        .mime_str(upload.mime_type())
        .map_err(|e| ServiceError::Transport(format!("Failed to create multipart: {}", e)))
}

/// Build the `/match-jobs` form. `location_filter` is omitted when no location is set.
pub fn match_form(request: &MatchRequest) -> ServiceResult<Form> {
    let mut form = Form::new()
        .part("file", file_part(&request.upload)?)
        .text("top_n", request.top_n.to_string());
    if let Some(location) = request.criteria.location_filter() {
        form = form.text("location_filter", location.to_string());
    }
    Ok(form.text("remote_only", if request.criteria.remote_only { "true" } else { "false" }))
}

pub fn analysis_form(request: &AnalysisRequest) -> ServiceResult<Form> {
    Ok(Form::new()
        .part("file", file_part(&request.upload)?)
        .text("job_desc", request.job_description.clone()))
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ServiceResult<T> {
    let status = response.status();
    let body = response.text().await?;
    debug!("Response status: {} ({} bytes)", status, body.len());
    parse_body(status, &body)
}

/// Turn a status + raw body into a payload or a `ServiceError`.
pub(crate) fn parse_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> ServiceResult<T> {
    if status.is_success() {
        return serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string()));
    }

    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|error_body| error_body.message());
    if detail.is_none() {
        warn!("Service error {} without detail: {}", status, body);
    }
    Err(ServiceError::Status {
        status: status.as_u16(),
        detail,
    })
}

impl JobService for HttpJobService {
    async fn match_jobs(&self, request: MatchRequest) -> ServiceResult<Vec<JobResult>> {
        let form = match_form(&request)?;
        let response: MatchResponse = self.post_form(MATCH_JOBS_ENDPOINT, form).await?;
        info!("Received {} recommendations", response.recommendations.len());
        Ok(response.recommendations)
    }

    async fn analyze_gap(&self, request: AnalysisRequest) -> ServiceResult<String> {
        let form = analysis_form(&request)?;
        let response: AnalysisResponse = self.post_form(ANALYZE_GAP_ENDPOINT, form).await?;
        Ok(response.markdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success_body() {
        let body = r#"{"status":"success","total":1,"recommendations":[{"title":"Backend Engineer","company":"Acme","location":"Jakarta","is_remote":true,"match_percentage":87}]}"#;
        let parsed: MatchResponse = parse_body(StatusCode::OK, body).unwrap();
        assert_eq!(parsed.recommendations.len(), 1);
    }

    #[test]
    fn test_parse_error_detail() {
        let result: ServiceResult<AnalysisResponse> =
            parse_body(StatusCode::BAD_REQUEST, r#"{"detail":"unsupported file type"}"#);
        match result {
            Err(ServiceError::Status { status, detail }) => {
                assert_eq!(status, 400);
                assert_eq!(detail.as_deref(), Some("unsupported file type"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_without_json() {
        let result: ServiceResult<AnalysisResponse> =
            parse_body(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>");
        assert!(matches!(result, Err(ServiceError::Status { status: 502, detail: None })));
    }

    #[test]
    fn test_parse_malformed_success() {
        let result: ServiceResult<MatchResponse> = parse_body(StatusCode::OK, "not json");
        assert!(matches!(result, Err(ServiceError::Decode(_))));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let service = HttpJobService::new("http://localhost:8000/", None).unwrap();
        assert_eq!(service.url(MATCH_JOBS_ENDPOINT), "http://localhost:8000/match-jobs");
    }
}
