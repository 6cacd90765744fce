//! CV improver workflow: CV plus a pasted job description, straight to gap analysis

use crate::api::{AnalysisRequest, JobService, ServiceResult};
use crate::input::UploadSelection;
use crate::messages::Messages;
use crate::workflow::matcher::PendingAnalysis;
use crate::workflow::outcome::*;
use log::{debug, info};

/// Shortest job description accepted, counted on the trimmed text.
pub const MIN_JOB_DESCRIPTION_CHARS: usize = 30;

pub struct ImproverWorkflow {
    upload: Option<UploadSelection>,
    job_description: String,
    report: Region<String>,
    notice: Option<RequestError>,
    messages: Messages,
}

impl ImproverWorkflow {
    pub fn new(messages: Messages) -> Self {
        Self {
            upload: None,
            job_description: String::new(),
            report: Region::new("analysis"),
            notice: None,
            messages,
        }
    }

    pub fn select_upload(&mut self, upload: UploadSelection) {
        info!("Selected {}", upload.file_name());
        self.upload = Some(upload);
    }

    pub fn upload(&self) -> Option<&UploadSelection> {
        self.upload.as_ref()
    }

    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.job_description = text.into();
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    fn validate(&self) -> Result<UploadSelection, RequestError> {
        let upload = self.upload.clone().ok_or_else(|| {
            RequestError::validation(ValidationKind::MissingUpload, self.messages.missing_cv_for_improver)
        })?;

        let length = self.job_description.trim().chars().count();
        if length < MIN_JOB_DESCRIPTION_CHARS {
            debug!("Job description has {} characters", length);
            return Err(RequestError::validation(
                ValidationKind::DescriptionTooShort,
                self.messages.job_description_too_short,
            ));
        }
        Ok(upload)
    }

    /// Validate and start the analysis. On a validation failure the notice is
    /// set and the previous report stays on screen.
    pub fn begin_analysis(&mut self) -> Option<PendingAnalysis> {
        let upload = match self.validate() {
            Ok(upload) => upload,
            Err(error) => {
                self.notice = Some(error);
                return None;
            }
        };

        self.notice = None;
        let ticket = self.report.begin();
        Some(PendingRequest {
            ticket,
            request: AnalysisRequest {
                upload,
                job_description: self.job_description.clone(),
            },
        })
    }

    pub fn complete_analysis(&mut self, ticket: Ticket, result: ServiceResult<String>) -> bool {
        let result = result.map_err(|e| RequestError::from_service(&e, &self.messages));
        self.report.settle(ticket, result)
    }

    pub async fn submit_analysis<S: JobService>(&mut self, service: &S) -> &RequestOutcome<String> {
        if let Some(pending) = self.begin_analysis() {
            let result = service.analyze_gap(pending.request).await;
            self.complete_analysis(pending.ticket, result);
        }
        self.report.outcome()
    }

    pub fn report_outcome(&self) -> &RequestOutcome<String> {
        self.report.outcome()
    }

    /// Markdown of the last successful analysis.
    pub fn report(&self) -> Option<&str> {
        self.report.value().map(String::as_str)
    }

    /// Local validation error from the last submit attempt.
    pub fn notice(&self) -> Option<&RequestError> {
        self.notice.as_ref()
    }

    /// The error to display: validation first, then the remote failure.
    pub fn error(&self) -> Option<&RequestError> {
        self.notice.as_ref().or_else(|| self.report.error())
    }
}

impl Default for ImproverWorkflow {
    fn default() -> Self {
        Self::new(Messages::default())
    }
}
