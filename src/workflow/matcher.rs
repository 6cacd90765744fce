//! Job matcher workflow: upload a CV, match jobs, analyze the gap for one result

use crate::api::{AnalysisRequest, JobResult, JobService, MatchCriteria, MatchRequest, ServiceResult, TOP_N};
use crate::input::UploadSelection;
use crate::messages::Messages;
use crate::workflow::effect::Effect;
use crate::workflow::outcome::*;
use log::{debug, info};

pub type PendingMatch = PendingRequest<MatchRequest>;
pub type PendingAnalysis = PendingRequest<AnalysisRequest>;

pub struct MatcherWorkflow {
    upload: Option<UploadSelection>,
    criteria: MatchCriteria,
    requery: Effect<MatchCriteria>,
    matches: Region<Vec<JobResult>>,
    gap: Region<String>,
    gap_label: Option<String>,
    messages: Messages,
}

impl MatcherWorkflow {
    pub fn new(messages: Messages) -> Self {
        let criteria = MatchCriteria::default();
        Self {
            upload: None,
            requery: Effect::new(criteria.clone()),
            criteria,
            matches: Region::new("match"),
            gap: Region::new("gap analysis"),
            gap_label: None,
            messages,
        }
    }

    /// Start from the given filters. Nothing fires for the initial criteria.
    pub fn with_criteria(mut self, criteria: MatchCriteria) -> Self {
        self.requery = Effect::new(criteria.clone());
        self.criteria = criteria;
        self
    }

    pub fn select_upload(&mut self, upload: UploadSelection) {
        info!("Selected {}", upload.file_name());
        self.upload = Some(upload);
    }

    pub fn upload(&self) -> Option<&UploadSelection> {
        self.upload.as_ref()
    }

    pub fn criteria(&self) -> &MatchCriteria {
        &self.criteria
    }

    /// Update the location filter. Returns the automatic re-query, if one fires.
    pub fn set_location(&mut self, location: Option<String>) -> Option<PendingMatch> {
        self.criteria.location = location;
        self.on_criteria_changed()
    }

    /// Update the remote-only flag. Returns the automatic re-query, if one fires.
    pub fn set_remote_only(&mut self, remote_only: bool) -> Option<PendingMatch> {
        self.criteria.remote_only = remote_only;
        self.on_criteria_changed()
    }

    /// Re-query effect. Guard: a CV is selected and results are on screen or a
    /// match is still in flight. The in-flight case supersedes the older request
    /// so settled results always belong to the current criteria.
    /// It depends only on the criteria, so the match it starts cannot retrigger it.
    fn on_criteria_changed(&mut self) -> Option<PendingMatch> {
        let results_live = !self.results().is_empty() || self.matches.is_pending();
        let has_upload = self.upload.is_some();
        if self.requery.observe(&self.criteria, || results_live && has_upload) {
            info!("Search filters changed, re-fetching jobs");
            self.begin_match()
        } else {
            None
        }
    }

    /// Start a match. Clears the previous results and any gap analysis.
    /// Returns `None` when validation failed; the error is in the match region.
    pub fn begin_match(&mut self) -> Option<PendingMatch> {
        self.gap.reset();
        self.gap_label = None;

        let Some(upload) = self.upload.clone() else {
            self.matches.fail_local(RequestError::validation(
                ValidationKind::MissingUpload,
                self.messages.missing_cv_for_match,
            ));
            return None;
        };

        let ticket = self.matches.begin();
        debug!("Match request {:?} with {:?}", ticket, self.criteria);
        Some(PendingRequest {
            ticket,
            request: MatchRequest {
                upload,
                criteria: self.criteria.clone(),
                top_n: TOP_N,
            },
        })
    }

    /// Settle a match. Returns `false` for a superseded request.
    pub fn complete_match(&mut self, ticket: Ticket, result: ServiceResult<Vec<JobResult>>) -> bool {
        let result = result.map_err(|e| RequestError::from_service(&e, &self.messages));
        self.matches.settle(ticket, result)
    }

    pub async fn dispatch_match<S: JobService>(&mut self, service: &S, pending: PendingMatch) -> bool {
        let result = service.match_jobs(pending.request).await;
        self.complete_match(pending.ticket, result)
    }

    pub async fn submit_match<S: JobService>(&mut self, service: &S) -> &RequestOutcome<Vec<JobResult>> {
        if let Some(pending) = self.begin_match() {
            self.dispatch_match(service, pending).await;
        }
        self.matches.outcome()
    }

    /// Start a gap analysis against `job`. The label is set before the request goes out.
    pub fn begin_gap_analysis(&mut self, job: &JobResult) -> Option<PendingAnalysis> {
        let Some(upload) = self.upload.clone() else {
            self.gap_label = None;
            self.gap.fail_local(RequestError::validation(
                ValidationKind::MissingUpload,
                self.messages.missing_cv_for_analysis,
            ));
            return None;
        };

        self.gap_label = Some(job.label());
        let ticket = self.gap.begin();
        debug!("Gap analysis request {:?} for {}", ticket, job.label());
        Some(PendingRequest {
            ticket,
            request: AnalysisRequest {
                upload,
                job_description: job.description.clone().unwrap_or_default(),
            },
        })
    }

    pub fn complete_gap_analysis(&mut self, ticket: Ticket, result: ServiceResult<String>) -> bool {
        let result = result.map_err(|e| RequestError::from_service(&e, &self.messages));
        self.gap.settle(ticket, result)
    }

    pub async fn dispatch_gap_analysis<S: JobService>(&mut self, service: &S, pending: PendingAnalysis) -> bool {
        let result = service.analyze_gap(pending.request).await;
        self.complete_gap_analysis(pending.ticket, result)
    }

    pub async fn submit_gap_analysis<S: JobService>(&mut self, service: &S, job: &JobResult) -> &RequestOutcome<String> {
        if let Some(pending) = self.begin_gap_analysis(job) {
            self.dispatch_gap_analysis(service, pending).await;
        }
        self.gap.outcome()
    }

    /// Current results; empty unless the last match succeeded.
    pub fn results(&self) -> &[JobResult] {
        self.matches.value().map(Vec::as_slice).unwrap_or(&[])
    }

    /// 1-based lookup, as listed on screen.
    pub fn job(&self, number: usize) -> Option<&JobResult> {
        number.checked_sub(1).and_then(|idx| self.results().get(idx))
    }

    pub fn match_outcome(&self) -> &RequestOutcome<Vec<JobResult>> {
        self.matches.outcome()
    }

    pub fn gap_outcome(&self) -> &RequestOutcome<String> {
        self.gap.outcome()
    }

    pub fn gap_label(&self) -> Option<&str> {
        self.gap_label.as_deref()
    }

    /// The failure a one-shot run should report: the match error, else the gap analysis error.
    pub fn failure(&self) -> Option<&RequestError> {
        self.matches.error().or_else(|| self.gap.error())
    }
}

impl Default for MatcherWorkflow {
    fn default() -> Self {
        Self::new(Messages::default())
    }
}
