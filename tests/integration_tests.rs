//! Integration tests for the matcher and improver workflows

use jobfoyu::api::{AnalysisRequest, JobResult, JobService, MatchCriteria, MatchRequest, ServiceResult};
use jobfoyu::input::UploadSelection;
use jobfoyu::output::{ConsoleFormatter, OutputFormatter};
use jobfoyu::shell::Session;
use jobfoyu::workflow::{ImproverWorkflow, MatcherWorkflow, RequestOutcome, ValidationKind};
use jobfoyu::ServiceError;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

/// Records every request and replays queued responses.
#[derive(Default)]
struct RecordingService {
    match_calls: Mutex<Vec<MatchRequest>>,
    analysis_calls: Mutex<Vec<AnalysisRequest>>,
    match_responses: Mutex<VecDeque<ServiceResult<Vec<JobResult>>>>,
    analysis_responses: Mutex<VecDeque<ServiceResult<String>>>,
}

impl RecordingService {
    fn queue_match(&self, response: ServiceResult<Vec<JobResult>>) {
        self.match_responses.lock().unwrap().push_back(response);
    }

    fn queue_analysis(&self, response: ServiceResult<String>) {
        self.analysis_responses.lock().unwrap().push_back(response);
    }

    fn match_count(&self) -> usize {
        self.match_calls.lock().unwrap().len()
    }

    fn analysis_count(&self) -> usize {
        self.analysis_calls.lock().unwrap().len()
    }
}

impl JobService for RecordingService {
    async fn match_jobs(&self, request: MatchRequest) -> ServiceResult<Vec<JobResult>> {
        self.match_calls.lock().unwrap().push(request);
        self.match_responses.lock().unwrap().pop_front().unwrap_or(Ok(Vec::new()))
    }

    async fn analyze_gap(&self, request: AnalysisRequest) -> ServiceResult<String> {
        self.analysis_calls.lock().unwrap().push(request);
        self.analysis_responses.lock().unwrap().pop_front().unwrap_or(Ok(String::new()))
    }
}

fn acme_job() -> JobResult {
    serde_json::from_str(
        r#"{"title":"Backend Engineer","company":"Acme","location":"Jakarta","is_remote":true,"match_percentage":87}"#,
    )
    .unwrap()
}

fn cv() -> UploadSelection {
    UploadSelection::from_bytes("cv.pdf", b"%PDF-1.4".to_vec())
}

async fn matched_workflow(service: &RecordingService) -> MatcherWorkflow {
    let mut workflow = MatcherWorkflow::default();
    workflow.select_upload(cv());
    service.queue_match(Ok(vec![acme_job()]));
    workflow.submit_match(service).await;
    workflow
}

#[tokio::test]
async fn test_match_without_file_never_calls_service() {
    let service = RecordingService::default();
    let mut workflow = MatcherWorkflow::default();

    let outcome = workflow.submit_match(&service).await;
    match outcome {
        RequestOutcome::Failed(error) => assert!(error.is_validation()),
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert_eq!(service.match_count(), 0);
}

#[tokio::test]
async fn test_match_sends_criteria_and_top_n() {
    let service = RecordingService::default();
    let mut workflow = MatcherWorkflow::default();
    workflow.select_upload(cv());
    assert!(workflow.set_location(Some("Bandung".to_string())).is_none());
    assert!(workflow.set_remote_only(true).is_none());

    workflow.submit_match(&service).await;

    let calls = service.match_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].top_n, 10);
    assert_eq!(calls[0].criteria.location_filter(), Some("Bandung"));
    assert!(calls[0].criteria.remote_only);
    assert_eq!(calls[0].upload.file_name(), "cv.pdf");
}

#[tokio::test]
async fn test_successful_match_renders_one_remote_card() {
    let service = RecordingService::default();
    let workflow = matched_workflow(&service).await;

    assert_eq!(workflow.results().len(), 1);
    let output = ConsoleFormatter::new(false).format_matcher(&workflow).unwrap();
    assert!(output.contains("1 jobs found"));
    assert!(output.contains("[Remote]"));
}

#[tokio::test]
async fn test_remote_toggle_requeries_with_new_flag() {
    let service = RecordingService::default();
    let mut workflow = matched_workflow(&service).await;

    let pending = workflow.set_remote_only(true).expect("re-query should fire");
    assert!(pending.request.criteria.remote_only);
    // Old results are discarded while the new request is in flight.
    assert!(workflow.results().is_empty());
    assert!(matches!(workflow.match_outcome(), RequestOutcome::Pending));

    let mut remote_job = acme_job();
    remote_job.title = "Platform Engineer".to_string();
    assert!(workflow.complete_match(pending.ticket, Ok(vec![remote_job])));
    assert_eq!(workflow.results().len(), 1);
    assert_eq!(workflow.results()[0].title, "Platform Engineer");
}

#[tokio::test]
async fn test_requery_does_not_loop_or_fire_without_change() {
    let service = RecordingService::default();
    let mut workflow = matched_workflow(&service).await;

    service.queue_match(Ok(vec![acme_job()]));
    let pending = workflow.set_location(Some("Jakarta".to_string())).unwrap();
    workflow.dispatch_match(&service, pending).await;
    assert_eq!(service.match_count(), 2);

    // Same value again: no dependency change, no request.
    assert!(workflow.set_location(Some("Jakarta".to_string())).is_none());
    assert_eq!(service.match_count(), 2);
}

#[tokio::test]
async fn test_requery_needs_existing_results() {
    let service = RecordingService::default();
    let mut workflow = MatcherWorkflow::default();
    workflow.select_upload(cv());
    service.queue_match(Ok(Vec::new()));
    workflow.submit_match(&service).await;

    assert!(workflow.set_remote_only(true).is_none());
    assert_eq!(service.match_count(), 1);
}

#[tokio::test]
async fn test_filter_change_during_requery_supersedes_it() {
    let service = RecordingService::default();
    let mut workflow = matched_workflow(&service).await;

    let first = workflow.set_remote_only(true).expect("re-query should fire");
    let second = workflow
        .set_location(Some("Bandung".to_string()))
        .expect("change while pending should fire again");
    assert_eq!(second.request.criteria.location_filter(), Some("Bandung"));
    assert!(second.request.criteria.remote_only);

    assert!(!workflow.complete_match(first.ticket, Ok(vec![acme_job(), acme_job()])));
    assert!(workflow.complete_match(second.ticket, Ok(vec![acme_job()])));
    assert_eq!(workflow.results().len(), 1);
}

#[tokio::test]
async fn test_initial_criteria_do_not_fire() {
    let service = RecordingService::default();
    let criteria = MatchCriteria { location: Some("Jakarta".to_string()), remote_only: true };
    let mut workflow = MatcherWorkflow::default().with_criteria(criteria.clone());
    workflow.select_upload(cv());
    assert_eq!(workflow.criteria(), &criteria);

    service.queue_match(Ok(vec![acme_job()]));
    workflow.submit_match(&service).await;
    assert!(workflow.set_remote_only(true).is_none());
    assert_eq!(service.match_calls.lock().unwrap()[0].criteria, criteria);
}

#[tokio::test]
async fn test_failure_prefers_match_error_over_gap_error() {
    let service = RecordingService::default();
    let mut workflow = matched_workflow(&service).await;
    assert!(workflow.failure().is_none());

    let job = workflow.job(1).cloned().unwrap();
    service.queue_analysis(Err(ServiceError::Status { status: 502, detail: Some("analysis down".to_string()) }));
    workflow.submit_gap_analysis(&service, &job).await;
    assert_eq!(workflow.failure().map(|e| e.message()), Some("analysis down"));

    service.queue_match(Err(ServiceError::Status { status: 400, detail: Some("unsupported file type".to_string()) }));
    workflow.submit_match(&service).await;
    assert_eq!(workflow.failure().map(|e| e.message()), Some("unsupported file type"));
}

#[tokio::test]
async fn test_stale_match_response_is_ignored() {
    let mut workflow = MatcherWorkflow::default();
    workflow.select_upload(cv());

    let first = workflow.begin_match().unwrap();
    let second = workflow.begin_match().unwrap();

    let mut newer = acme_job();
    newer.company = "Newer".to_string();
    assert!(workflow.complete_match(second.ticket, Ok(vec![newer])));
    assert!(!workflow.complete_match(first.ticket, Ok(vec![acme_job(), acme_job()])));
    assert_eq!(workflow.results().len(), 1);
    assert_eq!(workflow.results()[0].company, "Newer");
}

#[tokio::test]
async fn test_gap_label_set_before_report_arrives() {
    let service = RecordingService::default();
    let mut workflow = matched_workflow(&service).await;
    let job = workflow.job(1).cloned().unwrap();

    let pending = workflow.begin_gap_analysis(&job).unwrap();
    assert_eq!(workflow.gap_label(), Some("Backend Engineer @ Acme"));
    assert!(matches!(workflow.gap_outcome(), RequestOutcome::Pending));

    assert!(workflow.complete_gap_analysis(pending.ticket, Ok("## Fit\n\nGood".to_string())));
    assert_eq!(workflow.gap_outcome(), &RequestOutcome::Succeeded("## Fit\n\nGood".to_string()));
    assert_eq!(workflow.gap_label(), Some("Backend Engineer @ Acme"));
}

#[tokio::test]
async fn test_match_and_gap_can_be_pending_together() {
    let service = RecordingService::default();
    let mut workflow = matched_workflow(&service).await;
    let job = workflow.job(1).cloned().unwrap();

    let refresh = workflow.set_remote_only(true).unwrap();
    let gap = workflow.begin_gap_analysis(&job).unwrap();
    assert!(matches!(workflow.match_outcome(), RequestOutcome::Pending));
    assert!(matches!(workflow.gap_outcome(), RequestOutcome::Pending));

    assert!(workflow.complete_gap_analysis(gap.ticket, Ok("report".to_string())));
    assert!(workflow.complete_match(refresh.ticket, Ok(vec![acme_job()])));
    assert_eq!(workflow.results().len(), 1);
    assert_eq!(workflow.gap_outcome(), &RequestOutcome::Succeeded("report".to_string()));
}

#[tokio::test]
async fn test_new_match_supersedes_in_flight_gap_analysis() {
    let service = RecordingService::default();
    let mut workflow = matched_workflow(&service).await;
    let job = workflow.job(1).cloned().unwrap();

    let gap = workflow.begin_gap_analysis(&job).unwrap();
    let refresh = workflow.begin_match().unwrap();

    assert!(!workflow.complete_gap_analysis(gap.ticket, Ok("late".to_string())));
    assert!(workflow.complete_match(refresh.ticket, Ok(vec![acme_job()])));
    assert_eq!(workflow.gap_outcome(), &RequestOutcome::Idle);
}

#[tokio::test]
async fn test_gap_analysis_sends_job_description() {
    let service = RecordingService::default();
    let mut workflow = MatcherWorkflow::default();
    workflow.select_upload(cv());
    let mut job = acme_job();
    job.description = Some("Rust, tokio and PostgreSQL".to_string());
    service.queue_match(Ok(vec![job.clone()]));
    workflow.submit_match(&service).await;

    service.queue_analysis(Ok("report".to_string()));
    workflow.submit_gap_analysis(&service, &job).await;

    let calls = service.analysis_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].job_description, "Rust, tokio and PostgreSQL");
}

#[tokio::test]
async fn test_gap_analysis_without_file_is_local_error() {
    let service = RecordingService::default();
    let mut workflow = MatcherWorkflow::default();

    let outcome = workflow.submit_gap_analysis(&service, &acme_job()).await;
    assert!(matches!(outcome, RequestOutcome::Failed(e) if e.is_validation()));
    assert_eq!(service.analysis_count(), 0);
}

#[tokio::test]
async fn test_service_detail_is_shown_verbatim() {
    let service = RecordingService::default();
    let mut workflow = MatcherWorkflow::default();
    workflow.select_upload(cv());
    service.queue_match(Err(ServiceError::Status {
        status: 400,
        detail: Some("unsupported file type".to_string()),
    }));

    match workflow.submit_match(&service).await {
        RequestOutcome::Failed(error) => assert_eq!(error.message(), "unsupported file type"),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_new_match_clears_gap_report_and_error() {
    let service = RecordingService::default();
    let mut workflow = matched_workflow(&service).await;
    let job = workflow.job(1).cloned().unwrap();

    service.queue_analysis(Ok("## Report".to_string()));
    workflow.submit_gap_analysis(&service, &job).await;
    assert!(matches!(workflow.gap_outcome(), RequestOutcome::Succeeded(_)));

    service.queue_match(Ok(vec![acme_job()]));
    workflow.submit_match(&service).await;
    assert_eq!(workflow.gap_outcome(), &RequestOutcome::Idle);
    assert!(workflow.gap_label().is_none());

    service.queue_analysis(Err(ServiceError::Transport("connection reset".to_string())));
    workflow.submit_gap_analysis(&service, &job).await;
    assert!(matches!(workflow.gap_outcome(), RequestOutcome::Failed(_)));

    service.queue_match(Ok(vec![acme_job()]));
    workflow.submit_match(&service).await;
    assert_eq!(workflow.gap_outcome(), &RequestOutcome::Idle);
}

#[tokio::test]
async fn test_improver_description_length_boundary() {
    let service = RecordingService::default();
    let mut workflow = ImproverWorkflow::default();
    workflow.select_upload(cv());

    workflow.set_job_description("a".repeat(29));
    workflow.submit_analysis(&service).await;
    let notice = workflow.notice().expect("validation notice");
    assert!(matches!(
        notice,
        jobfoyu::workflow::RequestError::Validation { kind: ValidationKind::DescriptionTooShort, .. }
    ));
    assert_eq!(service.analysis_count(), 0);

    workflow.set_job_description("a".repeat(30));
    workflow.submit_analysis(&service).await;
    assert!(workflow.notice().is_none());
    assert_eq!(service.analysis_count(), 1);
}

#[tokio::test]
async fn test_improver_length_ignores_surrounding_whitespace() {
    let service = RecordingService::default();
    let mut workflow = ImproverWorkflow::default();
    workflow.select_upload(cv());
    workflow.set_job_description(format!("   {}   \n", "b".repeat(29)));

    workflow.submit_analysis(&service).await;
    assert!(workflow.notice().is_some());
    assert_eq!(service.analysis_count(), 0);
}

#[tokio::test]
async fn test_improver_missing_file() {
    let service = RecordingService::default();
    let mut workflow = ImproverWorkflow::default();
    workflow.set_job_description("x".repeat(50));

    workflow.submit_analysis(&service).await;
    assert!(matches!(
        workflow.notice(),
        Some(jobfoyu::workflow::RequestError::Validation { kind: ValidationKind::MissingUpload, .. })
    ));
    assert_eq!(service.analysis_count(), 0);
}

#[tokio::test]
async fn test_improver_failed_validation_keeps_report() {
    let service = RecordingService::default();
    let mut workflow = ImproverWorkflow::default();
    workflow.select_upload(cv());
    workflow.set_job_description("Senior backend engineer, Rust and distributed systems");
    service.queue_analysis(Ok("## Previous report".to_string()));
    workflow.submit_analysis(&service).await;
    assert_eq!(workflow.report(), Some("## Previous report"));

    workflow.set_job_description("too short");
    workflow.submit_analysis(&service).await;
    assert!(workflow.notice().is_some());
    assert_eq!(workflow.report(), Some("## Previous report"));
    assert_eq!(service.analysis_count(), 1);
}

#[tokio::test]
async fn test_improver_remote_error_uses_fallback() {
    let service = RecordingService::default();
    let mut workflow = ImproverWorkflow::default();
    workflow.select_upload(cv());
    workflow.set_job_description("Senior backend engineer, Rust and distributed systems");
    service.queue_analysis(Err(ServiceError::Status { status: 500, detail: None }));

    workflow.submit_analysis(&service).await;
    assert_eq!(workflow.error().map(|e| e.message()), Some("Something went wrong."));
    assert!(workflow.report().is_none());
}

#[tokio::test]
async fn test_upload_from_fixture() {
    let upload = UploadSelection::load(Path::new("tests/fixtures/sample_cv.pdf")).await.unwrap();
    assert_eq!(upload.file_name(), "sample_cv.pdf");
    assert_eq!(upload.mime_type(), "application/pdf");
    assert!(upload.content().starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_job_description_from_fixture() {
    let text = jobfoyu::input::read_job_description(Path::new("tests/fixtures/job_description.txt"))
        .await
        .unwrap();
    assert!(text.contains("Backend Engineer (Rust)"));
    assert!(text.trim().chars().count() >= 30);
}

#[tokio::test]
async fn test_shell_session_requeries_on_filter_change() {
    let service = RecordingService::default();
    service.queue_match(Ok(vec![acme_job()]));
    service.queue_match(Ok(vec![acme_job()]));
    service.queue_analysis(Ok("### Next steps\n\n1. Learn tokio".to_string()));

    let mut workflow = MatcherWorkflow::default();
    workflow.select_upload(cv());
    let mut session = Session::new(service, workflow, false);

    let input: &[u8] = b"search\nremote on\nanalyze 1\nquit\nsearch\n";
    let mut out = Vec::new();
    session.run(input, &mut out).await.unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(out.contains("Filters changed, searching again..."));
    assert!(out.contains("Position: Backend Engineer @ Acme"));
    assert!(out.contains("1. Learn tokio"));
    assert!(session.workflow().criteria().remote_only);
}

#[tokio::test]
async fn test_shell_reports_bad_commands_and_continues() {
    let service = RecordingService::default();
    let mut session = Session::new(service, MatcherWorkflow::default(), false);

    let input: &[u8] = b"dance\nanalyze 4\nsearch\n";
    let mut out = Vec::new();
    session.run(input, &mut out).await.unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(out.contains("unknown command 'dance'"));
    assert!(out.contains("No result number 4"));
    assert!(out.contains("Please upload your CV"));
}
