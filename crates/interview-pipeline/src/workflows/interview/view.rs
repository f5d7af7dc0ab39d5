use serde::Serialize;

use super::audit::{audit, RecordAnomaly};
use super::domain::{Application, ApplicationId, ApplicationStatus, CandidateId, Job, JobId};
use super::resolver::{resolve_round_status, RoundStatus};
use super::rounds::{RoundCatalog, RoundNumber};

/// One table cell: a round of the job and the application's status in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundCell {
    pub round_name: &'static str,
    pub round_key: &'static str,
    pub round_number: RoundNumber,
    pub status: RoundStatus,
}

/// Render-ready row for one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRow {
    pub application_id: ApplicationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<CandidateId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub overall_status: String,
    pub rounds: Vec<RoundCell>,
    pub highlighted: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<RecordAnomaly>,
}

/// Overall badge text. Taken from the coarse status only, never folded from round outcomes.
pub fn overall_status_badge(application: Option<&Application>) -> String {
    application
        .map(|application| application.status.badge())
        .unwrap_or_else(|| ApplicationStatus::Pending.badge())
}

pub fn round_cells(application: Option<&Application>, catalog: &RoundCatalog) -> Vec<RoundCell> {
    catalog
        .entries()
        .map(|entry| RoundCell {
            round_name: entry.round.label(),
            round_key: entry.round.key(),
            round_number: entry.number,
            status: resolve_round_status(application, entry.index),
        })
        .collect()
}

/// Builds the row for an application. The populated job on the application takes
/// precedence over `fallback_job`, which covers applications carrying a bare job id.
pub fn build_row(
    application: &Application,
    fallback_job: Option<&Job>,
    highlight_active: bool,
) -> ApplicationRow {
    let job = application.populated_job().or(fallback_job);
    let catalog = RoundCatalog::for_job(job);

    ApplicationRow {
        application_id: application.id.clone(),
        candidate_id: application.candidate_id.clone(),
        job_id: application
            .job_id()
            .or_else(|| fallback_job.map(|job| &job.id))
            .cloned(),
        job_title: job.and_then(|job| job.title.clone()),
        overall_status: overall_status_badge(Some(application)),
        rounds: round_cells(Some(application), &catalog),
        highlighted: highlight_active && application.status == ApplicationStatus::Shortlisted,
        anomalies: audit(application, &catalog),
    }
}

pub fn build_rows(
    applications: &[Application],
    fallback_job: Option<&Job>,
    highlight_active: bool,
) -> Vec<ApplicationRow> {
    applications
        .iter()
        .map(|application| build_row(application, fallback_job, highlight_active))
        .collect()
}
