use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;
use tokio::sync::Notify;

use crate::config::PipelineConfig;
use crate::workflows::interview::domain::{
    Application, ApplicationId, ApplicationStatus, Assessment, AssessmentId, Job, JobId, JobRef,
    RoundDetail, RoundDetails, RoundOutcome, RoundRecord, RoundTypeFlags,
};
use crate::workflows::interview::rounds::RoundNumber;
use crate::workflows::interview::source::{ApplicationSource, SourceError};
use crate::workflows::interview::PipelineBoard;

pub(super) fn job(flags: Option<RoundTypeFlags>) -> Job {
    Job {
        id: JobId::from("job-backend"),
        title: Some("Backend Engineer".to_string()),
        interview_round_types: flags,
        interview_round_details: None,
    }
}

pub(super) fn flags(keys: &[&str]) -> RoundTypeFlags {
    let mut flags = RoundTypeFlags::default();
    for key in keys {
        match *key {
            "technical" => flags.technical = true,
            "hr" => flags.hr = true,
            "managerial" => flags.managerial = true,
            "nonTechnical" => flags.non_technical = true,
            "final" => flags.final_round = true,
            other => panic!("unknown round key {other}"),
        }
    }
    flags
}

pub(super) fn detailed_job() -> Job {
    let mut job = job(Some(flags(&["technical", "hr"])));
    job.interview_round_details = Some(RoundDetails {
        technical: Some(RoundDetail {
            description: Some("Pairing exercise on the ingestion service".to_string()),
            time: Some("10:30".to_string()),
            assessment_id: Some(AssessmentId::from("asmt-dsa")),
            ..RoundDetail::default()
        }),
        hr: Some(RoundDetail {
            description: Some("Culture and compensation".to_string()),
            ..RoundDetail::default()
        }),
        ..RoundDetails::default()
    });
    job
}

pub(super) fn record(round: u32, status: RoundOutcome) -> RoundRecord {
    RoundRecord {
        round: Some(RoundNumber::new(round)),
        status,
        feedback: None,
    }
}

pub(super) fn application(
    id: &str,
    status: ApplicationStatus,
    rounds: Vec<RoundRecord>,
) -> Application {
    Application {
        id: ApplicationId::from(id),
        status,
        interview_rounds: rounds,
        ..Application::default()
    }
}

pub(super) fn application_for(
    id: &str,
    job: &Job,
    status: ApplicationStatus,
    rounds: Vec<RoundRecord>,
) -> Application {
    let mut application = application(id, status, rounds);
    application.job = Some(JobRef::Populated(Box::new(job.clone())));
    application
}

pub(super) fn board_config() -> PipelineConfig {
    PipelineConfig {
        upstream_url: None,
        refresh_interval: Duration::from_secs(30),
        highlight_window: Duration::from_secs(5),
        request_timeout: Duration::from_secs(10),
    }
}

#[derive(Default)]
pub(super) struct MemorySource {
    applications: Mutex<Vec<Application>>,
    assessments: Mutex<HashMap<AssessmentId, Assessment>>,
    fetches: AtomicUsize,
}

impl MemorySource {
    pub(super) fn with_applications(applications: Vec<Application>) -> Self {
        let source = Self::default();
        source.replace(applications);
        source
    }

    pub(super) fn replace(&self, applications: Vec<Application>) {
        *self.applications.lock().expect("source mutex poisoned") = applications;
    }

    pub(super) fn add_assessment(&self, assessment: Assessment) {
        let id = assessment.id.clone().expect("assessment id");
        self.assessments
            .lock()
            .expect("source mutex poisoned")
            .insert(id, assessment);
    }

    pub(super) fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl ApplicationSource for MemorySource {
    async fn applications(&self) -> Result<Vec<Application>, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .applications
            .lock()
            .expect("source mutex poisoned")
            .clone())
    }

    async fn assessment(&self, id: &AssessmentId) -> Result<Option<Assessment>, SourceError> {
        Ok(self
            .assessments
            .lock()
            .expect("source mutex poisoned")
            .get(id)
            .cloned())
    }
}

pub(super) struct UnavailableSource;

impl ApplicationSource for UnavailableSource {
    async fn applications(&self) -> Result<Vec<Application>, SourceError> {
        Err(SourceError::Unavailable("backend offline".to_string()))
    }

    async fn assessment(&self, _id: &AssessmentId) -> Result<Option<Assessment>, SourceError> {
        Err(SourceError::Unavailable("backend offline".to_string()))
    }
}

/// Holds every fetch until released so tests can overlap refreshes deterministically.
#[derive(Default)]
pub(super) struct GatedSource {
    pub(super) entered: Notify,
    pub(super) release: Notify,
}

impl ApplicationSource for GatedSource {
    async fn applications(&self) -> Result<Vec<Application>, SourceError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(vec![application(
            "app-gated",
            ApplicationStatus::Shortlisted,
            Vec::new(),
        )])
    }

    async fn assessment(&self, _id: &AssessmentId) -> Result<Option<Assessment>, SourceError> {
        Ok(None)
    }
}

pub(super) fn build_board<S>(source: S) -> Arc<PipelineBoard<S>>
where
    S: ApplicationSource + 'static,
{
    Arc::new(PipelineBoard::new(Arc::new(source), &board_config()))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
