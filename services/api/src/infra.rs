use interview_pipeline::workflows::interview::{
    Application, ApplicationSource, Assessment, AssessmentId, RestApplicationSource, SourceError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Fixed listing used when no upstream backend is configured.
#[derive(Debug, Default, Clone)]
pub(crate) struct InMemoryApplicationSource {
    applications: Vec<Application>,
    assessments: HashMap<AssessmentId, Assessment>,
}

impl InMemoryApplicationSource {
    pub(crate) fn new(applications: Vec<Application>, assessments: Vec<Assessment>) -> Self {
        let assessments = assessments
            .into_iter()
            .filter_map(|assessment| Some((assessment.id.clone()?, assessment)))
            .collect();
        Self {
            applications,
            assessments,
        }
    }
}

impl ApplicationSource for InMemoryApplicationSource {
    async fn applications(&self) -> Result<Vec<Application>, SourceError> {
        Ok(self.applications.clone())
    }

    async fn assessment(&self, id: &AssessmentId) -> Result<Option<Assessment>, SourceError> {
        Ok(self.assessments.get(id).cloned())
    }
}

/// Source selected at startup from configuration.
#[derive(Debug)]
pub(crate) enum ConfiguredSource {
    Rest(RestApplicationSource),
    InMemory(InMemoryApplicationSource),
}

impl ApplicationSource for ConfiguredSource {
    async fn applications(&self) -> Result<Vec<Application>, SourceError> {
        match self {
            ConfiguredSource::Rest(source) => source.applications().await,
            ConfiguredSource::InMemory(source) => source.applications().await,
        }
    }

    async fn assessment(&self, id: &AssessmentId) -> Result<Option<Assessment>, SourceError> {
        match self {
            ConfiguredSource::Rest(source) => source.assessment(id).await,
            ConfiguredSource::InMemory(source) => source.assessment(id).await,
        }
    }
}
