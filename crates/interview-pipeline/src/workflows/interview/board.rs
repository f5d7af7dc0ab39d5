use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::audit::audit;
use super::details::RoundDetailLookup;
use super::domain::{Application, ApplicationId, Assessment};
use super::highlight::HighlightSessions;
use super::rounds::RoundCatalog;
use super::source::{ApplicationSource, SourceError};
use super::view::{build_rows, ApplicationRow};
use crate::config::PipelineConfig;

/// Last successfully fetched application list.
#[derive(Debug, Clone, Default)]
pub struct BoardSnapshot {
    pub applications: Vec<Application>,
    pub fetched_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RefreshOutcome {
    Refreshed { applications: usize },
    /// Another refresh was already in flight; this request was dropped.
    Skipped,
}

/// Rows derived from the current snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub fetched_at: Option<DateTime<Utc>>,
    pub highlight_active: bool,
    pub applications: Vec<ApplicationRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDetailView {
    pub application_id: ApplicationId,
    #[serde(flatten)]
    pub lookup: RoundDetailLookup,
    pub assessment: Option<Assessment>,
}

/// Error raised by board operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("application {0} not found")]
    ApplicationNotFound(ApplicationId),
}

/// Shared pipeline state: the latest snapshot, the refresh gate and per-viewer highlights.
pub struct PipelineBoard<S> {
    source: Arc<S>,
    snapshot: RwLock<Arc<BoardSnapshot>>,
    refresh_gate: Mutex<()>,
    highlights: HighlightSessions,
    refresh_interval: Duration,
}

impl<S> PipelineBoard<S>
where
    S: ApplicationSource + 'static,
{
    pub fn new(source: Arc<S>, config: &PipelineConfig) -> Self {
        Self {
            source,
            snapshot: RwLock::new(Arc::new(BoardSnapshot::default())),
            refresh_gate: Mutex::new(()),
            highlights: HighlightSessions::new(config.highlight_window),
            refresh_interval: config.refresh_interval,
        }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn highlights(&self) -> &HighlightSessions {
        &self.highlights
    }

    /// Highlight state for one request. A named viewer's `requested` flag arms that viewer's
    /// window; an anonymous request is emphasised for its own response only.
    pub fn highlight_for(&self, viewer: Option<&str>, requested: bool) -> bool {
        let Some(viewer) = viewer else {
            return requested;
        };
        if requested {
            self.highlights.arm(viewer);
        }
        self.highlights.is_active(viewer)
    }

    pub async fn snapshot(&self) -> Arc<BoardSnapshot> {
        Arc::clone(&*self.snapshot.read().await)
    }

    /// Fetches a fresh list and swaps it in whole. Concurrent requests are dropped, and a
    /// failed fetch leaves the previous snapshot untouched.
    pub async fn refresh(&self) -> Result<RefreshOutcome, PipelineError> {
        let Ok(_gate) = self.refresh_gate.try_lock() else {
            debug!("refresh already in flight; dropping request");
            return Ok(RefreshOutcome::Skipped);
        };

        let applications = self.source.applications().await?;

        for application in &applications {
            let catalog = RoundCatalog::for_job(application.populated_job());
            for anomaly in audit(application, &catalog) {
                warn!(application = %application.id, anomaly = %anomaly.summary(), "inconsistent round records");
            }
        }

        let count = applications.len();
        let snapshot = BoardSnapshot {
            applications,
            fetched_at: Some(Utc::now()),
        };
        *self.snapshot.write().await = Arc::new(snapshot);

        info!(applications = count, "pipeline board refreshed");
        Ok(RefreshOutcome::Refreshed {
            applications: count,
        })
    }

    /// Recomputes every row from the snapshot. Nothing is cached between calls.
    pub async fn view(&self, highlight_active: bool) -> BoardView {
        let snapshot = self.snapshot().await;

        BoardView {
            fetched_at: snapshot.fetched_at,
            highlight_active,
            applications: build_rows(&snapshot.applications, None, highlight_active),
        }
    }

    /// Looks up one round's details for an application, fetching the assessment for
    /// technical rounds. A failed assessment fetch degrades to no assessment.
    pub async fn round_detail(
        &self,
        application_id: &ApplicationId,
        round_name: &str,
    ) -> Result<RoundDetailView, PipelineError> {
        let snapshot = self.snapshot().await;
        let application = snapshot
            .applications
            .iter()
            .find(|application| &application.id == application_id)
            .ok_or_else(|| PipelineError::ApplicationNotFound(application_id.clone()))?;

        let lookup = RoundDetailLookup::resolve(application.populated_job(), round_name);

        let assessment = match lookup.assessment_id() {
            Some(assessment_id) => match self.source.assessment(assessment_id).await {
                Ok(assessment) => assessment,
                Err(err) => {
                    warn!(%assessment_id, error = %err, "assessment fetch failed");
                    None
                }
            },
            None => None,
        };

        Ok(RoundDetailView {
            application_id: application.id.clone(),
            lookup,
            assessment,
        })
    }

    /// Refreshes immediately and then on every interval tick until the handle is dropped
    /// or the board itself goes away.
    pub fn spawn_polling(self: &Arc<Self>) -> PollingHandle {
        let board: Weak<Self> = Arc::downgrade(self);
        let every = self.refresh_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                let Some(board) = board.upgrade() else {
                    break;
                };
                if let Err(err) = board.refresh().await {
                    warn!(error = %err, "scheduled refresh failed; keeping previous snapshot");
                }
            }
        });

        PollingHandle { handle }
    }
}

/// Owns the polling task; dropping it stops polling.
#[derive(Debug)]
pub struct PollingHandle {
    handle: JoinHandle<()>,
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
