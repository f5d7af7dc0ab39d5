//! Interview pipeline status derivation.
//!
//! Given an application and the job it was made to, decides which interview rounds
//! exist, what each round displays, and which overall badge the application carries.
//! Everything below `board` is pure and cheap enough to recompute on every refresh.

pub mod audit;
pub mod board;
pub mod details;
pub mod domain;
mod highlight;
pub mod resolver;
pub mod rounds;
pub mod router;
pub mod source;
pub mod view;

#[cfg(test)]
mod tests;

pub use audit::{audit, RecordAnomaly};
pub use board::{
    BoardSnapshot, BoardView, PipelineBoard, PipelineError, PollingHandle, RefreshOutcome,
    RoundDetailView,
};
pub use details::RoundDetailLookup;
pub use domain::{
    Application, ApplicationId, ApplicationStatus, Assessment, AssessmentId, CandidateId,
    EmployerId, Job, JobId, JobRef, RoundDetail, RoundDetails, RoundOutcome, RoundRecord,
    RoundTypeFlags,
};
pub use highlight::{HighlightSessions, HighlightSignal};
pub use resolver::{resolve_round_status, RoundStatus, RoundStatusText, Severity, StatusBasis};
pub use rounds::{CatalogEntry, RoundCatalog, RoundIndex, RoundNumber, RoundType};
pub use router::pipeline_router;
pub use source::{decode_applications, ApplicationSource, RestApplicationSource, SourceError};
pub use view::{
    build_row, build_rows, overall_status_badge, round_cells, ApplicationRow, RoundCell,
};
