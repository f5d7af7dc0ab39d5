use serde::{Serialize, Serializer};
use tracing::trace;

use super::domain::{Application, ApplicationStatus, RoundOutcome};
use super::rounds::RoundIndex;

/// Presentation weight of a round status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Danger,
    Warning,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatusText {
    Passed,
    Failed,
    Pending,
    Shortlisted,
    Completed,
    InProgress,
    Rejected,
    NotStarted,
}

impl RoundStatusText {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "Passed",
            Self::Failed => "Failed",
            Self::Pending => "Pending",
            Self::Shortlisted => "Shortlisted",
            Self::Completed => "Completed",
            Self::InProgress => "In Progress",
            Self::Rejected => "Rejected",
            Self::NotStarted => "Not Started",
        }
    }

    pub const fn severity(self) -> Severity {
        match self {
            Self::Passed | Self::Shortlisted | Self::Completed => Severity::Success,
            Self::Failed | Self::Rejected => Severity::Danger,
            Self::Pending | Self::InProgress => Severity::Warning,
            Self::NotStarted => Severity::Secondary,
        }
    }
}

impl Serialize for RoundStatusText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Where a round status came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBasis {
    /// An employer-entered round record.
    Recorded,
    /// Derived from the coarse application status.
    Inferred,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundStatus {
    pub text: RoundStatusText,
    pub severity: Severity,
    pub feedback: String,
    pub basis: StatusBasis,
}

impl RoundStatus {
    fn recorded(text: RoundStatusText, feedback: Option<&str>) -> Self {
        Self {
            text,
            severity: text.severity(),
            feedback: feedback.unwrap_or_default().to_string(),
            basis: StatusBasis::Recorded,
        }
    }

    fn inferred(text: RoundStatusText) -> Self {
        Self {
            text,
            severity: text.severity(),
            feedback: String::new(),
            basis: StatusBasis::Inferred,
        }
    }
}

/// Display status for one round of one application.
///
/// A round record whose number matches the position always wins. Without one the status
/// is inferred from the coarse application status. A missing application resolves as a
/// pending application with no records, so every round reads "Not Started".
pub fn resolve_round_status(application: Option<&Application>, index: RoundIndex) -> RoundStatus {
    let number = index.round_number();

    if let Some(record) = application.and_then(|application| application.record_for(number)) {
        let text = match record.status {
            RoundOutcome::Passed => RoundStatusText::Passed,
            RoundOutcome::Failed => RoundStatusText::Failed,
            RoundOutcome::Pending | RoundOutcome::Other(_) => RoundStatusText::Pending,
        };
        return RoundStatus::recorded(text, record.feedback.as_deref());
    }

    let status = application.map(|application| &application.status);
    trace!(round = %number, status = ?status, "no round record; inferring from application status");

    RoundStatus::inferred(infer_from_status(status, index))
}

fn infer_from_status(status: Option<&ApplicationStatus>, index: RoundIndex) -> RoundStatusText {
    match (status, index.get()) {
        (Some(ApplicationStatus::Shortlisted), 0) => RoundStatusText::Shortlisted,
        (Some(ApplicationStatus::Interviewed), 0) => RoundStatusText::Completed,
        (Some(ApplicationStatus::Interviewed), 1) => RoundStatusText::InProgress,
        (Some(ApplicationStatus::Hired), _) => RoundStatusText::Completed,
        (Some(ApplicationStatus::Rejected), _) => RoundStatusText::Rejected,
        _ => RoundStatusText::NotStarted,
    }
}
