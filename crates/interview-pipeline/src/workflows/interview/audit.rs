use std::collections::BTreeSet;

use serde::Serialize;

use super::domain::{Application, ApplicationStatus, RoundOutcome};
use super::rounds::{RoundCatalog, RoundNumber};

/// Inconsistencies in stored round data. Reported for operators; derived statuses are
/// never adjusted because of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordAnomaly {
    /// A record whose round number could not be read.
    UnnumberedRecord { position: usize },
    DuplicateRound { round: RoundNumber },
    RoundOutOfRange { round: RoundNumber, catalog_len: usize },
    /// A pending round sits before a round that already passed.
    PendingBeforePassed { pending: RoundNumber, passed: RoundNumber },
    /// The overall badge contradicts a recorded round outcome.
    BadgeDisagreement { overall: String, round: RoundNumber, outcome: String },
}

impl RecordAnomaly {
    pub fn summary(&self) -> String {
        match self {
            RecordAnomaly::UnnumberedRecord { position } => {
                format!("round record #{position} has no usable round number")
            }
            RecordAnomaly::DuplicateRound { round } => {
                format!("round {round} is recorded more than once; the first record wins")
            }
            RecordAnomaly::RoundOutOfRange { round, catalog_len } => {
                format!("round {round} is outside the job's {catalog_len} configured rounds")
            }
            RecordAnomaly::PendingBeforePassed { pending, passed } => {
                format!("round {pending} is pending while later round {passed} passed")
            }
            RecordAnomaly::BadgeDisagreement {
                overall,
                round,
                outcome,
            } => format!("overall status '{overall}' disagrees with round {round} '{outcome}'"),
        }
    }
}

/// Checks an application's round records against the job's catalog.
pub fn audit(application: &Application, catalog: &RoundCatalog) -> Vec<RecordAnomaly> {
    let mut anomalies = Vec::new();
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();

    for (position, record) in application.interview_rounds.iter().enumerate() {
        let Some(round) = record.round else {
            anomalies.push(RecordAnomaly::UnnumberedRecord { position });
            continue;
        };

        if !seen.insert(round) && duplicates.insert(round) {
            anomalies.push(RecordAnomaly::DuplicateRound { round });
        }

        if !round.within(catalog.len()) {
            anomalies.push(RecordAnomaly::RoundOutOfRange {
                round,
                catalog_len: catalog.len(),
            });
        }
    }

    let highest_passed = effective_records(application)
        .filter(|(_, outcome)| matches!(outcome, RoundOutcome::Passed))
        .map(|(round, _)| round)
        .max();

    if let Some(passed) = highest_passed {
        anomalies.extend(
            effective_records(application)
                .filter(|(round, outcome)| {
                    *round < passed && matches!(outcome, RoundOutcome::Pending)
                })
                .map(|(pending, _)| RecordAnomaly::PendingBeforePassed { pending, passed }),
        );
    }

    let conflict = effective_records(application).find(|(round, outcome)| {
        match application.status {
            ApplicationStatus::Pending => matches!(outcome, RoundOutcome::Passed),
            ApplicationStatus::Shortlisted => {
                round.get() > 1 && matches!(outcome, RoundOutcome::Passed)
            }
            ApplicationStatus::Hired => matches!(outcome, RoundOutcome::Failed),
            _ => false,
        }
    });
    if let Some((round, outcome)) = conflict {
        anomalies.push(RecordAnomaly::BadgeDisagreement {
            overall: application.status.badge(),
            round,
            outcome: outcome.as_str().to_string(),
        });
    }

    anomalies
}

/// Records that actually drive resolution: numbered, first occurrence per round.
fn effective_records(
    application: &Application,
) -> impl Iterator<Item = (RoundNumber, &RoundOutcome)> + '_ {
    let mut seen = BTreeSet::new();
    application
        .interview_rounds
        .iter()
        .filter_map(|record| record.round.map(|round| (round, &record.status)))
        .filter(move |(round, _)| seen.insert(*round))
}
