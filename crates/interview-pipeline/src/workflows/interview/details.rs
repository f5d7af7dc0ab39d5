use serde::Serialize;

use super::domain::{AssessmentId, Job, RoundDetail};
use super::rounds::RoundType;

/// Result of looking up one round's configured details on a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDetailLookup {
    pub round_name: String,
    pub round_key: Option<&'static str>,
    pub detail: Option<RoundDetail>,
}

impl RoundDetailLookup {
    /// Maps a round name to its key and clones the job's detail for it. Unknown names and
    /// jobs without details produce an empty lookup, never an error.
    pub fn resolve(job: Option<&Job>, round_name: &str) -> Self {
        let round = RoundType::from_name(round_name);
        let detail = match (job, round) {
            (Some(job), Some(round)) => job.round_detail(round).cloned(),
            _ => None,
        };

        let round_name = match round {
            Some(round) => round.label().to_string(),
            None => round_name.to_string(),
        };

        Self {
            round_name,
            round_key: round.map(RoundType::key),
            detail,
        }
    }

    pub fn round(&self) -> Option<RoundType> {
        self.round_key.and_then(RoundType::from_name)
    }

    pub fn is_configured(&self) -> bool {
        self.detail.is_some()
    }

    /// Assessment the caller should fetch. Only the technical round carries one.
    pub fn assessment_id(&self) -> Option<&AssessmentId> {
        match self.round() {
            Some(RoundType::Technical) => self
                .detail
                .as_ref()
                .and_then(|detail| detail.assessment_id.as_ref()),
            _ => None,
        }
    }
}
