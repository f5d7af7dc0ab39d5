use serde::{Deserialize, Serialize};
use std::fmt;

use super::domain::Job;

/// Interview round kinds a job can configure. Carries both the display label and the
/// lookup key used by `interviewRoundTypes` / `interviewRoundDetails`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundType {
    Technical,
    Hr,
    Managerial,
    NonTechnical,
    Final,
}

impl RoundType {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Technical,
            Self::Hr,
            Self::Managerial,
            Self::NonTechnical,
            Self::Final,
        ]
    }

    /// Rounds shown when a job has not configured any.
    pub const fn default_set() -> [Self; 3] {
        [Self::Technical, Self::Hr, Self::Final]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Technical => "Technical",
            Self::Hr => "HR",
            Self::Managerial => "Managerial",
            Self::NonTechnical => "Non-Technical",
            Self::Final => "Final",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Hr => "hr",
            Self::Managerial => "managerial",
            Self::NonTechnical => "nonTechnical",
            Self::Final => "final",
        }
    }

    /// Resolves a display label or a lookup key. Anything else is unknown.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ordered()
            .into_iter()
            .find(|round| round.label() == name || round.key() == name)
    }
}

impl fmt::Display for RoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Zero-based position of a round within a job's catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RoundIndex(usize);

impl RoundIndex {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn get(self) -> usize {
        self.0
    }

    /// The one-based number stored on round records for this position.
    pub fn round_number(self) -> RoundNumber {
        let number = u32::try_from(self.0)
            .ok()
            .and_then(|index| index.checked_add(1))
            .unwrap_or(u32::MAX);
        RoundNumber(number)
    }
}

/// One-based round number as persisted on `RoundRecord`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundNumber(u32);

impl RoundNumber {
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this number addresses a round in a catalog of `rounds` entries.
    pub fn within(self, rounds: usize) -> bool {
        self.0 >= 1 && usize::try_from(self.0).is_ok_and(|number| number <= rounds)
    }
}

impl fmt::Display for RoundNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub index: RoundIndex,
    pub number: RoundNumber,
    pub round: RoundType,
}

/// Ordered interview rounds that apply to every application for a job. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundCatalog {
    rounds: Vec<RoundType>,
}

impl RoundCatalog {
    pub fn for_job(job: Option<&Job>) -> Self {
        let configured: Vec<RoundType> = match job.and_then(|job| job.interview_round_types) {
            Some(flags) => RoundType::ordered()
                .into_iter()
                .filter(|round| flags.enabled(*round))
                .collect(),
            None => Vec::new(),
        };

        if configured.is_empty() {
            return Self::default();
        }

        Self { rounds: configured }
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn rounds(&self) -> &[RoundType] {
        &self.rounds
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.rounds.iter().map(|round| round.label()).collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = CatalogEntry> + '_ {
        self.rounds.iter().enumerate().map(|(position, round)| {
            let index = RoundIndex::new(position);
            CatalogEntry {
                index,
                number: index.round_number(),
                round: *round,
            }
        })
    }
}

impl Default for RoundCatalog {
    fn default() -> Self {
        Self {
            rounds: RoundType::default_set().to_vec(),
        }
    }
}
