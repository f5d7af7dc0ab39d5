use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::rounds::{RoundNumber, RoundType};

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

identifier!(
    /// Identifier wrapper for submitted applications.
    ApplicationId
);
identifier!(JobId);
identifier!(CandidateId);
identifier!(EmployerId);
identifier!(
    /// Reference to an externally stored technical-round assessment.
    AssessmentId
);

/// Posted job as embedded in an application record. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "JobDocument")]
pub struct Job {
    pub id: JobId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_round_types: Option<RoundTypeFlags>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_round_details: Option<RoundDetails>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobDocument {
    #[serde(flatten)]
    key: DocumentKey,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    interview_round_types: Option<RoundTypeFlags>,
    #[serde(default, deserialize_with = "lenient")]
    interview_round_details: Option<RoundDetails>,
}

impl From<JobDocument> for Job {
    fn from(document: JobDocument) -> Self {
        Self {
            id: document.key.resolve().unwrap_or_default(),
            title: document.title,
            interview_round_types: document.interview_round_types,
            interview_round_details: document.interview_round_details,
        }
    }
}

impl Job {
    /// The configured detail for one round, if the employer supplied any.
    pub fn round_detail(&self, round: RoundType) -> Option<&RoundDetail> {
        self.interview_round_details
            .as_ref()
            .and_then(|details| details.get(round))
    }
}

/// Employer-selected interview rounds. Values follow JavaScript truthiness on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundTypeFlags {
    #[serde(default, deserialize_with = "truthy")]
    pub technical: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub hr: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub managerial: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub non_technical: bool,
    #[serde(default, rename = "final", deserialize_with = "truthy")]
    pub final_round: bool,
}

impl RoundTypeFlags {
    pub fn enabled(&self, round: RoundType) -> bool {
        match round {
            RoundType::Technical => self.technical,
            RoundType::Hr => self.hr,
            RoundType::Managerial => self.managerial,
            RoundType::NonTechnical => self.non_technical,
            RoundType::Final => self.final_round,
        }
    }
}

/// Per-round schedule and description keyed by round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDetails {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub technical: Option<RoundDetail>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub hr: Option<RoundDetail>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub managerial: Option<RoundDetail>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub non_technical: Option<RoundDetail>,
    #[serde(
        default,
        rename = "final",
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub final_round: Option<RoundDetail>,
}

impl RoundDetails {
    pub fn get(&self, round: RoundType) -> Option<&RoundDetail> {
        match round {
            RoundType::Technical => self.technical.as_ref(),
            RoundType::Hr => self.hr.as_ref(),
            RoundType::Managerial => self.managerial.as_ref(),
            RoundType::NonTechnical => self.non_technical.as_ref(),
            RoundType::Final => self.final_round.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDetail {
    #[serde(default, deserialize_with = "lenient_date")]
    pub from_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub to_date: Option<NaiveDate>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Only meaningful on the technical round.
    #[serde(
        default,
        deserialize_with = "reference_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub assessment_id: Option<AssessmentId>,
}

/// Coarse stage recorded on the application itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Shortlisted,
    Interviewed,
    Hired,
    Rejected,
    /// Any value the backend sends that this engine does not know about.
    Other(String),
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Shortlisted => "shortlisted",
            Self::Interviewed => "interviewed",
            Self::Hired => "hired",
            Self::Rejected => "rejected",
            Self::Other(raw) => raw,
        }
    }

    /// Badge text: the raw status with its first character upper-cased.
    pub fn badge(&self) -> String {
        let raw = self.as_str();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => "Pending".to_string(),
        }
    }
}

impl From<String> for ApplicationStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "" | "pending" => Self::Pending,
            "shortlisted" => Self::Shortlisted,
            "interviewed" => Self::Interviewed,
            "hired" => Self::Hired,
            "rejected" => Self::Rejected,
            _ => Self::Other(value),
        }
    }
}

impl From<ApplicationStatus> for String {
    fn from(value: ApplicationStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Outcome recorded by an employer for a single round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoundOutcome {
    Passed,
    Failed,
    #[default]
    Pending,
    Other(String),
}

impl RoundOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Pending => "pending",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for RoundOutcome {
    fn from(value: String) -> Self {
        match value.as_str() {
            "passed" => Self::Passed,
            "failed" => Self::Failed,
            "pending" => Self::Pending,
            _ => Self::Other(value),
        }
    }
}

impl From<RoundOutcome> for String {
    fn from(value: RoundOutcome) -> Self {
        value.as_str().to_string()
    }
}

/// Authoritative, employer-entered result for one round of one application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// One-based round number. Absent when the stored value was not a positive integer.
    #[serde(default, deserialize_with = "lenient_round")]
    pub round: Option<RoundNumber>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: RoundOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

/// The job reference on an application: either a bare id or the populated job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobRef {
    Id(JobId),
    Populated(Box<Job>),
}

impl JobRef {
    pub fn id(&self) -> &JobId {
        match self {
            JobRef::Id(id) => id,
            JobRef::Populated(job) => &job.id,
        }
    }

    pub fn job(&self) -> Option<&Job> {
        match self {
            JobRef::Id(_) => None,
            JobRef::Populated(job) => Some(job),
        }
    }
}

/// A candidate's application to one job as returned by the REST backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ApplicationDocument")]
pub struct Application {
    pub id: ApplicationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<CandidateId>,
    #[serde(rename = "jobId", skip_serializing_if = "Option::is_none")]
    pub job: Option<JobRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_id: Option<EmployerId>,
    pub status: ApplicationStatus,
    pub interview_rounds: Vec<RoundRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplicationDocument {
    #[serde(flatten)]
    key: DocumentKey,
    #[serde(default, deserialize_with = "reference_id")]
    candidate_id: Option<CandidateId>,
    #[serde(default, rename = "jobId", deserialize_with = "lenient")]
    job: Option<JobRef>,
    #[serde(default, deserialize_with = "reference_id")]
    employer_id: Option<EmployerId>,
    #[serde(default, deserialize_with = "null_as_default")]
    status: ApplicationStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    interview_rounds: Vec<RoundRecord>,
}

impl TryFrom<ApplicationDocument> for Application {
    type Error = &'static str;

    fn try_from(document: ApplicationDocument) -> Result<Self, Self::Error> {
        let id = document
            .key
            .resolve()
            .ok_or("application record carries neither `_id` nor `id`")?;

        Ok(Self {
            id,
            candidate_id: document.candidate_id,
            job: document.job,
            employer_id: document.employer_id,
            status: document.status,
            interview_rounds: document.interview_rounds,
        })
    }
}

impl Application {
    pub fn populated_job(&self) -> Option<&Job> {
        self.job.as_ref().and_then(JobRef::job)
    }

    pub fn job_id(&self) -> Option<&JobId> {
        self.job.as_ref().map(JobRef::id)
    }

    /// First recorded outcome for the given round, matching lookup order on the backend.
    pub fn record_for(&self, round: RoundNumber) -> Option<&RoundRecord> {
        self.interview_rounds
            .iter()
            .find(|record| record.round == Some(round))
    }
}

/// Technical-round assessment projection, fetched on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "AssessmentDocument")]
pub struct Assessment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<AssessmentId>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Minutes allowed.
    pub timer: Option<u32>,
    pub total_questions: Option<u32>,
    pub passing_percentage: Option<f32>,
    pub description: Option<String>,
    pub instructions: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssessmentDocument {
    #[serde(flatten)]
    key: DocumentKey,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    timer: Option<u32>,
    #[serde(default)]
    total_questions: Option<u32>,
    #[serde(default)]
    passing_percentage: Option<f32>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    instructions: Option<String>,
}

impl From<AssessmentDocument> for Assessment {
    fn from(document: AssessmentDocument) -> Self {
        Self {
            id: document.key.resolve(),
            title: document.title,
            kind: document.kind,
            timer: document.timer,
            total_questions: document.total_questions,
            passing_percentage: document.passing_percentage,
            description: document.description,
            instructions: document.instructions,
        }
    }
}

/// Document identity as stored (`_id`) or as the `id` virtual some backends emit beside
/// it. Either key, or both, may be present; `_id` wins.
#[derive(Debug, Default, Deserialize)]
struct DocumentKey {
    #[serde(default, rename = "_id", deserialize_with = "key_field")]
    stored: Option<String>,
    #[serde(default, deserialize_with = "key_field")]
    id: Option<String>,
}

impl DocumentKey {
    fn resolve<T: From<String>>(self) -> Option<T> {
        self.stored.or(self.id).map(T::from)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Malformed nested values degrade to `None` instead of failing the whole record.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn lenient_round<'de, D>(deserializer: D) -> Result<Option<RoundNumber>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_u64()
        .and_then(|raw| u32::try_from(raw).ok())
        .map(RoundNumber::new))
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(parse_loose_date))
}

fn parse_loose_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|stamp| stamp.date_naive())
        })
}

fn key_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(key_text(&value))
}

fn key_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Accepts either a bare id or a populated document carrying `_id` or `id`.
fn reference_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let value = Value::deserialize(deserializer)?;
    let id = match &value {
        Value::Object(document) => document
            .get("_id")
            .and_then(key_text)
            .or_else(|| document.get("id").and_then(key_text)),
        other => key_text(other),
    };
    Ok(id.map(T::from))
}
