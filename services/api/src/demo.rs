use clap::Args;
use interview_pipeline::error::AppError;
use interview_pipeline::workflows::interview::{
    build_rows, decode_applications, Application, ApplicationRow, Assessment, AssessmentId, Job,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct BoardArgs {
    /// Exported application listing (JSON array or `{ "applications": [...] }`)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Job used for applications that only reference their job by id
    #[arg(long)]
    pub(crate) job: Option<PathBuf>,
    /// Mark shortlisted candidates as freshly highlighted
    #[arg(long)]
    pub(crate) highlight: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApplicationListing {
    Bare(Vec<Value>),
    Envelope { applications: Vec<Value> },
}

impl ApplicationListing {
    fn into_records(self) -> Vec<Value> {
        match self {
            ApplicationListing::Bare(records) => records,
            ApplicationListing::Envelope { applications } => applications,
        }
    }
}

pub(crate) fn run_board(args: BoardArgs) -> Result<(), AppError> {
    let BoardArgs {
        input,
        job,
        highlight,
    } = args;

    let listing: ApplicationListing = serde_json::from_str(&std::fs::read_to_string(input)?)?;
    let applications = decode_applications(listing.into_records());
    let job: Option<Job> = match job {
        Some(path) => Some(serde_json::from_str(&std::fs::read_to_string(path)?)?),
        None => None,
    };

    let rows = build_rows(&applications, job.as_ref(), highlight);
    for line in render_rows(&rows) {
        println!("{line}");
    }

    Ok(())
}

pub(crate) fn render_rows(rows: &[ApplicationRow]) -> Vec<String> {
    let mut lines = vec![format!("Interview pipeline ({} applications)", rows.len())];

    for row in rows {
        let marker = if row.highlighted { "*" } else { "-" };
        let job = row
            .job_title
            .as_deref()
            .or(row.job_id.as_ref().map(|id| id.0.as_str()))
            .unwrap_or("unknown job");
        lines.push(format!(
            "{marker} {} [{}] {job}",
            row.application_id, row.overall_status
        ));

        let rounds: Vec<String> = row
            .rounds
            .iter()
            .map(|cell| format!("{}: {}", cell.round_name, cell.status.text.label()))
            .collect();
        lines.push(format!("    {}", rounds.join(" | ")));

        for cell in row.rounds.iter().filter(|cell| !cell.status.feedback.is_empty()) {
            lines.push(format!(
                "    {} feedback: {}",
                cell.round_name, cell.status.feedback
            ));
        }
        for anomaly in &row.anomalies {
            lines.push(format!("    ! {}", anomaly.summary()));
        }
    }

    lines
}

/// Seed listing served when no upstream backend is configured.
pub(crate) fn demo_applications() -> Vec<Application> {
    let backend = json!({
        "_id": "job-backend",
        "title": "Backend Engineer",
        "interviewRoundTypes": { "technical": true, "hr": true, "final": true },
        "interviewRoundDetails": {
            "technical": {
                "fromDate": "2026-11-02",
                "toDate": "2026-11-06",
                "time": "10:30",
                "description": "Live coding on queue processing",
                "assessmentId": "asmt-backend-dsa"
            },
            "hr": {
                "fromDate": "2026-11-09",
                "time": "15:00",
                "description": "Culture and compensation conversation"
            }
        }
    });
    let analyst = json!({
        "_id": "job-analyst",
        "title": "Data Analyst",
        "interviewRoundTypes": { "technical": true, "managerial": true }
    });

    decode_applications(vec![
        json!({
            "_id": "app-1001",
            "candidateId": { "_id": "cand-ana", "name": "Ana Ruiz" },
            "jobId": backend,
            "status": "shortlisted",
            "interviewRounds": []
        }),
        json!({
            "_id": "app-1002",
            "candidateId": "cand-kofi",
            "jobId": backend,
            "status": "interviewed",
            "interviewRounds": [
                { "round": 1, "status": "passed", "feedback": "Clean, well-tested solution" }
            ]
        }),
        json!({
            "_id": "app-1003",
            "candidateId": "cand-mei",
            "jobId": analyst,
            "status": "rejected",
            "interviewRounds": [
                { "round": 1, "status": "failed", "feedback": "SQL fundamentals need work" }
            ]
        }),
        json!({
            "_id": "app-1004",
            "candidateId": "cand-ola",
            "jobId": analyst,
            "status": "hired",
            "interviewRounds": [
                { "round": 1, "status": "passed" },
                { "round": 2, "status": "passed" }
            ]
        }),
        json!({
            "_id": "app-1005",
            "candidateId": "cand-sam",
            "jobId": "job-unlisted",
            "status": "pending"
        }),
    ])
}

pub(crate) fn demo_assessments() -> Vec<Assessment> {
    vec![Assessment {
        id: Some(AssessmentId::from("asmt-backend-dsa")),
        title: Some("Data Structures and Algorithms".to_string()),
        kind: Some("coding".to_string()),
        timer: Some(60),
        total_questions: Some(4),
        passing_percentage: Some(70.0),
        description: Some("Four timed problems on queues, maps and graphs".to_string()),
        instructions: Some("Solutions are graded on correctness first".to_string()),
    }]
}
