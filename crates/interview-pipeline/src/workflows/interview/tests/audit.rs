use super::common::*;
use crate::workflows::interview::audit::{audit, RecordAnomaly};
use crate::workflows::interview::domain::{ApplicationStatus, RoundOutcome, RoundRecord};
use crate::workflows::interview::rounds::{RoundCatalog, RoundNumber};

fn default_catalog() -> RoundCatalog {
    RoundCatalog::for_job(None)
}

#[test]
fn consistent_records_report_nothing() {
    let app = application(
        "app-1",
        ApplicationStatus::Interviewed,
        vec![record(1, RoundOutcome::Passed), record(2, RoundOutcome::Pending)],
    );
    assert!(audit(&app, &default_catalog()).is_empty());
}

#[test]
fn unnumbered_and_duplicate_records_are_reported_once() {
    let app = application(
        "app-2",
        ApplicationStatus::Interviewed,
        vec![
            RoundRecord {
                round: None,
                status: RoundOutcome::Passed,
                feedback: None,
            },
            record(1, RoundOutcome::Passed),
            record(1, RoundOutcome::Failed),
            record(1, RoundOutcome::Failed),
        ],
    );

    let anomalies = audit(&app, &default_catalog());
    assert_eq!(
        anomalies,
        vec![
            RecordAnomaly::UnnumberedRecord { position: 0 },
            RecordAnomaly::DuplicateRound {
                round: RoundNumber::new(1)
            },
        ]
    );
}

#[test]
fn rounds_beyond_catalog_are_out_of_range() {
    let app = application(
        "app-3",
        ApplicationStatus::Interviewed,
        vec![record(5, RoundOutcome::Passed)],
    );
    let catalog = RoundCatalog::for_job(Some(&job(Some(flags(&["technical", "hr"])))));

    assert_eq!(
        audit(&app, &catalog),
        vec![RecordAnomaly::RoundOutOfRange {
            round: RoundNumber::new(5),
            catalog_len: 2,
        }]
    );
}

#[test]
fn pending_round_before_passed_round_is_flagged() {
    let app = application(
        "app-4",
        ApplicationStatus::Interviewed,
        vec![record(1, RoundOutcome::Pending), record(3, RoundOutcome::Passed)],
    );

    assert_eq!(
        audit(&app, &default_catalog()),
        vec![RecordAnomaly::PendingBeforePassed {
            pending: RoundNumber::new(1),
            passed: RoundNumber::new(3),
        }]
    );
}

#[test]
fn badge_disagreements_cover_pending_and_hired() {
    let pending = application(
        "app-5",
        ApplicationStatus::Pending,
        vec![record(2, RoundOutcome::Passed)],
    );
    assert_eq!(
        audit(&pending, &default_catalog()),
        vec![RecordAnomaly::BadgeDisagreement {
            overall: "Pending".to_string(),
            round: RoundNumber::new(2),
            outcome: "passed".to_string(),
        }]
    );

    let hired = application(
        "app-6",
        ApplicationStatus::Hired,
        vec![record(1, RoundOutcome::Passed), record(2, RoundOutcome::Failed)],
    );
    let anomalies = audit(&hired, &default_catalog());
    assert_eq!(anomalies.len(), 1);
    assert!(anomalies[0].summary().contains("'Hired'"));
}

#[test]
fn anomalies_serialize_with_kind_tag() {
    let value = serde_json::to_value(RecordAnomaly::RoundOutOfRange {
        round: RoundNumber::new(4),
        catalog_len: 3,
    })
    .expect("serializes");

    assert_eq!(value["kind"], "round_out_of_range");
    assert_eq!(value["round"], 4);
    assert_eq!(value["catalog_len"], 3);
}

#[test]
fn shortlisted_with_later_passed_round_disagrees() {
    let first_round = application(
        "app-7",
        ApplicationStatus::Shortlisted,
        vec![record(1, RoundOutcome::Passed)],
    );
    assert!(audit(&first_round, &default_catalog()).is_empty());

    let later_round = application(
        "app-8",
        ApplicationStatus::Shortlisted,
        vec![record(1, RoundOutcome::Passed), record(2, RoundOutcome::Passed)],
    );
    assert_eq!(
        audit(&later_round, &default_catalog()),
        vec![RecordAnomaly::BadgeDisagreement {
            overall: "Shortlisted".to_string(),
            round: RoundNumber::new(2),
            outcome: "passed".to_string(),
        }]
    );
}
