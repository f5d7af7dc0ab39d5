use std::sync::Arc;
use std::time::Duration;

use super::common::*;
use crate::workflows::interview::board::{PipelineError, RefreshOutcome};
use crate::workflows::interview::domain::{
    ApplicationId, ApplicationStatus, Assessment, AssessmentId, RoundOutcome,
};
use crate::workflows::interview::resolver::RoundStatusText;

fn dsa_assessment() -> Assessment {
    Assessment {
        id: Some(AssessmentId::from("asmt-dsa")),
        title: Some("Data Structures".to_string()),
        total_questions: Some(20),
        passing_percentage: Some(60.0),
        ..Assessment::default()
    }
}

#[tokio::test]
async fn view_is_empty_before_first_refresh() {
    let board = build_board(MemorySource::default());
    let view = board.view(false).await;

    assert!(view.fetched_at.is_none());
    assert!(view.applications.is_empty());
    assert!(!view.highlight_active);
}

#[tokio::test]
async fn refresh_replaces_snapshot_and_rows_are_recomputed() {
    let job = job(Some(flags(&["technical", "hr"])));
    let source = MemorySource::with_applications(vec![application_for(
        "app-1",
        &job,
        ApplicationStatus::Shortlisted,
        Vec::new(),
    )]);
    let board = build_board(source);

    let outcome = board.refresh().await.expect("refresh succeeds");
    assert_eq!(outcome, RefreshOutcome::Refreshed { applications: 1 });

    let view = board.view(false).await;
    assert!(view.fetched_at.is_some());
    assert_eq!(view.applications.len(), 1);
    assert_eq!(
        view.applications[0].rounds[0].status.text,
        RoundStatusText::Shortlisted
    );

    board.source().replace(vec![
        application_for(
            "app-1",
            &job,
            ApplicationStatus::Interviewed,
            vec![record(1, RoundOutcome::Passed)],
        ),
        application_for("app-2", &job, ApplicationStatus::Rejected, Vec::new()),
    ]);
    board.refresh().await.expect("second refresh");

    let view = board.view(false).await;
    assert_eq!(view.applications.len(), 2);
    let texts: Vec<_> = view.applications[0]
        .rounds
        .iter()
        .map(|cell| cell.status.text)
        .collect();
    assert_eq!(texts, vec![RoundStatusText::Passed, RoundStatusText::InProgress]);
    assert_eq!(board.source().fetches(), 2);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshot() {
    let board = build_board(UnavailableSource);

    let err = board.refresh().await.expect_err("source is offline");
    assert!(matches!(err, PipelineError::Source(_)));

    let snapshot = board.snapshot().await;
    assert!(snapshot.fetched_at.is_none());
    assert!(snapshot.applications.is_empty());
}

#[tokio::test]
async fn overlapping_refresh_is_skipped() {
    let board = build_board(GatedSource::default());

    let first = {
        let board = Arc::clone(&board);
        tokio::spawn(async move { board.refresh().await })
    };
    board.source().entered.notified().await;

    let second = board.refresh().await.expect("skipped refresh is not an error");
    assert_eq!(second, RefreshOutcome::Skipped);

    board.source().release.notify_one();
    let first = first
        .await
        .expect("refresh task joins")
        .expect("first refresh succeeds");
    assert_eq!(first, RefreshOutcome::Refreshed { applications: 1 });
    assert_eq!(board.snapshot().await.applications.len(), 1);
}

#[tokio::test]
async fn round_detail_fetches_technical_assessment() {
    let job = detailed_job();
    let source = MemorySource::with_applications(vec![application_for(
        "app-1",
        &job,
        ApplicationStatus::Shortlisted,
        Vec::new(),
    )]);
    source.add_assessment(dsa_assessment());
    let board = build_board(source);
    board.refresh().await.expect("refresh");

    let id = ApplicationId::from("app-1");
    let technical = board
        .round_detail(&id, "Technical")
        .await
        .expect("application exists");
    assert_eq!(technical.lookup.round_key, Some("technical"));
    assert_eq!(technical.assessment, Some(dsa_assessment()));

    let hr = board.round_detail(&id, "HR").await.expect("application exists");
    assert!(hr.lookup.is_configured());
    assert!(hr.assessment.is_none());

    let managerial = board
        .round_detail(&id, "Managerial")
        .await
        .expect("application exists");
    assert!(!managerial.lookup.is_configured());
    assert!(managerial.assessment.is_none());
}

#[tokio::test]
async fn round_detail_for_unknown_application_fails() {
    let board = build_board(MemorySource::default());
    board.refresh().await.expect("refresh");

    let err = board
        .round_detail(&ApplicationId::from("app-missing"), "Technical")
        .await
        .expect_err("not in snapshot");
    assert!(matches!(err, PipelineError::ApplicationNotFound(id) if id.0 == "app-missing"));
}

#[tokio::test(start_paused = true)]
async fn viewer_highlight_expires_from_board_view() {
    let source = MemorySource::with_applications(vec![application(
        "app-1",
        ApplicationStatus::Shortlisted,
        Vec::new(),
    )]);
    let board = build_board(source);
    board.refresh().await.expect("refresh");

    assert!(board.highlight_for(Some("viewer-a"), true));
    let view = board.view(board.highlight_for(Some("viewer-a"), false)).await;
    assert!(view.highlight_active);
    assert!(view.applications[0].highlighted);

    tokio::time::sleep(Duration::from_secs(6)).await;
    let view = board.view(board.highlight_for(Some("viewer-a"), false)).await;
    assert!(!view.highlight_active);
    assert!(!view.applications[0].highlighted);
}

#[tokio::test(start_paused = true)]
async fn one_viewer_highlight_does_not_leak_to_others() {
    let board = build_board(MemorySource::default());

    assert!(board.highlight_for(Some("viewer-a"), true));
    assert!(!board.highlight_for(Some("viewer-b"), false));
    assert!(!board.highlight_for(None, false));
    assert!(board.highlight_for(None, true));
    assert_eq!(board.highlights().active_viewers(), 1);
}

#[tokio::test(start_paused = true)]
async fn polling_refreshes_on_interval_until_dropped() {
    let board = build_board(MemorySource::default());

    let polling = board.spawn_polling();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(board.source().fetches(), 1);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(board.source().fetches(), 2);

    drop(polling);
    tokio::time::sleep(Duration::from_secs(90)).await;
    assert_eq!(board.source().fetches(), 2);
}
