use super::common::*;
use crate::workflows::interview::domain::{Job, RoundTypeFlags};
use crate::workflows::interview::rounds::{RoundCatalog, RoundIndex, RoundNumber, RoundType};

#[test]
fn missing_round_types_fall_back_to_default_set() {
    let catalog = RoundCatalog::for_job(Some(&job(None)));
    assert_eq!(catalog.labels(), vec!["Technical", "HR", "Final"]);

    let catalog = RoundCatalog::for_job(None);
    assert_eq!(catalog.labels(), vec!["Technical", "HR", "Final"]);
}

#[test]
fn all_false_round_types_fall_back_to_default_set() {
    let catalog = RoundCatalog::for_job(Some(&job(Some(RoundTypeFlags::default()))));
    assert_eq!(catalog.labels(), vec!["Technical", "HR", "Final"]);
    assert!(!catalog.is_empty());
}

#[test]
fn configured_round_types_keep_fixed_priority_order() {
    let catalog = RoundCatalog::for_job(Some(&job(Some(flags(&["final", "technical"])))));
    assert_eq!(catalog.labels(), vec!["Technical", "Final"]);

    let catalog = RoundCatalog::for_job(Some(&job(Some(flags(&[
        "nonTechnical",
        "managerial",
        "hr",
        "final",
        "technical",
    ])))));
    assert_eq!(
        catalog.labels(),
        vec!["Technical", "HR", "Managerial", "Non-Technical", "Final"]
    );
}

#[test]
fn truthy_wire_values_enable_rounds() {
    let job: Job = serde_json::from_value(serde_json::json!({
        "_id": "job-1",
        "interviewRoundTypes": { "technical": 1, "hr": "", "managerial": "yes", "final": null }
    }))
    .expect("job parses");

    let catalog = RoundCatalog::for_job(Some(&job));
    assert_eq!(catalog.rounds(), &[RoundType::Technical, RoundType::Managerial]);
}

#[test]
fn entries_pair_zero_based_index_with_one_based_number() {
    let catalog = RoundCatalog::for_job(Some(&job(Some(flags(&["hr", "final"])))));
    let entries: Vec<_> = catalog.entries().collect();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].index, RoundIndex::new(0));
    assert_eq!(entries[0].number, RoundNumber::new(1));
    assert_eq!(entries[0].round, RoundType::Hr);
    assert_eq!(entries[1].index, RoundIndex::new(1));
    assert_eq!(entries[1].number, RoundNumber::new(2));
    assert_eq!(entries[1].round, RoundType::Final);
}

#[test]
fn catalog_is_deterministic() {
    let job = job(Some(flags(&["managerial", "technical"])));
    assert_eq!(
        RoundCatalog::for_job(Some(&job)),
        RoundCatalog::for_job(Some(&job))
    );
}
