use orbis_core::RawCountry;
use orbis_mock::{MockBehavior, MockSource};

use crate::helpers::{countries, default_harness};

#[tokio::test]
async fn second_run_updates_in_place() {
    let h = default_harness();
    let first = h.orbis.refresh().await.unwrap();
    let expected = MockSource::countries_fixture().len() as u64;
    assert_eq!(first.inserted, expected);
    assert_eq!(first.updated, 0);
    assert_eq!(first.processed, expected);
    assert_eq!(first.total, expected);

    let ids_before: Vec<i64> = h.store.rows().await.iter().map(|c| c.id).collect();
    let second = h.orbis.refresh().await.unwrap();
    assert_eq!(second.inserted, 0);
    assert_eq!(second.updated, expected);
    assert_eq!(second.total, expected);
    let ids_after: Vec<i64> = h.store.rows().await.iter().map(|c| c.id).collect();
    assert_eq!(ids_before, ids_after);
}

#[tokio::test]
async fn casing_changes_match_the_stored_row() {
    let h = default_harness();
    h.orbis.refresh().await.unwrap();
    let before = h.orbis.country("Chad").await.unwrap();

    h.ctl
        .set_countries_behavior(MockBehavior::Return(countries(vec![RawCountry::new(
            "  cHAD ",
            17_000_000,
            Some("XAF"),
        )])))
        .await;
    let report = h.orbis.refresh().await.unwrap();
    assert_eq!((report.inserted, report.updated), (0, 1));
    assert_eq!(report.total, MockSource::countries_fixture().len() as u64);

    let after = h.orbis.country("chad").await.unwrap();
    assert_eq!(after.id, before.id);
    assert_eq!(after.name, "cHAD");
    assert_eq!(after.population, 17_000_000);
}

#[tokio::test]
async fn rows_missing_from_a_later_fetch_are_kept() {
    let h = default_harness();
    h.orbis.refresh().await.unwrap();
    h.ctl
        .set_countries_behavior(MockBehavior::Return(countries(vec![RawCountry::new(
            "Peru",
            33_000_000,
            Some("PEN"),
        )])))
        .await;
    let report = h.orbis.refresh().await.unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(report.total, MockSource::countries_fixture().len() as u64);
    assert!(h.orbis.country("Nigeria").await.is_ok());
}
