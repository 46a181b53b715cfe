use std::time::Duration;

use orbis::{OrbisError, RefreshPhase};
use orbis_mock::MockBehavior;

use crate::helpers::{countries, default_harness, harness};

#[tokio::test]
async fn rates_failure_writes_nothing() {
    let h = default_harness();
    h.ctl.fail_rates("connection refused").await;

    let err = h.orbis.refresh().await.unwrap_err();
    assert!(err.is_fetch_failure());
    assert_eq!(err.data_source(), Some("mock-upstream"));
    assert!(err.to_string().contains("connection refused"));

    assert_eq!(h.store.commits(), 0);
    assert!(h.store.rows().await.is_empty());
    assert!(matches!(
        h.orbis.status().await,
        Err(OrbisError::StatusNotInitialized)
    ));
    assert!(h.renderer.snapshots().await.is_empty());
    assert_eq!(h.orbis.phase(), RefreshPhase::Aborted);
}

#[tokio::test]
async fn rates_failure_keeps_previous_status() {
    let h = default_harness();
    let first = h.orbis.refresh().await.unwrap();
    let rows_before = h.store.rows().await;

    h.ctl.fail_rates("503 from upstream").await;
    assert!(h.orbis.refresh().await.is_err());

    let status = h.orbis.status().await.unwrap();
    assert_eq!(status.last_updated, first.last_refreshed_at);
    assert_eq!(h.store.rows().await, rows_before);
    assert_eq!(h.store.commits(), 1);
}

#[tokio::test]
async fn countries_failure_writes_nothing() {
    let h = default_harness();
    h.ctl.fail_countries("dns error").await;

    let err = h.orbis.refresh().await.unwrap_err();
    assert!(matches!(err, OrbisError::DataSourceUnavailable { .. }));
    assert_eq!(h.store.commits(), 0);
}

#[tokio::test]
async fn empty_country_payload_aborts() {
    let h = default_harness();
    h.ctl
        .set_countries_behavior(MockBehavior::Return(countries(Vec::new())))
        .await;

    let err = h.orbis.refresh().await.unwrap_err();
    assert_eq!(err, OrbisError::empty_data_source("mock-upstream"));
    assert_eq!(h.store.commits(), 0);
    assert_eq!(h.orbis.phase(), RefreshPhase::Aborted);
}

#[tokio::test]
async fn empty_rate_table_does_not_abort() {
    let h = default_harness();
    h.ctl
        .set_rates_behavior(MockBehavior::Return(Default::default()))
        .await;

    let report = h.orbis.refresh().await.unwrap();
    assert!(report.total > 0);
    assert!(
        h.store
            .rows()
            .await
            .iter()
            .all(|c| c.exchange_rate.is_none() && c.estimated_gdp == Some(0.0))
    );
}

#[tokio::test(start_paused = true)]
async fn hanging_source_times_out_without_writing() {
    let h = harness(|b| b.fetch_timeout(Duration::from_millis(250)));
    h.ctl.set_rates_behavior(MockBehavior::Hang).await;

    let err = h.orbis.refresh().await.unwrap_err();
    match err {
        OrbisError::DataSourceUnavailable { data_source, cause } => {
            assert_eq!(data_source, "mock-upstream");
            assert!(cause.contains("timed out"), "{cause}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(h.store.commits(), 0);
}

#[tokio::test]
async fn aborted_cycle_can_be_retried() {
    let h = default_harness();
    h.ctl.fail_rates("flaky").await;
    assert!(h.orbis.refresh().await.is_err());

    h.ctl.reset().await;
    let report = h.orbis.refresh().await.unwrap();
    assert_eq!(report.inserted, report.total);
    assert_eq!(h.orbis.phase(), RefreshPhase::Done);
}
