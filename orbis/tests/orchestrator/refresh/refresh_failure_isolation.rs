use std::sync::Arc;

use orbis::{OrbisError, RefreshPhase};
use orbis_mock::{FailingRenderer, MockSource};

use crate::helpers::{default_harness, harness};

#[tokio::test]
async fn commit_failure_rolls_back_and_surfaces() {
    let h = default_harness();
    h.store
        .fail_next_commit(OrbisError::persistence("disk I/O error"))
        .await;

    let err = h.orbis.refresh().await.unwrap_err();
    assert!(matches!(err, OrbisError::Persistence(ref m) if m.contains("disk I/O")));
    assert!(h.store.rows().await.is_empty());
    assert!(matches!(
        h.orbis.status().await,
        Err(OrbisError::StatusNotInitialized)
    ));
    assert!(h.renderer.snapshots().await.is_empty());
    assert_eq!(h.orbis.phase(), RefreshPhase::Aborted);
}

#[tokio::test]
async fn row_fault_is_a_warning_and_siblings_commit() {
    let h = default_harness();
    h.store.reject_row("ghana").await;

    let report = h.orbis.refresh().await.unwrap();
    let expected = MockSource::countries_fixture().len() as u64 - 1;
    assert_eq!(report.total, expected);
    assert_eq!(report.processed, expected);
    assert_eq!(report.rejected(), 1);
    assert!(matches!(
        &report.warnings[0],
        OrbisError::RecordProcessing { record, .. } if record == "Ghana"
    ));
    assert!(matches!(
        h.orbis.country("Ghana").await,
        Err(OrbisError::NotFound { .. })
    ));
}

#[tokio::test]
async fn render_failure_does_not_fail_the_cycle() {
    let h = harness(|b| b.renderer(Arc::new(FailingRenderer::new("no space left on device"))));

    let report = h.orbis.refresh().await.unwrap();
    assert!(!report.summary_rendered);
    assert_eq!(report.rejected(), 0);
    assert!(matches!(
        report.warnings.as_slice(),
        [OrbisError::Render(m)] if m.contains("no space")
    ));
    assert_eq!(report.total, MockSource::countries_fixture().len() as u64);
    assert_eq!(
        h.orbis.status().await.unwrap().last_updated,
        report.last_refreshed_at
    );
    assert_eq!(h.orbis.phase(), RefreshPhase::Done);
}

#[tokio::test]
async fn summary_snapshot_lists_top_gdp() {
    let h = harness(|b| b.summary_top_n(3));
    let report = h.orbis.refresh().await.unwrap();
    assert!(report.summary_rendered);

    let snap = h.renderer.last().await.unwrap();
    assert_eq!(snap.total, report.total);
    assert_eq!(snap.last_refreshed_at, report.last_refreshed_at);
    assert_eq!(snap.top.len(), 3);
    let gdps: Vec<f64> = snap.top.iter().filter_map(|c| c.estimated_gdp).collect();
    assert!(gdps.windows(2).all(|w| w[0] >= w[1]));
}
