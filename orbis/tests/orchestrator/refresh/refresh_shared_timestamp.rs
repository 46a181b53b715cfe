use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Duration;

use crate::helpers::{dt, harness};

#[tokio::test]
async fn every_row_and_the_status_share_one_timestamp() {
    // A clock that moves on every read would expose per-row stamping.
    let ticks = Arc::new(AtomicI64::new(0));
    let base = dt(2025, 10, 22, 8, 0, 0);
    let h = harness(|b| {
        let ticks = Arc::clone(&ticks);
        b.clock(move || base + Duration::seconds(ticks.fetch_add(1, Ordering::SeqCst)))
    });

    let report = h.orbis.refresh().await.unwrap();
    assert_eq!(report.last_refreshed_at, base);
    let rows = h.store.rows().await;
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|c| c.last_refreshed_at == base));
    assert_eq!(h.orbis.status().await.unwrap().last_updated, base);

    let second = h.orbis.refresh().await.unwrap();
    assert_eq!(second.last_refreshed_at, base + Duration::seconds(1));
    assert!(
        h.store
            .rows()
            .await
            .iter()
            .all(|c| c.last_refreshed_at == second.last_refreshed_at)
    );
}

#[tokio::test]
async fn status_never_moves_backwards() {
    let newer = dt(2025, 10, 22, 9, 0, 0);
    let older = dt(2025, 10, 22, 8, 0, 0);
    let flip = Arc::new(AtomicI64::new(0));
    let h = harness(|b| {
        let flip = Arc::clone(&flip);
        b.clock(move || {
            if flip.fetch_add(1, Ordering::SeqCst) == 0 {
                newer
            } else {
                older
            }
        })
    });

    h.orbis.refresh().await.unwrap();
    h.orbis.refresh().await.unwrap();
    assert_eq!(h.orbis.status().await.unwrap().last_updated, newer);
}
