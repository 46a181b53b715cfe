use std::sync::Arc;
use std::time::Duration;

use orbis::{ConcurrentRefresh, OrbisError};
use orbis_mock::MockBehavior;

use crate::helpers::{harness, wait_for_countries_calls};

#[tokio::test]
async fn overlapping_refresh_is_rejected() {
    let h = harness(|b| b.concurrent_refresh(ConcurrentRefresh::Reject));
    h.ctl.set_countries_behavior(MockBehavior::Hang).await;

    let running = {
        let orbis = Arc::clone(&h.orbis);
        tokio::spawn(async move { orbis.refresh().await })
    };
    wait_for_countries_calls(&h.ctl, 1).await;

    let err = h.orbis.refresh().await.unwrap_err();
    assert_eq!(err, OrbisError::RefreshInProgress);
    // The rejected trigger never reached the sources.
    assert_eq!(h.ctl.countries_calls(), 1);

    running.abort();
    let _ = running.await;

    h.ctl.reset().await;
    assert!(h.orbis.refresh().await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn overlapping_refresh_waits_in_wait_mode() {
    let h = harness(|b| {
        b.concurrent_refresh(ConcurrentRefresh::Wait)
            .fetch_timeout(Duration::from_secs(1))
    });
    h.ctl.set_countries_behavior(MockBehavior::Hang).await;

    let first = {
        let orbis = Arc::clone(&h.orbis);
        tokio::spawn(async move { orbis.refresh().await })
    };
    wait_for_countries_calls(&h.ctl, 1).await;
    h.ctl.reset().await;

    let second = {
        let orbis = Arc::clone(&h.orbis);
        tokio::spawn(async move { orbis.refresh().await })
    };

    let first = first.await.unwrap();
    assert!(matches!(first, Err(OrbisError::DataSourceUnavailable { .. })));
    let second = second.await.unwrap().unwrap();
    assert_eq!(second.inserted, second.total);
    assert_eq!(h.ctl.countries_calls(), 2);
    assert_eq!(h.store.commits(), 1);
}
