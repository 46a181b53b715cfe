use std::sync::Arc;

use orbis::{MultiplierRange, Orbis, OrbisError};
use orbis_mock::{MemoryCountryStore, MockSource};

#[test]
fn build_requires_every_collaborator() {
    let err = Orbis::builder()
        .store(Arc::new(MemoryCountryStore::new()))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, OrbisError::InvalidArg(ref m) if m.contains("country source")));

    let err = Orbis::builder()
        .sources(Arc::new(MockSource::new()))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, OrbisError::InvalidArg(ref m) if m.contains("store")));
}

#[test]
fn build_validates_configuration() {
    let mut range = MultiplierRange::default();
    range.min = 3000.0;
    let err = Orbis::builder()
        .sources(Arc::new(MockSource::new()))
        .store(Arc::new(MemoryCountryStore::new()))
        .multiplier_range(range)
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, OrbisError::InvalidArg(_)));
}

#[test]
fn renderer_is_optional() {
    let orbis = Orbis::builder()
        .sources(Arc::new(MockSource::new()))
        .store(Arc::new(MemoryCountryStore::new()))
        .summary_top_n(3)
        .build()
        .unwrap();
    assert_eq!(orbis.config().summary_top_n, 3);
    assert_eq!(orbis.phase(), orbis::RefreshPhase::Idle);
}

#[tokio::test]
async fn refresh_without_renderer_reports_not_rendered() {
    let orbis = Orbis::builder()
        .sources(Arc::new(MockSource::new()))
        .store(Arc::new(MemoryCountryStore::new()))
        .build()
        .unwrap();
    let report = orbis.refresh().await.unwrap();
    assert!(!report.summary_rendered);
    assert!(report.warnings.is_empty());
    assert_eq!(orbis.phase(), orbis::RefreshPhase::Done);
}
