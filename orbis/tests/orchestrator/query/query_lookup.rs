use orbis::OrbisError;

use crate::helpers::default_harness;

#[tokio::test]
async fn lookup_ignores_case_and_whitespace() {
    let h = default_harness();
    h.orbis.refresh().await.unwrap();

    let c = h.orbis.country("  nIgErIa ").await.unwrap();
    assert_eq!(c.name, "Nigeria");
    assert_eq!(c.capital.as_deref(), Some("Abuja"));
    assert_eq!(c.currency_code.as_deref(), Some("NGN"));
    assert_eq!(c.flag_url.as_deref(), Some("https://flagcdn.com/ni.svg"));
}

#[tokio::test]
async fn lookup_errors() {
    let h = default_harness();
    h.orbis.refresh().await.unwrap();

    assert!(matches!(
        h.orbis.country("   ").await,
        Err(OrbisError::InvalidArg(_))
    ));
    let err = h.orbis.country("Atlantis").await.unwrap_err();
    assert_eq!(err, OrbisError::not_found("country 'Atlantis'"));
}

#[tokio::test]
async fn delete_then_lookup() {
    let h = default_harness();
    h.orbis.refresh().await.unwrap();

    h.orbis.delete_country("peru").await.unwrap();
    assert!(matches!(
        h.orbis.country("Peru").await,
        Err(OrbisError::NotFound { .. })
    ));
    assert!(matches!(
        h.orbis.delete_country("Peru").await,
        Err(OrbisError::NotFound { .. })
    ));
    assert_eq!(h.orbis.status().await.unwrap().total_countries, 8);
}

#[tokio::test]
async fn status_before_and_after_first_refresh() {
    let h = default_harness();
    let err = h.orbis.status().await.unwrap_err();
    assert_eq!(err, OrbisError::StatusNotInitialized);
    assert!(!err.is_actionable());

    let report = h.orbis.refresh().await.unwrap();
    let status = h.orbis.status().await.unwrap();
    assert_eq!(status.last_updated, report.last_refreshed_at);
    assert_eq!(status.total_countries, report.total);
}
