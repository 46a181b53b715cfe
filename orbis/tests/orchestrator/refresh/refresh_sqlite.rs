use std::sync::Arc;

use orbis::{CountryQuery, Orbis, OrbisError, SortKey};
use orbis_mock::{DynamicMockSource, MockSource};
use orbis_store::SqliteCountryStore;

#[tokio::test]
async fn end_to_end_against_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteCountryStore::open(dir.path().join("orbis.db"))
        .await
        .unwrap();
    let (source, ctl) = DynamicMockSource::new_with_controller("mock-upstream");
    let orbis = Orbis::builder()
        .sources(source)
        .store(Arc::new(store.clone()))
        .seed(1)
        .build()
        .unwrap();

    let first = orbis.refresh().await.unwrap();
    let expected = MockSource::countries_fixture().len() as u64;
    assert_eq!((first.inserted, first.total), (expected, expected));

    let second = orbis.refresh().await.unwrap();
    assert_eq!((second.inserted, second.updated), (0, expected));

    let status = orbis.status().await.unwrap();
    assert_eq!(status.last_updated, second.last_refreshed_at);
    assert_eq!(status.total_countries, expected);

    let page = orbis
        .countries(&CountryQuery::new().region("europe").sort(SortKey::Name))
        .await
        .unwrap();
    let names: Vec<&str> = page.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["France", "Germany"]);

    // A failed fetch leaves the committed state alone.
    ctl.fail_rates("down").await;
    assert!(orbis.refresh().await.is_err());
    assert_eq!(
        orbis.status().await.unwrap().last_updated,
        second.last_refreshed_at
    );

    orbis.delete_country("FRANCE").await.unwrap();
    assert!(matches!(
        orbis.country("france").await,
        Err(OrbisError::NotFound { .. })
    ));
    assert_eq!(orbis.status().await.unwrap().total_countries, expected - 1);
}
