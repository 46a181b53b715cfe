use orbis::{CountryQuery, OrbisError, RegionMatch, SortKey, SortOrder};

use crate::helpers::{default_harness, harness};

#[tokio::test]
async fn default_listing_is_population_descending() {
    let h = default_harness();
    h.orbis.refresh().await.unwrap();

    let page = h.orbis.countries(&CountryQuery::new()).await.unwrap();
    assert_eq!(page.total, 9);
    assert_eq!(page.limit, 100);
    let head: Vec<&str> = page.items.iter().take(3).map(|c| c.name.as_str()).collect();
    assert_eq!(head, vec!["Nigeria", "Japan", "Germany"]);
}

#[tokio::test]
async fn filters_and_ordering() {
    let h = default_harness();
    h.orbis.refresh().await.unwrap();

    let q = CountryQuery::new()
        .region("AFR")
        .sort(SortKey::Name)
        .order(SortOrder::Desc);
    let page = h.orbis.countries(&q).await.unwrap();
    let names: Vec<&str> = page.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Nigeria", "Ghana", "Chad"]);

    let page = h
        .orbis
        .countries(&CountryQuery::new().currency("eur"))
        .await
        .unwrap();
    assert_eq!(page.total, 2);

    // Null estimates sort last in both directions.
    for order in [SortOrder::Asc, SortOrder::Desc] {
        let h = harness(|b| b.gdp_sentinel(orbis::GdpSentinel::Null));
        h.orbis.refresh().await.unwrap();
        let q = CountryQuery::new().sort(SortKey::EstimatedGdp).order(order);
        let page = h.orbis.countries(&q).await.unwrap();
        let tail: Vec<Option<f64>> = page.items.iter().rev().take(2).map(|c| c.estimated_gdp).collect();
        assert_eq!(tail, vec![None, None]);
    }
}

#[tokio::test]
async fn exact_region_mode() {
    let h = harness(|b| b.region_match(RegionMatch::Exact));
    h.orbis.refresh().await.unwrap();

    let partial = h.orbis.countries(&CountryQuery::new().region("afr")).await.unwrap();
    assert_eq!(partial.total, 0);
    let exact = h.orbis.countries(&CountryQuery::new().region("AFRICA")).await.unwrap();
    assert_eq!(exact.total, 3);
}

#[tokio::test]
async fn page_past_the_end_is_out_of_range() {
    let h = default_harness();
    h.orbis.refresh().await.unwrap();

    let page = h
        .orbis
        .countries(&CountryQuery::new().skip(8).limit(5))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);

    let err = h
        .orbis
        .countries(&CountryQuery::new().skip(9).limit(5))
        .await
        .unwrap_err();
    assert_eq!(err, OrbisError::PageOutOfRange { skip: 9, total: 9 });
    assert!(!err.is_actionable());
}

#[tokio::test]
async fn empty_result_at_first_page_is_not_out_of_range() {
    let h = default_harness();

    let page = h.orbis.countries(&CountryQuery::new()).await.unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);

    h.orbis.refresh().await.unwrap();
    let page = h
        .orbis
        .countries(&CountryQuery::new().region("atlantis"))
        .await
        .unwrap();
    assert_eq!(page.total, 0);

    let err = h
        .orbis
        .countries(&CountryQuery::new().region("atlantis").skip(1))
        .await
        .unwrap_err();
    assert_eq!(err, OrbisError::PageOutOfRange { skip: 1, total: 0 });
}

#[tokio::test]
async fn page_size_bounds() {
    let h = harness(|b| b.default_page_size(2).max_page_size(4));
    h.orbis.refresh().await.unwrap();

    assert_eq!(h.orbis.countries(&CountryQuery::new()).await.unwrap().items.len(), 2);
    for bad in [0, 5] {
        let err = h
            .orbis
            .countries(&CountryQuery::new().limit(bad))
            .await
            .unwrap_err();
        assert!(matches!(err, OrbisError::InvalidArg(_)), "{bad}");
    }
}
