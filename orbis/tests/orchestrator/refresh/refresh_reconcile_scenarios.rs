use orbis::{OrbisError, RateMissPolicy};
use orbis_core::{CountryBatch, RawCountry};
use orbis_mock::MockBehavior;

use crate::helpers::{countries, default_harness, harness, rates};

#[tokio::test]
async fn unknown_currency_uses_null_rate_and_zero_gdp() {
    let h = default_harness();
    h.ctl
        .set_countries_behavior(MockBehavior::Return(countries(vec![RawCountry::new(
            "Testland",
            1000,
            Some("ZZZ"),
        )])))
        .await;
    h.ctl.set_rates_behavior(MockBehavior::Return(rates(&[]))).await;

    let report = h.orbis.refresh().await.unwrap();
    assert_eq!(report.total, 1);
    let row = h.orbis.country("testland").await.unwrap();
    assert_eq!(row.currency_code.as_deref(), Some("ZZZ"));
    assert_eq!(row.exchange_rate, None);
    assert_eq!(row.estimated_gdp, Some(0.0));
}

#[tokio::test]
async fn default_to_one_policy_computes_an_estimate() {
    let h = harness(|b| b.rate_miss_policy(RateMissPolicy::DefaultToOne));
    h.orbis.refresh().await.unwrap();

    let row = h.orbis.country("Testland").await.unwrap();
    assert_eq!(row.exchange_rate, Some(1.0));
    let gdp = row.estimated_gdp.unwrap();
    assert!((1_000_000.0..=2_000_000.0).contains(&gdp), "{gdp}");

    // No currency code never receives a rate, whatever the policy.
    let polar = h.orbis.country("Antarctica").await.unwrap();
    assert_eq!(polar.currency_code, None);
    assert_eq!(polar.exchange_rate, None);
    assert_eq!(polar.estimated_gdp, Some(0.0));
}

#[tokio::test]
async fn duplicate_names_collapse_to_the_last_record() {
    let h = default_harness();
    h.ctl
        .set_countries_behavior(MockBehavior::Return(countries(vec![
            RawCountry::new("Chad", 100, Some("XAF")),
            RawCountry::new("CHAD", 200, Some("XAF")),
        ])))
        .await;

    let report = h.orbis.refresh().await.unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.inserted, 1);
    assert_eq!(report.duplicates, 1);
    let rows = h.store.rows().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "CHAD");
    assert_eq!(rows[0].population, 200);
}

#[tokio::test]
async fn invalid_records_are_counted_not_fatal() {
    let h = default_harness();
    let mut nameless = RawCountry::new("x", 5, None);
    nameless.name = None;
    let mut no_population = RawCountry::new("Ghost", 0, None);
    no_population.population = None;
    let batch = CountryBatch {
        records: vec![
            nameless,
            no_population,
            RawCountry::new("Zero", 0, Some("EUR")),
            RawCountry::new("Negative", -5, Some("EUR")),
            RawCountry::new("Germany", 83_240_525, Some("eur")),
        ],
        rejected: vec![OrbisError::record("#7", "invalid type: string, expected i64")],
    };
    h.ctl
        .set_countries_behavior(MockBehavior::Return(batch))
        .await;

    let report = h.orbis.refresh().await.unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.skipped, 3);
    assert_eq!(report.rejected(), 2);
    let records: Vec<_> = report
        .warnings
        .iter()
        .filter_map(|w| match w {
            OrbisError::RecordProcessing { record, .. } => Some(record.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(records, vec!["#7", "Negative"]);

    // Lower-case code resolves through the upper-cased rate key.
    let germany = h.orbis.country("germany").await.unwrap();
    assert_eq!(germany.exchange_rate, Some(0.92));
}

#[tokio::test]
async fn non_finite_rate_is_stored_as_null_with_a_warning() {
    let h = default_harness();
    h.ctl
        .set_countries_behavior(MockBehavior::Return(countries(vec![RawCountry::new(
            "Nowhere",
            10,
            Some("NAN"),
        )])))
        .await;
    h.ctl
        .set_rates_behavior(MockBehavior::Return(rates(&[("NAN", f64::NAN)])))
        .await;

    let report = h.orbis.refresh().await.unwrap();
    assert_eq!(report.total, 1);
    assert_eq!(report.warnings.len(), 1);
    let row = h.orbis.country("Nowhere").await.unwrap();
    assert_eq!(row.exchange_rate, None);
    assert_eq!(row.estimated_gdp, Some(0.0));
}
