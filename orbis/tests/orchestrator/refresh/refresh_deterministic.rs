use orbis::{GdpFormula, GdpSentinel, MultiplierRange};

use crate::helpers::harness;

#[tokio::test]
async fn same_seed_same_estimates() {
    let a = harness(|b| b.seed(42));
    let b = harness(|b| b.seed(42));
    a.orbis.refresh().await.unwrap();
    b.orbis.refresh().await.unwrap();

    let gdp = |rows: Vec<orbis::Country>| {
        rows.into_iter()
            .map(|c| (c.name, c.estimated_gdp))
            .collect::<Vec<_>>()
    };
    assert_eq!(gdp(a.store.rows().await), gdp(b.store.rows().await));
}

#[tokio::test]
async fn computed_estimates_stay_within_the_multiplier_range() {
    let h = harness(|b| b.seed(9));
    h.orbis.refresh().await.unwrap();
    let range = MultiplierRange::default();
    for c in h.store.rows().await {
        let (Some(rate), Some(gdp)) = (c.exchange_rate, c.estimated_gdp) else {
            continue;
        };
        let multiplier = gdp * rate / c.population as f64;
        assert!(
            multiplier >= range.min - 1e-6 && multiplier <= range.max + 1e-6,
            "{}: {multiplier}",
            c.name
        );
    }
}

#[tokio::test]
async fn fixed_multiplier_gives_exact_values() {
    let h = harness(|b| b.multiplier_range(MultiplierRange::fixed(1500.0).unwrap()));
    h.orbis.refresh().await.unwrap();

    let nigeria = h.orbis.country("nigeria").await.unwrap();
    assert_eq!(nigeria.exchange_rate, Some(1600.0));
    assert_eq!(
        nigeria.estimated_gdp,
        Some(206_139_589_f64 * 1500.0 / 1600.0)
    );
}

#[tokio::test]
async fn multiply_formula_and_null_sentinel() {
    let h = harness(|b| {
        b.multiplier_range(MultiplierRange::fixed(1000.0).unwrap())
            .gdp_formula(GdpFormula::MultiplyByRate)
            .gdp_sentinel(GdpSentinel::Null)
    });
    h.orbis.refresh().await.unwrap();

    let ghana = h.orbis.country("Ghana").await.unwrap();
    assert_eq!(ghana.estimated_gdp, Some(31_072_940_f64 * 1000.0 * 15.5));
    let testland = h.orbis.country("Testland").await.unwrap();
    assert_eq!(testland.estimated_gdp, None);
}
