use std::collections::HashSet;

use orbis_core::RawCountry;
use orbis_mock::MockBehavior;
use proptest::prelude::*;

use crate::helpers::{countries, default_harness};

fn raw_country() -> impl Strategy<Value = RawCountry> {
    (
        prop::sample::select(vec!["Chad", "chad", "CHAD", "Peru", "peru ", "Japan", "Mali"]),
        0i64..1_000_000,
        prop::option::of(prop::sample::select(vec!["XAF", "PEN", "JPY", "ZZZ"])),
    )
        .prop_map(|(name, pop, code)| RawCountry::new(name, pop, code))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn one_row_per_normalized_name(records in prop::collection::vec(raw_country(), 1..20)) {
        let distinct: HashSet<String> = records
            .iter()
            .filter(|r| r.population.unwrap_or(0) > 0)
            .filter_map(|r| r.name.as_deref().map(orbis_core::normalize_name))
            .collect();

        let (first, second, rows) = tokio_test::block_on(async {
            let h = default_harness();
            h.ctl
                .set_countries_behavior(MockBehavior::Return(countries(records.clone())))
                .await;
            let first = h.orbis.refresh().await;
            let second = h.orbis.refresh().await;
            (first, second, h.store.rows().await)
        });

        if distinct.is_empty() {
            // Every record skipped: the cycle still commits, with nothing to write.
            prop_assert_eq!(first.unwrap().total, 0);
        } else {
            let first = first.unwrap();
            prop_assert_eq!(first.total, distinct.len() as u64);
            prop_assert_eq!(first.inserted, distinct.len() as u64);
        }
        let second = second.unwrap();
        prop_assert_eq!(second.inserted, 0);
        prop_assert_eq!(rows.len(), distinct.len());
        prop_assert!(rows.iter().all(|c| c.last_refreshed_at == second.last_refreshed_at));
    }
}
