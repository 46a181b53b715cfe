// Shared wiring for orchestrator tests so scenarios can `use crate::helpers::*;`
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use orbis::{Orbis, OrbisBuilder};
use orbis_core::{CountryBatch, RawCountry};
use orbis_mock::{DynamicMockController, DynamicMockSource, MemoryCountryStore, RecordingRenderer};

/// Construct a UTC `DateTime` from components for readability in tests.
pub fn dt(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> DateTime<Utc> {
    let date = chrono::NaiveDate::from_ymd_opt(y, m, d).expect("invalid date");
    let naive = date.and_hms_opt(hh, mm, ss).expect("invalid time components");
    DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc)
}

/// Orchestrator wired to a dynamic source, the in-memory store, and a recording renderer.
pub struct Harness {
    pub orbis: Arc<Orbis>,
    pub source: Arc<DynamicMockSource>,
    pub ctl: DynamicMockController,
    pub store: Arc<MemoryCountryStore>,
    pub renderer: Arc<RecordingRenderer>,
}

/// Build a harness; `tweak` adjusts the builder before `build()`.
pub fn harness(tweak: impl FnOnce(OrbisBuilder) -> OrbisBuilder) -> Harness {
    let (source, ctl) = DynamicMockSource::new_with_controller("mock-upstream");
    let store = Arc::new(MemoryCountryStore::new());
    let renderer = Arc::new(RecordingRenderer::new());
    let builder = Orbis::builder()
        .sources(Arc::clone(&source))
        .store(store.clone())
        .renderer(renderer.clone())
        .seed(7);
    let orbis = tweak(builder).build().expect("valid orchestrator");
    Harness {
        orbis: Arc::new(orbis),
        source,
        ctl,
        store,
        renderer,
    }
}

/// Harness with default settings.
pub fn default_harness() -> Harness {
    harness(|b| b)
}

/// A country batch with no decode rejections.
pub fn countries(records: Vec<RawCountry>) -> CountryBatch {
    CountryBatch::from(records)
}

/// Rate table from `(code, rate)` pairs.
pub fn rates(pairs: &[(&str, f64)]) -> orbis_core::RateTable {
    pairs.iter().map(|(c, r)| ((*c).to_string(), *r)).collect()
}

/// Spin until the dynamic source has seen `n` country fetches.
pub async fn wait_for_countries_calls(ctl: &DynamicMockController, n: usize) {
    while ctl.countries_calls() < n {
        tokio::task::yield_now().await;
    }
}
