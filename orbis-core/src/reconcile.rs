use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::estimate::GdpEstimator;
use orbis_types::upstream::{RateTable, RawCountry};
use orbis_types::{CountryUpsert, OrbisError, RateMissPolicy, normalize_name};

/// Rows to write in one refresh cycle, all stamped with the same timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshBatch {
    /// Shared cycle timestamp; becomes every row's `last_refreshed_at` and the
    /// status record's `last_updated`.
    pub refreshed_at: DateTime<Utc>,
    /// Upserts with unique normalized names.
    pub rows: Vec<CountryUpsert>,
}

/// Result of reconciling one fetched snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilePlan {
    /// Rows ready to commit.
    pub batch: RefreshBatch,
    /// Per-record problems. Rejected records are absent from `batch`; records
    /// with a repaired field stay in it.
    pub rejected: Vec<OrbisError>,
    /// Records without a name or with a missing or zero population.
    pub skipped: u64,
    /// Records replaced by a later record with the same normalized name.
    pub duplicates: u64,
}

/// Merge a fetched country list and rate table into a refresh batch.
///
/// Per record:
/// - blank names and missing or zero populations are skipped;
/// - negative populations are rejected with a `RecordProcessing` warning;
/// - the first listed currency code is used;
/// - the rate is looked up by exact code, then by upper-cased code; a miss
///   follows `policy`, and a non-finite rate is stored as null with a warning;
/// - GDP comes from `estimator`.
///
/// Names colliding after normalization keep the last record's fields in the
/// slot of the first one.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "orbis_core::reconcile",
        skip(records, rates, estimator, rng),
        fields(records = records.len(), rates = rates.len(), policy = ?policy),
    )
)]
pub fn reconcile<R: Rng>(
    records: Vec<RawCountry>,
    rates: &RateTable,
    policy: RateMissPolicy,
    estimator: &GdpEstimator,
    refreshed_at: DateTime<Utc>,
    rng: &mut R,
) -> ReconcilePlan {
    let mut rows: Vec<CountryUpsert> = Vec::with_capacity(records.len());
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(records.len());
    let mut rejected = Vec::new();
    let mut skipped = 0u64;
    let mut duplicates = 0u64;

    for raw in records {
        let Some(name) = raw
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
        else {
            skipped += 1;
            continue;
        };
        let population = match raw.population {
            None | Some(0) => {
                skipped += 1;
                continue;
            }
            Some(p) if p < 0 => {
                #[cfg(feature = "tracing")]
                tracing::warn!(name, population = p, "negative population");
                rejected.push(OrbisError::record(
                    name,
                    format!("negative population {p}"),
                ));
                continue;
            }
            Some(p) => p.unsigned_abs(),
        };

        let currency_code = raw.first_currency_code().map(str::to_string);
        let exchange_rate = match currency_code.as_deref() {
            None => None,
            Some(code) => match lookup_rate(rates, code) {
                Some(rate) if !rate.is_finite() => {
                    rejected.push(OrbisError::record(
                        name,
                        format!("non-finite exchange rate for {code}; stored as null"),
                    ));
                    None
                }
                Some(rate) => Some(rate),
                None => match policy {
                    RateMissPolicy::DefaultToOne => Some(1.0),
                    RateMissPolicy::Null => None,
                },
            },
        };
        let estimated_gdp =
            estimator.estimate(population, currency_code.as_deref(), exchange_rate, rng);

        let row = CountryUpsert {
            name: name.to_string(),
            capital: non_blank(raw.capital),
            region: non_blank(raw.region),
            population,
            currency_code,
            exchange_rate,
            estimated_gdp,
            flag_url: non_blank(raw.flag),
        };

        let key = normalize_name(name);
        if let Some(&slot) = slots.get(&key) {
            #[cfg(feature = "tracing")]
            tracing::debug!(name, "duplicate name in batch; later record wins");
            duplicates += 1;
            rows[slot] = row;
        } else {
            slots.insert(key, rows.len());
            rows.push(row);
        }
    }

    ReconcilePlan {
        batch: RefreshBatch { refreshed_at, rows },
        rejected,
        skipped,
        duplicates,
    }
}

fn lookup_rate(rates: &RateTable, code: &str) -> Option<f64> {
    rates
        .get(code)
        .or_else(|| rates.get(&code.to_ascii_uppercase()))
        .copied()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
