//! SQL rendering of `CountryQuery`; ordering mirrors `orbis_core::query::compare`.

use sqlx::{QueryBuilder, Sqlite};

use orbis_core::{CountryQuery, RegionMatch, SortKey, SortOrder};

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

pub(crate) fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, q: &CountryQuery, mode: RegionMatch) {
    qb.push(" WHERE 1 = 1");
    if let Some(region) = q.region_filter() {
        let region = region.to_lowercase();
        match mode {
            RegionMatch::Substring => {
                qb.push(" AND region_key LIKE ")
                    .push_bind(format!("%{}%", escape_like(&region)))
                    .push(" ESCAPE '\\'");
            }
            RegionMatch::Exact => {
                qb.push(" AND region_key = ").push_bind(region);
            }
        }
    }
    if let Some(code) = q.currency_filter() {
        qb.push(" AND upper(currency_code) = ")
            .push_bind(code.to_ascii_uppercase());
    }
}

pub(crate) fn order_clause(key: SortKey, order: SortOrder) -> &'static str {
    match (key, order) {
        (SortKey::Name, SortOrder::Asc) => " ORDER BY name_key ASC, id ASC",
        (SortKey::Name, SortOrder::Desc) => " ORDER BY name_key DESC, id ASC",
        (SortKey::Population, SortOrder::Asc) => " ORDER BY population ASC, id ASC",
        (SortKey::Population, SortOrder::Desc) => " ORDER BY population DESC, id ASC",
        (SortKey::EstimatedGdp, SortOrder::Asc) => {
            " ORDER BY (estimated_gdp IS NULL) ASC, estimated_gdp ASC, id ASC"
        }
        (SortKey::EstimatedGdp, SortOrder::Desc) => {
            " ORDER BY (estimated_gdp IS NULL) ASC, estimated_gdp DESC, id ASC"
        }
    }
}
