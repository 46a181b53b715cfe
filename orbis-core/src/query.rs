//! In-memory evaluation of [`CountryQuery`].
//!
//! Stores without a query engine use these helpers; the SQL store mirrors the
//! same ordering rules so both backends return identical pages.

use core::cmp::Ordering;

use orbis_types::{Country, CountryPage, CountryQuery, RegionMatch, SortKey, SortOrder};

/// Returns true when `region` satisfies the filter under `mode`. Matching ignores case.
#[must_use]
pub fn region_matches(region: Option<&str>, filter: &str, mode: RegionMatch) -> bool {
    let Some(region) = region else {
        return false;
    };
    let region = region.to_lowercase();
    let filter = filter.trim().to_lowercase();
    match mode {
        RegionMatch::Substring => region.contains(&filter),
        RegionMatch::Exact => region == filter,
    }
}

/// Returns true when the row passes the query's filters.
#[must_use]
pub fn matches(country: &Country, query: &CountryQuery, region_match: RegionMatch) -> bool {
    if let Some(filter) = query.region_filter()
        && !region_matches(country.region.as_deref(), filter, region_match)
    {
        return false;
    }
    if let Some(code) = query.currency_filter() {
        return country
            .currency_code
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(code));
    }
    true
}

/// Total ordering for listings.
///
/// Names compare case-insensitively. Null GDPs sort after every value in
/// either direction. Ties break on ascending id.
#[must_use]
pub fn compare(a: &Country, b: &Country, key: SortKey, order: SortOrder) -> Ordering {
    let directed = |o: Ordering| match order {
        SortOrder::Asc => o,
        SortOrder::Desc => o.reverse(),
    };
    let primary = match key {
        SortKey::Name => directed(a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        SortKey::Population => directed(a.population.cmp(&b.population)),
        SortKey::EstimatedGdp => match (a.estimated_gdp, b.estimated_gdp) {
            (Some(x), Some(y)) => directed(x.total_cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    };
    primary.then(a.id.cmp(&b.id))
}

/// Filter, sort, and paginate `rows`.
#[must_use]
pub fn evaluate<'a, I>(rows: I, query: &CountryQuery, region_match: RegionMatch) -> CountryPage
where
    I: IntoIterator<Item = &'a Country>,
{
    let mut hits: Vec<&Country> = rows
        .into_iter()
        .filter(|c| matches(c, query, region_match))
        .collect();
    let order = query.effective_order();
    hits.sort_by(|a, b| compare(a, b, query.sort, order));

    let total = hits.len() as u64;
    let limit = query.effective_limit();
    let items = hits
        .into_iter()
        .skip(usize::try_from(query.skip).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .cloned()
        .collect();

    CountryPage {
        items,
        total,
        skip: query.skip,
        limit,
    }
}

/// The `n` rows with the highest GDP estimate, nulls last.
#[must_use]
pub fn top_by_gdp<'a, I>(rows: I, n: usize) -> Vec<Country>
where
    I: IntoIterator<Item = &'a Country>,
{
    let mut all: Vec<&Country> = rows.into_iter().collect();
    all.sort_by(|a, b| compare(a, b, SortKey::EstimatedGdp, SortOrder::Desc));
    all.into_iter().take(n).cloned().collect()
}
