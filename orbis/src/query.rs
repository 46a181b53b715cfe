use orbis_core::{Country, CountryPage, CountryQuery, OrbisError, StatusReport};

use crate::Orbis;

impl Orbis {
    /// One page of stored countries matching `query`.
    ///
    /// Filters apply the configured `RegionMatch`. A missing `limit` takes the
    /// configured default page size.
    ///
    /// # Errors
    /// - `InvalidArg` when `limit` is zero or above the maximum page size.
    /// - `PageOutOfRange` when `skip > 0` and the page is empty. An empty
    ///   result at `skip = 0` is a valid, empty page.
    /// - `Persistence` when the store fails.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "orbis::countries",
            skip(self, query),
            fields(sort = %query.sort, skip = query.skip),
        )
    )]
    pub async fn countries(&self, query: &CountryQuery) -> Result<CountryPage, OrbisError> {
        let limit = query.limit.unwrap_or(self.cfg.default_page_size);
        if limit == 0 || limit > self.cfg.max_page_size {
            return Err(OrbisError::InvalidArg(format!(
                "limit must be between 1 and {}, got {limit}",
                self.cfg.max_page_size
            )));
        }
        let q = query.clone().limit(limit);
        let page = self.store.list_countries(&q, self.cfg.region_match).await?;
        if page.items.is_empty() && q.skip > 0 {
            return Err(OrbisError::PageOutOfRange {
                skip: q.skip,
                total: page.total,
            });
        }
        Ok(page)
    }

    /// Case-insensitive lookup of one country.
    ///
    /// # Errors
    /// `InvalidArg` for a blank name, `NotFound` when no row matches.
    pub async fn country(&self, name: &str) -> Result<Country, OrbisError> {
        let name = non_blank(name)?;
        self.store
            .country_by_name(name)
            .await?
            .ok_or_else(|| OrbisError::not_found(format!("country '{name}'")))
    }

    /// Case-insensitive delete of one country.
    ///
    /// # Errors
    /// `InvalidArg` for a blank name, `NotFound` when no row matches.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "orbis::delete_country", skip(self))
    )]
    pub async fn delete_country(&self, name: &str) -> Result<(), OrbisError> {
        let name = non_blank(name)?;
        if self.store.delete_country(name).await? {
            Ok(())
        } else {
            Err(OrbisError::not_found(format!("country '{name}'")))
        }
    }

    /// Last successful refresh time and the current row count.
    ///
    /// # Errors
    /// `StatusNotInitialized` before the first successful refresh.
    pub async fn status(&self) -> Result<StatusReport, OrbisError> {
        let record = self
            .store
            .status()
            .await?
            .ok_or(OrbisError::StatusNotInitialized)?;
        let total_countries = self.store.count_countries().await?;
        Ok(StatusReport {
            last_updated: record.last_updated,
            total_countries,
        })
    }
}

fn non_blank(name: &str) -> Result<&str, OrbisError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(OrbisError::InvalidArg("country name must not be empty".into()));
    }
    Ok(trimmed)
}
