use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the orbis workspace.
///
/// Covers upstream fetch failures, per-record reconciliation problems,
/// transactional persistence failures, rendering problems, and the read-side
/// not-found conditions.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OrbisError {
    /// An upstream API could not be reached, timed out, or answered with a
    /// non-success status or an unusable payload.
    #[error("{data_source} unavailable: {cause}")]
    DataSourceUnavailable {
        /// Name of the upstream data source (e.g. "restcountries").
        data_source: String,
        /// Human-readable description of the underlying failure.
        cause: String,
    },

    /// An upstream API answered successfully but carried no usable records.
    #[error("{data_source} returned no records")]
    EmptyDataSource {
        /// Name of the upstream data source.
        data_source: String,
    },

    /// A single fetched record could not be processed. Never aborts a cycle.
    #[error("record '{record}' rejected: {reason}")]
    RecordProcessing {
        /// Record identity (country name, or a positional label when unnamed).
        record: String,
        /// Why the record was rejected.
        reason: String,
    },

    /// The backing store failed; the whole refresh cycle was rolled back.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// The summary image could not be produced.
    #[error("render failure: {0}")]
    Render(String),

    /// A resource could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource, e.g. "country 'Chad'".
        what: String,
    },

    /// No refresh cycle has ever completed successfully.
    #[error("status not initialized: no refresh has completed yet")]
    StatusNotInitialized,

    /// A page was requested past the end of the matching rows.
    #[error("no more countries in this range: skip={skip} total={total}")]
    PageOutOfRange {
        /// Requested offset.
        skip: u64,
        /// Number of rows matching the filter.
        total: u64,
    },

    /// Another refresh cycle is running against the same store.
    #[error("refresh already in progress")]
    RefreshInProgress,

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl OrbisError {
    /// Helper: build a `DataSourceUnavailable` error.
    pub fn data_source_unavailable(data_source: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::DataSourceUnavailable {
            data_source: data_source.into(),
            cause: cause.into(),
        }
    }

    /// Helper: build an `EmptyDataSource` error.
    pub fn empty_data_source(data_source: impl Into<String>) -> Self {
        Self::EmptyDataSource {
            data_source: data_source.into(),
        }
    }

    /// Helper: build a `RecordProcessing` error.
    pub fn record(record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RecordProcessing {
            record: record.into(),
            reason: reason.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `Persistence` error from any displayable cause.
    pub fn persistence(cause: impl core::fmt::Display) -> Self {
        Self::Persistence(cause.to_string())
    }

    /// Helper: build a `Render` error from any displayable cause.
    pub fn render(cause: impl core::fmt::Display) -> Self {
        Self::Render(cause.to_string())
    }

    /// Name of the upstream source this error is attributed to, if any.
    #[must_use]
    pub fn data_source(&self) -> Option<&str> {
        match self {
            Self::DataSourceUnavailable { data_source, .. }
            | Self::EmptyDataSource { data_source } => Some(data_source.as_str()),
            _ => None,
        }
    }

    /// Returns true when the refresh cycle was aborted before any write
    /// because an upstream source failed.
    #[must_use]
    pub const fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::DataSourceUnavailable { .. } | Self::EmptyDataSource { .. }
        )
    }

    /// Returns true if this error should be surfaced to operators as actionable.
    ///
    /// Benign read-side outcomes (missing rows, empty pages, a service that has
    /// simply not refreshed yet) are not actionable.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        !matches!(
            self,
            Self::NotFound { .. } | Self::StatusNotInitialized | Self::PageOutOfRange { .. }
        )
    }

    /// Short machine-readable label for the variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DataSourceUnavailable { .. } => "data_source_unavailable",
            Self::EmptyDataSource { .. } => "empty_data_source",
            Self::RecordProcessing { .. } => "record_processing",
            Self::Persistence(_) => "persistence",
            Self::Render(_) => "render",
            Self::NotFound { .. } => "not_found",
            Self::StatusNotInitialized => "status_not_initialized",
            Self::PageOutOfRange { .. } => "page_out_of_range",
            Self::RefreshInProgress => "refresh_in_progress",
            Self::InvalidArg(_) => "invalid_argument",
            Self::Other(_) => "other",
        }
    }
}
