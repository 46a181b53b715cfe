/// Tables are created on open; statements are idempotent.
///
/// `name_key` holds the normalized name and carries the uniqueness
/// constraint so matching is case-insensitive for every script, not just ASCII.
/// `region_key` is the lowercased region for the same reason: SQLite's
/// `lower()` only folds ASCII.
pub(crate) const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS countries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    name_key TEXT NOT NULL UNIQUE,
    capital TEXT,
    region TEXT,
    region_key TEXT,
    population INTEGER NOT NULL CHECK (population >= 0),
    currency_code TEXT,
    exchange_rate REAL,
    estimated_gdp REAL,
    flag_url TEXT,
    last_refreshed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS countries_region_idx ON countries(region_key);
CREATE INDEX IF NOT EXISTS countries_currency_idx ON countries(currency_code);

CREATE TABLE IF NOT EXISTS api_status (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    last_updated TEXT NOT NULL
);
";
