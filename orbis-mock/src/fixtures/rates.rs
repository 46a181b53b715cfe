use orbis_core::RateTable;

/// USD-relative rates for the fixture currencies, minus ZZZ.
pub fn usd() -> RateTable {
    [
        ("USD", 1.0),
        ("NGN", 1_600.0),
        ("GHS", 15.5),
        ("XAF", 605.0),
        ("EUR", 0.92),
        ("JPY", 150.0),
        ("PEN", 3.75),
    ]
    .into_iter()
    .map(|(code, rate)| (code.to_string(), rate))
    .collect()
}
