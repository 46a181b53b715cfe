use orbis_core::{RawCountry, RawCurrency};

fn country(
    name: &str,
    capital: &str,
    region: &str,
    population: i64,
    currency: Option<&str>,
) -> RawCountry {
    let slug: String = name
        .chars()
        .filter(char::is_ascii_alphabetic)
        .take(2)
        .collect::<String>()
        .to_ascii_lowercase();
    RawCountry {
        name: Some(name.to_string()),
        capital: Some(capital.to_string()),
        region: Some(region.to_string()),
        population: Some(population),
        flag: Some(format!("https://flagcdn.com/{slug}.svg")),
        currencies: currency.map(|c| {
            vec![RawCurrency {
                code: Some(c.to_string()),
                ..RawCurrency::default()
            }]
        }),
    }
}

/// A small, stable directory covering several regions and edge cases:
/// a currency missing from the rate fixtures ("Testland"/ZZZ) and a
/// country without currencies (Antarctica).
pub fn all() -> Vec<RawCountry> {
    vec![
        country("Nigeria", "Abuja", "Africa", 206_139_589, Some("NGN")),
        country("Ghana", "Accra", "Africa", 31_072_940, Some("GHS")),
        country("Chad", "N'Djamena", "Africa", 16_425_864, Some("XAF")),
        country("Germany", "Berlin", "Europe", 83_240_525, Some("EUR")),
        country("France", "Paris", "Europe", 67_391_582, Some("EUR")),
        country("Japan", "Tokyo", "Asia", 125_836_021, Some("JPY")),
        country("Peru", "Lima", "Americas", 32_971_846, Some("PEN")),
        country("Testland", "Testville", "Oceania", 1_000, Some("ZZZ")),
        country("Antarctica", "", "Polar", 1_000, None),
    ]
}
