/// Parse a currency string such as `"$1,234"` into an integer amount.
///
/// `$` and `,` are stripped before parsing. Missing, empty, or unparseable
/// input yields `0`.
pub fn clean_currency(value: Option<&str>) -> i64 {
    let Some(value) = value else {
        return 0;
    };
    let cleaned: String = value.chars().filter(|c| *c != '$' && *c != ',').collect();
    cleaned.trim().parse().unwrap_or(0)
}

/// Normalize a region heading into a column-name fragment.
///
/// Example: `"Latin America, Inc"` → `"latin_america_inc"`
pub fn clean_region_name(region: &str) -> String {
    region.replace(',', "").replace(' ', "_").to_lowercase()
}
