use serde::{Deserialize, Serialize};

/// Column names added by detail enrichment, in output order.
pub const DETAIL_COLUMNS: [&str; 10] = [
    "budget",
    "genres",
    "imdb_id",
    "production_companies",
    "production_countries",
    "revenue",
    "runtime",
    "status",
    "tagline",
    "spoken_languages",
];

/// Detail fields for one movie, as served by the detail endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MovieDetails {
    pub budget: Option<i64>,
    pub genres: Vec<String>,
    pub imdb_id: Option<String>,
    pub production_companies: Vec<String>,
    pub production_countries: Vec<String>,
    pub revenue: Option<i64>,
    pub runtime: Option<i64>,
    pub status: Option<String>,
    pub tagline: Option<String>,
    pub spoken_languages: Vec<String>,
}

#[derive(Deserialize)]
struct NamedEntity {
    name: String,
}

// Wire shape of the detail document. List fields may be absent or null.
#[derive(Deserialize)]
struct RawDetails {
    budget: Option<i64>,
    genres: Option<Vec<NamedEntity>>,
    imdb_id: Option<String>,
    production_companies: Option<Vec<NamedEntity>>,
    production_countries: Option<Vec<NamedEntity>>,
    revenue: Option<i64>,
    runtime: Option<i64>,
    status: Option<String>,
    tagline: Option<String>,
    spoken_languages: Option<Vec<NamedEntity>>,
}

fn names(entities: Option<Vec<NamedEntity>>) -> Vec<String> {
    entities
        .unwrap_or_default()
        .into_iter()
        .map(|e| e.name)
        .collect()
}

impl MovieDetails {
    /// Parse a detail document body.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let raw: RawDetails = serde_json::from_str(body)?;
        Ok(Self {
            budget: raw.budget,
            genres: names(raw.genres),
            imdb_id: raw.imdb_id,
            production_companies: names(raw.production_companies),
            production_countries: names(raw.production_countries),
            revenue: raw.revenue,
            runtime: raw.runtime,
            status: raw.status,
            tagline: raw.tagline,
            spoken_languages: names(raw.spoken_languages),
        })
    }

    /// Cell values in [`DETAIL_COLUMNS`] order. List fields are joined with `", "`.
    pub fn cells(&self) -> [Option<String>; 10] {
        [
            self.budget.map(|v| v.to_string()),
            Some(self.genres.join(", ")),
            self.imdb_id.clone(),
            Some(self.production_companies.join(", ")),
            Some(self.production_countries.join(", ")),
            self.revenue.map(|v| v.to_string()),
            self.runtime.map(|v| v.to_string()),
            self.status.clone(),
            self.tagline.clone(),
            Some(self.spoken_languages.join(", ")),
        ]
    }
}

/// One row of a regional box-office table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionFigure {
    /// Normalized region key, e.g. `"latin_america"`.
    pub region: String,
    pub opening: i64,
    pub gross: i64,
}

/// Totals read from the performance summary panel. Absent sections are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryFigures {
    pub domestic: Option<i64>,
    pub international: Option<i64>,
    pub worldwide: Option<i64>,
}

impl SummaryFigures {
    /// Present totals keyed by `domestic`, `international`, `worldwide`.
    pub fn entries(&self) -> Vec<(&'static str, i64)> {
        [
            ("domestic", self.domestic),
            ("international", self.international),
            ("worldwide", self.worldwide),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect()
    }
}

/// Flat column-name → amount mapping for one title, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxOfficeFigures {
    entries: Vec<(String, i64)>,
}

impl BoxOfficeFigures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `key`, creating it at zero first. Sums saturate.
    pub fn add(&mut self, key: &str, amount: i64) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => {
                *v = match v.checked_add(amount) {
                    Some(sum) => sum,
                    None => {
                        tracing::warn!(key, "Box office sum overflowed, saturating");
                        v.saturating_add(amount)
                    }
                };
            }
            None => self.entries.push((key.to_string(), amount)),
        }
    }

    /// Overwrite `key` with `amount`, keeping its original position if present.
    pub fn set(&mut self, key: &str, amount: i64) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = amount,
            None => self.entries.push((key.to_string(), amount)),
        }
    }

    pub fn get(&self, key: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
