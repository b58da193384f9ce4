// 🏞️ Park Catalog - immutable Park entities joined with visitor counts
//
// One Park per raw API record. Records missing a required field are dropped
// (and logged); everything else is read-only once built.

use crate::error::ParkError;
use crate::source::{NamedItem, RawPark};
use crate::visitors::VisitorCounts;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::warn;

// ============================================================================
// PARK
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Park {
    pub name: String,
    pub url: String,
    pub location: Location,
    pub activities: BTreeSet<String>,
    pub topics: BTreeSet<String>,
    /// All state codes the park spans, e.g. "CA,NV"
    pub state: String,
    pub visitor_count_2022: u64,
}

impl Park {
    /// Individual state codes, upper-cased
    pub fn state_codes(&self) -> impl Iterator<Item = String> + '_ {
        split_state_codes(&self.state)
    }

    /// Case-insensitive membership of one state code
    pub fn in_state(&self, code: &str) -> bool {
        let code = code.trim().to_uppercase();
        !code.is_empty() && self.state_codes().any(|c| c == code)
    }

    pub fn has_any_topic(&self, topics: &[String]) -> bool {
        topics.iter().any(|t| self.topics.contains(t))
    }

    pub fn has_any_activity(&self, activities: &[String]) -> bool {
        activities.iter().any(|a| self.activities.contains(a))
    }
}

fn split_state_codes(states: &str) -> impl Iterator<Item = String> + '_ {
    states
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_uppercase())
}

// ============================================================================
// CATALOG
// ============================================================================

/// Ordered, read-only list of parks for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    parks: Vec<Park>,
}

impl Catalog {
    pub fn new(parks: Vec<Park>) -> Self {
        Catalog { parks }
    }

    pub fn parks(&self) -> &[Park] {
        &self.parks
    }

    pub fn len(&self) -> usize {
        self.parks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parks.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Park> {
        self.parks.iter().find(|p| p.name == name)
    }

    /// Every individual state code present, sorted
    pub fn state_codes(&self) -> BTreeSet<String> {
        self.parks.iter().flat_map(|p| p.state_codes()).collect()
    }

    pub fn total_visitors(&self) -> u64 {
        self.parks.iter().map(|p| p.visitor_count_2022).sum()
    }

    /// Canonical visitor-table names with no park of that name
    pub fn unmatched_names<'a>(&self, counts: &'a VisitorCounts) -> Vec<&'a str> {
        counts
            .counts
            .keys()
            .filter(|name| self.get(name).is_none())
            .map(|name| name.as_str())
            .collect()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// A raw record that could not become a Park
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedRecord {
    pub index: usize,
    pub name: Option<String>,
    pub field: &'static str,
}

/// Catalog plus the records that were dropped while building it
#[derive(Debug, Clone, Default)]
pub struct CatalogBuild {
    pub catalog: Catalog,
    pub dropped: Vec<DroppedRecord>,
}

/// Convert one raw record, failing on the first missing required field
pub fn park_from_raw(index: usize, raw: &RawPark, counts: &VisitorCounts) -> Result<Park, ParkError> {
    let missing = |field| ParkError::MissingField { index, field };

    let name = non_empty(raw.full_name.as_deref()).ok_or_else(|| missing("fullName"))?;
    let url = non_empty(raw.url.as_deref()).ok_or_else(|| missing("url"))?;
    let latitude = parse_coordinate(raw.latitude.as_deref()).ok_or_else(|| missing("latitude"))?;
    let longitude = parse_coordinate(raw.longitude.as_deref()).ok_or_else(|| missing("longitude"))?;

    Ok(Park {
        name: name.to_string(),
        url: url.to_string(),
        location: Location { latitude, longitude },
        activities: names(raw.activities.as_deref()),
        topics: names(raw.topics.as_deref()),
        state: raw.states.clone().unwrap_or_default(),
        visitor_count_2022: counts.get(name),
    })
}

/// Build the catalog. Records with missing required fields are skipped.
pub fn build_catalog(raw_parks: &[RawPark], counts: &VisitorCounts) -> CatalogBuild {
    let mut build = CatalogBuild::default();
    let mut parks = Vec::with_capacity(raw_parks.len());

    for (index, raw) in raw_parks.iter().enumerate() {
        match park_from_raw(index, raw, counts) {
            Ok(park) => parks.push(park),
            Err(ParkError::MissingField { field, .. }) => {
                warn!(
                    index,
                    name = raw.full_name.as_deref().unwrap_or("<unnamed>"),
                    field,
                    "Dropping park record with missing field"
                );
                build.dropped.push(DroppedRecord {
                    index,
                    name: raw.full_name.clone(),
                    field,
                });
            }
            Err(e) => warn!(index, error = %e, "Dropping park record"),
        }
    }

    build.catalog = Catalog::new(parks);
    build
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_coordinate(value: Option<&str>) -> Option<f64> {
    non_empty(value)?.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn names(items: Option<&[NamedItem]>) -> BTreeSet<String> {
    items
        .unwrap_or_default()
        .iter()
        .map(|item| item.name.clone())
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
