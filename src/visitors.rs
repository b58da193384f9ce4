// 🏷️ Visitor Table Normalizer - Rules as Data
// Rewrites visitor-table park names into the API's canonical names and sums
// visitor counts per canonical name.
//
// Rules are plain substring replacements applied in order, each one to the
// output of the previous. Order matters: " NPRES" must run before " NP",
// " NRRA"/" NRA"/" NRES" before " NR", and so on.

use crate::error::{ParkError, ParkResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

// ============================================================================
// RAW ROWS
// ============================================================================

/// One row of the visitor table. Other columns in the file are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawVisitorRow {
    #[serde(rename = "Park")]
    pub park_name_raw: String,

    /// Thousands-separated count, e.g. "1,234,567"
    #[serde(rename = "RecreationVisitors2022")]
    pub visitor_count: String,
}

impl RawVisitorRow {
    pub fn new(park_name_raw: &str, visitor_count: &str) -> Self {
        RawVisitorRow {
            park_name_raw: park_name_raw.to_string(),
            visitor_count: visitor_count.to_string(),
        }
    }
}

pub fn load_visitor_table(path: &Path) -> ParkResult<Vec<RawVisitorRow>> {
    let mut rdr = csv::Reader::from_path(path)
        .map_err(|e| ParkError::VisitorTable(format!("{}: {}", path.display(), e)))?;

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: RawVisitorRow =
            result.map_err(|e| ParkError::VisitorTable(format!("{}: {}", path.display(), e)))?;
        rows.push(row);
    }

    debug!(rows = rows.len(), path = %path.display(), "Loaded visitor table");
    Ok(rows)
}

/// Strip thousands separators and parse
pub fn parse_count(row: &RawVisitorRow) -> ParkResult<u64> {
    let digits: String = row
        .visitor_count
        .chars()
        .filter(|c| *c != ',')
        .collect();

    digits
        .trim()
        .parse::<u64>()
        .map_err(|_| ParkError::MalformedCount {
            park: row.park_name_raw.clone(),
            value: row.visitor_count.clone(),
        })
}

// ============================================================================
// RULES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationRule {
    pub pattern: String,
    pub replacement: String,
}

impl NormalizationRule {
    pub fn new(pattern: &str, replacement: &str) -> Self {
        NormalizationRule {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }

    pub fn apply(&self, name: &str) -> String {
        name.replace(&self.pattern, &self.replacement)
    }
}

/// Visitor-table abbreviations → API names, in application order.
pub const NPS_NAME_RULES: &[(&str, &str)] = &[
    // Unit designations
    (" NMP", " National Military Park"),
    (" NPRES", " National Preserve"),
    (" PKWY", " Parkway"),
    (" MEM", " Memorial"),
    (" NMEM", " National Memorial"),
    (" NM", " National Monument"),
    (" NHS", " National Historic Site"),
    (" PRES", " Preserve"),
    (" NHP", " National Historical Park"),
    (" NP", " National Park"),
    (" NRRA", " National River & Recreation Area"),
    (" NRA", " National Recreation Area"),
    (" NRES", " National Reserve"),
    (" NR", " National River"),
    (" EHP", " Ecological & Historic Preserve"),
    (" NBP", " NB Park"),
    (" NB", " National Battlefield"),
    (" S&RR", " Scenic & Recreational River"),
    (" NL", " National Lakeshore"),
    (" The R.E.", ", The Robert E."),
    // Riverways are keyed on the abbreviation so they cannot fire on their own output
    ("Ozark NSR", "Ozark National Scenic Riverways"),
    ("Saint Croix NSR", "Saint Croix National Scenic Riverway"),
    (" NSR", " National Scenic River"),
    (" NS", " National Seashore"),
    // Individual parks
    ("Booker T.", "Booker T"),
    ("Cesar E. Chavez", "César E. Chávez"),
    ("Ford's Theatre National Historic Site", "Ford's Theatre"),
    (" & HS", " and Historic Shrine"),
    ("Haleakala", "Haleakalā"),
    ("Hawaii", "Hawaiʻi"),
    ("Franklin D.", "Franklin D"),
    ("James A.", "James A"),
    (
        "Jean Lafitte National Historical Park & Preserve",
        "Jean Lafitte National Historical Park and Preserve",
    ),
    ("Kaloko Honokohau", "Kaloko-Honokōhau"),
    (
        "Klondike Gold Rush National Historical Park Alaska",
        "Klondike Gold Rush National Historical Park",
    ),
    (
        "Klondike Gold Rush National Historical Park Seattle",
        "Klondike Gold Rush - Seattle Unit National Historical Park",
    ),
    ("Lewis & Clark", "Lewis and Clark"),
    (" HQ", " Headquarters"),
    ("Lyndon B.", "Lyndon B"),
    ("Maggie L.", "Maggie L"),
    ("Marsh-Billings-Rockefeller", "Marsh - Billings - Rockefeller"),
    ("Parks East", "Parks-East"),
    (" W&SR", " Wild & Scenic River"),
    ("Pennsylvania Avenue National Historic Site", "Pennsylvania Avenue"),
    (" Intl.", " International"),
    (" W.J.", " William Jefferson"),
    ("Pu'uhonua o Honaunau", "Puʻuhonua o Hōnaunau"),
    ("Pu'ukohola Heiau", "Puʻukoholā Heiau"),
    ("Redwood National Park", "Redwood National and State Parks"),
    (" IHS", " International Historic Site"),
    ("Sequoia National Park", "Sequoia & Kings Canyon National Parks"),
    ("Tumacacori", "Tumacácori"),
    ("Ulysses S.", "Ulysses S"),
    ("Wrangell-St. Elias", "Wrangell - St Elias"),
    ("Yukon-Charley Rivers", "Yukon - Charley Rivers"),
    // Capitalization differences
    (
        "Black Canyon of the Gunnison National Park",
        "Black Canyon Of The Gunnison National Park",
    ),
    ("City of Rocks National Reserve", "City Of Rocks National Reserve"),
    (
        "Craters of the Moon National Monument & Preserve",
        "Craters Of The Moon National Monument & Preserve",
    ),
    (
        "Gates of the Arctic National Park & Preserve",
        "Gates Of The Arctic National Park & Preserve",
    ),
    (
        "Home of Franklin D Roosevelt National Historic Site",
        "Home Of Franklin D Roosevelt National Historic Site",
    ),
    (
        "Rosie The Riveter WWII Home Front National Historical Park",
        "Rosie the Riveter WWII Home Front National Historical Park",
    ),
    ("Statue of Liberty National Monument", "Statue Of Liberty National Monument"),
    (
        "War in the Pacific National Historical Park",
        "War In The Pacific National Historical Park",
    ),
];

// ============================================================================
// NORMALIZER
// ============================================================================

/// Visitor counts keyed by canonical name, plus the rows that were skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitorCounts {
    pub counts: BTreeMap<String, u64>,
    pub skipped: Vec<SkippedRow>,
}

impl VisitorCounts {
    /// Count for a canonical name, 0 when the table has no such park
    pub fn get(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// A row dropped because its count could not be parsed
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based data row number
    pub row: usize,
    pub park_name_raw: String,
    pub value: String,
}

pub struct Normalizer {
    rules: Vec<NormalizationRule>,
}

impl Normalizer {
    /// Normalizer over an explicit rule table
    pub fn new(rules: Vec<NormalizationRule>) -> Self {
        Normalizer { rules }
    }

    /// Normalizer over the built-in table
    pub fn builtin() -> Self {
        Normalizer::new(
            NPS_NAME_RULES
                .iter()
                .map(|(pattern, replacement)| NormalizationRule::new(pattern, replacement))
                .collect(),
        )
    }

    /// Load an ordered rule table from a JSON array of `{pattern, replacement}`
    pub fn from_file<P: AsRef<Path>>(path: P) -> ParkResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ParkError::Rules(format!("{}: {}", path.display(), e)))?;

        let rules: Vec<NormalizationRule> = serde_json::from_str(&content)
            .map_err(|e| ParkError::Rules(format!("{}: {}", path.display(), e)))?;

        Ok(Normalizer::new(rules))
    }

    pub fn rules(&self) -> &[NormalizationRule] {
        &self.rules
    }

    /// Run the whole rule list over one raw name
    pub fn canonical_name(&self, raw: &str) -> String {
        self.rules
            .iter()
            .fold(raw.to_string(), |name, rule| rule.apply(&name))
    }

    /// Normalize every row and sum counts per canonical name.
    /// Rows with malformed counts are skipped and reported, not fatal.
    pub fn normalize(&self, rows: &[RawVisitorRow]) -> VisitorCounts {
        let mut result = VisitorCounts::default();

        for (i, row) in rows.iter().enumerate() {
            let count = match parse_count(row) {
                Ok(count) => count,
                Err(e) => {
                    warn!(row = i + 1, error = %e, "Skipping visitor row");
                    result.skipped.push(SkippedRow {
                        row: i + 1,
                        park_name_raw: row.park_name_raw.clone(),
                        value: row.visitor_count.clone(),
                    });
                    continue;
                }
            };

            let name = self.canonical_name(&row.park_name_raw);
            *result.counts.entry(name).or_insert(0) += count;
        }

        result
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::builtin()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_yukon_charley() {
        let normalizer = Normalizer::builtin();
        let counts = normalizer.normalize(&[RawVisitorRow::new("Yukon-Charley Rivers NPRES", "12,345")]);

        assert_eq!(counts.get("Yukon - Charley Rivers National Preserve"), 12345);
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn test_common_designations() {
        let normalizer = Normalizer::builtin();

        let cases = [
            ("Gettysburg NMP", "Gettysburg National Military Park"),
            ("Lake Mead NRA", "Lake Mead National Recreation Area"),
            ("Mississippi NRRA", "Mississippi National River & Recreation Area"),
            ("Buffalo NR", "Buffalo National River"),
            ("Cape Cod NS", "Cape Cod National Seashore"),
            ("Ozark NSR", "Ozark National Scenic Riverways"),
            ("Saint Croix NSR", "Saint Croix National Scenic Riverway"),
            ("Redwood NP", "Redwood National and State Parks"),
            ("Sequoia NP", "Sequoia & Kings Canyon National Parks"),
            ("Haleakala NP", "Haleakalā National Park"),
            ("Hawaii Volcanoes NP", "Hawaiʻi Volcanoes National Park"),
            ("Gates of the Arctic NP & PRES", "Gates Of The Arctic National Park & Preserve"),
            ("Fort McHenry NM & HS", "Fort McHenry National Monument and Historic Shrine"),
        ];

        for (raw, expected) in cases {
            assert_eq!(normalizer.canonical_name(raw), expected, "raw name {:?}", raw);
        }
    }

    #[test]
    fn test_counts_are_summed() {
        let normalizer = Normalizer::builtin();
        let rows = vec![
            RawVisitorRow::new("Klondike Gold Rush NHP Alaska", "1,200"),
            RawVisitorRow::new("Klondike Gold Rush NHP Alaska", "300"),
        ];

        let counts = normalizer.normalize(&rows);
        assert_eq!(counts.get("Klondike Gold Rush National Historical Park"), 1500);

        println!("✅ Summation test PASSED");
    }

    #[test]
    fn test_malformed_count_is_skipped() {
        let normalizer = Normalizer::builtin();
        let rows = vec![
            RawVisitorRow::new("Zion NP", "4,692,417"),
            RawVisitorRow::new("Arches NP", "n/a"),
            RawVisitorRow::new("Arches NP", "1,460,652"),
        ];

        let counts = normalizer.normalize(&rows);

        assert_eq!(counts.get("Zion National Park"), 4692417);
        assert_eq!(counts.get("Arches National Park"), 1460652);
        assert_eq!(counts.skipped.len(), 1);
        assert_eq!(counts.skipped[0].row, 2);
        assert_eq!(counts.skipped[0].value, "n/a");
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(&RawVisitorRow::new("X", "1,234,567")).unwrap(), 1234567);
        assert_eq!(parse_count(&RawVisitorRow::new("X", "0")).unwrap(), 0);
        assert!(matches!(
            parse_count(&RawVisitorRow::new("X", "-5")),
            Err(ParkError::MalformedCount { .. })
        ));
        assert!(parse_count(&RawVisitorRow::new("X", "")).is_err());
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let normalizer = Normalizer::builtin();
        let rows = vec![
            RawVisitorRow::new("Acadia NP", "3,970,260"),
            RawVisitorRow::new("Lewis & Clark NHP", "185,000"),
            RawVisitorRow::new("Wrangell-St. Elias NP & PRES", "16,000"),
        ];

        assert_eq!(normalizer.normalize(&rows), normalizer.normalize(&rows));
    }

    #[test]
    fn test_builtin_rules_are_idempotent() {
        let normalizer = Normalizer::builtin();

        for (_, replacement) in NPS_NAME_RULES {
            let once = normalizer.canonical_name(&format!("Sample{}", replacement));
            let twice = normalizer.canonical_name(&once);
            assert_eq!(once, twice, "rule output {:?} is not stable", replacement);
        }

        let canonical = [
            "Ozark National Scenic Riverways",
            "Yukon - Charley Rivers National Preserve",
            "Redwood National and State Parks",
            "Lake Mead National Recreation Area",
        ];
        for name in canonical {
            assert_eq!(normalizer.canonical_name(name), name);
        }
    }

    #[test]
    fn test_rule_order_matters() {
        let sequential = Normalizer::new(vec![
            NormalizationRule::new(" NRA", " National Recreation Area"),
            NormalizationRule::new(" NR", " National River"),
        ]);
        let swapped = Normalizer::new(vec![
            NormalizationRule::new(" NR", " National River"),
            NormalizationRule::new(" NRA", " National Recreation Area"),
        ]);

        assert_eq!(
            sequential.canonical_name("Lake Mead NRA"),
            "Lake Mead National Recreation Area"
        );
        assert_eq!(swapped.canonical_name("Lake Mead NRA"), "Lake Mead National RiverA");
    }

    #[test]
    fn test_rules_chain_on_previous_output() {
        // " NBP" produces " NB Park", which " NB" then expands
        let normalizer = Normalizer::builtin();
        assert_eq!(
            normalizer.canonical_name("Richmond NBP"),
            "Richmond National Battlefield Park"
        );
    }

    #[test]
    fn test_load_visitor_table_and_rules_file() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("visits.csv");
        let mut file = fs::File::create(&csv_path).unwrap();
        writeln!(file, "Park,State,RecreationVisitors2022").unwrap();
        writeln!(file, "Acadia NP,ME,\"3,970,260\"").unwrap();
        writeln!(file, "Big Bend NP,TX,\"581,220\"").unwrap();

        let rows = load_visitor_table(&csv_path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].visitor_count, "3,970,260");

        let rules_path = dir.path().join("rules.json");
        fs::write(
            &rules_path,
            r#"[{"pattern": " NP", "replacement": " National Park"}]"#,
        )
        .unwrap();

        let normalizer = Normalizer::from_file(&rules_path).unwrap();
        assert_eq!(normalizer.rules().len(), 1);

        let counts = normalizer.normalize(&rows);
        assert_eq!(counts.get("Big Bend National Park"), 581220);
    }

    #[test]
    fn test_missing_visitor_table() {
        let result = load_visitor_table(Path::new("/nonexistent/visits.csv"));
        assert!(matches!(result, Err(ParkError::VisitorTable(_))));
    }
}
