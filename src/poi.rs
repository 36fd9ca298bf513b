// POI records and the CSV row shape they are imported from.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::encoding::read_text_multi;

// ============================================================================
// POI IDENTIFIER
// ============================================================================

/// POI identifiers come from a free-text CSV column: numeric when possible,
/// otherwise the raw string is kept so a malformed export still imports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PoiId {
    Number(i64),
    Text(String),
}

impl PoiId {
    /// None when the field is empty - the only case that drops a row outright.
    pub fn parse(raw: &str) -> Option<PoiId> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(match raw.parse::<i64>() {
            Ok(n) => PoiId::Number(n),
            Err(_) => PoiId::Text(raw.to_string()),
        })
    }
}

// ============================================================================
// CSV ROW
// ============================================================================

/// One row of the POI export. All columns are optional in the file; missing
/// ones deserialize to empty strings and values are trimmed at use sites.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoiRow {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub name_ar: String,
    #[serde(default)]
    pub category_en: String,
    #[serde(default)]
    pub category_ar: String,
    #[serde(default)]
    pub sub_category_en: String,
    #[serde(default)]
    pub sub_category_ar: String,
}

pub fn parse_poi_csv(text: &str) -> Result<Vec<PoiRow>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: PoiRow = result.context("Failed to deserialize POI row")?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn read_poi_csv(path: &Path) -> Result<Vec<PoiRow>> {
    let text = read_text_multi(path)?;
    parse_poi_csv(&text)
}

// ============================================================================
// RESOLVED POI
// ============================================================================

/// A POI attached to its resolved taxonomy ids. The category/subcategory
/// names are denormalized snapshots taken at resolution time and are never
/// refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiRecord {
    pub id: PoiId,
    pub name_en: String,
    pub name_ar: String,
    pub category_id: Option<i64>,
    pub category_name_en: Option<String>,
    pub category_name_ar: Option<String>,
    pub subcategory_id: Option<i64>,
    pub subcategory_name_en: Option<String>,
    pub subcategory_name_ar: Option<String>,
}

/// A row whose category names resolved to nothing; kept verbatim in the
/// import report so someone can fix the source data.
#[derive(Debug, Clone, Serialize)]
pub struct UnmatchedRow {
    pub id: PoiId,
    pub name_en: String,
    pub name_ar: String,
    pub category_en: String,
    pub category_ar: String,
    pub sub_category_en: String,
    pub sub_category_ar: String,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poi_id_parse() {
        assert_eq!(PoiId::parse("123"), Some(PoiId::Number(123)));
        assert_eq!(PoiId::parse(" 42 "), Some(PoiId::Number(42)));
        assert_eq!(
            PoiId::parse("POI-7"),
            Some(PoiId::Text("POI-7".to_string()))
        );
        assert_eq!(PoiId::parse(""), None);
        assert_eq!(PoiId::parse("   "), None);
    }

    #[test]
    fn test_poi_id_serializes_untagged() {
        let json = serde_json::to_string(&PoiId::Number(5)).unwrap();
        assert_eq!(json, "5");

        let json = serde_json::to_string(&PoiId::Text("x1".to_string())).unwrap();
        assert_eq!(json, "\"x1\"");

        let back: PoiId = serde_json::from_str("5").unwrap();
        assert_eq!(back, PoiId::Number(5));
    }

    #[test]
    fn test_parse_poi_csv() {
        let text = "id,name_en,name_ar,category_en,category_ar,sub_category_en,sub_category_ar\n\
                    1,Corner Bakery,مخبز الزاوية,Bakery,مخبز,,\n";
        let rows = parse_poi_csv(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "1");
        assert_eq!(rows[0].category_en, "Bakery");
        assert_eq!(rows[0].sub_category_en, "");
    }

    #[test]
    fn test_parse_poi_csv_missing_columns() {
        // Exports sometimes lack the subcategory columns entirely
        let text = "id,name_en,category_en\n7,Plant Nursery,Garden\n";
        let rows = parse_poi_csv(text).unwrap();
        assert_eq!(rows[0].id, "7");
        assert_eq!(rows[0].category_en, "Garden");
        assert_eq!(rows[0].sub_category_ar, "");
    }
}
