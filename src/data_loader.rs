//! Input loading and merging.
//!
//! Boundaries come from a GeoJSON `FeatureCollection`; statistics come from a
//! CSV export or a JSON array of records. The two are inner-joined on one or
//! more key columns. Geometry is carried through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{ChoroplethError, Result};

/// A table row: column name to value
pub type Record = Map<String, Value>;

/// One boundary shape with its attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// GeoJSON object type, always "Feature"
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    /// Optional feature identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Attribute columns
    #[serde(default)]
    pub properties: Record,
    /// Geometry, kept opaque
    #[serde(default)]
    pub geometry: Value,
}

/// A GeoJSON feature collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    /// GeoJSON object type, always "FeatureCollection"
    #[serde(rename = "type")]
    pub kind: String,
    /// The features
    pub features: Vec<Feature>,
}

fn feature_type() -> String {
    "Feature".to_string()
}

/// Boundaries joined with their table rows
#[derive(Debug, Clone)]
pub struct MergedTable {
    /// Merged features; table columns are added to each feature's properties
    pub features: Vec<Feature>,
    /// Columns identifying a feature
    pub shape_keys: Vec<String>,
}

impl MergedTable {
    /// Number of features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when no feature was matched
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Per-feature numeric value of `column`; missing or non-numeric is `None`.
    pub fn numeric_column(&self, column: &str) -> Vec<Option<f64>> {
        self.features
            .iter()
            .map(|f| f.properties.get(column).and_then(numeric_value))
            .collect()
    }

    /// Display name of a feature built from its key columns
    pub fn feature_name(&self, feature: &Feature) -> String {
        self.shape_keys
            .iter()
            .filter_map(|k| feature.properties.get(k).and_then(|v| key_string(v, None)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Interpret a JSON value as a finite number.
pub fn numeric_value(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

/// Stringify a key value, left-padding with zeros to `width` when given.
///
/// Numbers and strings both work, so a table storing zip code `5753` joins a
/// shapefile storing `"05753"` once padded to five characters.
pub fn key_string(value: &Value, width: Option<usize>) -> Option<String> {
    let raw = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            // 5753.0 from a float column is the code 5753
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if raw.is_empty() {
        return None;
    }
    Some(match width {
        Some(w) if raw.len() < w => format!("{:0>width$}", raw, width = w),
        _ => raw,
    })
}

fn composite_key(row: &Record, keys: &[String], width: Option<usize>) -> Option<String> {
    let parts = keys
        .iter()
        .map(|k| row.get(k).and_then(|v| key_string(v, width)))
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("|"))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| ChoroplethError::Resource {
        message: format!("Failed to read {} {}: {}", what, path.display(), e),
    })?;
    serde_json::from_str(&content).map_err(|e| ChoroplethError::Resource {
        message: format!("Failed to parse {} {}: {}", what, path.display(), e),
    })
}

/// Load a GeoJSON feature collection
pub fn load_boundaries(path: &Path) -> Result<FeatureCollection> {
    let collection: FeatureCollection = read_json(path, "boundary file")?;
    if collection.kind != "FeatureCollection" {
        return Err(ChoroplethError::Resource {
            message: format!(
                "{} is a GeoJSON '{}', expected a FeatureCollection",
                path.display(),
                collection.kind
            ),
        });
    }
    info!(
        path = %path.display(),
        features = collection.features.len(),
        "Loaded boundaries"
    );
    Ok(collection)
}

/// Read a CSV file with a header row into records.
///
/// Cells are kept as strings so that leading zeros in codes survive; empty
/// cells become `null`. Numeric columns are parsed later by [`numeric_value`].
pub fn read_csv(path: &Path) -> Result<Vec<Record>> {
    let csv_error = |e: csv::Error| ChoroplethError::Resource {
        message: format!("Failed to read data table {}: {}", path.display(), e),
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;
    let headers = reader.headers().map_err(csv_error)?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(column, cell)| {
                let value = if cell.is_empty() {
                    Value::Null
                } else {
                    Value::String(cell.to_string())
                };
                (column.to_string(), value)
            })
            .collect();
        records.push(record);
    }
    Ok(records)
}

/// Load a data table: `.csv` files are read as CSV, anything else as a JSON
/// array of records.
pub fn load_table(path: &Path) -> Result<Vec<Record>> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    let records = if is_csv {
        read_csv(path)?
    } else {
        read_json(path, "data table")?
    };
    info!(
        path = %path.display(),
        rows = records.len(),
        "Loaded data table"
    );
    Ok(records)
}

/// Inner-join boundaries with table rows.
///
/// `shape_keys[i]` in the boundaries is matched against `data_keys[i]` in the
/// table. When several rows share a key the first one is used.
pub fn merge_tables(
    boundaries: FeatureCollection,
    records: Vec<Record>,
    shape_keys: &[String],
    data_keys: &[String],
    key_width: Option<usize>,
) -> Result<MergedTable> {
    if shape_keys.is_empty() || shape_keys.len() != data_keys.len() {
        return Err(ChoroplethError::Config {
            message: format!(
                "Join needs the same non-zero number of shape and data keys, got {} and {}",
                shape_keys.len(),
                data_keys.len()
            ),
        });
    }

    let mut by_key: HashMap<String, Record> = HashMap::with_capacity(records.len());
    let mut duplicates = 0usize;
    for record in records {
        let Some(key) = composite_key(&record, data_keys, key_width) else {
            continue;
        };
        if by_key.contains_key(&key) {
            duplicates += 1;
            continue;
        }
        by_key.insert(key, record);
    }
    if duplicates > 0 {
        warn!(duplicates = duplicates, "Data table has duplicate keys; first row kept");
    }

    let total = boundaries.features.len();
    let mut features = Vec::with_capacity(total);
    for mut feature in boundaries.features {
        let Some(key) = composite_key(&feature.properties, shape_keys, key_width) else {
            continue;
        };
        let Some(record) = by_key.get(&key) else {
            continue;
        };
        for (column, value) in record {
            feature.properties.insert(column.clone(), value.clone());
        }
        features.push(feature);
    }

    let unmatched = total - features.len();
    if unmatched > 0 {
        warn!(
            boundaries = total,
            unmatched = unmatched,
            "Boundaries without a table row were dropped"
        );
    }
    debug!(
        boundaries = total,
        matched = features.len(),
        "Merged boundaries with data table"
    );

    if features.is_empty() {
        return Err(ChoroplethError::DataNotFound {
            message: format!(
                "No boundary matched a table row on keys {:?} = {:?}",
                shape_keys, data_keys
            ),
        });
    }

    Ok(MergedTable {
        features,
        shape_keys: shape_keys.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collection(zips: &[Value]) -> FeatureCollection {
        let features = zips
            .iter()
            .map(|z| {
                let mut properties = Record::new();
                properties.insert("ZCTA".to_string(), z.clone());
                Feature {
                    kind: "Feature".to_string(),
                    id: None,
                    properties,
                    geometry: json!({"type": "Point", "coordinates": [0.0, 0.0]}),
                }
            })
            .collect();
        FeatureCollection {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }

    fn records(rows: Value) -> Vec<Record> {
        serde_json::from_value(rows).unwrap()
    }

    #[test]
    fn test_key_string_padding() {
        assert_eq!(key_string(&json!(5753), Some(5)).unwrap(), "05753");
        assert_eq!(key_string(&json!("5753"), Some(5)).unwrap(), "05753");
        assert_eq!(key_string(&json!("22101"), Some(5)).unwrap(), "22101");
        assert_eq!(key_string(&json!(123456), Some(5)).unwrap(), "123456");
        assert_eq!(key_string(&json!(7), None).unwrap(), "7");
        assert_eq!(key_string(&json!(5753.0), Some(5)).unwrap(), "05753");
        assert_eq!(key_string(&json!(12.5), None).unwrap(), "12.5");
        assert_eq!(key_string(&Value::Null, Some(5)), None);
        assert_eq!(key_string(&json!(""), Some(5)), None);
    }

    #[test]
    fn test_numeric_value() {
        assert_eq!(numeric_value(&json!(1.5)), Some(1.5));
        assert_eq!(numeric_value(&json!(" 42 ")), Some(42.0));
        assert_eq!(numeric_value(&json!("n/a")), None);
        assert_eq!(numeric_value(&Value::Null), None);
        assert_eq!(numeric_value(&json!("NaN")), None);
    }

    #[test]
    fn test_merge_pads_keys() {
        let boundaries = collection(&[json!("05753"), json!("22101"), json!("99999")]);
        let table = records(json!([
            {"zip": 5753, "income": 52000},
            {"zip": "22101", "income": 150000},
            {"zip": "10001", "income": 90000}
        ]));
        let merged = merge_tables(
            boundaries,
            table,
            &["ZCTA".to_string()],
            &["zip".to_string()],
            Some(5),
        )
        .unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(
            merged.numeric_column("income"),
            vec![Some(52000.0), Some(150000.0)]
        );
        assert_eq!(merged.feature_name(&merged.features[0]), "05753");
    }

    #[test]
    fn test_merge_first_duplicate_wins() {
        let boundaries = collection(&[json!("1")]);
        let table = records(json!([
            {"id": 1, "v": 10},
            {"id": 1, "v": 20}
        ]));
        let merged = merge_tables(
            boundaries,
            table,
            &["ZCTA".to_string()],
            &["id".to_string()],
            None,
        )
        .unwrap();
        assert_eq!(merged.numeric_column("v"), vec![Some(10.0)]);
    }

    #[test]
    fn test_merge_composite_keys() {
        let mut features = Vec::new();
        for (state, county) in [(51, 59), (51, 13), (6, 37)] {
            let mut properties = Record::new();
            properties.insert("STATEFP".to_string(), json!(format!("{:02}", state)));
            properties.insert("COUNTYFP".to_string(), json!(format!("{:03}", county)));
            features.push(Feature {
                kind: "Feature".to_string(),
                id: None,
                properties,
                geometry: Value::Null,
            });
        }
        let boundaries = FeatureCollection {
            kind: "FeatureCollection".to_string(),
            features,
        };
        let table = records(json!([
            {"state": 51, "county": 59, "pop": 1150000},
            {"state": 6, "county": 37, "pop": 9800000}
        ]));
        let merged = merge_tables(
            boundaries,
            table,
            &["STATEFP".to_string(), "COUNTYFP".to_string()],
            &["state".to_string(), "county".to_string()],
            Some(3),
        )
        .unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.numeric_column("pop"), vec![Some(1150000.0), Some(9800000.0)]);
    }

    #[test]
    fn test_merge_float_keys() {
        let boundaries = collection(&[json!("05753"), json!("22101")]);
        let table = records(json!([
            {"zip": 5753.0, "income": 52000},
            {"zip": 22101.0, "income": 150000}
        ]));
        let merged = merge_tables(
            boundaries,
            table,
            &["ZCTA".to_string()],
            &["zip".to_string()],
            Some(5),
        )
        .unwrap();
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_load_csv_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("income.CSV");
        std::fs::write(
            &path,
            "zip, median_income ,name\n05753,52000,Middlebury\n22101, 150000 ,McLean\n10001,,Chelsea\n",
        )
        .unwrap();

        let table = load_table(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table[0]["zip"], json!("05753"));
        assert_eq!(table[1]["median_income"], json!("150000"));
        assert_eq!(table[2]["median_income"], Value::Null);

        let merged = merge_tables(
            collection(&[json!("05753"), json!("22101"), json!("10001")]),
            table,
            &["ZCTA".to_string()],
            &["zip".to_string()],
            Some(5),
        )
        .unwrap();
        assert_eq!(
            merged.numeric_column("median_income"),
            vec![Some(52000.0), Some(150000.0), None]
        );
    }

    #[test]
    fn test_load_malformed_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        std::fs::write(&path, "zip,value\n1,2,3\n").unwrap();
        let err = load_table(&path).unwrap_err();
        assert!(matches!(err, ChoroplethError::Resource { .. }));
    }

    #[test]
    fn test_merge_errors() {
        let err = merge_tables(
            collection(&[json!("1")]),
            records(json!([{"id": 2}])),
            &["ZCTA".to_string()],
            &["id".to_string()],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ChoroplethError::DataNotFound { .. }));

        let err = merge_tables(
            collection(&[json!("1")]),
            vec![],
            &["ZCTA".to_string()],
            &[],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ChoroplethError::Config { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_boundaries(Path::new("/nonexistent/shapes.geojson")).unwrap_err();
        assert!(matches!(err, ChoroplethError::Resource { .. }));
    }
}
