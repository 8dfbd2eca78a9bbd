//! Test data generation utilities.
//!
//! Writes small GeoJSON boundary files and JSON record tables with known
//! values, shaped like zip code and county inputs.

use serde_json::{json, Value};
use std::path::Path;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// A unit square at column `i` of a grid, as a GeoJSON polygon
fn square(i: usize) -> Value {
    let x = -100.0 + i as f64;
    json!({
        "type": "Polygon",
        "coordinates": [[[x, 38.0], [x + 1.0, 38.0], [x + 1.0, 39.0], [x, 39.0], [x, 38.0]]]
    })
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Creates a boundary file with one square per zip code, stored as strings
/// under `ZCTA5CE20`.
pub fn create_zip_boundaries(path: &Path, zips: &[&str]) -> Result<()> {
    let features: Vec<Value> = zips
        .iter()
        .enumerate()
        .map(|(i, zip)| {
            json!({
                "type": "Feature",
                "properties": {"ZCTA5CE20": zip},
                "geometry": square(i)
            })
        })
        .collect();
    write_json(path, &json!({"type": "FeatureCollection", "features": features}))
}

/// Creates a table with numeric `zip` keys and a `median_income` column.
pub fn create_income_table(path: &Path, rows: &[(u32, Option<f64>)]) -> Result<()> {
    let records: Vec<Value> = rows
        .iter()
        .map(|(zip, income)| json!({"zip": zip, "median_income": income}))
        .collect();
    write_json(path, &Value::Array(records))
}

/// Creates a `zip,median_income` CSV with zero-padded zips; `None` leaves the cell empty.
pub fn create_income_csv(path: &Path, rows: &[(u32, Option<f64>)]) -> Result<()> {
    let mut text = String::from("zip,median_income\n");
    for (zip, income) in rows {
        let cell = income.map(|v| v.to_string()).unwrap_or_default();
        text.push_str(&format!("{:05},{}\n", zip, cell));
    }
    std::fs::write(path, text)?;
    Ok(())
}

/// Creates county boundaries keyed by `STATEFP` and `COUNTYFP`.
pub fn create_county_boundaries(path: &Path, counties: &[(&str, &str, &str)]) -> Result<()> {
    let features: Vec<Value> = counties
        .iter()
        .enumerate()
        .map(|(i, (state, county, name))| {
            json!({
                "type": "Feature",
                "properties": {"STATEFP": state, "COUNTYFP": county, "NAME": name},
                "geometry": square(i)
            })
        })
        .collect();
    write_json(path, &json!({"type": "FeatureCollection", "features": features}))
}

/// Creates a county table with numeric FIPS parts and a `share` column.
pub fn create_county_table(path: &Path, rows: &[(u32, u32, f64)]) -> Result<()> {
    let records: Vec<Value> = rows
        .iter()
        .map(|(state, county, share)| json!({"state": state, "county": county, "share": share}))
        .collect();
    write_json(path, &Value::Array(records))
}
