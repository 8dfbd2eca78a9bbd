//! Interactive map document.
//!
//! Writes a self-contained Leaflet page: the tile layer, the merged features
//! with their fill colors baked into the properties, a tooltip per feature
//! and the legend. Colors are computed here from the [`StepColormap`], so the
//! page never classifies anything itself.

use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};
use tracing::info;

use crate::colormaps::{Colormap, StepColormap};
use crate::config::MapConfig;
use crate::data_loader::{Feature, FeatureCollection, MergedTable};
use crate::error::{ChoroplethError, Result};
use crate::legend::svg::{escape_xml, render_svg};
use crate::legend::{format_label, LegendSpec};

/// Fill of features without a value
pub const MISSING_COLOR: &str = "#bdbdbd";

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// Where the legend of a page comes from
#[derive(Debug, Clone, PartialEq)]
pub enum LegendPlacement<'a> {
    /// Horizontal strip drawn into the page
    Inline(&'a LegendSpec),
    /// Floating image pointing at an exported legend file
    Image(String),
}

/// Everything needed to draw one map page
#[derive(Debug, Clone)]
pub struct MapDocument<'a> {
    /// Features to draw
    pub table: &'a MergedTable,
    /// Value per feature, aligned with `table.features`
    pub values: &'a [Option<f64>],
    /// Colors for the values
    pub colormap: &'a StepColormap,
    /// Legend to show
    pub legend: LegendPlacement<'a>,
    /// Decimal places for tooltip values
    pub decimal_precision: u32,
    /// Page options
    pub map: &'a MapConfig,
}

#[derive(Serialize)]
struct MapOptions<'a> {
    center: [f64; 2],
    zoom: u8,
    tiles: &'a str,
    attribution: &'a str,
    fill_opacity: f64,
}

/// Path of the HTML page for a map
pub fn map_path(dir: &Path, map_name: &str) -> PathBuf {
    dir.join(format!("{}.html", map_name))
}

/// Serialize a value for embedding inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn tooltip(doc: &MapDocument<'_>, feature: &Feature, value: Option<f64>) -> String {
    let value = match value {
        Some(v) => format_label(v, doc.decimal_precision),
        None => "no data".to_string(),
    };
    format!(
        "<b>{}:</b> {}<br><b>{}:</b> {}",
        escape_xml(&doc.map.feature_label),
        escape_xml(&doc.table.feature_name(feature)),
        escape_xml(&doc.map.popup_label),
        escape_xml(&value)
    )
}

/// The features with `fill_color` and `tooltip` added to their properties.
pub fn styled_features(doc: &MapDocument<'_>) -> Result<FeatureCollection> {
    if doc.values.len() != doc.table.len() {
        return Err(ChoroplethError::InvalidParameter {
            param: "values".to_string(),
            message: format!(
                "{} values for {} features",
                doc.values.len(),
                doc.table.len()
            ),
        });
    }

    let features = doc
        .table
        .features
        .iter()
        .zip(doc.values)
        .map(|(feature, &value)| {
            let fill = doc
                .colormap
                .map_optional(value)
                .map(|c| c.as_str().to_string())
                .unwrap_or_else(|| MISSING_COLOR.to_string());
            let mut styled = feature.clone();
            styled
                .properties
                .insert("fill_color".to_string(), Value::String(fill));
            styled.properties.insert(
                "tooltip".to_string(),
                Value::String(tooltip(doc, feature, value)),
            );
            styled
        })
        .collect();

    Ok(FeatureCollection {
        kind: "FeatureCollection".to_string(),
        features,
    })
}

/// Render the map page as HTML.
pub fn render_html(doc: &MapDocument<'_>) -> Result<String> {
    let features = script_json(&styled_features(doc)?)?;
    let options = script_json(&MapOptions {
        center: doc.map.center,
        zoom: doc.map.zoom,
        tiles: &doc.map.tiles,
        attribution: &doc.map.attribution,
        fill_opacity: doc.map.fill_opacity,
    })?;

    let legend = match &doc.legend {
        LegendPlacement::Inline(spec) => {
            format!(r#"<div class="legend inline">{}</div>"#, render_svg(spec))
        }
        LegendPlacement::Image(src) => format!(
            r#"<img class="legend floating" src="{}" alt="{}">"#,
            escape_xml(src),
            escape_xml(&doc.map.title)
        ),
    };

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_xml(&doc.map.title)));
    html.push_str(&format!("<link rel=\"stylesheet\" href=\"{}\">\n", LEAFLET_CSS));
    html.push_str(&format!("<script src=\"{}\"></script>\n", LEAFLET_JS));
    html.push_str(
        "<style>\n\
         html, body, #map { height: 100%; margin: 0; }\n\
         .legend { position: absolute; z-index: 1000; }\n\
         .legend.inline { bottom: 24px; right: 12px; width: 464px; }\n\
         .legend.floating { bottom: 20%; left: 85%; }\n\
         </style>\n",
    );
    html.push_str("</head>\n<body>\n<div id=\"map\"></div>\n");
    html.push_str(&legend);
    html.push_str("\n<script>\n");
    html.push_str(&format!("const options = {};\n", options));
    html.push_str(&format!("const features = {};\n", features));
    html.push_str(
        "const map = L.map('map').setView(options.center, options.zoom);\n\
         L.tileLayer(options.tiles, { attribution: options.attribution }).addTo(map);\n\
         L.geoJSON(features, {\n  \
           style: f => ({ fillColor: f.properties.fill_color, color: '#555', weight: 0.5, fillOpacity: options.fill_opacity }),\n  \
           onEachFeature: (f, layer) => layer.bindTooltip(f.properties.tooltip, { sticky: true })\n\
         }).addTo(map);\n",
    );
    html.push_str("</script>\n</body>\n</html>\n");
    Ok(html)
}

/// Write `{output_dir}/{map_name}.html`, replacing any previous page.
pub fn write_map(doc: &MapDocument<'_>) -> Result<PathBuf> {
    let html = render_html(doc)?;
    std::fs::create_dir_all(&doc.map.output_dir)?;
    let path = map_path(&doc.map.output_dir, &doc.map.map_name);

    let mut writer = BufWriter::new(File::create(&path)?);
    writer.write_all(html.as_bytes())?;
    writer.flush()?;

    info!(
        path = %path.display(),
        features = doc.table.len(),
        "Map written"
    );
    Ok(path)
}

/// Make a path absolute and resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

/// Reference to a legend file relative to the page's directory.
///
/// Walks up with `..` when the legend lives outside `output_dir`. Paths on
/// different roots (another drive) fall back to the absolute path.
pub fn legend_href(legend_path: &Path, output_dir: &Path) -> Result<String> {
    let target = normalize(legend_path)?;
    let base = normalize(output_dir)?;
    let common = target
        .components()
        .zip(base.components())
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return Ok(target.display().to_string());
    }

    let mut parts: Vec<String> = base.components().skip(common).map(|_| "..".to_string()).collect();
    parts.extend(
        target
            .components()
            .skip(common)
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    Ok(parts.join("/"))
}
