//! Map generation.
//!
//! [`prepare_map`] does all the classification work without touching the
//! filesystem; [`generate_map`] runs it and then writes the legend and the
//! page. A failure while classifying leaves no files behind.

use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::classify::{compute_boundaries, prepare_values, BinBoundaries, NumericSample};
use crate::colormaps::StepColormap;
use crate::config::Config;
use crate::data_loader::MergedTable;
use crate::error::Result;
use crate::legend::{build_legend, export_legend, LegendOrientation, LegendSpec};
use crate::logging::{
    generate_request_id, log_classification_stats, log_error, log_operation_end,
    log_operation_start,
};
use crate::palettes::{ColorList, ColorSchemeCatalog};
use crate::render::{legend_href, write_map, LegendPlacement, MapDocument};

/// A classified table, ready to be drawn
#[derive(Debug, Clone)]
pub struct PreparedMap {
    /// Features that have a value, limited to the requested row count
    pub table: MergedTable,
    /// Scaled and rounded value per feature
    pub values: Vec<f64>,
    /// Colors per bin
    pub colormap: StepColormap,
    /// Legend for the colormap
    pub legend: LegendSpec,
}

/// Result of a generated map
#[derive(Debug, Clone)]
pub struct MapOutput {
    /// Bin boundaries used
    pub boundaries: BinBoundaries,
    /// One color per bin, lowest first
    pub colors: ColorList,
    /// Legend description
    pub legend: LegendSpec,
    /// Written HTML page
    pub html_path: PathBuf,
    /// Exported legend graphic, for vertical legends
    pub legend_path: Option<PathBuf>,
}

/// Classify `config.data.data_column` of the table and build colors and legend.
pub fn prepare_map(
    table: &MergedTable,
    config: &Config,
    catalog: &ColorSchemeCatalog,
) -> Result<PreparedMap> {
    let classification = &config.classification;
    classification.validate()?;
    config.map.validate()?;
    let bin_type = classification.bin_type()?;
    let orientation = config.map.legend_orientation()?;
    let column = config.data.data_column.as_str();

    // Features without a usable value are not mapped
    let mut features = Vec::with_capacity(table.len());
    let mut raw = Vec::with_capacity(table.len());
    for (feature, value) in table.features.iter().zip(table.numeric_column(column)) {
        if let Some(v) = value {
            features.push(feature.clone());
            raw.push(v);
        }
    }
    let missing = table.len() - features.len();
    if missing > 0 {
        warn!(
            column = column,
            missing = missing,
            "Dropped features without a value"
        );
    }

    let mut values = prepare_values(
        &raw,
        classification.multiply_before_classify,
        classification.decimal_precision,
    );

    if classification.rows_to_map > 0 && classification.rows_to_map < values.len() {
        debug!(rows = classification.rows_to_map, "Limiting mapped rows");
        values.truncate(classification.rows_to_map);
        features.truncate(classification.rows_to_map);
    }

    let sample = NumericSample::new(values.clone(), column)?;
    let boundaries = compute_boundaries(&sample, classification.bin_count, bin_type)?;
    log_classification_stats(column, bin_type, sample.len(), missing, &boundaries);

    let colors = catalog.resolve(&classification.palette_name, boundaries.bin_count())?;
    let colormap = StepColormap::new(boundaries, colors)?;
    let legend = build_legend(
        colormap.boundaries(),
        colormap.colors(),
        &config.map.title,
        classification.decimal_precision,
        orientation,
    )?;

    Ok(PreparedMap {
        table: MergedTable {
            features,
            shape_keys: table.shape_keys.clone(),
        },
        values,
        colormap,
        legend,
    })
}

/// Classify the table, export the legend when it is vertical and write the page.
pub fn generate_map(
    table: &MergedTable,
    config: &Config,
    catalog: &ColorSchemeCatalog,
) -> Result<MapOutput> {
    let request_id = generate_request_id();
    let start = Instant::now();
    log_operation_start("generate_map", Some(config.map.map_name.as_str()));

    let result = write_outputs(table, config, catalog);
    match &result {
        Ok(output) => info!(
            request_id = %request_id,
            html = %output.html_path.display(),
            bins = output.colors.len(),
            "Map generated"
        ),
        Err(e) => log_error(e, &format!("generate_map request {}", request_id)),
    }
    log_operation_end("generate_map", start, result.is_ok());
    result
}

fn write_outputs(
    table: &MergedTable,
    config: &Config,
    catalog: &ColorSchemeCatalog,
) -> Result<MapOutput> {
    let prepared = prepare_map(table, config, catalog)?;
    let map = &config.map;

    let legend_path = match prepared.legend.orientation {
        LegendOrientation::Vertical => Some(export_legend(
            &prepared.legend,
            &map.legend_dir,
            &map.map_name,
            map.legend_format()?,
        )?),
        LegendOrientation::Inline => None,
    };

    let placement = match &legend_path {
        Some(path) => LegendPlacement::Image(legend_href(path, &map.output_dir)?),
        None => LegendPlacement::Inline(&prepared.legend),
    };
    let values: Vec<Option<f64>> = prepared.values.iter().copied().map(Some).collect();
    let html_path = write_map(&MapDocument {
        table: &prepared.table,
        values: &values,
        colormap: &prepared.colormap,
        legend: placement,
        decimal_precision: config.classification.decimal_precision,
        map,
    })?;

    Ok(MapOutput {
        boundaries: prepared.colormap.boundaries().clone(),
        colors: prepared.colormap.colors().to_vec(),
        legend: prepared.legend,
        html_path,
        legend_path,
    })
}
