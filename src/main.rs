//! choropleth - bin a data column and draw it as a choropleth map
//!
//! This is the main entry point for the choropleth application.

use anyhow::Context;
use tracing::{error, info};

use choropleth::data_loader::{load_boundaries, load_table, merge_tables};
use choropleth::logging::log_timed_operation;
use choropleth::{generate_map, init_tracing, ColorSchemeCatalog, Config};

fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    init_tracing(&config.log_level);
    info!("Starting choropleth v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let owned_catalog;
    let catalog = match &config.palette_file {
        Some(path) => {
            owned_catalog = ColorSchemeCatalog::from_path(path)?;
            &owned_catalog
        }
        None => ColorSchemeCatalog::builtin()?,
    };

    let data = &config.data;
    let (boundaries_path, table_path) = match (&data.boundaries_path, &data.table_path) {
        (Some(b), Some(t)) => (b, t),
        _ => anyhow::bail!("Both a boundary file and a data table are required"),
    };

    let table = log_timed_operation("load_inputs", || -> anyhow::Result<_> {
        let boundaries = load_boundaries(boundaries_path)
            .with_context(|| format!("Failed to load {}", boundaries_path.display()))?;
        let records = load_table(table_path)
            .with_context(|| format!("Failed to load {}", table_path.display()))?;
        Ok(merge_tables(
            boundaries,
            records,
            &data.shape_keys,
            &data.data_keys,
            data.key_width,
        )?)
    })?;

    info!(features = table.len(), "Inputs merged");

    let output = generate_map(&table, &config, catalog).map_err(|e| {
        error!(category = ?e.category(), "Map generation failed: {}", e);
        e
    })?;

    println!("Map written to {}", output.html_path.display());
    if let Some(legend) = &output.legend_path {
        println!("Legend written to {}", legend.display());
    }
    Ok(())
}
