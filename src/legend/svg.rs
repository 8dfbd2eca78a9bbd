//! SVG rendering of a legend.
//!
//! Vertical legends stack the bins bottom-up with a label at every boundary;
//! inline legends draw a left-to-right strip. Text gets a contrasting outline
//! so it stays readable over light and dark map tiles.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{LegendOrientation, LegendSpec};
use crate::error::Result;

const BAR_LENGTH: f64 = 320.0;
const BAR_THICKNESS: f64 = 24.0;
const TITLE_HEIGHT: f64 = 48.0;
const FONT_SIZE: f64 = 12.0;
const MARGIN: f64 = 8.0;
const LABEL_GUTTER: f64 = 72.0;

/// Escape text for use in SVG content and attributes
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn label(out: &mut String, x: f64, y: f64, anchor: &str, text: &str) {
    out.push_str(&format!(
        r#"  <text x="{:.1}" y="{:.1}" text-anchor="{}" dominant-baseline="middle" font-size="{}" font-weight="bold" fill="black" stroke="white" stroke-width="2" paint-order="stroke">{}</text>"#,
        x,
        y,
        anchor,
        FONT_SIZE,
        escape_xml(text)
    ));
    out.push('\n');
}

fn title(out: &mut String, x: f64, y: f64, text: &str) {
    out.push_str(&format!(
        r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="{}" fill="white" stroke="black" stroke-width="3" paint-order="stroke">{}</text>"#,
        x,
        y,
        FONT_SIZE,
        escape_xml(text)
    ));
    out.push('\n');
}

fn rect(out: &mut String, x: f64, y: f64, w: f64, h: f64, fill: &str) {
    out.push_str(&format!(
        r#"  <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
        x,
        y,
        w,
        h,
        escape_xml(fill)
    ));
    out.push('\n');
}

/// Render the legend as an SVG document.
pub fn render_svg(spec: &LegendSpec) -> String {
    let swatches = spec.swatches();
    let n = swatches.len().max(1) as f64;
    let step = BAR_LENGTH / n;
    let mut out = String::new();

    let (width, height) = match spec.orientation {
        LegendOrientation::Vertical => (
            LABEL_GUTTER + BAR_THICKNESS + LABEL_GUTTER,
            TITLE_HEIGHT + BAR_LENGTH + 2.0 * MARGIN,
        ),
        LegendOrientation::Inline => (
            BAR_LENGTH + 2.0 * LABEL_GUTTER,
            TITLE_HEIGHT + BAR_THICKNESS + FONT_SIZE + 3.0 * MARGIN,
        ),
    };

    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
        w = width,
        h = height
    ));
    out.push('\n');
    title(&mut out, width / 2.0, TITLE_HEIGHT - MARGIN, &spec.title);

    match spec.orientation {
        LegendOrientation::Vertical => {
            let x = LABEL_GUTTER;
            let bottom = TITLE_HEIGHT + BAR_LENGTH;
            for (i, swatch) in swatches.iter().enumerate() {
                let y = bottom - (i as f64 + 1.0) * step;
                rect(&mut out, x, y, BAR_THICKNESS, step, swatch.color.as_str());
            }
            for (i, entry) in spec.entries.iter().enumerate() {
                let y = bottom - i as f64 * step;
                label(&mut out, x - MARGIN, y, "end", &entry.label);
            }
        }
        LegendOrientation::Inline => {
            let y = TITLE_HEIGHT;
            for (i, swatch) in swatches.iter().enumerate() {
                let x = LABEL_GUTTER + i as f64 * step;
                rect(&mut out, x, y, step, BAR_THICKNESS, swatch.color.as_str());
            }
            for (i, entry) in spec.entries.iter().enumerate() {
                let x = LABEL_GUTTER + i as f64 * step;
                label(
                    &mut out,
                    x,
                    y + BAR_THICKNESS + MARGIN + FONT_SIZE / 2.0,
                    "middle",
                    &entry.label,
                );
            }
        }
    }

    out.push_str("</svg>\n");
    out
}

/// Write the SVG legend to `path`.
pub fn write_svg(spec: &LegendSpec, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(render_svg(spec).as_bytes())?;
    writer.flush()?;
    Ok(())
}
