//! Print the palettes of a color scheme catalog with the bin counts each supports.
//!
//! Usage: `list_palettes [catalog.json]`. Without an argument the built-in
//! ColorBrewer catalog is listed.

use std::path::PathBuf;

use choropleth::palettes::palette_key;
use choropleth::ColorSchemeCatalog;

fn main() -> anyhow::Result<()> {
    let owned;
    let catalog = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            owned = ColorSchemeCatalog::from_path(&path)?;
            &owned
        }
        None => ColorSchemeCatalog::builtin()?,
    };

    println!("{} schemes", catalog.len());
    for name in catalog.palette_names() {
        let counts = catalog.supported_bin_counts(name);
        let listed = counts
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("{:<10} bins: {}", name, listed);

        if let Some(&largest) = counts.last() {
            let colors = catalog.resolve(name, largest)?;
            let hex = colors.iter().map(|c| c.to_hex()).collect::<Vec<_>>();
            println!("  {:<12} {}", palette_key(name, largest), hex.join(" "));
        }
    }
    Ok(())
}
