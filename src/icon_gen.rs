use crate::badge::render_badge;
use crate::png::encode_rgba;
use anyhow::{Context, Result};
use image::Rgba;
use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

/// Icon edge lengths required by the iOS/Android home screens and PWA installers.
pub const ICON_SIZES: [u32; 8] = [72, 96, 128, 144, 152, 192, 384, 512];

/// Badge color, in CSS notation.
pub const BASE_COLOR: &str = "#4caf50";

const FALLBACK_BASE_COLOR: Rgba<u8> = Rgba([76, 175, 80, 255]);

/// Everything the generator needs, passed explicitly through the pipeline.
#[derive(Debug, Clone)]
pub struct IconConfig {
    pub sizes: Vec<u32>,
    pub base_color: Rgba<u8>,
    pub output_dir: PathBuf,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            sizes: ICON_SIZES.to_vec(),
            base_color: parse_color(BASE_COLOR),
            output_dir: PathBuf::from("icons"),
        }
    }
}

impl IconConfig {
    /// Default config writing into `output_dir` instead of `./icons`.
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }
}

/// Parse a CSS color into an opaque pixel, falling back to the stock badge green.
pub fn parse_color(color: &str) -> Rgba<u8> {
    css_color::Srgb::from_str(color)
        .map(|color| {
            Rgba([
                (color.red * 255.).round() as u8,
                (color.green * 255.).round() as u8,
                (color.blue * 255.).round() as u8,
                255,
            ])
        })
        .unwrap_or(FALLBACK_BASE_COLOR)
}

/// File name for the icon of the given edge length.
pub fn icon_filename(size: u32) -> String {
    format!("icon-{size}.png")
}

/// Render, encode and write every configured size.
///
/// Returns the written PNG paths in configuration order. Files written before
/// a failure are left in place; rerunning overwrites them with identical bytes.
pub fn generate_icons(config: &IconConfig) -> Result<Vec<PathBuf>> {
    create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Can't create output directory {}",
            config.output_dir.display()
        )
    })?;
    log::info!("Writing icons to {}", config.output_dir.display());

    let mut written = Vec::with_capacity(config.sizes.len());

    for &size in &config.sizes {
        let output_path = config.output_dir.join(icon_filename(size));

        let badge = render_badge(size, config.base_color);
        write_png(&encode_rgba(&badge), &output_path)?;
        println!("Created {}", output_path.display());

        written.push(output_path);
    }

    println!("All icons generated!");
    Ok(written)
}

fn write_png(png: &[u8], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file {}", path.display()))?;
    let mut out_file = BufWriter::new(file);
    out_file
        .write_all(png)
        .with_context(|| format!("Failed to write PNG {}", path.display()))?;
    out_file.flush()?;
    Ok(())
}
