use anyhow::{bail, Context, Result};
use pwa_icons::png::{read_chunks, Ihdr, BIT_DEPTH, COLOR_TYPE_RGBA};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("icons"));

    let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("icon-") && name.ends_with(".png"))
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        bail!("No icon-*.png files in {}", dir.display());
    }

    println!("Checking {} icons in: {}", paths.len(), dir.display());
    for path in &paths {
        verify_icon(path)?;
    }

    println!("✓ All icons verified");
    Ok(())
}

fn verify_icon(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let chunks = read_chunks(&bytes).with_context(|| format!("Malformed PNG {}", path.display()))?;

    let tags: Vec<&str> = chunks.iter().map(|c| c.tag_str()).collect();
    if tags != ["IHDR", "IDAT", "IEND"] {
        bail!("{}: unexpected chunk sequence {:?}", path.display(), tags);
    }
    if let Some(bad) = chunks.iter().find(|c| !c.crc_matches()) {
        bail!("{}: CRC mismatch in {} chunk", path.display(), bad.tag_str());
    }

    let ihdr = Ihdr::parse(&chunks[0].payload)?;
    if ihdr.bit_depth != BIT_DEPTH || ihdr.color_type != COLOR_TYPE_RGBA || ihdr.interlace != 0 {
        bail!("{}: unexpected IHDR {:?}", path.display(), ihdr);
    }

    let raw = miniz_oxide::inflate::decompress_to_vec_zlib(&chunks[1].payload)
        .map_err(|e| anyhow::anyhow!("{}: IDAT does not inflate: {:?}", path.display(), e))?;
    let expected = ihdr.height as usize * (1 + ihdr.width as usize * 4);
    if raw.len() != expected {
        bail!(
            "{}: IDAT inflates to {} bytes, expected {}",
            path.display(),
            raw.len(),
            expected
        );
    }

    let img = image::load_from_memory(&bytes)
        .with_context(|| format!("Failed to decode {}", path.display()))?
        .to_rgba8();
    let center = img.get_pixel(ihdr.width / 2, ihdr.height / 2);
    let corner = img.get_pixel(0, 0);

    println!(
        "  ✓ {} {}x{} center RGBA {:?} corner alpha {}",
        path.display(),
        img.width(),
        img.height(),
        center.0,
        corner[3]
    );
    Ok(())
}
