use std::fs;
use std::io::{self, Write};
use std::path::*;
use texc_api::{ColorSpace, CompressionLevel, CompressionType, PixelFormat, Texture};

/// Recursively collects every file under `dir`.
///
/// Unreadable directories and entries are skipped rather than reported.
pub fn find_all_files(dir: &Path, entries: &mut Vec<PathBuf>) -> io::Result<()> {
    let dir_entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(()),
    };

    for entry in dir_entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue, // e.g. no access
        };

        let path = entry.path();
        if path.is_dir() {
            find_all_files(&path, entries)?;
        } else {
            entries.push(path);
        }
    }
    Ok(())
}

/// Canonicalizes a CLI path argument, creating the directory if it doesn't exist.
pub fn canonicalize_cli_path(value: &str) -> Result<PathBuf, String> {
    let path = Path::new(value);

    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| format!("Failed to create directory: {e}"))?;
    }

    fs::canonicalize(path).map_err(|e| format!("Invalid path: {e}"))
}

pub fn parse_pixel_format(value: &str) -> Result<PixelFormat, String> {
    let value = value.to_lowercase();
    PixelFormat::all_values()
        .iter()
        .copied()
        .find(|format| format.name() == value)
        .ok_or_else(|| {
            let names: Vec<&str> = PixelFormat::all_values().iter().map(|f| f.name()).collect();
            format!(
                "Invalid pixel format: {value}. Valid formats are: {}",
                names.join(", ")
            )
        })
}

pub fn parse_color_space(value: &str) -> Result<ColorSpace, String> {
    match value.to_lowercase().as_str() {
        "linear" => Ok(ColorSpace::Linear),
        "srgb" => Ok(ColorSpace::Srgb),
        _ => Err(format!(
            "Invalid color space: {value}. Valid values are: linear, srgb"
        )),
    }
}

pub fn parse_level(value: &str) -> Result<CompressionLevel, String> {
    match value.to_lowercase().as_str() {
        "fast" => Ok(CompressionLevel::Fast),
        "normal" => Ok(CompressionLevel::Normal),
        "high" => Ok(CompressionLevel::High),
        "best" => Ok(CompressionLevel::Best),
        _ => Err(format!(
            "Invalid compression level: {value}. Valid values are: fast, normal, high, best"
        )),
    }
}

pub fn parse_compression(value: &str) -> Result<CompressionType, String> {
    match value.to_lowercase().as_str() {
        "default" | "none" => Ok(CompressionType::Default),
        "webp" => Ok(CompressionType::WebP),
        "webp-lossy" => Ok(CompressionType::WebPLossy),
        _ => Err(format!(
            "Invalid compression type: {value}. Valid values are: default, webp, webp-lossy"
        )),
    }
}

/// Parses `WIDTHxHEIGHT`, e.g. `512x256`.
pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let invalid = || format!("Invalid size: {value}. Expected WIDTHxHEIGHT");
    let (width, height) = value.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width: u32 = width.trim().parse().map_err(|_| invalid())?;
    let height: u32 = height.trim().parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    Ok((width, height))
}

/// Writes a transcoded texture as a `.texc` container. See the crate README for the layout.
pub fn write_container<W: Write>(texture: &Texture, out: &mut W) -> io::Result<()> {
    let header = texture.header();
    out.write_all(b"TEXC")?;
    out.write_all(&header.width.to_le_bytes())?;
    out.write_all(&header.height.to_le_bytes())?;
    out.write_all(&header.pixel_format)?;
    out.write_all(&(texture.mip_count() as u32).to_le_bytes())?;

    for level in texture.levels() {
        out.write_all(&level.width().to_le_bytes())?;
        out.write_all(&level.height().to_le_bytes())?;
        out.write_all(&(level.compression() as u32).to_le_bytes())?;
        out.write_all(&(level.size_compressed() as u32).to_le_bytes())?;
    }
    for level in texture.levels() {
        out.write_all(level.stored())?;
    }
    Ok(())
}
