use crate::error::CliError;
use crate::util::*;
use argh::FromArgs;
use bytesize::ByteSize;
#[cfg(feature = "multithreaded")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, AtomicUsize, Ordering},
    time::Instant,
};
use texc_api::{ColorSpace, CompressionLevel, CompressionType, FlipAxis, PixelFormat, Texture};
use tracing::{debug, info, warn};

#[derive(FromArgs, Debug)]
/// Transcode images from input directory into .texc files in output directory
#[argh(subcommand, name = "transcode")]
pub struct TranscodeCmd {
    /// input directory path
    #[argh(option, from_str_fn(canonicalize_cli_path))]
    pub input: PathBuf,

    /// output directory path
    #[argh(option, from_str_fn(canonicalize_cli_path))]
    pub output: PathBuf,

    /// target pixel format, e.g. rgba8, pvrtc4-rgba, etc1
    #[argh(option, from_str_fn(parse_pixel_format))]
    pub format: PixelFormat,

    /// target color space (linear, srgb) [default: linear]
    #[argh(option, from_str_fn(parse_color_space), default = "ColorSpace::Linear")]
    pub color_space: ColorSpace,

    /// block encoder effort (fast, normal, high, best) [default: normal]
    #[argh(option, from_str_fn(parse_level), default = "CompressionLevel::Normal")]
    pub level: CompressionLevel,

    /// envelope (default, webp, webp-lossy) [default: default]
    #[argh(option, from_str_fn(parse_compression), default = "CompressionType::Default")]
    pub compression: CompressionType,

    /// resize level 0 to WIDTHxHEIGHT before anything else
    #[argh(option, from_str_fn(parse_size))]
    pub resize: Option<(u32, u32)>,

    /// generate a full mip chain
    #[argh(switch)]
    pub mipmaps: bool,

    /// premultiply colour by alpha
    #[argh(switch)]
    pub premultiply: bool,

    /// mirror horizontally
    #[argh(switch)]
    pub flip_x: bool,

    /// mirror vertically
    #[argh(switch)]
    pub flip_y: bool,

    /// worker threads [default: one per core]
    #[argh(option)]
    pub threads: Option<usize>,
}

#[derive(Default)]
struct Totals {
    files: AtomicUsize,
    input: AtomicU64,
    output: AtomicU64,
}

pub fn handle_transcode_command(cmd: TranscodeCmd) -> Result<(), Box<dyn std::error::Error>> {
    let mut entries = Vec::new();
    find_all_files(&cmd.input, &mut entries)?;
    info!("Found {} files to transcode", entries.len());

    let start = Instant::now();
    let totals = Totals::default();
    let process = |entry: &PathBuf| match transcode_file(entry, &cmd) {
        Ok((input, output)) => {
            totals.files.fetch_add(1, Ordering::Relaxed);
            totals.input.fetch_add(input, Ordering::Relaxed);
            totals.output.fetch_add(output, Ordering::Relaxed);
        }
        Err(CliError::Image(e)) => debug!("Skipping {}: {e}", entry.display()),
        Err(e) => warn!("{}: {e}", entry.display()),
    };

    #[cfg(feature = "multithreaded")]
    {
        let mut pool = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = cmd.threads {
            pool = pool.num_threads(threads);
        }
        pool.build()?.install(|| entries.par_iter().for_each(process));
    }
    #[cfg(not(feature = "multithreaded"))]
    entries.iter().for_each(process);

    println!(
        "Transcoded {} files in {:.2?}: {} -> {}",
        totals.files.load(Ordering::Relaxed),
        start.elapsed(),
        ByteSize(totals.input.load(Ordering::Relaxed)),
        ByteSize(totals.output.load(Ordering::Relaxed)),
    );
    Ok(())
}

/// Runs one image through the pipeline and returns (source size, written size).
fn transcode_file(path: &Path, cmd: &TranscodeCmd) -> Result<(u64, u64), CliError> {
    let image = image::open(path)?.into_rgba8();
    let (width, height) = image.dimensions();

    let mut texture = Texture::new(
        width,
        height,
        PixelFormat::R8G8B8A8,
        ColorSpace::Linear,
        image.as_raw(),
    )?;

    if let Some((width, height)) = cmd.resize {
        texture.resize(width, height)?;
    }
    if cmd.premultiply {
        texture.pre_multiply_alpha()?;
    }
    if cmd.flip_x {
        texture.flip(FlipAxis::X)?;
    }
    if cmd.flip_y {
        texture.flip(FlipAxis::Y)?;
    }
    if cmd.mipmaps {
        texture.gen_mip_maps()?;
    }
    texture.transcode(cmd.format, cmd.color_space, cmd.level, cmd.compression)?;

    let relative = path
        .strip_prefix(&cmd.input)
        .map_err(|_| CliError::OutsideInput(path.to_path_buf()))?;
    let target = cmd.output.join(relative).with_extension("texc");
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(fs::File::create(&target)?);
    write_container(&texture, &mut writer)?;
    writer.flush()?;

    let input = fs::metadata(path)?.len();
    let output = fs::metadata(&target)?.len();
    debug!(
        "{} -> {} ({} mips, {} -> {})",
        path.display(),
        target.display(),
        texture.mip_count(),
        ByteSize(input),
        ByteSize(output)
    );
    Ok((input, output))
}
