use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, ensure, Context, Result};
use clap::Parser;
use log::{error, info, warn};
use png::{ColorType, Transformations};

use wadpack::palette::{PaletteIndex, PALETTE_LEN};
use wadpack::texture::{self, RgbaBuffer};
use wadpack::{lump::MipTexture, wad};

/// Pack a directory of PNG images into a WAD2 texture archive
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory searched recursively for `.png` files
    #[arg(value_name = "TEXTURE_DIR")]
    textures: PathBuf,

    /// 768-byte palette (256 RGB triples)
    #[arg(value_name = "PALETTE")]
    palette: PathBuf,

    /// WAD file to create
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    validate(args)?;

    let palette_bytes = fs::read(&args.palette)
        .with_context(|| format!("Reading {}", args.palette.display()))?;
    let mut palette = PaletteIndex::load(&palette_bytes)?;

    let paths = find_pngs(&args.textures)?;
    let mut textures = Vec::<MipTexture>::with_capacity(paths.len());

    for (idx, path) in paths.iter().enumerate() {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        info!("[{}/{}] {}", idx + 1, paths.len(), path.display());

        let image = decode_png(path)
            .with_context(|| format!("Decoding {}", path.display()))?;

        let (texture, warnings) = texture::build(&mut palette, &image, &name)
            .with_context(|| format!("Converting {}", path.display()))?;

        for warning in warnings {
            warn!("{}", warning);
        }

        textures.push(texture);
    }

    let file = File::create(&args.output)
        .with_context(|| format!("Creating {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);

    wad::write(&palette, &textures, &mut writer)
        .with_context(|| format!("Writing {}", args.output.display()))?;
    writer.flush()?;

    info!(
        "Wrote {} textures to {} ({} distinct colors matched)",
        textures.len(),
        args.output.display(),
        palette.cached_colors(),
    );

    Ok(())
}

/// Check every input before anything is written
fn validate(args: &Args) -> Result<()> {
    let palette_meta = fs::metadata(&args.palette).map_err(|_| {
        wadpack::Error::Validation(format!(
            "Palette file {} does not exist",
            args.palette.display()
        ))
    })?;

    if palette_meta.len() != PALETTE_LEN as u64 {
        return Err(wadpack::Error::Validation(format!(
            "Palette file {} is {} bytes, expected {}",
            args.palette.display(),
            palette_meta.len(),
            PALETTE_LEN
        ))
        .into());
    }

    if !args.textures.is_dir() {
        return Err(wadpack::Error::Validation(format!(
            "Texture directory {} does not exist",
            args.textures.display()
        ))
        .into());
    }

    Ok(())
}

/// All `.png` files below `dir`, in sorted path order
fn find_pngs(dir: &Path) -> Result<Vec<PathBuf>> {
    let Some(dir_str) = dir.to_str() else {
        bail!("Texture directory {} is not valid UTF-8", dir.display());
    };

    let pattern = format!("{}/**/*", glob::Pattern::escape(dir_str));
    let mut paths = Vec::new();

    for entry in glob::glob(&pattern)? {
        let path = entry?;
        let is_png = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("png"));

        if is_png && path.is_file() {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

fn decode_png(path: &Path) -> Result<RgbaBuffer> {
    let file = BufReader::new(File::open(path)?);
    let mut decoder = png::Decoder::new(file);
    decoder
        .set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

    let mut reader = decoder.read_info()?;
    let mut buffer = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buffer)?;
    buffer.truncate(frame.buffer_size());

    ensure!(
        frame.width > 0 && frame.height > 0,
        "Zero-sized image ({}x{})",
        frame.width,
        frame.height
    );

    let rgba: Vec<u8> = match frame.color_type {
        ColorType::Rgba => buffer,
        ColorType::Rgb => buffer
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], u8::MAX])
            .collect(),
        ColorType::GrayscaleAlpha => buffer
            .chunks_exact(2)
            .flat_map(|c| [c[0], c[0], c[0], c[1]])
            .collect(),
        ColorType::Grayscale => buffer
            .iter()
            .flat_map(|&v| [v, v, v, u8::MAX])
            .collect(),
        other => bail!("Unsupported color type {:?}", other),
    };

    Ok(RgbaBuffer::new(
        frame.width,
        frame.height,
        rgba.into_boxed_slice(),
    )?)
}
