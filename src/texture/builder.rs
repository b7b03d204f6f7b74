use alloc::string::String;
use alloc::vec::Vec;

use super::RgbaImage;
use crate::common::{pad_name, NAME_LEN};
use crate::error::{Error, Result};
use crate::lump::{mip_dimension, Image, MipTexture};
use crate::palette::PaletteIndex;

const MAX_NAME_CHARS: usize = NAME_LEN - 1;

/// Quantize `image` against `palette` and derive its mip levels.  Returns the
/// texture together with any non-fatal warnings about its name.
pub fn build(
    palette: &mut PaletteIndex,
    image: &impl RgbaImage,
    name: &str,
) -> Result<(MipTexture, Vec<String>)> {
    let (width, height) = (image.width(), image.height());

    if width == 0 || height == 0 {
        return Err(Error::Format(format!(
            "`{}` has zero-sized dimensions {}x{}",
            name, width, height
        )));
    }

    let pixel_ct = u64::from(width) * u64::from(height);

    if width > i32::MAX as u32
        || height > i32::MAX as u32
        || pixel_ct > i32::MAX as u64
    {
        return Err(Error::Format(format!(
            "`{}` is too large ({}x{})",
            name, width, height
        )));
    }

    let (name, warnings) = texture_name(name);

    let mut pixels = Vec::with_capacity(pixel_ct as usize);

    for y in 0..height {
        for x in 0..width {
            pixels.push(palette.nearest(image.pixel(x, y)));
        }
    }

    let full = Image::from_pixels(width, height, pixels.into_boxed_slice())?;
    let mip1 = downsample(&full, 1)?;
    let mip2 = downsample(&full, 2)?;
    let mip3 = downsample(&full, 3)?;
    let texture = MipTexture::from_parts(name, [full, mip1, mip2, mip3])?;

    Ok((texture, warnings))
}

/// Nearest-neighbor reduction of `full` to mip level `level`.  Works on
/// palette indices directly, no colors are re-quantized.
pub fn downsample(full: &Image, level: usize) -> Result<Image> {
    let (src_w, src_h) = (full.width() as usize, full.height() as usize);
    let dst_w = mip_dimension(full.width(), level) as usize;
    let dst_h = mip_dimension(full.height(), level) as usize;
    let src = full.pixels();

    let mut pixels = Vec::with_capacity(dst_w * dst_h);

    for dy in 0..dst_h {
        let sy = dy * src_h / dst_h;

        for dx in 0..dst_w {
            let sx = dx * src_w / dst_w;
            pixels.push(src[sy * src_w + sx]);
        }
    }

    Image::from_pixels(dst_w as u32, dst_h as u32, pixels.into_boxed_slice())
}

/// Fit `name` into a texture name field.  Non-ASCII characters become `_`
/// and anything past 15 characters is dropped, each with a warning.
pub fn texture_name(name: &str) -> ([u8; NAME_LEN], Vec<String>) {
    let mut warnings = Vec::new();

    let mut ascii: String = name
        .chars()
        .map(|c| if c.is_ascii() && c != '\0' { c } else { '_' })
        .collect();

    if ascii != name {
        warnings.push(format!(
            "Texture name `{}` contains unsupported characters, using `{}`",
            name, ascii
        ));
    }

    if ascii.len() > MAX_NAME_CHARS {
        ascii.truncate(MAX_NAME_CHARS);
        warnings.push(format!(
            "Texture name `{}` is longer than {} characters, truncated to `{}`",
            name, MAX_NAME_CHARS, ascii
        ));
    }

    (pad_name(&ascii), warnings)
}
