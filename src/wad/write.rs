use crate::common::SeekExt;
use crate::error::{Error, Result};
use crate::lump::{kind, MipTexture, MipTextureHead};
use crate::palette::{PaletteIndex, PALETTE_LEN};
use crate::wad::repr::{Entry, MAGIC, PALETTE_NAME};
use log::debug;
use std::io::{Seek, Write};
use std::mem::{offset_of, size_of};
use std::string::String;
use std::vec::Vec;

/// Serialize `textures` followed by `palette` as a WAD2 archive starting at
/// the cursor's current position.  Returns the directory that was written, in
/// lump order (textures first, palette last).
///
/// The cursor is left at the end of the archive.  On failure, whatever was
/// already written stays in the sink.
pub fn write(
    palette: &PaletteIndex,
    textures: &[MipTexture],
    cursor: &mut (impl Write + Seek),
) -> Result<Vec<Entry>> {
    let wad_start = cursor.stream_position()?;
    let entry_count = to_i32(textures.len() + 1, "Too many lumps")?;

    cursor.write_all(&MAGIC)?;
    cursor.write_all(&entry_count.to_le_bytes())?;

    let dir_offset_pos = cursor.stream_position()?;
    cursor.write_all(&0i32.to_le_bytes())?;

    let mut entries = Vec::with_capacity(textures.len() + 1);

    for texture in textures {
        let offset = position(cursor, wad_start)?;
        let length = write_mip_texture(cursor, texture)?;

        debug!(
            "Texture `{}` ({}x{}) at offset {}, {} bytes",
            texture.name_to_string(),
            texture.width(),
            texture.height(),
            offset,
            length,
        );

        entries.push(Entry::from_name_field(
            offset,
            length,
            kind::MIPTEX,
            texture.name(),
        ));
    }

    let palette_offset = position(cursor, wad_start)?;
    cursor.write_all(&palette.to_bytes())?;
    debug!("Palette at offset {}", palette_offset);

    entries.push(Entry::new(
        palette_offset,
        PALETTE_LEN as i32,
        kind::PALETTE,
        PALETTE_NAME,
    ));

    let dir_offset = position(cursor, wad_start)?;

    for entry in &entries {
        cursor.write_all(&entry.to_bytes())?;
    }

    cursor.patch_at(dir_offset_pos, &dir_offset.to_le_bytes())?;
    debug!("Directory of {} entries at offset {}", entry_count, dir_offset);

    Ok(entries)
}

/// Write one texture lump, returning its length in bytes.  Mip offsets are
/// only known once each level has been written, so the head goes out with
/// zeroed offsets that are patched afterwards.
fn write_mip_texture(
    cursor: &mut (impl Write + Seek),
    texture: &MipTexture,
) -> Result<i32> {
    let lump_start = cursor.stream_position()?;

    let mut head = MipTextureHead {
        name: texture.name(),
        width: to_i32(texture.width(), "Texture too wide")?,
        height: to_i32(texture.height(), "Texture too tall")?,
        offsets: [0i32; MipTexture::LEN],
    };

    cursor.write_all(&head.to_bytes())?;

    let mut offsets = [0i32; MipTexture::LEN];

    for (offset, mip) in offsets.iter_mut().zip(texture) {
        *offset = position(cursor, lump_start)?;
        cursor.write_all(mip.pixels())?;
    }

    head.offsets = offsets;
    let offsets_start = offset_of!(MipTextureHead, offsets);
    let head_bytes = head.to_bytes();

    cursor.patch_at(
        lump_start + offsets_start as u64,
        &head_bytes[offsets_start..size_of::<MipTextureHead>()],
    )?;

    position(cursor, lump_start)
}

fn position(cursor: &mut impl Seek, start: u64) -> Result<i32> {
    let pos = cursor.stream_position()?;
    let relative = pos.checked_sub(start).ok_or_else(|| {
        Error::Format(String::from("Cursor moved before start of archive"))
    })?;

    to_i32(relative, "Offset too large")
}

fn to_i32<T: TryInto<i32>>(value: T, message: &str) -> Result<i32> {
    value
        .try_into()
        .map_err(|_| Error::Format(String::from(message)))
}
