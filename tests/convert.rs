use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};

use wadpack::lump::kind;
use wadpack::palette::{PaletteIndex, PALETTE_LEN};
use wadpack::texture::{self, RgbaBuffer};
use wadpack::wad;

fn rainbow_palette() -> PaletteIndex {
    let mut bytes = Vec::with_capacity(PALETTE_LEN);

    for i in 0..256u32 {
        bytes.extend([(i * 7 % 256) as u8, (i * 13 % 256) as u8, i as u8]);
    }

    PaletteIndex::load(&bytes).unwrap()
}

#[test]
fn convert_to_file() -> wadpack::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("textures.wad");
    let mut palette = rainbow_palette();

    let images = [
        ("floor", RgbaBuffer::filled(64, 32, [200, 120, 40, 255])),
        ("wall_brick_01_extended", RgbaBuffer::filled(16, 16, [1, 2, 3, 255])),
        ("sky", RgbaBuffer::filled(5, 3, [0, 0, 0, 0])),
    ];

    let mut textures = Vec::new();
    let mut warnings = Vec::new();

    for (name, image) in &images {
        let (tex, mut tex_warnings) = texture::build(&mut palette, image, name)?;
        textures.push(tex);
        warnings.append(&mut tex_warnings);
    }

    assert_eq!(warnings.len(), 1);

    {
        let mut writer = BufWriter::new(File::create(&path)?);
        wad::write(&palette, &textures, &mut writer)?;
        writer.flush()?;
    }

    let file_len = fs::metadata(&path)?.len() as usize;
    let mut reader = BufReader::new(File::open(&path)?);
    let entries = wad::parse_directory(&mut reader)?;

    let names: Vec<_> = entries.iter().map(|e| e.name_to_string()).collect();
    assert_eq!(names, ["floor", "wall_brick_01_e", "sky", "PALETTE"]);

    let kinds: Vec<_> = entries.iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, [kind::MIPTEX, kind::MIPTEX, kind::MIPTEX, kind::PALETTE]);

    let lump_total: usize = entries.iter().map(|e| e.length() as usize).sum();
    assert_eq!(12 + lump_total + 32 * entries.len(), file_len);

    for (entry, tex) in entries.iter().zip(&textures) {
        assert_eq!(entry.length() as usize, tex.lump_length());
    }

    // 5x3 source: every mip dimension is floored at 1
    let sky = &textures[2];
    let dims: Vec<_> = sky.mips().iter().map(|m| (m.width(), m.height())).collect();
    assert_eq!(dims, [(5, 3), (2, 1), (1, 1), (1, 1)]);

    Ok(())
}

#[test]
fn shared_palette_cache_across_textures() {
    let mut palette = rainbow_palette();
    let image = RgbaBuffer::filled(8, 8, [10, 20, 30, 255]);

    let (first, _) = texture::build(&mut palette, &image, "a").unwrap();
    let (second, _) = texture::build(&mut palette, &image, "b").unwrap();

    assert_eq!(palette.searches(), 1);
    assert_eq!(first.mip(0).pixels(), second.mip(0).pixels());
}
