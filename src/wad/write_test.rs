use crate::error;
use crate::lump::{kind, MipTexture, MipTextureHead};
use crate::palette::{PaletteIndex, PALETTE_LEN};
use crate::texture::{build, RgbaBuffer};
use crate::wad::{parse_directory, write, Entry, Head};
use std::io::{self, Cursor, Seek, SeekFrom, Write};
use std::mem::size_of;
use std::vec::Vec;

fn palette() -> PaletteIndex {
    let bytes: Vec<u8> = (0..PALETTE_LEN).map(|i| (i % 251) as u8).collect();
    PaletteIndex::load(&bytes).unwrap()
}

fn solid_texture(
    palette: &mut PaletteIndex,
    name: &str,
    color: [u8; 4],
) -> MipTexture {
    let image = RgbaBuffer::filled(4, 4, color);
    build(palette, &image, name).unwrap().0
}

fn two_texture_wad() -> (PaletteIndex, Vec<MipTexture>, Vec<u8>) {
    let mut palette = palette();
    let textures = vec![
        solid_texture(&mut palette, "red", [255, 0, 0, 255]),
        solid_texture(&mut palette, "clear", [0, 0, 0, 0]),
    ];
    let mut cursor = Cursor::new(Vec::new());
    write(&palette, &textures, &mut cursor).unwrap();
    (palette, textures, cursor.into_inner())
}

fn read_i32(bytes: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[test]
fn write_head() {
    let (_, textures, bytes) = two_texture_wad();

    let lump_bytes: usize = textures.iter().map(|t| t.lump_length()).sum();
    let expected_dir = size_of::<Head>() + lump_bytes + PALETTE_LEN;

    assert_eq!(&bytes[0..4], b"WAD2");
    assert_eq!(read_i32(&bytes, 4), 3);
    assert_eq!(read_i32(&bytes, 8) as usize, expected_dir);
}

#[test]
fn write_lengths_add_up() {
    let (_, textures, bytes) = two_texture_wad();
    let entries = parse_directory(&mut Cursor::new(&bytes)).unwrap();

    assert_eq!(entries.len(), 3);

    let dir_offset = read_i32(&bytes, 8) as usize;
    let mut lump_total = 0usize;

    for (i, texture) in textures.iter().enumerate() {
        let raw = &bytes[(dir_offset + 32 * i)..(dir_offset + 32 * (i + 1))];
        assert_eq!(read_i32(raw, 4), read_i32(raw, 8));
        assert_eq!(read_i32(raw, 4) as usize, texture.lump_length());
        assert_eq!(raw[12], kind::MIPTEX);
        lump_total += entries[i].length() as usize;
    }

    let directory_len = entries.len() * size_of::<Entry>();
    assert_eq!(
        size_of::<Head>() + lump_total + PALETTE_LEN + directory_len,
        bytes.len()
    );
}

#[test]
fn write_directory_order() {
    let (palette, _, bytes) = two_texture_wad();
    let entries = parse_directory(&mut Cursor::new(&bytes)).unwrap();
    let names: Vec<_> = entries.iter().map(|e| e.name_to_string()).collect();
    assert_eq!(names, ["red", "clear", "PALETTE"]);

    // every lump starts where the previous one ended
    assert_eq!(entries[0].offset() as usize, size_of::<Head>());
    assert_eq!(
        entries[1].offset(),
        entries[0].offset() + entries[0].length()
    );
    assert_eq!(
        entries[2].offset(),
        entries[1].offset() + entries[1].length()
    );

    let pal = &entries[2];
    assert_eq!(pal.kind(), kind::PALETTE);
    assert_eq!(pal.length() as usize, PALETTE_LEN);
    let start = pal.offset() as usize;
    assert_eq!(&bytes[start..(start + PALETTE_LEN)], &palette.to_bytes()[..]);
}

#[test]
fn write_mip_offsets() {
    let (_, textures, bytes) = two_texture_wad();
    let entries = parse_directory(&mut Cursor::new(&bytes)).unwrap();

    for (entry, texture) in entries.iter().zip(&textures) {
        let start = entry.offset() as usize;
        let mut head_bytes = [0u8; size_of::<MipTextureHead>()];
        head_bytes.copy_from_slice(
            &bytes[start..(start + size_of::<MipTextureHead>())],
        );
        let head = MipTextureHead::try_from(head_bytes).unwrap();
        let (name, width, height) = (head.name, head.width, head.height);
        let offsets = head.offsets;

        assert_eq!(name, texture.name());
        assert_eq!((width, height), (4, 4));
        assert_eq!(offsets, [40, 56, 60, 61]);

        for (offset, mip) in offsets.iter().zip(texture) {
            let mip_start = start + *offset as usize;
            let mip_bytes = &bytes[mip_start..(mip_start + mip.pixels().len())];
            assert_eq!(mip_bytes, mip.pixels());
        }
    }
}

#[test]
fn write_returns_directory() {
    let mut palette = palette();
    let textures = vec![solid_texture(&mut palette, "one", [9, 9, 9, 255])];
    let mut cursor = Cursor::new(Vec::new());
    let entries = write(&palette, &textures, &mut cursor).unwrap();
    let written = parse_directory(&mut Cursor::new(cursor.get_ref())).unwrap();

    assert_eq!(entries, written);
    assert_eq!(cursor.position() as usize, cursor.get_ref().len());
}

#[test]
fn write_palette_only() {
    let palette = palette();
    let mut cursor = Cursor::new(Vec::new());
    write(&palette, &[], &mut cursor).unwrap();
    let bytes = cursor.into_inner();

    assert_eq!(read_i32(&bytes, 4), 1);
    assert_eq!(read_i32(&bytes, 8) as usize, size_of::<Head>() + PALETTE_LEN);
    assert_eq!(bytes.len(), size_of::<Head>() + PALETTE_LEN + 32);
}

struct FullDisk {
    inner: Cursor<Vec<u8>>,
    capacity: usize,
}

impl Write for FullDisk {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.inner.position() as usize + buf.len() > self.capacity {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }

        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for FullDisk {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

#[test]
fn write_io_error() {
    let mut palette = palette();
    let textures = vec![solid_texture(&mut palette, "one", [9, 9, 9, 255])];
    let mut sink = FullDisk {
        inner: Cursor::new(Vec::new()),
        capacity: 100,
    };

    let e = write(&palette, &textures, &mut sink).unwrap_err();
    assert!(matches!(e, error::Error::Io(_)));
}
