use alloc::boxed::Box;
use alloc::string::String;
use core::mem::size_of;

use crate::common::{slice_to_string, NAME_LEN};
use crate::error::{Error, Result};

const MIP_LEVELS: usize = 4;

/// Side length of mip level `level` for a texture whose full-size side is
/// `full`.  Never smaller than 1.
pub fn mip_dimension(full: u32, level: usize) -> u32 {
    (full >> level).max(1)
}

/// A grid of palette indices in row-major order
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Box<[u8]>,
}

impl Image {
    pub fn from_pixels(
        width: u32,
        height: u32,
        pixels: Box<[u8]>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Format(format!(
                "Zero-sized image ({}x{})",
                width, height
            )));
        }

        let expected = u64::from(width) * u64::from(height);

        if pixels.len() as u64 != expected {
            return Err(Error::Format(format!(
                "Pixel count {} != {}x{}",
                pixels.len(),
                width,
                height
            )));
        }

        Ok(Image {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels[..]
    }
}

/// Named texture with four quantized mip levels
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MipTexture {
    name: [u8; NAME_LEN],
    mips: [Image; MIP_LEVELS],
}

impl MipTexture {
    pub const LEN: usize = MIP_LEVELS;

    /// Assemble a texture, checking that every level has the dimensions
    /// derived from level 0
    pub fn from_parts(
        name: [u8; NAME_LEN],
        mips: [Image; Self::LEN],
    ) -> Result<Self> {
        if name[NAME_LEN - 1] != 0 {
            return Err(Error::Format(String::from(
                "Texture name is not null-terminated",
            )));
        }

        let (width, height) = (mips[0].width, mips[0].height);

        for (level, mip) in mips.iter().enumerate().skip(1) {
            if mip.width != mip_dimension(width, level)
                || mip.height != mip_dimension(height, level)
            {
                return Err(Error::Format(format!(
                    "Bad mip level {}: {}x{} from {}x{}",
                    level, mip.width, mip.height, width, height
                )));
            }
        }

        Ok(MipTexture { name, mips })
    }

    /// Name in raw bytes
    pub fn name(&self) -> [u8; NAME_LEN] {
        self.name
    }

    pub fn name_to_string(&self) -> String {
        slice_to_string(&self.name)
    }

    pub fn width(&self) -> u32 {
        self.mips[0].width
    }

    pub fn height(&self) -> u32 {
        self.mips[0].height
    }

    pub fn mip(&self, index: usize) -> &Image {
        if index < Self::LEN {
            &self.mips[index]
        } else {
            panic!("Outside mip bounds ([0..{}])", Self::LEN);
        }
    }

    pub fn mips(&self) -> &[Image; Self::LEN] {
        &self.mips
    }

    /// Length of the texture lump: head followed by every mip level
    pub fn lump_length(&self) -> usize {
        size_of::<MipTextureHead>()
            + self.mips.iter().map(|m| m.pixels.len()).sum::<usize>()
    }
}

impl<'a> IntoIterator for &'a MipTexture {
    type Item = &'a Image;
    type IntoIter = core::slice::Iter<'a, Image>;

    fn into_iter(self) -> Self::IntoIter {
        self.mips.iter()
    }
}

/// Fixed-size head at the start of every texture lump.  Mip offsets are
/// relative to the start of the lump.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(C, packed)]
pub struct MipTextureHead {
    pub(crate) name: [u8; NAME_LEN],
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) offsets: [i32; MIP_LEVELS],
}

impl MipTextureHead {
    pub fn to_bytes(&self) -> [u8; size_of::<MipTextureHead>()] {
        let mut bytes = [0u8; size_of::<MipTextureHead>()];
        let offsets = self.offsets;

        bytes[..16].copy_from_slice(&self.name);
        bytes[16..20].copy_from_slice(&{ self.width }.to_le_bytes());
        bytes[20..24].copy_from_slice(&{ self.height }.to_le_bytes());

        for (i, offset) in offsets.iter().enumerate() {
            bytes[(24 + 4 * i)..(28 + 4 * i)]
                .copy_from_slice(&offset.to_le_bytes());
        }

        bytes
    }
}

impl TryFrom<[u8; size_of::<MipTextureHead>()]> for MipTextureHead {
    type Error = Error;

    fn try_from(bytes: [u8; size_of::<MipTextureHead>()]) -> Result<Self> {
        let mut words = bytes[16..].chunks_exact(4).map(|chunk| {
            i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])
        });

        let mut name = [0u8; NAME_LEN];
        name.copy_from_slice(&bytes[..16]);

        let mut next = || {
            words.next().ok_or_else(|| {
                Error::Format(String::from("Short texture head"))
            })
        };

        let width = next()?;
        let height = next()?;

        if width <= 0 || height <= 0 {
            return Err(Error::Format(format!(
                "Invalid dimensions {}x{}",
                width, height
            )));
        }

        let mut offsets = [0i32; MIP_LEVELS];

        for offset in offsets.iter_mut() {
            *offset = next()?;
        }

        Ok(MipTextureHead {
            name,
            width,
            height,
            offsets,
        })
    }
}
