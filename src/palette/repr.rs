use alloc::boxed::Box;
use core::mem::size_of;

use crate::common::{Palette, Rgba};
use crate::error::{Error, Result};

#[cfg(feature = "std")]
use std::collections::HashMap;

#[cfg(not(feature = "std"))]
use hashbrown::HashMap;

/// Size of a palette in bytes (256 RGB triples)
pub const PALETTE_LEN: usize = size_of::<Palette>();

/// Fixed 256-color palette with a memoizing nearest-color search.
///
/// The cache is keyed by the full RGBA value, so two colors differing only
/// in (non-zero) alpha are resolved independently.  Entries are never evicted.
#[derive(Clone, Debug)]
pub struct PaletteIndex {
    colors: Box<Palette>,
    cache: HashMap<u32, u8>,
    searches: u64,
}

impl PaletteIndex {
    /// Load a palette from exactly 768 bytes of consecutive RGB triples
    pub fn load(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PALETTE_LEN {
            return Err(Error::Format(format!(
                "Palette must be {} bytes, got {}",
                PALETTE_LEN,
                bytes.len()
            )));
        }

        let mut colors = Box::new([[0u8; 3]; 256]);

        for (color, chunk) in colors.iter_mut().zip(bytes.chunks_exact(3)) {
            color.copy_from_slice(chunk);
        }

        Ok(Self::from_palette(colors))
    }

    pub fn from_palette(colors: Box<Palette>) -> Self {
        PaletteIndex {
            colors,
            cache: HashMap::new(),
            searches: 0,
        }
    }

    pub fn entries(&self) -> &Palette {
        &self.colors
    }

    /// Raw bytes as stored in a palette lump
    pub fn to_bytes(&self) -> [u8; PALETTE_LEN] {
        let mut bytes = [0u8; PALETTE_LEN];

        for (chunk, color) in bytes.chunks_exact_mut(3).zip(self.colors.iter())
        {
            chunk.copy_from_slice(color);
        }

        bytes
    }

    /// Index of the palette entry closest to `color`.  Fully transparent
    /// colors always map to index 0.
    pub fn nearest(&mut self, color: Rgba) -> u8 {
        if color[3] == 0 {
            return 0;
        }

        let key = u32::from_le_bytes(color);

        if let Some(&index) = self.cache.get(&key) {
            return index;
        }

        let index = self.search(color);
        self.cache.insert(key, index);
        index
    }

    /// Number of full palette scans performed so far
    pub fn searches(&self) -> u64 {
        self.searches
    }

    /// Number of distinct colors resolved and memoized
    pub fn cached_colors(&self) -> usize {
        self.cache.len()
    }

    fn search(&mut self, color: Rgba) -> u8 {
        self.searches += 1;

        let mut best_index = 0u8;
        let mut best_distance = u32::MAX;

        for (index, entry) in self.colors.iter().enumerate() {
            let [r, g, b] = *entry;
            let distance = [r, g, b, u8::MAX]
                .iter()
                .zip(color.iter())
                .map(|(&channel, &target)| {
                    let d = u32::from(channel.abs_diff(target));
                    d * d
                })
                .sum::<u32>();

            // strict comparison keeps the lowest index on ties
            if distance < best_distance {
                best_distance = distance;
                best_index = index as u8;

                if distance == 0 {
                    break;
                }
            }
        }

        best_index
    }
}
