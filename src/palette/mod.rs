mod repr;

pub use repr::{PaletteIndex, PALETTE_LEN};
