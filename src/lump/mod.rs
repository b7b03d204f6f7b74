mod repr;

pub use repr::{mip_dimension, Image, MipTexture, MipTextureHead};

pub mod kind {
    pub const PALETTE: u8 = 0x40;
    pub const MIPTEX: u8 = 0x44;
}
