mod builder;
mod source;

pub use builder::{build, downsample, texture_name};
pub use source::{RgbaBuffer, RgbaImage};
