#![no_std]

#[cfg(all(not(feature = "std"), not(feature = "alloc_fills")))]
compile_error!("Must use feature 'std' or include 'alloc_fills'");

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
extern crate alloc;

mod common;
pub mod error;
pub mod lump;
pub mod palette;
pub mod texture;

#[cfg(feature = "std")]
pub mod wad;

pub use common::{pad_name, slice_to_string, Palette, Rgba, NAME_LEN};
pub use error::{Error, Result};
