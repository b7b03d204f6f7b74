mod read;
mod repr;
mod write;

pub use read::parse_directory;
pub use repr::{Entry, Head, MAGIC, PALETTE_NAME};
pub use write::write;



#[cfg(test)]
mod write_test;
