use alloc::string::String;

#[cfg(feature = "std")]
mod ext_traits;

#[cfg(feature = "std")]
pub use ext_traits::SeekExt;

/// 256 RGB triples, indexed by palette position
pub type Palette = [[u8; 3]; 256];

/// A single true-color pixel as `[red, green, blue, alpha]`
pub type Rgba = [u8; 4];

/// Size of a lump or texture name field, including the null terminator
pub const NAME_LEN: usize = 16;

/// Copy `name` into a null-padded name field.  At most `NAME_LEN - 1` bytes
/// are kept so the field is always null-terminated.
pub fn pad_name(name: &str) -> [u8; NAME_LEN] {
    let mut field = [0u8; NAME_LEN];
    let bytes = name.as_bytes();
    let len = bytes.len().min(NAME_LEN - 1);
    field[..len].copy_from_slice(&bytes[..len]);
    field
}

/// Read a null-terminated name field up to the first null byte.  Bytes that
/// are not valid UTF-8 are replaced.
pub fn slice_to_string(slice: &[u8]) -> String {
    let len = slice.iter().position(|&b| b == 0u8).unwrap_or(slice.len());
    String::from_utf8_lossy(&slice[..len]).into_owned()
}
