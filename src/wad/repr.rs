use std::mem::size_of;
use std::string::String;

use crate::common::{pad_name, slice_to_string, NAME_LEN};
use crate::error::{Error, Result};

pub const MAGIC: [u8; 4] = *b"WAD2";

/// Directory name of the palette lump
pub const PALETTE_NAME: &str = "PALETTE";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(C, packed)]
pub struct Head {
    magic: [u8; 4],
    entry_count: i32,
    directory_offset: i32,
}

impl Head {
    pub fn new(entry_count: i32, directory_offset: i32) -> Self {
        Head {
            magic: MAGIC,
            entry_count,
            directory_offset,
        }
    }

    pub fn entry_count(&self) -> i32 {
        self.entry_count
    }

    pub fn directory_offset(&self) -> i32 {
        self.directory_offset
    }

    pub fn to_bytes(&self) -> [u8; size_of::<Head>()] {
        let mut bytes = [0u8; size_of::<Head>()];
        bytes[..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&{ self.entry_count }.to_le_bytes());
        bytes[8..].copy_from_slice(&{ self.directory_offset }.to_le_bytes());
        bytes
    }
}

impl TryFrom<[u8; size_of::<Head>()]> for Head {
    type Error = Error;

    fn try_from(bytes: [u8; size_of::<Head>()]) -> Result<Self> {
        if bytes[..4] != MAGIC[..] {
            let magic_str: String =
                MAGIC.iter().copied().map(char::from).collect();

            return Err(Error::Format(format!(
                "Magic number does not match `{magic_str}`"
            )));
        }

        let entry_count =
            i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

        let directory_offset =
            i32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);

        if entry_count < 0 || directory_offset < 0 {
            return Err(Error::Format(format!(
                "Negative entry count ({entry_count}) or directory offset \
                ({directory_offset})"
            )));
        }

        Ok(Head::new(entry_count, directory_offset))
    }
}

/// Provides the location of a lump within a WAD archive, length of the lump,
/// name (16 bytes, null-terminated), and lump kind
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(C, packed)]
pub struct Entry {
    offset: i32,
    length: i32,
    // always equal to `length`, lumps are never compressed
    uncompressed_length: i32,
    lump_kind: u8,
    compression: u8,
    _padding: u16,
    name: [u8; NAME_LEN],
}

impl Entry {
    pub fn new(offset: i32, length: i32, lump_kind: u8, name: &str) -> Self {
        Self::from_name_field(offset, length, lump_kind, pad_name(name))
    }

    pub(crate) fn from_name_field(
        offset: i32,
        length: i32,
        lump_kind: u8,
        name: [u8; NAME_LEN],
    ) -> Self {
        Entry {
            offset,
            length,
            uncompressed_length: length,
            lump_kind,
            compression: 0u8,
            _padding: 0u16,
            name,
        }
    }

    /// Name read up to the first null byte
    pub fn name_to_string(&self) -> String {
        slice_to_string(&self.name)
    }

    /// Name in raw bytes
    pub fn name(&self) -> [u8; NAME_LEN] {
        self.name
    }

    /// WAD offset of lump
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Length of lump in bytes
    pub fn length(&self) -> i32 {
        self.length
    }

    /// Lump kind as a byte
    pub fn kind(&self) -> u8 {
        self.lump_kind
    }

    pub fn to_bytes(&self) -> [u8; size_of::<Entry>()] {
        let mut bytes = [0u8; size_of::<Entry>()];
        bytes[0..4].copy_from_slice(&{ self.offset }.to_le_bytes());
        bytes[4..8].copy_from_slice(&{ self.length }.to_le_bytes());
        bytes[8..12]
            .copy_from_slice(&{ self.uncompressed_length }.to_le_bytes());
        bytes[12] = self.lump_kind;
        bytes[13] = self.compression;
        bytes[14..16].copy_from_slice(&{ self._padding }.to_le_bytes());
        bytes[16..].copy_from_slice(&self.name);
        bytes
    }
}

impl TryFrom<[u8; size_of::<Entry>()]> for Entry {
    type Error = Error;

    // Fails if compression flag is on (unsupported)
    fn try_from(bytes: [u8; size_of::<Entry>()]) -> Result<Self> {
        let word = |start: usize| {
            i32::from_le_bytes([
                bytes[start],
                bytes[start + 1],
                bytes[start + 2],
                bytes[start + 3],
            ])
        };

        let offset = word(0);
        let length = word(4);

        if offset < 0 || length < 0 {
            return Err(Error::Format(format!(
                "Negative lump offset ({offset}) or length ({length})"
            )));
        }

        if bytes[13] != 0 {
            return Err(Error::Format(String::from(
                "Compression is unsupported",
            )));
        }

        let mut name = [0u8; NAME_LEN];
        name.copy_from_slice(&bytes[16..]);

        Ok(Entry::from_name_field(offset, length, bytes[12], name))
    }
}
