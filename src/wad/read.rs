use crate::error::{Error, Result};
use crate::wad::repr::{Entry, Head};
use std::io::{Read, Seek, SeekFrom};
use std::mem::size_of;
use std::string::String;
use std::vec::Vec;

/// Read the head and directory of a WAD archive that begins at the cursor's
/// current position.  Entries come back in directory order.
pub fn parse_directory(cursor: &mut (impl Seek + Read)) -> Result<Vec<Entry>> {
    let wad_start = cursor.stream_position()?;

    let mut header_bytes = [0u8; size_of::<Head>()];
    cursor.read_exact(&mut header_bytes[..])?;
    let header: Head = header_bytes.try_into()?;
    let entry_ct = header.entry_count() as usize;
    let dir_offset = header.directory_offset() as u64;

    let dir_pos = wad_start
        .checked_add(dir_offset)
        .ok_or_else(|| Error::Format(String::from("Offset too large")))?;

    cursor.seek(SeekFrom::Start(dir_pos))?;

    let mut entries = Vec::<Entry>::with_capacity(entry_ct.min(4096));

    for _ in 0..entry_ct {
        const WAD_ENTRY_SIZE: usize = size_of::<Entry>();
        let mut entry_bytes = [0u8; WAD_ENTRY_SIZE];
        cursor.read_exact(&mut entry_bytes[0..WAD_ENTRY_SIZE])?;
        let entry: Entry = entry_bytes.try_into()?;
        entries.push(entry);
    }

    Ok(entries)
}
