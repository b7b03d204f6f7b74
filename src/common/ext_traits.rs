use std::io::{self, Seek, SeekFrom, Write};

pub trait SeekExt {
    /// Overwrite bytes at absolute position `pos`, then return to wherever
    /// the cursor was beforehand.  The position is restored even when the
    /// write fails; the first error encountered is reported.
    fn patch_at(&mut self, pos: u64, bytes: &[u8]) -> io::Result<()>;
}

impl<T: Write + Seek> SeekExt for T {
    fn patch_at(&mut self, pos: u64, bytes: &[u8]) -> io::Result<()> {
        let resume = self.stream_position()?;

        let patched = self
            .seek(SeekFrom::Start(pos))
            .and_then(|_| self.write_all(bytes));

        let restored = self.seek(SeekFrom::Start(resume)).map(|_| ());

        patched.and(restored)
    }
}
