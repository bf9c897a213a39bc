//! Little-endian cursor over a fully loaded file
//!
//! World and texture parsing seeks by absolute offset in both directions, so
//! sources are read into memory once and walked through this cursor. All
//! integers are 32-bit little-endian; strings are length-prefixed. Any read
//! past the end of the data is a fatal format error.

use crate::error::{PackError, Result, unexpected_chunk};

pub struct Stream<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Stream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Move to an absolute offset. Seeking to the very end is allowed;
    /// anything past it is a truncation.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(PackError::TruncatedRead { offset: pos });
        }
        self.pos = pos;
        Ok(())
    }

    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.seek(self.pos + count)
    }

    /// True when the next four bytes equal `tag`. Never advances.
    pub fn peek_tag(&self, tag: &[u8; 4]) -> bool {
        self.data
            .get(self.pos..self.pos + 4)
            .is_some_and(|bytes| bytes == tag)
    }

    pub fn read(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self
            .data
            .get(self.pos..self.pos + count)
            .ok_or(PackError::TruncatedRead { offset: self.pos })?;
        self.pos += count;
        Ok(bytes)
    }

    /// Consume `tag` or fail with a chunk-mismatch format error.
    pub fn expect_tag(&mut self, tag: &[u8; 4]) -> Result<()> {
        let offset = self.pos;
        if self.read(4)? != tag {
            return Err(unexpected_chunk(tag, offset));
        }
        Ok(())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Length-prefixed string: a 32-bit count followed by that many bytes.
    /// Dictionary names are byte strings; stray non-UTF-8 bytes are replaced
    /// rather than rejected.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.read(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}
