use crate::{DecodeError, Result};
use log::warn;

/// Writes black runs into a packed 1 bit per pixel buffer (MSB first).
pub(crate) struct Bitmap<'a> {
    data: &'a mut [u8],
    recover: bool,
}

impl<'a> Bitmap<'a> {
    pub(crate) fn new(data: &'a mut [u8], recover: bool) -> Self {
        Self { data, recover }
    }

    /// Set `len` bits starting at bit `start` of the row that begins at byte
    /// `row_offset`.
    pub(crate) fn fill_black(&mut self, row_offset: usize, start: u32, len: u32) -> Result<()> {
        if len == 0 {
            return Ok(());
        }

        let start = row_offset * 8 + start as usize;
        let mut end = start + len as usize;
        let available = self.data.len() * 8;

        if end > available {
            if !self.recover {
                return Err(DecodeError::BufferOverrun);
            }

            warn!("black run exceeds the output buffer, dropping {} pixels", end - available);
            end = available;

            if start >= end {
                return Ok(());
            }
        }

        let first = start / 8;
        let last = (end - 1) / 8;
        let head = start % 8;
        let tail = end - last * 8;

        if first == last {
            self.data[first] |= span_mask(head, tail);
        } else {
            self.data[first] |= span_mask(head, 8);
            self.data[first + 1..last].fill(0xFF);
            self.data[last] |= span_mask(0, tail);
        }

        Ok(())
    }
}

/// The bits `from..to` of a byte, counted from the most significant bit.
#[inline(always)]
fn span_mask(from: usize, to: usize) -> u8 {
    ((0xFF_u16 >> from) & !(0xFF_u16 >> to)) as u8
}
