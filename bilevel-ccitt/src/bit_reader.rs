//! Bit-level reader for CCITT encoded data streams.

use crate::FillOrder;

/// Maps every byte to its bit-reversed value.
pub(crate) const REVERSED: [u8; 256] = {
    let mut table = [0_u8; 256];
    let mut i = 0;

    while i < 256 {
        table[i] = (i as u8).reverse_bits();
        i += 1;
    }

    table
};

/// A reader that hands out bits MSB first.
///
/// Reading past the end of the data yields zero bits, so truncated streams
/// run into an invalid code or an EOL instead of an out-of-bounds access.
#[derive(Debug, Clone)]
pub(crate) struct BitReader<'a> {
    data: &'a [u8],
    bit_offset: usize,
    fill_order: FillOrder,
}

impl<'a> BitReader<'a> {
    #[inline(always)]
    pub(crate) fn new(data: &'a [u8], fill_order: FillOrder) -> Self {
        Self {
            data,
            bit_offset: 0,
            fill_order,
        }
    }

    #[inline(always)]
    fn byte(&self, pos: usize) -> u32 {
        match self.data.get(pos) {
            Some(&b) => match self.fill_order {
                FillOrder::MsbFirst => b as u32,
                FillOrder::LsbFirst => REVERSED[b as usize] as u32,
            },
            None => 0,
        }
    }

    /// Read the next `num_bits` bits (at most 16).
    #[inline(always)]
    pub(crate) fn read(&mut self, num_bits: u8) -> u32 {
        debug_assert!(num_bits <= 16);

        if num_bits == 0 {
            return 0;
        }

        let pos = self.byte_pos();
        let window = (self.byte(pos) << 16) | (self.byte(pos + 1) << 8) | self.byte(pos + 2);
        let shift = 24 - self.bit_pos() - num_bits as usize;
        self.bit_offset += num_bits as usize;

        (window >> shift) & ((1 << num_bits) - 1)
    }

    #[inline(always)]
    pub(crate) fn peek(&self, num_bits: u8) -> u32 {
        self.clone().read(num_bits)
    }

    /// Step back by `num_bits` bits that were read but not used.
    #[inline(always)]
    pub(crate) fn rewind(&mut self, num_bits: u8) {
        self.bit_offset = self.bit_offset.saturating_sub(num_bits as usize);
    }

    #[inline(always)]
    pub(crate) fn align(&mut self) {
        let bit_pos = self.bit_pos();

        if bit_pos != 0 {
            self.bit_offset += 8 - bit_pos;
        }
    }

    #[inline(always)]
    pub(crate) fn at_end(&self) -> bool {
        self.byte_pos() >= self.data.len()
    }

    #[inline(always)]
    pub(crate) fn byte_pos(&self) -> usize {
        self.bit_offset >> 3
    }

    #[inline(always)]
    pub(crate) fn bit_pos(&self) -> usize {
        self.bit_offset & 7
    }
}
