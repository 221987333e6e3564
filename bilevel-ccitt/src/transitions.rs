//! Changing element bookkeeping for two-dimensional decoding.

use crate::Color;

/// The changing elements of the reference line and of the line being coded.
///
/// Positions are strictly increasing and lie within `[0, width]`. An element
/// at an even index is a change to black, one at an odd index a change to
/// white. Everything past the end of a list reads as `width`, so an empty
/// reference line is the imaginary white line that precedes the first row.
#[derive(Debug)]
pub(crate) struct Transitions {
    reference: Vec<u32>,
    coding: Vec<u32>,
    width: u32,
    /// Index of the last `b1` found on the reference line.
    cursor: usize,
}

impl Transitions {
    pub(crate) fn new(width: u32) -> Self {
        let capacity = width as usize + 1;

        Self {
            reference: Vec::with_capacity(capacity),
            coding: Vec::with_capacity(capacity),
            width,
            cursor: 0,
        }
    }

    /// Record a color change at `pos` on the coding line.
    ///
    /// A change at the same position as the previous one means the run in
    /// between was empty, so both changes cancel out.
    #[inline(always)]
    pub(crate) fn push(&mut self, pos: u32) {
        let pos = pos.min(self.width);

        if self.coding.last() == Some(&pos) {
            self.coding.pop();
        } else {
            debug_assert!(self.coding.last().is_none_or(|&last| last < pos));
            self.coding.push(pos);
        }
    }

    /// Make the coding line the reference line for the next row.
    pub(crate) fn next_line(&mut self) {
        core::mem::swap(&mut self.reference, &mut self.coding);
        self.coding.clear();
        self.cursor = 0;
    }

    /// Find `b1` and `b2` for a coding position `a0` whose color is `color`.
    ///
    /// `b1` is the first change on the reference line right of `a0` towards
    /// the opposite color, `b2` the change after it. `a0 = None` stands for
    /// the position before the first pixel.
    #[inline(always)]
    pub(crate) fn reference_changes(&mut self, a0: Option<u32>, color: Color) -> (u32, u32) {
        // `b1` cannot move further left than one element before the last one,
        // since `a0` only ever grows.
        let mut i = self.cursor.saturating_sub(1);

        i = match color {
            Color::White => i & !1,
            Color::Black => i | 1,
        };

        while let Some(&pos) = self.reference.get(i) {
            if a0.is_none_or(|a0| pos > a0) {
                break;
            }

            i += 2;
        }

        self.cursor = i.min(self.reference.len());

        let b1 = self.reference.get(i).copied().unwrap_or(self.width);
        let b2 = self.reference.get(i + 1).copied().unwrap_or(self.width);

        (b1, b2)
    }

    #[cfg(test)]
    pub(crate) fn coding_line(&self) -> &[u32] {
        &self.coding
    }
}
