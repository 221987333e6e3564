//! Scanline decoding for Modified Huffman, Modified READ and Modified
//! Modified READ data.

use crate::bit_reader::BitReader;
use crate::bitmap::Bitmap;
use crate::run::Mode;
use crate::tables::{EOL, UNCOMPRESSED_ENTRANCE};
use crate::transitions::Transitions;
use crate::{
    Color, DecodeError, DecodeSettings, EncodingMode, Group3Options, Group4Options, Result,
};
use log::{debug, warn};

/// The state of a single decode call.
pub(crate) struct Session<'a> {
    reader: BitReader<'a>,
    transitions: Transitions,
    bitmap: Bitmap<'a>,
    settings: &'a DecodeSettings,
    width: u32,
    stride: usize,
    /// Byte offset of the current row in the output.
    row_offset: usize,
    /// The position up to which the current row has been decoded.
    pos: u32,
    /// The color of the run starting at `pos`.
    color: Color,
    /// Whether EOLs are padded so that they end on a byte boundary.
    fill_bits: bool,
}

impl<'a> Session<'a> {
    pub(crate) fn new(data: &'a [u8], settings: &'a DecodeSettings, out: &'a mut [u8]) -> Self {
        Self {
            reader: BitReader::new(data, settings.fill_order),
            transitions: Transitions::new(settings.columns),
            bitmap: Bitmap::new(out, settings.recover_from_errors),
            settings,
            width: settings.columns,
            stride: settings.row_stride(),
            row_offset: 0,
            pos: 0,
            color: Color::White,
            fill_bits: false,
        }
    }

    /// Decode all rows and return the number of bytes read.
    pub(crate) fn run(mut self) -> Result<usize> {
        debug!(
            "decoding {}x{} image with {:?}",
            self.settings.columns, self.settings.rows, self.settings.encoding
        );

        match self.settings.encoding {
            EncodingMode::Group3_1D => self.decode_group3_1d()?,
            EncodingMode::Group3_2D(options) => self.decode_group3_2d(options)?,
            EncodingMode::Group4(options) => self.decode_group4(options)?,
        }

        self.reader.align();

        Ok(self.reader.byte_pos())
    }

    fn decode_group3_1d(&mut self) -> Result<()> {
        for _ in 0..self.settings.rows {
            self.decode_1d_line()?;
            self.next_row();

            if self.settings.rows_are_byte_aligned {
                self.reader.align();
            }
        }

        Ok(())
    }

    fn decode_group3_2d(&mut self, options: Group3Options) -> Result<()> {
        self.fill_bits = options.fill_bits_before_eol;

        for row in 0..self.settings.rows {
            self.read_eol(row == 0)?;

            // The tag bit after the EOL is 1 for a one-dimensional line.
            let one_dimensional = !options.default_is_2d || self.reader.read(1) == 1;

            if one_dimensional {
                self.decode_1d_line()?;
            } else if row == 0 {
                return Err(DecodeError::FirstScanlineMustBeOneDimensional);
            } else {
                self.decode_2d_line(false, options.uncompressed_mode)?;
            }

            self.next_row();
        }

        Ok(())
    }

    fn decode_group4(&mut self, options: Group4Options) -> Result<()> {
        for _ in 0..self.settings.rows {
            self.decode_2d_line(true, options.uncompressed_mode)?;
            self.next_row();

            if self.settings.rows_are_byte_aligned {
                self.reader.align();
            }
        }

        Ok(())
    }

    fn start_row(&mut self) {
        self.pos = self.settings.start_x.min(self.width);
        self.color = Color::White;
    }

    fn next_row(&mut self) {
        self.transitions.next_line();
        self.row_offset += self.stride;
    }

    /// Consume an EOL code, including any fill bits in front of it.
    fn read_eol(&mut self, first: bool) -> Result<()> {
        if !self.fill_bits {
            let code = self.reader.read(12);

            if code == EOL {
                return Ok(());
            }

            // Some encoders pad EOLs to byte boundaries without saying so. The
            // first EOL then shows up as `0000` followed by the code.
            if first && code == 0 && self.reader.peek(4) == EOL {
                warn!("found fill bits before EOL that were not announced");
                self.reader.read(4);
                self.fill_bits = true;

                return Ok(());
            }

            return Err(DecodeError::MissingEndOfLine);
        }

        let bits_left = (8 - self.reader.bit_pos()) as u8;

        if self.reader.read(bits_left) != 0 {
            return Err(DecodeError::MalformedFillBitsBeforeEol);
        }

        // The EOL needs at least 11 zeros, 7 of which are in its last byte.
        if bits_left < 4 && self.reader.read(8) != 0 {
            return Err(DecodeError::MalformedFillBitsBeforeEol);
        }

        loop {
            if self.reader.at_end() {
                return Err(DecodeError::MissingEndOfLine);
            }

            match self.reader.read(8) {
                0 => {}
                1 => return Ok(()),
                _ => return Err(DecodeError::MalformedFillBitsBeforeEol),
            }
        }
    }

    fn decode_1d_line(&mut self) -> Result<()> {
        self.start_row();

        while self.pos < self.width {
            let run = self.reader.decode_run(self.color)?;
            self.advance(run)?;
        }

        Ok(())
    }

    fn decode_2d_line(&mut self, group4: bool, uncompressed_mode: bool) -> Result<()> {
        self.start_row();
        let mut a0 = None;

        while self.pos < self.width {
            let (b1, b2) = self.transitions.reference_changes(a0, self.color);

            let mode = match self.reader.decode_mode() {
                Ok(mode) => mode,
                Err(_) if group4 => {
                    self.abandon_row();
                    break;
                }
                Err(e) => return Err(e),
            };

            match mode {
                Mode::Pass => {
                    if self.color == Color::Black {
                        self.fill(self.pos, b2.saturating_sub(self.pos))?;
                    }

                    self.pos = self.pos.max(b2);
                }
                Mode::Horizontal => {
                    for _ in 0..2 {
                        let run = self.reader.decode_run(self.color)?;
                        self.advance(run)?;
                    }
                }
                Mode::Vertical(offset) => {
                    let mut a1 = b1.saturating_add_signed(offset as i32).min(self.width);

                    if a1 < self.pos {
                        warn!("vertical mode moved a1 left of a0, clamping it");
                        a1 = self.pos;
                    }

                    self.advance(a1 - self.pos)?;
                }
                Mode::Extension(UNCOMPRESSED_ENTRANCE) if group4 || uncompressed_mode => {
                    if !uncompressed_mode {
                        debug!("entering uncompressed mode that was not announced");
                    }

                    self.decode_uncompressed()?;
                }
                Mode::Extension(_) if group4 => {
                    self.abandon_row();
                    break;
                }
                Mode::Extension(_) => return Err(DecodeError::InvalidTwoDimensionalModeCode),
            }

            a0 = Some(self.pos);
        }

        Ok(())
    }

    /// Decode uncompressed mode data up to and including its exit code.
    fn decode_uncompressed(&mut self) -> Result<()> {
        loop {
            let mut zeros = 0;

            while self.reader.read(1) == 0 {
                zeros += 1;

                if zeros > 10 {
                    return Err(DecodeError::InvalidCode);
                }
            }

            match zeros {
                // `1`, `01`, ..., `00001`.
                0..=4 => {
                    self.emit(Color::White, zeros)?;
                    self.emit(Color::Black, 1)?;
                }
                // `000001`.
                5 => self.emit(Color::White, 5)?,
                // `0000001T`, ..., `00000000001T`.
                _ => {
                    self.emit(Color::White, zeros - 6)?;

                    let next = if self.reader.read(1) == 1 {
                        Color::Black
                    } else {
                        Color::White
                    };

                    if next != self.color {
                        self.transitions.push(self.pos);
                        self.color = next;
                    }

                    return Ok(());
                }
            }
        }
    }

    /// Treat the rest of the row as white after a mode code that cannot be
    /// decoded.
    fn abandon_row(&mut self) {
        warn!(
            "unsupported two-dimensional mode code at pixel {}, abandoning remainder of row",
            self.pos
        );

        if self.color == Color::Black {
            self.transitions.push(self.pos);
        }

        self.pos = self.width;
    }

    /// End the current run after `len` pixels and switch colors.
    fn advance(&mut self, len: u32) -> Result<()> {
        if self.color == Color::Black {
            self.fill(self.pos, len)?;
        }

        self.pos = self.pos.saturating_add(len);
        self.transitions.push(self.pos);
        self.color = self.color.flip();

        Ok(())
    }

    /// Append `len` pixels of `color` without ending the run afterwards.
    fn emit(&mut self, color: Color, len: u32) -> Result<()> {
        if len == 0 {
            return Ok(());
        }

        if color != self.color {
            self.transitions.push(self.pos);
            self.color = color;
        }

        if color == Color::Black {
            self.fill(self.pos, len)?;
        }

        self.pos = self.pos.saturating_add(len);

        Ok(())
    }

    fn fill(&mut self, start: u32, len: u32) -> Result<()> {
        let end = start.saturating_add(len);

        if end > self.width {
            warn!(
                "run from {start} to {end} exceeds the row width of {}, clipping it",
                self.width
            );
        }

        let end = end.min(self.width);

        if start >= end {
            return Ok(());
        }

        self.bitmap.fill_black(self.row_offset, start, end - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{Lcg, changes, encode, pack, random_image};
    use crate::{FillOrder, decode_to_vec};

    const WIDTHS: [u32; 9] = [1, 7, 8, 13, 64, 200, 1728, 2600, 5000];

    fn round_trip(encoding: EncodingMode, rows_are_byte_aligned: bool, fill_order: FillOrder) {
        let mut rng = Lcg(0x5eed_1234);

        for round in 0..45 {
            let width = WIDTHS[round % WIDTHS.len()];
            let height = 1 + rng.next() % 10;
            let rows = random_image(&mut rng, width, height);
            let mut data = encode(&rows, width, encoding, rows_are_byte_aligned);

            if fill_order == FillOrder::LsbFirst {
                data.iter_mut().for_each(|b| *b = b.reverse_bits());
            }

            let mut settings = DecodeSettings::new(width, height, encoding);
            settings.rows_are_byte_aligned = rows_are_byte_aligned;
            settings.fill_order = fill_order;

            assert_eq!(
                decode_to_vec(&data, &settings),
                Ok(pack(&rows, width)),
                "round {round}, {width}x{height}"
            );
        }
    }

    #[test]
    fn round_trip_group3_1d() {
        round_trip(EncodingMode::Group3_1D, true, FillOrder::MsbFirst);
        round_trip(EncodingMode::Group3_1D, false, FillOrder::LsbFirst);
    }

    #[test]
    fn round_trip_group3_2d() {
        let options = Group3Options {
            default_is_2d: true,
            ..Group3Options::default()
        };

        round_trip(EncodingMode::Group3_2D(options), false, FillOrder::MsbFirst);
        round_trip(EncodingMode::Group3_2D(options), false, FillOrder::LsbFirst);
        round_trip(
            EncodingMode::Group3_2D(Group3Options::default()),
            false,
            FillOrder::MsbFirst,
        );
    }

    #[test]
    fn round_trip_group4() {
        let encoding = EncodingMode::Group4(Group4Options::default());

        round_trip(encoding, false, FillOrder::MsbFirst);
        round_trip(encoding, false, FillOrder::LsbFirst);
        round_trip(encoding, true, FillOrder::MsbFirst);
    }

    /// Decode random images line by line and check the changing elements
    /// recorded for each line.
    fn check_coding_lines(encoding: EncodingMode, two_dimensional: bool) {
        let mut rng = Lcg(0xc0de_0042);

        for width in WIDTHS {
            let rows = random_image(&mut rng, width, 8);
            let data = encode(&rows, width, encoding, false);
            let settings = DecodeSettings::new(width, rows.len() as u32, encoding);
            let mut out = vec![0; settings.row_stride() * rows.len()];
            let mut session = Session::new(&data, &settings, &mut out);

            for row in &rows {
                if two_dimensional {
                    session.decode_2d_line(true, false).unwrap();
                } else {
                    session.decode_1d_line().unwrap();
                }

                // The runs add up to the width.
                assert_eq!(session.pos, width);

                let line = session.transitions.coding_line();
                assert!(line.windows(2).all(|w| w[0] < w[1]), "{line:?}");
                assert!(line.iter().all(|&pos| pos <= width), "{line:?}");

                // Apart from a closing change at the width, the line holds
                // exactly the color changes of the row.
                let line = line.strip_suffix(&[width]).unwrap_or(line);
                assert_eq!(line, changes(row));

                session.next_row();
            }
        }
    }

    #[test]
    fn coding_lines_1d() {
        check_coding_lines(EncodingMode::Group3_1D, false);
    }

    #[test]
    fn coding_lines_2d() {
        check_coding_lines(EncodingMode::Group4(Group4Options::default()), true);
    }
}
