use crate::bit_reader::BitReader;
use crate::tables::{
    BLACK_LONG, BLACK_MID, BLACK_SHORT, EXTENDED_MAKEUP, Entry, Kind, MODE, MODE_HORIZONTAL,
    MODE_PASS, MODE_VERTICAL_0, WHITE,
};
use crate::{Color, DecodeError, Result};

/// A two-dimensional coding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Pass,
    Horizontal,
    Vertical(i8),
    /// The `0000001` prefix, carrying the three bits that follow it.
    Extension(u32),
}

impl BitReader<'_> {
    /// Resolve an extended make-up code whose first 8 bits were just consumed.
    #[inline(always)]
    fn decode_extended_makeup(&mut self) -> Result<u32> {
        let entry = EXTENDED_MAKEUP[self.read(4) as usize];
        self.rewind(4 - entry.length());

        Ok(entry.value())
    }

    #[inline(always)]
    pub(crate) fn decode_white_run(&mut self) -> Result<u32> {
        let mut total: u32 = 0;

        loop {
            let entry = WHITE[self.read(10) as usize];

            match entry.kind() {
                Kind::Run => {
                    self.rewind(10 - entry.length());
                    total = total.saturating_add(entry.value());

                    if entry.is_terminating() {
                        return Ok(total);
                    }
                }
                Kind::Extension => {
                    self.rewind(10 - entry.length());
                    total = total.saturating_add(self.decode_extended_makeup()?);
                }
                Kind::EndOfLine => return Err(DecodeError::UnexpectedEndOfLine(Color::White)),
                Kind::Invalid | Kind::Prefix => return Err(DecodeError::InvalidCode),
            }
        }
    }

    #[inline(always)]
    fn black_entry(&mut self) -> Result<Entry> {
        let index = self.read(4);
        let entry = BLACK_SHORT[index as usize];

        if entry.kind() != Kind::Prefix {
            self.rewind(4 - entry.length());
            return Ok(entry);
        }

        if index == 1 {
            let entry = BLACK_MID[self.read(2) as usize];
            self.rewind(2 - entry.length());
            return Ok(entry);
        }

        let entry = BLACK_LONG[self.read(9) as usize];

        match entry.kind() {
            Kind::EndOfLine => Err(DecodeError::UnexpectedEndOfLine(Color::Black)),
            Kind::Invalid | Kind::Prefix => Err(DecodeError::InvalidCode),
            Kind::Run | Kind::Extension => {
                self.rewind(9 - entry.length());
                Ok(entry)
            }
        }
    }

    #[inline(always)]
    pub(crate) fn decode_black_run(&mut self) -> Result<u32> {
        let mut total: u32 = 0;

        loop {
            let entry = self.black_entry()?;

            if entry.kind() == Kind::Extension {
                total = total.saturating_add(self.decode_extended_makeup()?);
                continue;
            }

            total = total.saturating_add(entry.value());

            if entry.is_terminating() {
                return Ok(total);
            }
        }
    }

    #[inline(always)]
    pub(crate) fn decode_run(&mut self, color: Color) -> Result<u32> {
        match color {
            Color::White => self.decode_white_run(),
            Color::Black => self.decode_black_run(),
        }
    }

    #[inline(always)]
    pub(crate) fn decode_mode(&mut self) -> Result<Mode> {
        let entry = MODE[self.read(7) as usize];

        match entry.kind() {
            Kind::Run => {
                self.rewind(7 - entry.length());

                Ok(match entry.value() {
                    MODE_PASS => Mode::Pass,
                    MODE_HORIZONTAL => Mode::Horizontal,
                    id => Mode::Vertical(id as i8 - MODE_VERTICAL_0 as i8),
                })
            }
            Kind::Extension => Ok(Mode::Extension(self.read(3))),
            _ => Err(DecodeError::InvalidTwoDimensionalModeCode),
        }
    }
}
