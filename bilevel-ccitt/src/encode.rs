//! A small T.4/T.6 encoder for checking the decoder against arbitrary images.

use crate::tables::{
    BLACK_MAKEUP, BLACK_TERMINATING, COMMON_MAKEUP, MODE_CODES, MODE_HORIZONTAL, MODE_PASS,
    MODE_VERTICAL_0, WHITE_MAKEUP, WHITE_TERMINATING,
};
use crate::{Color, EncodingMode};

type Codes = [(u16, u8, u16)];

#[derive(Default)]
struct BitWriter {
    data: Vec<u8>,
    len: usize,
}

impl BitWriter {
    fn push(&mut self, length: u8, code: u16) {
        for i in (0..length).rev() {
            if self.len % 8 == 0 {
                self.data.push(0);
            }

            if (code >> i) & 1 == 1 {
                if let Some(last) = self.data.last_mut() {
                    *last |= 0x80 >> (self.len % 8);
                }
            }

            self.len += 1;
        }
    }

    fn push_code(&mut self, codes: &Codes, value: u32) {
        let &(_, length, code) = codes
            .iter()
            .find(|c| c.0 as u32 == value)
            .expect("no code for value");
        self.push(length, code);
    }

    fn push_run(&mut self, color: Color, mut run: u32) {
        let (terminating, makeup): (&Codes, &Codes) = match color {
            Color::White => (&WHITE_TERMINATING, &WHITE_MAKEUP),
            Color::Black => (&BLACK_TERMINATING, &BLACK_MAKEUP),
        };

        while run > 2560 {
            self.push_code(&COMMON_MAKEUP, 2560);
            run -= 2560;
        }

        if run >= 64 {
            let value = run / 64 * 64;

            if value >= 1792 {
                self.push_code(&COMMON_MAKEUP, value);
            } else {
                self.push_code(makeup, value);
            }

            run -= value;
        }

        self.push_code(terminating, run);
    }

    fn align(&mut self) {
        self.len = self.len.div_ceil(8) * 8;
    }
}

/// The positions at which the color of `row` changes, starting from white.
pub(crate) fn changes(row: &[bool]) -> Vec<u32> {
    let mut out = Vec::new();
    let mut black = false;

    for (i, &pixel) in row.iter().enumerate() {
        if pixel != black {
            out.push(i as u32);
            black = pixel;
        }
    }

    out
}

/// Pack rows the way the decoder lays out its output.
pub(crate) fn pack(rows: &[Vec<bool>], width: u32) -> Vec<u8> {
    let stride = (width as usize).div_ceil(8);
    let mut out = vec![0; stride * rows.len()];

    for (y, row) in rows.iter().enumerate() {
        for (x, &pixel) in row.iter().enumerate() {
            if pixel {
                out[y * stride + x / 8] |= 0x80 >> (x % 8);
            }
        }
    }

    out
}

fn encode_1d_row(writer: &mut BitWriter, changes: &[u32], width: u32) {
    let mut pos = 0;
    let mut color = Color::White;

    for &change in changes {
        writer.push_run(color, change - pos);
        pos = change;
        color = color.flip();
    }

    writer.push_run(color, width - pos);
}

fn encode_2d_row(writer: &mut BitWriter, changes: &[u32], reference: &[u32], width: u32) {
    let right_of = |list: &[u32], a0: Option<u32>| {
        list.iter()
            .position(|&pos| a0.is_none_or(|a0| pos > a0))
            .unwrap_or(list.len())
    };

    let mut a0 = None;
    let mut color = Color::White;

    while a0.is_none_or(|a0| a0 < width) {
        let i = right_of(changes, a0);
        let a1 = changes.get(i).copied().unwrap_or(width);
        let a2 = changes.get(i + 1).copied().unwrap_or(width);

        // Changes to black sit at even indices.
        let mut j = right_of(reference, a0);

        if (j % 2 == 0) != (color == Color::White) {
            j += 1;
        }

        let b1 = reference.get(j).copied().unwrap_or(width);
        let b2 = reference.get(j + 1).copied().unwrap_or(width);

        if b2 < a1 {
            writer.push_code(&MODE_CODES, MODE_PASS);
            a0 = Some(b2);
        } else if a1.abs_diff(b1) <= 3 {
            let id = MODE_VERTICAL_0 as i64 + a1 as i64 - b1 as i64;
            writer.push_code(&MODE_CODES, id as u32);
            a0 = Some(a1);
            color = color.flip();
        } else {
            writer.push_code(&MODE_CODES, MODE_HORIZONTAL);
            writer.push_run(color, a1 - a0.unwrap_or(0));
            writer.push_run(color.flip(), a2 - a1);
            a0 = Some(a2);
        }
    }
}

/// Encode `rows` of `width` pixels.
///
/// Group 3 data uses a one-dimensional line every fourth row and no fill bits.
pub(crate) fn encode(
    rows: &[Vec<bool>],
    width: u32,
    encoding: EncodingMode,
    rows_are_byte_aligned: bool,
) -> Vec<u8> {
    let mut writer = BitWriter::default();
    let mut reference = Vec::new();

    for (y, row) in rows.iter().enumerate() {
        let changes = changes(row);

        match encoding {
            EncodingMode::Group3_1D => encode_1d_row(&mut writer, &changes, width),
            EncodingMode::Group3_2D(options) => {
                writer.push(12, 0x001);
                let one_dimensional = !options.default_is_2d || y % 4 == 0;

                if options.default_is_2d {
                    writer.push(1, one_dimensional as u16);
                }

                if one_dimensional {
                    encode_1d_row(&mut writer, &changes, width);
                } else {
                    encode_2d_row(&mut writer, &changes, &reference, width);
                }
            }
            EncodingMode::Group4(_) => encode_2d_row(&mut writer, &changes, &reference, width),
        }

        if rows_are_byte_aligned {
            writer.align();
        }

        reference = changes;
    }

    writer.data
}

/// A linear congruential generator for reproducible test images.
pub(crate) struct Lcg(pub(crate) u32);

impl Lcg {
    pub(crate) fn next(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(1_103_515_245).wrapping_add(12345);
        self.0 >> 8
    }
}

/// An image mixing short and long runs, where most rows are small edits of
/// the row above so that all two-dimensional modes show up.
pub(crate) fn random_image(rng: &mut Lcg, width: u32, height: u32) -> Vec<Vec<bool>> {
    let width = width as usize;
    let mut rows: Vec<Vec<bool>> = Vec::new();

    for _ in 0..height {
        let row = match rows.last() {
            Some(prev) if rng.next() % 4 != 0 => {
                let mut row = prev.clone();
                let shift = (rng.next() % 5) as usize;

                if shift < 2 {
                    row.rotate_right(shift + 1);
                } else if shift < 4 {
                    row.rotate_left(shift - 1);
                }

                for _ in 0..rng.next() % 5 {
                    let start = rng.next() as usize % width;
                    let len = 1 + rng.next() as usize % 6;

                    for pixel in row.iter_mut().skip(start).take(len) {
                        *pixel = !*pixel;
                    }
                }

                row
            }
            _ => {
                let mut row = Vec::with_capacity(width);
                let mut black = rng.next() % 2 == 0;

                while row.len() < width {
                    let len = if rng.next() % 10 == 0 {
                        1 + rng.next() % 3000
                    } else {
                        1 + rng.next() % 12
                    };

                    for _ in 0..len.min((width - row.len()) as u32) {
                        row.push(black);
                    }

                    black = !black;
                }

                row
            }
        };

        rows.push(row);
    }

    rows
}

#[cfg(test)]
#[allow(clippy::unusual_byte_groupings)]
mod tests {
    use super::*;

    #[test]
    fn runs_with_makeup_codes() {
        let mut writer = BitWriter::default();
        // 2560 + 2560 + 1728 + 4 for white.
        writer.push_run(Color::White, 6852);

        assert_eq!(
            writer.data,
            // 000000011111 000000011111 010011011 1011
            [0b00000001, 0b1111_0000, 0b00011111, 0b01001101, 0b1_1011_000]
        );
    }

    #[test]
    fn changes_start_from_white() {
        assert_eq!(changes(&[true, true, false, true]), [0, 2, 3]);
        assert!(changes(&[false; 4]).is_empty());
    }
}
