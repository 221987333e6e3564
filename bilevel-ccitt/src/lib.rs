/*!
A memory-safe, pure-Rust CCITT Group 3 and Group 4 fax decoder.

`bilevel-ccitt` decodes bi-level images compressed with the schemes of ITU-T
T.4 and T.6, as they appear in TIFF files (compression 2, 3 and 4) and in
PDF `CCITTFaxDecode` streams:

- Modified Huffman (one-dimensional, [`EncodingMode::Group3_1D`]),
- Modified READ (Group 3 two-dimensional, [`EncodingMode::Group3_2D`]),
- Modified Modified READ (Group 4, [`EncodingMode::Group4`]).

Locating the compressed data and its parameters in the container is up to the
caller.

The decoded image has one bit per pixel, 1 for black, with the most
significant bit first and every row starting on a new byte.

# Example
```rust,no_run
use bilevel_ccitt::{DecodeSettings, EncodingMode, Group4Options, decode_to_vec};

let data = std::fs::read("page.g4").unwrap();
let settings = DecodeSettings::new(1728, 2200, EncodingMode::Group4(Group4Options::default()));
let bitmap = decode_to_vec(&data, &settings).unwrap();

assert_eq!(bitmap.len(), settings.row_stride() * 2200);
```

# Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![forbid(unsafe_code)]

mod bit_reader;
mod bitmap;
mod decode;
#[cfg(test)]
mod encode;
mod error;
mod run;
mod tables;
mod transitions;

use decode::Session;

pub use error::{DecodeError, Result};

/// The color of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// A white run (bit value 0 in the output).
    White,
    /// A black run (bit value 1 in the output).
    Black,
}

impl Color {
    /// The other color.
    #[inline(always)]
    pub fn flip(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

/// The order of the bits within each byte of the compressed data.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FillOrder {
    /// The first pixel is stored in the most significant bit (TIFF `FillOrder` 1).
    #[default]
    MsbFirst,
    /// The first pixel is stored in the least significant bit (TIFF `FillOrder` 2).
    LsbFirst,
}

impl FillOrder {
    /// Interpret the value of the TIFF `FillOrder` tag.
    pub fn from_tiff_tag(value: u16) -> Result<Self> {
        match value {
            1 => Ok(Self::MsbFirst),
            2 => Ok(Self::LsbFirst),
            _ => Err(DecodeError::InvalidFillOrder(value)),
        }
    }
}

/// Options for Group 3 data.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Group3Options {
    /// Whether lines may be two-dimensionally coded. Each EOL is then
    /// followed by a tag bit selecting the coding of the next line.
    pub default_is_2d: bool,
    /// Whether uncompressed mode may be used.
    pub uncompressed_mode: bool,
    /// Whether EOLs are padded with zeros so that they end on a byte boundary.
    pub fill_bits_before_eol: bool,
}

impl Group3Options {
    /// Interpret the value of the TIFF `T4Options` tag.
    pub fn from_t4_options(value: u32) -> Self {
        Self {
            default_is_2d: value & 0b001 != 0,
            uncompressed_mode: value & 0b010 != 0,
            fill_bits_before_eol: value & 0b100 != 0,
        }
    }
}

/// Options for Group 4 data.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Group4Options {
    /// Whether uncompressed mode may be used.
    pub uncompressed_mode: bool,
}

impl Group4Options {
    /// Interpret the value of the TIFF `T6Options` tag.
    pub fn from_t6_options(value: u32) -> Self {
        Self {
            uncompressed_mode: value & 0b010 != 0,
        }
    }
}

/// The encoding mode for CCITT fax decoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EncodingMode {
    /// Group 3 1D (MH) - Pure 1D encoding without EOL codes.
    /// TIFF compression 2.
    Group3_1D,
    /// Group 3 (MR) - Lines introduced by EOL codes, optionally followed by a
    /// tag bit selecting 1D or 2D coding.
    /// TIFF compression 3, PDF K >= 0.
    Group3_2D(Group3Options),
    /// Group 4 (MMR) - Pure 2D encoding, no EOL codes.
    /// TIFF compression 4, PDF K < 0.
    Group4(Group4Options),
}

/// Settings for a decode call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DecodeSettings {
    /// The width of the image in pixels.
    pub columns: u32,
    /// The number of rows to decode.
    pub rows: u32,
    /// The bit order of the compressed data.
    pub fill_order: FillOrder,
    /// The coding scheme of the compressed data.
    pub encoding: EncodingMode,
    /// The pixel at which decoding starts on every row. Pixels before it are
    /// white.
    pub start_x: u32,
    /// Whether every row of Group 3 1D or Group 4 data starts on a byte
    /// boundary.
    pub rows_are_byte_aligned: bool,
    /// Drop black pixels that fall outside the output buffer instead of
    /// failing with [`DecodeError::BufferOverrun`].
    pub recover_from_errors: bool,
}

impl DecodeSettings {
    /// Create settings with the defaults for the given encoding.
    ///
    /// Rows are byte aligned for [`EncodingMode::Group3_1D`], which matches TIFF
    /// compression 2.
    pub fn new(columns: u32, rows: u32, encoding: EncodingMode) -> Self {
        Self {
            columns,
            rows,
            fill_order: FillOrder::MsbFirst,
            encoding,
            start_x: 0,
            rows_are_byte_aligned: matches!(encoding, EncodingMode::Group3_1D),
            recover_from_errors: false,
        }
    }

    /// The number of bytes per row in the decoded image.
    pub fn row_stride(&self) -> usize {
        (self.columns as usize).div_ceil(8)
    }
}

/// Decode CCITT data into `out` and return the number of bytes of `data` that
/// were read.
///
/// Only black pixels are written, so `out` should be zeroed. It needs to hold
/// `settings.rows` rows of [`DecodeSettings::row_stride`] bytes each.
pub fn decode(data: &[u8], settings: &DecodeSettings, out: &mut [u8]) -> Result<usize> {
    let consumed = Session::new(data, settings, out).run()?;

    Ok(consumed.min(data.len()))
}

/// Decode CCITT data into a newly allocated buffer.
pub fn decode_to_vec(data: &[u8], settings: &DecodeSettings) -> Result<Vec<u8>> {
    let mut out = vec![0; settings.row_stride() * settings.rows as usize];
    decode(data, settings, &mut out)?;

    Ok(out)
}
