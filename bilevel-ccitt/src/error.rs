//! Error types for CCITT fax decoding.

use crate::Color;
use core::fmt;

/// The error type for CCITT decoding operations.
///
/// All variants describe problems with the data being decoded, never misuse of
/// the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// A run-length code was not found in the code tables.
    InvalidCode,
    /// An end-of-line pattern appeared where a run of the given color was
    /// expected.
    UnexpectedEndOfLine(Color),
    /// The first scanline of a Group 3 two-dimensional stream was tagged as
    /// two-dimensional.
    FirstScanlineMustBeOneDimensional,
    /// The TIFF fill order tag was neither 1 nor 2.
    InvalidFillOrder(u16),
    /// Non-zero bits were found where fill bits before an EOL were expected.
    MalformedFillBitsBeforeEol,
    /// A Group 3 scanline did not start with an end-of-line code.
    MissingEndOfLine,
    /// An unknown or unsupported two-dimensional mode code.
    InvalidTwoDimensionalModeCode,
    /// A pixel write fell outside the output buffer.
    BufferOverrun,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCode => write!(f, "invalid code encountered"),
            Self::UnexpectedEndOfLine(Color::White) => {
                write!(f, "EOL code word encountered in white run")
            }
            Self::UnexpectedEndOfLine(Color::Black) => {
                write!(f, "EOL code word encountered in black run")
            }
            Self::FirstScanlineMustBeOneDimensional => {
                write!(f, "first scanline must be 1D encoded")
            }
            Self::InvalidFillOrder(v) => {
                write!(f, "fill order must be either 1 or 2, got {v}")
            }
            Self::MalformedFillBitsBeforeEol => {
                write!(f, "all fill bits preceding EOL code must be 0")
            }
            Self::MissingEndOfLine => write!(f, "scanline must begin with EOL code word"),
            Self::InvalidTwoDimensionalModeCode => {
                write!(f, "invalid code encountered while decoding 2D data")
            }
            Self::BufferOverrun => write!(f, "write outside of the output buffer"),
        }
    }
}

impl core::error::Error for DecodeError {}

/// Result type for CCITT decoding operations.
pub type Result<T> = core::result::Result<T, DecodeError>;
