#![no_main]

use bilevel_ccitt::{
    DecodeSettings, EncodingMode, FillOrder, Group3Options, Group4Options, decode,
};
use libfuzzer_sys::fuzz_target;

// Header layout (8 bytes):
// [0..2]  columns (u16 LE)
// [2..4]  rows (u16 LE)
// [4]     encoding_mode (0=Group4, 1=Group3_1D, 2+=Group3_2D)
// [5]     T4/T6 options
// [6]     flags: bit 0 = LSB first, bit 1 = rows_are_byte_aligned,
//         bit 2 = recover_from_errors, bit 3 = short output buffer
// [7]     start_x
// [8..]   CCITT encoded data

const HEADER_SIZE: usize = 8;

fuzz_target!(|data: &[u8]| {
    if data.len() < HEADER_SIZE {
        return;
    }

    let columns = u16::from_le_bytes([data[0], data[1]]).max(1) as u32;
    let rows = u16::from_le_bytes([data[2], data[3]]).max(1) as u32;
    let encoding = match data[4] % 3 {
        0 => EncodingMode::Group4(Group4Options::from_t6_options(data[5] as u32)),
        1 => EncodingMode::Group3_1D,
        _ => EncodingMode::Group3_2D(Group3Options::from_t4_options(data[5] as u32)),
    };
    let flags = data[6];

    let mut settings = DecodeSettings::new(columns, rows, encoding);
    settings.fill_order = if flags & 1 != 0 {
        FillOrder::LsbFirst
    } else {
        FillOrder::MsbFirst
    };
    settings.rows_are_byte_aligned = flags & 2 != 0;
    settings.recover_from_errors = flags & 4 != 0;
    settings.start_x = data[7] as u32;

    let mut len = settings.row_stride() * rows as usize;

    if flags & 8 != 0 {
        len /= 2;
    }

    let mut out = vec![0; len];

    if let Ok(consumed) = decode(&data[HEADER_SIZE..], &settings, &mut out) {
        assert!(consumed <= data.len() - HEADER_SIZE);
    }
});
