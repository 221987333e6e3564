//! The ITU-T T.4 code assignments and the lookup tables built from them.
//!
//! Every table is indexed by a fixed number of upcoming bits. An entry tells
//! how many of those bits the code actually occupies, so the reader can give
//! back the rest after a lookup.

/// A packed code table entry.
///
/// Layout: `run << 8 | terminating << 7 | kind << 4 | length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Entry(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    /// No code starts with this bit pattern.
    Invalid,
    /// A run length (or mode id for the mode table).
    Run,
    /// An extended make-up code shared by both colors. Continue in
    /// [`EXTENDED_MAKEUP`] with bits 9-12 of the code.
    Extension,
    /// The start of an end-of-line code.
    EndOfLine,
    /// The code is longer than this table's index.
    Prefix,
}

impl Entry {
    const INVALID: Self = Self::special(Kind::Invalid, 0);

    const fn run(run: u16, length: u8, terminating: bool) -> Self {
        Self(((run as u32) << 8) | ((terminating as u32) << 7) | (1 << 4) | length as u32)
    }

    const fn special(kind: Kind, length: u8) -> Self {
        let kind = match kind {
            Kind::Invalid => 0,
            Kind::Run => 1,
            Kind::Extension => 2,
            Kind::EndOfLine => 3,
            Kind::Prefix => 4,
        };

        Self((kind << 4) | length as u32)
    }

    #[inline(always)]
    pub(crate) fn kind(self) -> Kind {
        match (self.0 >> 4) & 0x7 {
            1 => Kind::Run,
            2 => Kind::Extension,
            3 => Kind::EndOfLine,
            4 => Kind::Prefix,
            _ => Kind::Invalid,
        }
    }

    /// The run length, or the mode id.
    #[inline(always)]
    pub(crate) fn value(self) -> u32 {
        self.0 >> 8
    }

    /// The number of index bits that belong to the code.
    #[inline(always)]
    pub(crate) fn length(self) -> u8 {
        (self.0 & 0xF) as u8
    }

    #[inline(always)]
    pub(crate) fn is_terminating(self) -> bool {
        self.0 & 0x80 != 0
    }
}

/// The end-of-line code, `000000000001`.
pub(crate) const EOL: u32 = 0x001;

/// Mode ids stored in [`MODE`]. Vertical modes are stored as `VERTICAL_0 + k`.
pub(crate) const MODE_PASS: u32 = 0;
pub(crate) const MODE_HORIZONTAL: u32 = 1;
pub(crate) const MODE_VERTICAL_0: u32 = 5;

/// Selector bits following the `0000001` extension prefix that enter
/// uncompressed mode (`0000001111`).
pub(crate) const UNCOMPRESSED_ENTRANCE: u32 = 0b111;

/// Table 2/T.4 - White terminating codes.
pub(crate) const WHITE_TERMINATING: [(u16, u8, u16); 64] = [
    (0, 8, 0b00110101),
    (1, 6, 0b000111),
    (2, 4, 0b0111),
    (3, 4, 0b1000),
    (4, 4, 0b1011),
    (5, 4, 0b1100),
    (6, 4, 0b1110),
    (7, 4, 0b1111),
    (8, 5, 0b10011),
    (9, 5, 0b10100),
    (10, 5, 0b00111),
    (11, 5, 0b01000),
    (12, 6, 0b001000),
    (13, 6, 0b000011),
    (14, 6, 0b110100),
    (15, 6, 0b110101),
    (16, 6, 0b101010),
    (17, 6, 0b101011),
    (18, 7, 0b0100111),
    (19, 7, 0b0001100),
    (20, 7, 0b0001000),
    (21, 7, 0b0010111),
    (22, 7, 0b0000011),
    (23, 7, 0b0000100),
    (24, 7, 0b0101000),
    (25, 7, 0b0101011),
    (26, 7, 0b0010011),
    (27, 7, 0b0100100),
    (28, 7, 0b0011000),
    (29, 8, 0b00000010),
    (30, 8, 0b00000011),
    (31, 8, 0b00011010),
    (32, 8, 0b00011011),
    (33, 8, 0b00010010),
    (34, 8, 0b00010011),
    (35, 8, 0b00010100),
    (36, 8, 0b00010101),
    (37, 8, 0b00010110),
    (38, 8, 0b00010111),
    (39, 8, 0b00101000),
    (40, 8, 0b00101001),
    (41, 8, 0b00101010),
    (42, 8, 0b00101011),
    (43, 8, 0b00101100),
    (44, 8, 0b00101101),
    (45, 8, 0b00000100),
    (46, 8, 0b00000101),
    (47, 8, 0b00001010),
    (48, 8, 0b00001011),
    (49, 8, 0b01010010),
    (50, 8, 0b01010011),
    (51, 8, 0b01010100),
    (52, 8, 0b01010101),
    (53, 8, 0b00100100),
    (54, 8, 0b00100101),
    (55, 8, 0b01011000),
    (56, 8, 0b01011001),
    (57, 8, 0b01011010),
    (58, 8, 0b01011011),
    (59, 8, 0b01001010),
    (60, 8, 0b01001011),
    (61, 8, 0b00110010),
    (62, 8, 0b00110011),
    (63, 8, 0b00110100),
];

/// Table 3/T.4 - White make-up codes.
pub(crate) const WHITE_MAKEUP: [(u16, u8, u16); 27] = [
    (64, 5, 0b11011),
    (128, 5, 0b10010),
    (192, 6, 0b010111),
    (256, 7, 0b0110111),
    (320, 8, 0b00110110),
    (384, 8, 0b00110111),
    (448, 8, 0b01100100),
    (512, 8, 0b01100101),
    (576, 8, 0b01101000),
    (640, 8, 0b01100111),
    (704, 9, 0b011001100),
    (768, 9, 0b011001101),
    (832, 9, 0b011010010),
    (896, 9, 0b011010011),
    (960, 9, 0b011010100),
    (1024, 9, 0b011010101),
    (1088, 9, 0b011010110),
    (1152, 9, 0b011010111),
    (1216, 9, 0b011011000),
    (1280, 9, 0b011011001),
    (1344, 9, 0b011011010),
    (1408, 9, 0b011011011),
    (1472, 9, 0b010011000),
    (1536, 9, 0b010011001),
    (1600, 9, 0b010011010),
    (1664, 6, 0b011000),
    (1728, 9, 0b010011011),
];

/// Table 2/T.4 - Black terminating codes.
pub(crate) const BLACK_TERMINATING: [(u16, u8, u16); 64] = [
    (0, 10, 0b0000110111),
    (1, 3, 0b010),
    (2, 2, 0b11),
    (3, 2, 0b10),
    (4, 3, 0b011),
    (5, 4, 0b0011),
    (6, 4, 0b0010),
    (7, 5, 0b00011),
    (8, 6, 0b000101),
    (9, 6, 0b000100),
    (10, 7, 0b0000100),
    (11, 7, 0b0000101),
    (12, 7, 0b0000111),
    (13, 8, 0b00000100),
    (14, 8, 0b00000111),
    (15, 9, 0b000011000),
    (16, 10, 0b0000010111),
    (17, 10, 0b0000011000),
    (18, 10, 0b0000001000),
    (19, 11, 0b00001100111),
    (20, 11, 0b00001101000),
    (21, 11, 0b00001101100),
    (22, 11, 0b00000110111),
    (23, 11, 0b00000101000),
    (24, 11, 0b00000010111),
    (25, 11, 0b00000011000),
    (26, 12, 0b000011001010),
    (27, 12, 0b000011001011),
    (28, 12, 0b000011001100),
    (29, 12, 0b000011001101),
    (30, 12, 0b000001101000),
    (31, 12, 0b000001101001),
    (32, 12, 0b000001101010),
    (33, 12, 0b000001101011),
    (34, 12, 0b000011010010),
    (35, 12, 0b000011010011),
    (36, 12, 0b000011010100),
    (37, 12, 0b000011010101),
    (38, 12, 0b000011010110),
    (39, 12, 0b000011010111),
    (40, 12, 0b000001101100),
    (41, 12, 0b000001101101),
    (42, 12, 0b000011011010),
    (43, 12, 0b000011011011),
    (44, 12, 0b000001010100),
    (45, 12, 0b000001010101),
    (46, 12, 0b000001010110),
    (47, 12, 0b000001010111),
    (48, 12, 0b000001100100),
    (49, 12, 0b000001100101),
    (50, 12, 0b000001010010),
    (51, 12, 0b000001010011),
    (52, 12, 0b000000100100),
    (53, 12, 0b000000110111),
    (54, 12, 0b000000111000),
    (55, 12, 0b000000100111),
    (56, 12, 0b000000101000),
    (57, 12, 0b000001011000),
    (58, 12, 0b000001011001),
    (59, 12, 0b000000101011),
    (60, 12, 0b000000101100),
    (61, 12, 0b000001011010),
    (62, 12, 0b000001100110),
    (63, 12, 0b000001100111),
];

/// Table 3/T.4 - Black make-up codes.
pub(crate) const BLACK_MAKEUP: [(u16, u8, u16); 27] = [
    (64, 10, 0b0000001111),
    (128, 12, 0b000011001000),
    (192, 12, 0b000011001001),
    (256, 12, 0b000001011011),
    (320, 12, 0b000000110011),
    (384, 12, 0b000000110100),
    (448, 12, 0b000000110101),
    (512, 13, 0b0000001101100),
    (576, 13, 0b0000001101101),
    (640, 13, 0b0000001001010),
    (704, 13, 0b0000001001011),
    (768, 13, 0b0000001001100),
    (832, 13, 0b0000001001101),
    (896, 13, 0b0000001110010),
    (960, 13, 0b0000001110011),
    (1024, 13, 0b0000001110100),
    (1088, 13, 0b0000001110101),
    (1152, 13, 0b0000001110110),
    (1216, 13, 0b0000001110111),
    (1280, 13, 0b0000001010010),
    (1344, 13, 0b0000001010011),
    (1408, 13, 0b0000001010100),
    (1472, 13, 0b0000001010101),
    (1536, 13, 0b0000001011010),
    (1600, 13, 0b0000001011011),
    (1664, 13, 0b0000001100100),
    (1728, 13, 0b0000001100101),
];

/// Table 3/T.4 - Common make-up codes.
pub(crate) const COMMON_MAKEUP: [(u16, u8, u16); 13] = [
    (1792, 11, 0b00000001000),
    (1856, 11, 0b00000001100),
    (1920, 11, 0b00000001101),
    (1984, 12, 0b000000010010),
    (2048, 12, 0b000000010011),
    (2112, 12, 0b000000010100),
    (2176, 12, 0b000000010101),
    (2240, 12, 0b000000010110),
    (2304, 12, 0b000000010111),
    (2368, 12, 0b000000011100),
    (2432, 12, 0b000000011101),
    (2496, 12, 0b000000011110),
    (2560, 12, 0b000000011111),
];

/// Table 4/T.4 - Mode codes, as (mode id, length, code).
pub(crate) const MODE_CODES: [(u16, u8, u16); 9] = [
    (0, 4, 0b0001),    // Pass
    (1, 3, 0b001),     // Horizontal
    (2, 7, 0b0000010), // Vertical_L3
    (3, 6, 0b000010),  // Vertical_L2
    (4, 3, 0b010),     // Vertical_L1
    (5, 1, 0b1),       // Vertical_0
    (6, 3, 0b011),     // Vertical_R1
    (7, 6, 0b000011),  // Vertical_R2
    (8, 7, 0b0000011), // Vertical_R3
];

/// Store every code of `codes` that starts with `prefix` and fits into the
/// `index_bits` bits following it.
///
/// `terminating` marks codes below 64 as terminating, which is right for run
/// codes and irrelevant for mode codes.
const fn fill<const N: usize, const M: usize>(
    mut table: [Entry; N],
    index_bits: u8,
    prefix: u16,
    prefix_len: u8,
    codes: &[(u16, u8, u16); M],
) -> [Entry; N] {
    let mut i = 0;

    while i < M {
        let (value, length, code) = codes[i];
        i += 1;

        if length <= prefix_len || length - prefix_len > index_bits {
            continue;
        }

        let rest_len = length - prefix_len;

        if code >> rest_len != prefix {
            continue;
        }

        let rest = (code & ((1 << rest_len) - 1)) as usize;
        let free = index_bits - rest_len;
        let start = rest << free;
        let mut j = 0;

        while j < (1 << free) {
            table[start + j] = Entry::run(value, rest_len, value < 64);
            j += 1;
        }
    }

    table
}

const fn mark<const N: usize>(
    mut table: [Entry; N],
    from: usize,
    to: usize,
    entry: Entry,
) -> [Entry; N] {
    let mut i = from;

    while i < to {
        table[i] = entry;
        i += 1;
    }

    table
}

/// White runs, indexed by the next 10 bits.
pub(crate) const WHITE: [Entry; 1024] = {
    let table = [Entry::INVALID; 1024];
    let table = fill(table, 10, 0, 0, &WHITE_TERMINATING);
    let table = fill(table, 10, 0, 0, &WHITE_MAKEUP);
    // `0000000000` can only be the start of an EOL, `0000000001`-`0000000011`
    // are not assigned.
    let table = mark(table, 0, 1, Entry::special(Kind::EndOfLine, 10));
    // `00000001xx`: the first 8 bits of an extended make-up code.
    mark(table, 4, 8, Entry::special(Kind::Extension, 8))
};

/// Black runs, indexed by the next 4 bits.
///
/// Codes starting with `0000` continue in [`BLACK_LONG`], codes starting with
/// `0001` in [`BLACK_MID`].
pub(crate) const BLACK_SHORT: [Entry; 16] = {
    let table = [Entry::INVALID; 16];
    let table = fill(table, 4, 0, 0, &BLACK_TERMINATING);
    mark(table, 0, 2, Entry::special(Kind::Prefix, 4))
};

/// Black runs starting with `0001`, indexed by the 2 bits after the prefix.
pub(crate) const BLACK_MID: [Entry; 4] = fill([Entry::INVALID; 4], 2, 0b0001, 4, &BLACK_TERMINATING);

/// Black runs starting with `0000`, indexed by the 9 bits after the prefix.
pub(crate) const BLACK_LONG: [Entry; 512] = {
    let table = [Entry::INVALID; 512];
    let table = fill(table, 9, 0, 4, &BLACK_TERMINATING);
    let table = fill(table, 9, 0, 4, &BLACK_MAKEUP);
    // `0000 00000001x`: EOL.
    let table = mark(table, 2, 4, Entry::special(Kind::EndOfLine, 8));
    // `0000 0001xxxxx`: extended make-up code.
    mark(table, 32, 64, Entry::special(Kind::Extension, 4))
};

/// Extended make-up codes (`00000001` + 3 or 4 bits), indexed by the 4 bits
/// after the common prefix.
pub(crate) const EXTENDED_MAKEUP: [Entry; 16] =
    fill([Entry::INVALID; 16], 4, 0b00000001, 8, &COMMON_MAKEUP);

/// Two-dimensional mode codes, indexed by the next 7 bits.
pub(crate) const MODE: [Entry; 128] = {
    let table = fill([Entry::INVALID; 128], 7, 0, 0, &MODE_CODES);
    // `0000001`: extension codes, including the uncompressed mode entrance.
    mark(table, 1, 2, Entry::special(Kind::Extension, 7))
};
