// Unit
//------------------------------------------------------------------------------

/// Smallest encodable piece of input. Text is lowered to a sequence of units
/// before segmentation: Latin-1 bytes, or Shift JIS double-byte kanji already
/// compacted to their 13-bit value.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Unit {
    Byte(u8),
    Kanji(u16),
}

impl Unit {
    /// Compacts a Shift JIS double-byte code into a 13-bit kanji value. Returns
    /// None if the code lies outside the kanji ranges.
    pub fn kanji_from_sjis(code: u16) -> Option<Self> {
        let offset = match code {
            0x8140..=0x9FFC => 0x8140,
            0xE040..=0xEBBF => 0xC140,
            _ => return None,
        };
        let trail = code & 0xFF;
        if trail < 0x40 || trail == 0x7F || trail > 0xFC {
            return None;
        }
        let diff = code - offset;
        Some(Self::Kanji((diff >> 8) * 0xC0 + (diff & 0xFF)))
    }
}


// Mode
//------------------------------------------------------------------------------

/// Segment encoding mode. Discriminant is the 4-bit mode indicator.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
    Kanji = 0b1000,
}

impl Mode {
    #[inline]
    fn numeric_digit(char: u8) -> u16 {
        debug_assert!(char.is_ascii_digit(), "Invalid numeric data: {char}");
        (char - b'0') as u16
    }

    #[inline]
    fn alphanumeric_digit(char: u8) -> u16 {
        match char {
            b'0'..=b'9' => (char - b'0') as u16,
            b'A'..=b'Z' => (char - b'A' + 10) as u16,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => unreachable!("Invalid alphanumeric {char}"),
        }
    }

    #[inline]
    fn byte(unit: &Unit) -> u8 {
        match unit {
            Unit::Byte(b) => *b,
            Unit::Kanji(_) => unreachable!("Kanji unit in single byte mode"),
        }
    }

    /// Packs a chunk of units into its codeword value. Chunks are at most 3 digits
    /// in numeric mode, 2 chars in alphanumeric mode and a single unit otherwise.
    pub fn encode_chunk(&self, data: &[Unit]) -> u16 {
        let len = data.len();
        match self {
            Self::Numeric => {
                debug_assert!(len <= 3, "Data is too long for numeric conversion: {len}");
                data.iter().fold(0_u16, |n, u| n * 10 + Self::numeric_digit(Self::byte(u)))
            }
            Self::Alphanumeric => {
                debug_assert!(len <= 2, "Data is too long for alphanumeric conversion: {len}");
                data.iter().fold(0_u16, |n, u| n * 45 + Self::alphanumeric_digit(Self::byte(u)))
            }
            Self::Byte => {
                debug_assert!(len == 1, "Data is too long for byte conversion: {len}");
                Self::byte(&data[0]) as u16
            }
            Self::Kanji => {
                debug_assert!(len == 1, "Data is too long for kanji conversion: {len}");
                match data[0] {
                    Unit::Kanji(k) => k,
                    Unit::Byte(b) => unreachable!("Byte {b} in kanji mode"),
                }
            }
        }
    }

    /// Bit length of a chunk of `len` units produced by [`Mode::encode_chunk`].
    pub fn chunk_bits(&self, len: usize) -> usize {
        match self {
            Self::Numeric => [0, 4, 7, 10][len],
            Self::Alphanumeric => [0, 6, 11][len],
            Self::Byte => 8,
            Self::Kanji => 13,
        }
    }

    pub fn chunk_len(&self) -> usize {
        match self {
            Self::Numeric => 3,
            Self::Alphanumeric => 2,
            Self::Byte | Self::Kanji => 1,
        }
    }

    pub fn contains(&self, unit: &Unit) -> bool {
        match (self, unit) {
            (Self::Numeric, Unit::Byte(b)) => b.is_ascii_digit(),
            (Self::Alphanumeric, Unit::Byte(b)) => {
                matches!(b, b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':')
            }
            (Self::Byte, Unit::Byte(_)) => true,
            (Self::Kanji, Unit::Kanji(_)) => true,
            _ => false,
        }
    }

    /// Payload bit length of `len` units, excluding segment header.
    pub fn encoded_len(&self, len: usize) -> usize {
        match *self {
            Self::Numeric => (len * 10).div_ceil(3),
            Self::Alphanumeric => (len * 11).div_ceil(2),
            Self::Byte => len * 8,
            Self::Kanji => len * 13,
        }
    }

    /// Per unit cost in sixths of a bit, used by segmentation.
    pub(crate) fn unit_cost(&self) -> usize {
        match self {
            Self::Numeric => 20,
            Self::Alphanumeric => 33,
            Self::Byte => 48,
            Self::Kanji => 78,
        }
    }
}


// Segment
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment<'a> {
    pub mode: Mode,
    pub mode_bits: usize,  // Bit len of mode
    pub len_bits: usize,   // Bit len of char count
    pub data: &'a [Unit], // Units covered by the segment
}

impl<'a> Segment<'a> {
    pub fn new(mode: Mode, mode_bits: usize, len_bits: usize, data: &'a [Unit]) -> Self {
        Self { mode, mode_bits, len_bits, data }
    }

    pub fn bit_len(&self) -> usize {
        let encoded_bits = self.mode.encoded_len(self.data.len());
        self.mode_bits + self.len_bits + encoded_bits
    }
}


// Global constants
//------------------------------------------------------------------------------

pub static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

pub static MODES: [Mode; 4] = [Mode::Numeric, Mode::Alphanumeric, Mode::Byte, Mode::Kanji];
