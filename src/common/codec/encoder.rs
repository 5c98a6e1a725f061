pub use encode::*;

// Encoder
//------------------------------------------------------------------------------

pub mod encode {
    use std::mem::swap;

    use encoding_rs::SHIFT_JIS;

    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{Mode, Segment, Unit, MODES};
    use crate::common::error::{QRError, QRResult};
    use crate::common::metadata::{ECLevel, Version};

    use super::writer::{pad_remaining_capacity, push_segment, push_terminator};

    /// Lowers raw bytes to units. Every byte is encodable.
    pub fn units_from_bytes(data: &[u8]) -> Vec<Unit> {
        data.iter().copied().map(Unit::Byte).collect()
    }

    /// Lowers text to units. Chars below U+0100 become single Latin-1 bytes, chars
    /// with a Shift JIS double-byte kanji code become kanji units.
    pub fn units_from_text(text: &str) -> QRResult<Vec<Unit>> {
        let mut buf = [0; 4];
        text.chars()
            .map(|c| {
                if let Ok(b) = u8::try_from(c) {
                    return Ok(Unit::Byte(b));
                }
                let (sjis, _, has_err) = SHIFT_JIS.encode(c.encode_utf8(&mut buf));
                let kanji = match (has_err, &sjis[..]) {
                    (false, &[hi, lo]) => Unit::kanji_from_sjis(u16::from_be_bytes([hi, lo])),
                    _ => None,
                };
                kanji.ok_or(QRError::UnsupportedCharacter(c))
            })
            .collect()
    }

    /// Segments and packs the units into the smallest version which can hold them.
    pub fn encode_data(data: &[Unit], ecl: ECLevel) -> QRResult<(BitStream, Version)> {
        let (ver, segs) = find_optimal_version_and_segments(data, ecl)?;
        Ok((write_segments(segs, ver, ecl), ver))
    }

    pub fn encode_data_with_version(
        data: &[Unit],
        ver: Version,
        ecl: ECLevel,
    ) -> QRResult<BitStream> {
        let bcap = ver.data_bit_capacity(ecl);
        let segs = compute_optimal_segments(data, ver);
        let sz: usize = segs.iter().map(|s| s.bit_len()).sum();
        if sz > bcap {
            return Err(QRError::CapacityExceeded);
        }
        Ok(write_segments(segs, ver, ecl))
    }

    fn write_segments(segs: Vec<Segment>, ver: Version, ecl: ECLevel) -> BitStream {
        let mut bs = BitStream::new(ver.data_bit_capacity(ecl));
        for seg in segs {
            push_segment(seg, &mut bs);
        }
        push_terminator(&mut bs);
        pad_remaining_capacity(&mut bs);
        assert_eq!(bs.len(), bs.capacity(), "Padded stream must fill data capacity");
        bs
    }

    fn find_optimal_version_and_segments(
        data: &[Unit],
        ecl: ECLevel,
    ) -> QRResult<(Version, Vec<Segment>)> {
        let mut segs = vec![];
        let mut sz = 0;
        for ver in Version::all() {
            // Char count widths only change at these versions
            if matches!(*ver, 1 | 10 | 27) {
                segs = compute_optimal_segments(data, ver);
                sz = segs.iter().map(|s| s.bit_len()).sum();
            }
            if sz <= ver.data_bit_capacity(ecl) {
                return Ok((ver, segs));
            }
        }
        Err(QRError::DataTooLong)
    }

    // Dynamic programming over units to find the mode sequence with the least bits.
    // Costs are kept in sixths of a bit so partial chunks stay integral.
    fn compute_optimal_segments(data: &[Unit], ver: Version) -> Vec<Segment> {
        if data.is_empty() {
            return vec![];
        }

        let header_cost = |m: Mode| (ver.mode_bits() + ver.char_cnt_bits(m)) * 6;
        let len = data.len();
        let mut prev_cost = MODES.map(header_cost);
        let mut cur_cost = [usize::MAX; 4];
        let mut min_path = vec![[usize::MAX; 4]; len];
        for (i, unit) in data.iter().enumerate() {
            for (j, to_mode) in MODES.iter().enumerate() {
                if !to_mode.contains(unit) {
                    continue;
                }
                for (k, from_mode) in MODES.iter().enumerate() {
                    if prev_cost[k] == usize::MAX {
                        continue;
                    }
                    let mut cost = if to_mode != from_mode {
                        prev_cost[k].div_ceil(6) * 6 + header_cost(*to_mode)
                    } else {
                        prev_cost[k]
                    };
                    cost += to_mode.unit_cost();
                    if cost < cur_cost[j] {
                        cur_cost[j] = cost;
                        min_path[i][j] = k;
                    }
                }
            }
            swap(&mut prev_cost, &mut cur_cost);
            cur_cost.fill(usize::MAX);
        }

        let char_modes = trace_optimal_modes(min_path, prev_cost);
        build_segments(ver, char_modes, data)
    }

    // Backtrack min_path from the cheapest final mode, lowest index on ties
    fn trace_optimal_modes(min_path: Vec<[usize; 4]>, final_cost: [usize; 4]) -> Vec<Mode> {
        let mut mode_index = (0..4).min_by_key(|&i| (final_cost[i], i)).unwrap_or(0);
        let mut modes = Vec::with_capacity(min_path.len());
        for step in min_path.iter().rev() {
            modes.push(MODES[mode_index]);
            mode_index = step[mode_index];
        }
        modes.reverse();
        modes
    }

    // Group runs of equal char mode into segments
    fn build_segments(ver: Version, char_modes: Vec<Mode>, data: &[Unit]) -> Vec<Segment> {
        let mode_bits = ver.mode_bits();
        let mut segs: Vec<Segment> = vec![];
        let mut seg_start = 0;
        for (i, &m) in char_modes.iter().enumerate() {
            let is_last = i + 1 == char_modes.len();
            if is_last || char_modes[i + 1] != m {
                let len_bits = ver.char_cnt_bits(m);
                segs.push(Segment::new(m, mode_bits, len_bits, &data[seg_start..=i]));
                seg_start = i + 1;
            }
        }
        segs
    }

}

// Writer for encoded data
//------------------------------------------------------------------------------

pub(super) mod writer {
    use crate::common::bit_utils::BitStream;
    use crate::common::codec::{Mode, Segment, Unit, PADDING_CODEWORDS};

    pub fn push_segment(seg: Segment, out: &mut BitStream) {
        push_header(&seg, out);
        push_data(seg.mode, seg.data, out);
    }

    fn push_header(seg: &Segment, out: &mut BitStream) {
        out.push_bits(seg.mode as u8, seg.mode_bits);
        let char_cnt = seg.data.len();
        debug_assert!(
            char_cnt < (1 << seg.len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {}",
            seg.len_bits
        );
        out.push_bits(char_cnt as u16, seg.len_bits);
    }

    fn push_data(mode: Mode, data: &[Unit], out: &mut BitStream) {
        for chunk in data.chunks(mode.chunk_len()) {
            let bits = mode.encode_chunk(chunk);
            out.push_bits(bits, mode.chunk_bits(chunk.len()));
        }
    }

    pub fn push_terminator(out: &mut BitStream) {
        let term_len = std::cmp::min(4, out.remaining());
        out.push_bits(0u8, term_len);
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            out.push_bits(0u8, 8 - offset);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        debug_assert!(
            out.len() & 7 == 0,
            "Bit offset should be zero before padding codewords: {}",
            out.len() & 7
        );

        let remain_byte_capacity = out.remaining() >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }

    #[cfg(test)]
    mod writer_tests {
        use test_case::test_case;

        use super::{
            push_data, push_header, push_padding_bits, push_padding_codewords, push_terminator,
            Mode, Segment, Unit, PADDING_CODEWORDS,
        };
        use crate::common::bit_utils::BitStream;
        use crate::common::metadata::{ECLevel, Version};

        fn units(s: &str) -> Vec<Unit> {
            s.bytes().map(Unit::Byte).collect()
        }

        // Header with the largest char count each field width can hold
        #[test_case(1, Mode::Numeric, 1023, vec![0b00011111, 0b11111100])]
        #[test_case(1, Mode::Alphanumeric, 511, vec![0b00101111, 0b11111000])]
        #[test_case(1, Mode::Byte, 255, vec![0b01001111, 0b11110000])]
        #[test_case(1, Mode::Kanji, 255, vec![0b10001111, 0b11110000])]
        #[test_case(10, Mode::Numeric, 4095, vec![0b00011111, 0b11111111])]
        #[test_case(10, Mode::Alphanumeric, 2047, vec![0b00101111, 0b11111110])]
        #[test_case(10, Mode::Byte, 65535, vec![0b01001111, 0b11111111, 0b11110000])]
        #[test_case(27, Mode::Numeric, 16383, vec![0b00011111, 0b11111111, 0b11000000])]
        #[test_case(27, Mode::Alphanumeric, 8191, vec![0b00101111, 0b11111111, 0b10000000])]
        #[test_case(27, Mode::Kanji, 4095, vec![0b10001111, 0b11111111])]
        fn test_push_header(v: usize, mode: Mode, cnt: usize, exp: Vec<u8>) {
            let ver = Version::new(v).unwrap();
            let dummy = vec![Unit::Byte(0); cnt];
            let mut bs = BitStream::new(ver.data_bit_capacity(ECLevel::L));
            let seg = Segment::new(mode, ver.mode_bits(), ver.char_cnt_bits(mode), &dummy);
            push_header(&seg, &mut bs);
            assert_eq!(bs.data(), exp);
        }

        #[test]
        fn test_push_numeric_data() {
            let mut bs = BitStream::new(152);
            push_data(Mode::Numeric, &units("01234567"), &mut bs);
            assert_eq!(bs.data(), vec![0b00000011, 0b00010101, 0b10011000, 0b01100000]);
            let mut bs = BitStream::new(152);
            push_data(Mode::Numeric, &units("8"), &mut bs);
            assert_eq!(bs.data(), vec![0b10000000]);
        }

        #[test]
        fn test_push_alphanumeric_data() {
            let mut bs = BitStream::new(152);
            push_data(Mode::Alphanumeric, &units("AC-42"), &mut bs);
            assert_eq!(bs.data(), vec![0b00111001, 0b11011100, 0b11100100, 0b00100000])
        }

        #[test]
        fn test_push_byte_data() {
            let mut bs = BitStream::new(152);
            push_data(Mode::Byte, &units("a"), &mut bs);
            assert_eq!(bs.data(), vec![0b01100001])
        }

        #[test]
        fn test_push_kanji_data() {
            let mut bs = BitStream::new(152);
            push_data(Mode::Kanji, &[Unit::Kanji(0xD9F), Unit::Kanji(0x1AAA)], &mut bs);
            // 0110110011111 1101010101010
            assert_eq!(bs.data(), vec![0b01101100, 0b11111110, 0b10101010, 0b10000000]);
            assert_eq!(bs.len(), 26);
        }

        #[test]
        fn test_push_terminator() {
            let bit_capacity = 152;
            let mut bs = BitStream::new(bit_capacity);
            bs.push_bits(0b1u8, 1);
            push_terminator(&mut bs);
            assert_eq!(bs.data(), vec![0b10000000]);
            assert_eq!(bs.len(), 5);
            while bs.remaining() > 2 {
                bs.push(true);
            }
            push_terminator(&mut bs);
            assert_eq!(bs.len(), bit_capacity);
        }

        #[test]
        fn test_push_padding_bits() {
            let mut bs = BitStream::new(152);
            bs.push_bits(1u8, 1);
            push_padding_bits(&mut bs);
            assert_eq!(bs.data(), vec![0b10000000]);
            assert_eq!(bs.len() & 7, 0);
        }

        #[test]
        fn test_push_padding_codewords() {
            let mut bs = BitStream::new(152);
            bs.push_bits(1u8, 1);
            push_padding_bits(&mut bs);
            push_padding_codewords(&mut bs);
            let mut output = vec![0b10000000];
            output.extend(PADDING_CODEWORDS.iter().cycle().take(18));
            assert_eq!(bs.data(), output);
        }
    }
}
