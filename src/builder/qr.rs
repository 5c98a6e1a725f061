use std::ops::Deref;

use crate::common::{
    bit_utils::BitStream,
    iter::EncRegionIter,
    mask::MaskPattern,
    metadata::{
        format_info, Color, ECLevel, Version, FORMAT_INFO_BIT_LEN, FORMAT_INFO_COORDS_MAIN,
        FORMAT_INFO_COORDS_SIDE, VERSION_INFO_BIT_LEN, VERSION_INFO_COORDS_BL,
        VERSION_INFO_COORDS_TR,
    },
};

use super::QRCode;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Version(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

/// Symbol under construction. Owned exclusively by the builder until frozen into a
/// [`QRCode`].
#[derive(Debug, Clone)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl, mask: None }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    #[cfg(test)]
    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|m| m.is_dark()).count()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize + 1);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Version(Color::Dark) => 'v',
                    Module::Version(Color::Light) => 'V',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    // Negative coordinates count from the bottom or right edge
    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "Row {r} out of bounds for width {w}");
        debug_assert!(-w <= c && c < w, "Column {c} out of bounds for width {w}");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r as usize) * self.w + c as usize
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn color(&self, r: i16, c: i16) -> Color {
        *self.get(r, c)
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        let index = self.coord_to_index(r, c);
        self.grid[index] = module;
    }

    /// Freezes the masked symbol. Every module must be set and a mask applied.
    pub fn freeze(self) -> QRCode {
        assert!(!self.grid.contains(&Module::Empty), "Unset module in finished symbol");
        let mask = match self.mask {
            Some(m) => m,
            None => panic!("Symbol frozen before masking"),
        };
        let modules = self.grid.iter().map(|m| m.is_dark()).collect();
        QRCode::new(self.ver, self.ecl, mask, modules)
    }
}

#[cfg(test)]
mod qr_util_tests {
    use super::{Module, QR};
    use crate::common::metadata::{Color, ECLevel, Version};

    fn qr(v: usize) -> QR {
        QR::new(Version::new(v).unwrap(), ECLevel::L)
    }

    #[test]
    fn test_index_wrap() {
        let mut qr = qr(1);
        let w = qr.w as i16;
        qr.set(-1, -1, Module::Func(Color::Dark));
        assert_eq!(qr.get(w - 1, w - 1), Module::Func(Color::Dark));
        qr.set(0, 0, Module::Func(Color::Dark));
        assert_eq!(qr.get(-w, -w), Module::Func(Color::Dark));
        assert_eq!(qr.count_dark_modules(), 2);
    }

    #[test]
    #[should_panic]
    fn test_row_out_of_bound() {
        let qr = qr(1);
        let w = qr.w as i16;
        qr.get(w, 0);
    }

    #[test]
    #[should_panic]
    fn test_col_index_overwrap() {
        let qr = qr(1);
        let w = qr.w as i16;
        qr.get(0, -(w + 1));
    }

    #[test]
    #[should_panic]
    fn test_freeze_unmasked() {
        let mut qr = qr(1);
        qr.grid.fill(Module::Data(Color::Light));
        qr.freeze();
    }
}

// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // Draws the 7x7 pattern centred at (r, c) with its light separator on the
    // sides facing the symbol interior
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_top, dr_bottom): (i16, i16) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_left, dc_right): (i16, i16) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_top..=dr_bottom {
            for j in dc_left..=dc_right {
                let ring = i16::max(i.abs(), j.abs());
                let clr = Color::from(ring != 2 && ring != 4);
                self.set(r + i, c + j, Module::Func(clr));
            }
        }
    }
}

// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let last = self.w as i16 - 9;
        self.draw_line(6, 8, 6, last);
        self.draw_line(8, 6, last, 6);
    }

    // Alternating line starting dark on even indices
    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        if r1 == r2 {
            for j in c1..=c2 {
                self.set(r1, j, Module::Func(Color::from(j & 1 == 0)));
            }
        } else {
            for i in r1..=r2 {
                self.set(i, c1, Module::Func(Color::from(i & 1 == 0)));
            }
        }
    }
}

// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in poses {
            for &c in poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let far = self.w as i16 - 7;
        // Overlaps a finder pattern
        if (r == 6 && (c == 6 || c == far)) || (r == far && c == 6) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                let ring = i16::max(i16::abs(i), i16::abs(j));
                self.set(r + i, c + j, Module::Func(Color::from(ring != 1)));
            }
        }
    }
}

// All function patterns
//------------------------------------------------------------------------------

impl QR {
    pub fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_alignment_patterns();
        self.set(-8, 8, Module::Func(Color::Dark));
    }
}


// Format & version info
//------------------------------------------------------------------------------

impl QR {
    fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    fn draw_format_info(&mut self, info: u32) {
        let (off, on) = (Module::Format(Color::Light), Module::Format(Color::Dark));
        self.draw_number(info, FORMAT_INFO_BIT_LEN, off, on, &FORMAT_INFO_COORDS_MAIN);
        self.draw_number(info, FORMAT_INFO_BIT_LEN, off, on, &FORMAT_INFO_COORDS_SIDE);
    }

    fn draw_version_info(&mut self) {
        if let Some(info) = self.ver.info() {
            let (off, on) = (Module::Version(Color::Light), Module::Version(Color::Dark));
            self.draw_number(info, VERSION_INFO_BIT_LEN, off, on, &VERSION_INFO_COORDS_BL);
            self.draw_number(info, VERSION_INFO_BIT_LEN, off, on, &VERSION_INFO_COORDS_TR);
        }
    }

    // Writes number MSB first along coords
    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        off_clr: Module,
        on_clr: Module,
        coords: &[(i16, i16)],
    ) {
        debug_assert_eq!(coords.len(), bit_len, "Coords don't match bit length");
        let mut mask = 1 << (bit_len - 1);
        for &(r, c) in coords {
            self.set(r, c, if number & mask == 0 { off_clr } else { on_clr });
            mask >>= 1;
        }
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    /// Reserves info areas and places the interleaved codewords in the remaining
    /// modules, followed by light remainder bits.
    pub fn draw_encoding_region(&mut self, payload: &BitStream) {
        self.reserve_format_area();
        self.draw_version_info();

        let free = EncRegionIter::new(self.ver)
            .filter(|&(r, c)| self.get(r, c) == Module::Empty)
            .collect::<Vec<_>>();
        let rem_bits = self.ver.remainder_bits();
        assert_eq!(
            free.len(),
            payload.len() + rem_bits,
            "Encoding region doesn't fit payload: Modules {}, Payload bits {}, Remainder bits {rem_bits}",
            free.len(),
            payload.len()
        );

        let bits = payload.bits().chain(std::iter::repeat(false).take(rem_bits));
        for ((r, c), bit) in free.into_iter().zip(bits) {
            self.set(r, c, Module::Data(Color::from(bit)));
        }
    }

    /// Masks data modules and records the mask in format information.
    pub fn apply_mask(&mut self, pattern: MaskPattern) {
        debug_assert!(self.mask.is_none(), "Symbol is already masked");
        self.mask = Some(pattern);
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if let Module::Data(clr) = self.get(r, c) {
                    if pattern.flips(r, c) {
                        self.set(r, c, Module::Data(!clr));
                    }
                }
            }
        }
        self.draw_format_info(format_info(self.ecl, pattern));
    }
}

#[cfg(test)]
mod encoding_region_tests {
    use super::{Module, QR};
    use crate::common::bit_utils::BitStream;
    use crate::common::mask::MaskPattern;
    use crate::common::metadata::{Color, ECLevel, Version};

    fn prepared(ver: Version, byte: u8) -> QR {
        let len = ver.total_codewords();
        let mut payload = BitStream::new(len << 3);
        payload.extend(&vec![byte; len]);
        let mut qr = QR::new(ver, ECLevel::M);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(&payload);
        qr
    }

    #[test]
    fn test_payload_fills_every_version() {
        for ver in Version::all() {
            let qr = prepared(ver, 0xFF);
            let dbg = qr.to_debug_str();
            assert!(!dbg.contains('.'), "Version {ver} has unset modules");
            // All payload bits are dark, remainder bits light
            assert_eq!(dbg.matches('D').count(), ver.remainder_bits(), "Version {ver}");
            assert_eq!(dbg.matches('d').count(), ver.total_codewords() * 8, "Version {ver}");
        }
    }

    #[test]
    fn test_first_codeword_placement() {
        let mut payload = BitStream::new(26 * 8);
        payload.extend(&[0b10110001]);
        payload.extend(&[0; 25]);
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(&payload);
        let exp = [(20, 20, true), (20, 19, false), (19, 20, true), (19, 19, true)];
        for (r, c, dark) in exp {
            assert_eq!(qr.get(r, c), Module::Data(Color::from(dark)), "Module ({r}, {c})");
        }
        assert_eq!(qr.get(17, 19), Module::Data(Color::Dark));
        assert_eq!(qr.get(16, 20), Module::Data(Color::Light));
    }

    #[test]
    #[should_panic]
    fn test_payload_size_mismatch() {
        let mut payload = BitStream::new(25 * 8);
        payload.extend(&[0; 25]);
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(&payload);
    }

    #[test]
    fn test_apply_mask() {
        let ver = Version::new(1).unwrap();
        let mut qr = prepared(ver, 0);
        qr.apply_mask(MaskPattern::HorizontalLines);
        assert_eq!(qr.mask(), Some(MaskPattern::HorizontalLines));
        for r in 0..21 {
            for c in 0..21 {
                if let Module::Data(clr) = qr.get(r, c) {
                    assert_eq!(clr, Color::from(r & 1 == 0), "Module ({r}, {c})");
                }
            }
        }
        assert!(!qr.to_debug_str().contains('.'));
    }

    #[test]
    fn test_freeze() {
        let ver = Version::new(2).unwrap();
        let mut qr = prepared(ver, 0x5A);
        qr.apply_mask(MaskPattern::Fields);
        let dark = qr.count_dark_modules();
        let code = qr.freeze();
        assert_eq!(code.width(), 25);
        assert_eq!(code.mask(), MaskPattern::Fields);
        assert_eq!(code.ec_level(), ECLevel::M);
        assert_eq!(code.count_dark_modules(), dark);
        assert!(code.is_dark(0, 0));
        assert!(!code.is_dark(7, 7));
        assert!(code.is_dark(17, 8));
    }
}
