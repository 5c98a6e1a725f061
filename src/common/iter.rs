use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

/// Walks every module of the symbol in data placement order: two column wide
/// strips from the right edge, alternating upwards and downwards, stepping over
/// the vertical timing column. Callers skip modules that are already occupied.
pub struct EncRegionIter {
    r: i16,
    c: i16,
    width: i16,
}

const VERT_TIMING_COL: i16 = 6;

impl EncRegionIter {
    pub fn new(version: Version) -> Self {
        let w = version.width() as i16;
        Self { r: w - 1, c: w - 1, width: w }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        if self.c < 0 {
            return None;
        }
        let res = (self.r, self.c);

        // Columns left of the timing column are shifted by one so strips stay paired
        let adjusted_col = if self.c <= VERT_TIMING_COL { self.c + 1 } else { self.c };
        let upward = ((self.width - 1 - adjusted_col) / 2) & 1 == 0;
        let is_right = (self.width - 1 - adjusted_col) & 1 == 0;

        if is_right {
            self.c -= 1;
        } else if upward && self.r > 0 {
            self.r -= 1;
            self.c += 1;
        } else if !upward && self.r < self.width - 1 {
            self.r += 1;
            self.c += 1;
        } else if self.c == VERT_TIMING_COL + 1 {
            self.c -= 2;
        } else {
            self.c -= 1;
        }
        Some(res)
    }
}
