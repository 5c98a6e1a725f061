use crate::common::{
    mask::MaskPattern,
    metadata::{ECLevel, Version},
};

/// A finished, masked QR symbol. Module (0, 0) is the top left corner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QRCode {
    ver: Version,
    ecl: ECLevel,
    mask: MaskPattern,
    w: usize,
    modules: Vec<bool>,
}

impl QRCode {
    pub(crate) fn new(ver: Version, ecl: ECLevel, mask: MaskPattern, modules: Vec<bool>) -> Self {
        let w = ver.width();
        debug_assert_eq!(modules.len(), w * w, "Module count doesn't match version {ver}");
        Self { ver, ecl, mask, w, modules }
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> MaskPattern {
        self.mask
    }

    /// Modules per side, `4 * version + 17`.
    pub fn width(&self) -> usize {
        self.w
    }

    /// # Panics
    ///
    /// Panics if `r` or `c` is not less than [`QRCode::width`].
    pub fn is_dark(&self, r: usize, c: usize) -> bool {
        assert!(r < self.w && c < self.w, "Module ({r}, {c}) out of bounds for width {}", self.w);
        self.modules[r * self.w + c]
    }

    /// Rows from top to bottom, `true` for dark modules.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[bool]> + '_ {
        self.modules.chunks_exact(self.w)
    }

    pub fn to_matrix(&self) -> Vec<Vec<bool>> {
        self.rows().map(<[bool]>::to_vec).collect()
    }

    pub fn count_dark_modules(&self) -> usize {
        self.modules.iter().filter(|&&d| d).count()
    }

    /// Text dump for terminals with a dark background. Light modules are drawn as
    /// blocks, each module is `module_sz` chars wide and tall, and the symbol is
    /// surrounded by a 4 module quiet zone.
    pub fn to_str(&self, module_sz: usize) -> String {
        let qz_sz = QUIET_ZONE * module_sz;
        let qr_sz = self.w * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = String::with_capacity(total_sz * (total_sz * 3 + 1));
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.push('█');
                    continue;
                }
                let r = (i - qz_sz) / module_sz;
                let c = (j - qz_sz) / module_sz;
                canvas.push(if self.is_dark(r, c) { ' ' } else { '█' });
            }
            canvas.push('\n');
        }
        canvas
    }
}

const QUIET_ZONE: usize = 4;
