use std::fmt::{Display, Formatter};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::trace;

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::QR;

// Mask pattern
//------------------------------------------------------------------------------

/// The 8 data masks. Discriminant is the mask id recorded in format information.
#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum MaskPattern {
    Checkerboard = 0b000,
    HorizontalLines = 0b001,
    VerticalLines = 0b010,
    DiagonalLines = 0b011,
    LargeCheckerboard = 0b100,
    Fields = 0b101,
    Diamonds = 0b110,
    Meadow = 0b111,
}

impl MaskPattern {
    pub const ALL: [MaskPattern; 8] = [
        Self::Checkerboard,
        Self::HorizontalLines,
        Self::VerticalLines,
        Self::DiagonalLines,
        Self::LargeCheckerboard,
        Self::Fields,
        Self::Diamonds,
        Self::Meadow,
    ];

    pub fn new(id: u8) -> QRResult<Self> {
        Self::ALL
            .get(id as usize)
            .copied()
            .ok_or(QRError::InvalidParameter("mask pattern id must be within 0..=7"))
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Whether the module at row `r`, column `c` is inverted by this mask.
    pub fn flips(self, r: i16, c: i16) -> bool {
        let (r, c) = (r as i32, c as i32);
        match self {
            Self::Checkerboard => (r + c) & 1 == 0,
            Self::HorizontalLines => r & 1 == 0,
            Self::VerticalLines => c % 3 == 0,
            Self::DiagonalLines => (r + c) % 3 == 0,
            Self::LargeCheckerboard => ((r >> 1) + (c / 3)) & 1 == 0,
            Self::Fields => ((r * c) & 1) + ((r * c) % 3) == 0,
            Self::Diamonds => (((r * c) & 1) + ((r * c) % 3)) & 1 == 0,
            Self::Meadow => (((r + c) & 1) + ((r * c) % 3)) & 1 == 0,
        }
    }
}

impl Display for MaskPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl TryFrom<u8> for MaskPattern {
    type Error = QRError;
    fn try_from(id: u8) -> QRResult<Self> {
        Self::new(id)
    }
}


// Mask selection
//------------------------------------------------------------------------------

/// Scores every mask on a copy of the unmasked symbol and applies the one with
/// the least penalty, lowest id on ties.
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let score = |&mask: &MaskPattern| {
        let mut candidate = qr.clone();
        candidate.apply_mask(mask);
        let penalty = compute_total_penalty(&candidate);
        trace!(mask = mask.id(), penalty, "Scored mask candidate");
        (penalty, mask)
    };

    #[cfg(feature = "parallel")]
    let best = MaskPattern::ALL.par_iter().map(score).min();
    #[cfg(not(feature = "parallel"))]
    let best = MaskPattern::ALL.iter().map(score).min();

    let best_mask = best.map_or(MaskPattern::Checkerboard, |(_, m)| m);
    qr.apply_mask(best_mask);
    best_mask
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i16;
    let rows = (0..w).map(|r| (0..w).map(|c| qr.color(r, c)).collect::<Vec<_>>());
    let cols = (0..w).map(|c| (0..w).map(|r| qr.color(r, c)).collect::<Vec<_>>());
    let line_pen: u32 = rows.chain(cols).map(|l| run_penalty(&l) + finder_penalty(&l)).sum();
    line_pen + block_penalty(qr) + balance_penalty(qr)
}

// Rule 1: runs of 5 or more same colored modules score 3, plus 1 per extra module
fn run_penalty(line: &[Color]) -> u32 {
    let mut pen = 0;
    let mut run = 0;
    for (i, clr) in line.iter().enumerate() {
        run += 1;
        let run_ends = line.get(i + 1) != Some(clr);
        if run_ends {
            if run >= 5 {
                pen += 3 + (run - 5);
            }
            run = 0;
        }
    }
    pen
}

// Rule 2: 3 for every 2x2 block of one color, blocks may overlap
fn block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = qr.color(r, c);
            if clr == qr.color(r + 1, c) && clr == qr.color(r, c + 1) && clr == qr.color(r + 1, c + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

// Rule 3: 40 for each dark:light:dark:light:dark run of n:n:3n:n:n with at
// least 4n light modules on one side, counted per side. Modules past the ends
// of the line are light.
fn finder_penalty(line: &[Color]) -> u32 {
    let quiet = line.len();
    let mut runs: Vec<(Color, usize)> = vec![(Color::Light, quiet)];
    for &clr in line {
        match runs.last_mut() {
            Some((last, len)) if *last == clr => *len += 1,
            _ => runs.push((clr, 1)),
        }
    }
    match runs.last_mut() {
        Some((Color::Light, len)) => *len += quiet,
        _ => runs.push((Color::Light, quiet)),
    }

    // Runs alternate in color and both ends are light, so a window starting on
    // a dark run always has a light run on either side of it
    let mut pen = 0;
    for (i, win) in runs.windows(FINDER_RATIO.len()).enumerate() {
        let n = win[0].1;
        let is_finder_like = win[0].0 == Color::Dark
            && win.iter().zip(FINDER_RATIO).all(|(&(_, len), k)| len == k * n);
        if !is_finder_like {
            continue;
        }
        if runs[i - 1].1 >= 4 * n {
            pen += 40;
        }
        if runs[i + FINDER_RATIO.len()].1 >= 4 * n {
            pen += 40;
        }
    }
    pen
}

// Rule 4: 10 for every full 5% the dark ratio deviates from 50%
fn balance_penalty(qr: &QR) -> u32 {
    let total = qr.width() * qr.width();
    dark_ratio_penalty(qr.count_dark_modules(), total)
}

fn dark_ratio_penalty(dark: usize, total: usize) -> u32 {
    let dev = (dark * 20).abs_diff(total * 10);
    (dev / total) as u32 * 10
}

static FINDER_RATIO: [usize; 5] = [1, 1, 3, 1, 1];
