//! # qrsmith
//!
//! A Rust library for encoding data into standards-compliant QR Code symbols with
//! Reed-Solomon error correction.
//!
//! ## Features
//!
//! - **Optimal segmentation**: Input is split into numeric, alphanumeric, byte and
//!   kanji segments with the fewest total bits
//! - **Version selection**: Smallest of versions 1 to 40 that holds the data, or a
//!   pinned version
//! - **Reed-Solomon error correction**: Levels L, M, Q and H over GF(256), with block
//!   interleaving
//! - **Mask selection**: All 8 masks scored with the 4 penalty rules, optionally in
//!   parallel with the `parallel` feature
//!
//! The output is a module matrix only. Rendering it to pixels, including the 4
//! module quiet zone, is left to the caller.
//!
//! ## Quick Start
//!
//! ```rust
//! use qrsmith::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Simplest usage - provide only data, all other settings are automatically chosen
//! let qr = QRBuilder::new(b"Hello, World!").build()?;
//!
//! for row in qr.rows() {
//!     let line: String = row.iter().map(|&dark| if dark { '#' } else { ' ' }).collect();
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrsmith::{ECLevel, MaskPattern, QRBuilder, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::from_text("Hello, 世界!")
//!     .version(Version::new(2)?)          // if not provided, finds smallest version to fit data
//!     .ec_level(ECLevel::M)               // if not provided, defaults to ECLevel::Q
//!     .mask(MaskPattern::new(3)?)         // if not provided, finds best mask based on penalty score
//!     .build()?;
//!
//! assert_eq!(qr.width(), 25);
//! assert_eq!(qr.mask(), MaskPattern::DiagonalLines);
//! # Ok(())
//! # }
//! ```
//!
//! ### One Call
//!
//! ```rust
//! use qrsmith::{encode, ECLevel};
//!
//! # fn main() -> Result<(), qrsmith::QRError> {
//! let qr = encode(b"8675309", ECLevel::L, None, None)?;
//! assert_eq!(*qr.version(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction

#![allow(clippy::items_after_test_module, clippy::suspicious_arithmetic_impl)]

pub mod builder;
pub(crate) mod common;

pub use builder::{encode, QRBuilder, QRCode};
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{ECLevel, Version};
