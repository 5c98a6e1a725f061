mod code;
mod qr;

pub use code::QRCode;
pub(crate) use qr::QR;

use std::ops::Deref;

use tracing::debug;

use crate::common::{
    bit_utils::BitStream,
    codec::{encode_data, encode_data_with_version, units_from_bytes, units_from_text},
    ec::Block,
    error::QRResult,
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input<'a> {
    Bytes(&'a [u8]),
    Text(&'a str),
}

/// Configures and builds a [`QRCode`].
///
/// Version is the smallest that fits when unset, EC level defaults to
/// [`ECLevel::Q`], and the mask with the least penalty is chosen when unset.
#[derive(Debug, Clone)]
pub struct QRBuilder<'a> {
    data: Input<'a>,
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    /// Raw bytes. Every byte is encodable.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data: Input::Bytes(data), version: None, ec_level: ECLevel::Q, mask: None }
    }

    /// Text of Latin-1 and Shift JIS kanji characters. Any other character fails
    /// the build with [`QRError::UnsupportedCharacter`](crate::QRError::UnsupportedCharacter).
    pub fn from_text(text: &'a str) -> Self {
        Self { data: Input::Text(text), version: None, ec_level: ECLevel::Q, mask: None }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = Input::Bytes(data);
        self
    }

    pub fn text(&mut self, text: &'a str) -> &mut Self {
        self.data = Input::Text(text);
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn unset_mask(&mut self) -> &mut Self {
        self.mask = None;
        self
    }

    pub fn metadata(&self) -> String {
        let ver = self.version.map_or("None".to_string(), |v| v.to_string());
        let mask = self.mask.map_or("None".to_string(), |m| m.to_string());
        format!("{{ Version: {ver}, Ec level: {:?}, Mask: {mask} }}", self.ec_level)
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QRCode> {
        let mut qr = self.prepare()?;

        let mask = match self.mask {
            Some(m) => {
                debug!(mask = m.id(), "Applying requested mask");
                qr.apply_mask(m);
                m
            }
            None => {
                debug!("Finding & applying best mask");
                apply_best_mask(&mut qr)
            }
        };

        let code = qr.freeze();
        debug!(
            version = *code.version(),
            mask = mask.id(),
            dark_modules = code.count_dark_modules(),
            total_modules = code.width() * code.width(),
            "QR generated"
        );
        Ok(code)
    }

    /// Runs the pipeline up to, but excluding, masking.
    pub(crate) fn prepare(&self) -> QRResult<QR> {
        debug!("Generating QR {}", self.metadata());

        let units = match self.data {
            Input::Bytes(bytes) => units_from_bytes(bytes),
            Input::Text(text) => units_from_text(text)?,
        };

        let ecl = self.ec_level;
        let (encoded_data, version) = match self.version {
            Some(v) => (encode_data_with_version(&units, v, ecl)?, v),
            None => {
                debug!("Finding best version");
                encode_data(&units, ecl)?
            }
        };
        debug!(
            version = *version,
            units = units.len(),
            data_codewords = encoded_data.len() >> 3,
            "Encoded data"
        );

        debug!("Constructing payload with ecc & interleaving");
        let blocks = Self::compute_ecc(encoded_data.data(), version, ecl);
        let data_blocks = blocks.iter().map(Block::data).collect::<Vec<_>>();
        let ecc_blocks = blocks.iter().map(Block::ecc).collect::<Vec<_>>();
        let mut payload = BitStream::new(version.total_codewords() << 3);
        payload.extend(&Self::interleave(&data_blocks));
        payload.extend(&Self::interleave(&ecc_blocks));

        debug!("Drawing functional patterns & encoding region");
        let mut qr = QR::new(version, ecl);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(&payload);

        Ok(qr)
    }

    // Splits data into blocks and appends error correction codewords to each
    fn compute_ecc(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<Block> {
        let ec_len = version.ecc_per_block(ec_level);
        Self::blockify(data, version, ec_level).into_iter().map(|b| Block::new(b, ec_len)).collect()
    }

    pub(crate) fn blockify(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<&[u8]> {
        let (block1_size, block1_count, block2_size, block2_count) =
            version.data_codewords_per_block(ec_level);

        let total_blocks = block1_count + block2_count;
        let total_block1_size = block1_size * block1_count;
        let total_size = total_block1_size + block2_size * block2_count;

        assert_eq!(
            total_size,
            data.len(),
            "Data len doesn't match total size of blocks: Data len {}, Total block size {}",
            data.len(),
            total_size
        );

        let mut data_blocks = Vec::with_capacity(total_blocks);
        data_blocks.extend(data[..total_block1_size].chunks(block1_size));
        if block2_size > 0 {
            data_blocks.extend(data[total_block1_size..].chunks(block2_size));
        }
        data_blocks
    }

    /// Round robin over blocks, shorter blocks drop out once exhausted.
    pub fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
        let max_block_size = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
        let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
        let mut res = Vec::with_capacity(total_size);
        for i in 0..max_block_size {
            for b in blocks {
                if let Some(&v) = b.get(i) {
                    res.push(v);
                }
            }
        }
        res
    }
}

/// Encodes `data` into a symbol. Picks the smallest version and the best mask
/// unless overridden.
pub fn encode(
    data: &[u8],
    ec_level: ECLevel,
    version: Option<Version>,
    mask: Option<MaskPattern>,
) -> QRResult<QRCode> {
    let mut builder = QRBuilder::new(data);
    builder.ec_level(ec_level);
    if let Some(v) = version {
        builder.version(v);
    }
    if let Some(m) = mask {
        builder.mask(m);
    }
    builder.build()
}
