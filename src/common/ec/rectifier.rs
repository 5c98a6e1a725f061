use super::{galois::G, Block};

// Rectifier
//------------------------------------------------------------------------------

// Reference RS corrector used to check the error correction codewords emitted by
// the encoder. Generator roots are a^0..a^(n-1), first codeword is the highest
// degree coefficient.
impl Block {
    pub fn rectify(&mut self) -> Option<&[u8]> {
        let synd = match self.syndromes() {
            None => return Some(self.data()),
            Some(s) => s,
        };

        let sig = berlekamp_massey(&synd);
        let err_pos = self.chien_search(&sig)?;
        let omg = omega(&synd, &sig);

        // Formal derivative keeps odd terms in characteristic 2
        let dsig = sig
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &s)| if i & 1 == 1 { s } else { G::ZERO })
            .collect::<Vec<_>>();

        let n = self.len();
        for j in err_pos {
            let x = G::gen_pow(n - 1 - j);
            let xinv = x.inverse();
            let mag = x * eval_poly(&omg, xinv) / eval_poly(&dsig, xinv);
            self.data[j] = (G(self.data[j]) + mag).into();
        }

        match self.syndromes() {
            None => Some(self.data()),
            Some(_) => None,
        }
    }

    // None if the block is a valid codeword
    fn syndromes(&self) -> Option<Vec<G>> {
        let synd = (0..self.ec_len())
            .map(|i| {
                let x = G::gen_pow(i);
                self.data.iter().fold(G::ZERO, |acc, &c| acc * x + G(c))
            })
            .collect::<Vec<_>>();
        synd.iter().any(|s| !s.is_zero()).then_some(synd)
    }

    // Indices of erroneous codewords, None if the locator doesn't split into
    // as many roots as its degree
    fn chien_search(&self, sig: &[G]) -> Option<Vec<usize>> {
        let n = self.len();
        let err_pos = (0..n)
            .filter(|&j| eval_poly(sig, G::gen_pow(n - 1 - j).inverse()).is_zero())
            .collect::<Vec<_>>();
        (err_pos.len() + 1 == sig.len()).then_some(err_pos)
    }
}

// Error locator polynomial, lowest degree first and trimmed to its degree
fn berlekamp_massey(synd: &[G]) -> Vec<G> {
    let len = synd.len();
    let mut cx = vec![G::ZERO; len + 1];
    let mut bx = vec![G::ZERO; len + 1];
    cx[0] = G::ONE;
    bx[0] = G::ONE;
    let (mut l, mut m, mut b) = (0usize, 1usize, G::ONE);

    for n in 0..len {
        let mut d = synd[n];
        for i in 1..=l {
            d += cx[i] * synd[n - i];
        }

        if d.is_zero() {
            m += 1;
            continue;
        }

        let tx = cx.clone();
        let scale = d / b;
        for i in 0..=len - m {
            cx[i + m] += scale * bx[i];
        }
        if 2 * l <= n {
            l = n + 1 - l;
            bx = tx;
            b = d;
            m = 1;
        } else {
            m += 1;
        }
    }
    cx.truncate(l + 1);
    cx
}

// Error evaluator polynomial S(x) * sigma(x) mod x^n
fn omega(synd: &[G], sig: &[G]) -> Vec<G> {
    let n = synd.len();
    let mut omg = vec![G::ZERO; n];
    for (i, &s) in synd.iter().enumerate() {
        for (j, &c) in sig.iter().enumerate().take(n - i) {
            omg[i + j] += s * c;
        }
    }
    omg
}

// Evaluates a polynomial stored lowest degree first
fn eval_poly(poly: &[G], x: G) -> G {
    poly.iter().rev().fold(G::ZERO, |acc, &c| acc * x + c)
}

/// Nearest valid format or version info by Hamming distance, if within capacity.
pub fn rectify_info(info: u32, valid_numbers: &[u32], err_capacity: u32) -> Option<u32> {
    let res = *valid_numbers.iter().min_by_key(|&n| (info ^ n).count_ones())?;
    ((info ^ res).count_ones() <= err_capacity).then_some(res)
}

#[cfg(test)]
mod rectifier_tests {
    use proptest::prelude::*;
    use rand::seq::index::sample;
    use rand::{rng, Rng};
    use test_case::test_case;

    use super::{rectify_info, Block};
    use crate::common::metadata::{
        FORMAT_ERROR_CAPACITY, FORMAT_INFOS, VERSION_ERROR_CAPACITY, VERSION_INFOS,
    };

    #[test_case(&[32, 91, 11, 45, 89, 123, 77, 44, 56, 99, 202], &[32, 91, 11, 45, 89, 46, 77, 44, 56, 99, 202])]
    #[test_case(&[32, 91, 11, 45, 89, 123, 77, 44, 56, 99, 202], &[32, 91, 11, 45, 89, 46, 77, 44, 56, 99, 249])]
    #[test_case(&[32, 91, 11, 45, 89, 123, 77, 44, 56, 99, 202], &[138, 91, 161, 45, 243, 46, 231, 44, 56, 99, 202])]
    fn test_rectifier(data: &[u8], bad: &[u8]) {
        let mut blk = Block::new(data, 15);
        blk.full_mut()[..11].copy_from_slice(bad);
        let rect = blk.rectify();
        assert_eq!(rect, Some(data));
    }

    #[test]
    fn test_rectifier_clean_block() {
        let data = [0x40, 0xD2, 0x75, 0x47, 0x76, 0x17, 0x32, 0x06, 0x27, 0x26];
        let mut blk = Block::new(&data, 10);
        assert_eq!(blk.rectify(), Some(&data[..]));
    }

    #[test]
    fn test_rectifier_too_many_errors() {
        let data = [32, 91, 11, 45, 89, 123, 77, 44, 56, 99, 202];
        let mut blk = Block::new(&data, 4);
        for b in blk.full_mut()[..5].iter_mut() {
            *b ^= 0x5A;
        }
        assert_ne!(blk.rectify(), Some(&data[..]));
    }

    proptest! {
        #[test]
        fn proptest_rectifier(
            data in prop::collection::vec(any::<u8>(), 1..=123),
            ec_len in prop::sample::select(vec![7usize, 10, 15, 18, 22, 26, 30]),
        ) {
            let mut blk = Block::new(&data, ec_len);
            let len = blk.len();
            let mut rand = rng();
            let err_cnt = rand.random_range(0..=ec_len / 2);
            for i in sample(&mut rand, len, err_cnt) {
                blk.full_mut()[i] ^= rand.random_range(1..=255u8);
            }
            prop_assert_eq!(blk.rectify(), Some(&data[..]));
        }
    }

    #[test]
    fn test_rectify_format_info() {
        let mut rand = rng();
        for &info in FORMAT_INFOS.iter() {
            let mut bad = info;
            for i in sample(&mut rand, 15, FORMAT_ERROR_CAPACITY as usize) {
                bad ^= 1 << i;
            }
            assert_eq!(rectify_info(bad, &FORMAT_INFOS, FORMAT_ERROR_CAPACITY), Some(info));
        }
    }

    #[test]
    fn test_rectify_version_info() {
        let mut rand = rng();
        for &info in VERSION_INFOS.iter() {
            let mut bad = info;
            for i in sample(&mut rand, 18, VERSION_ERROR_CAPACITY as usize) {
                bad ^= 1 << i;
            }
            assert_eq!(rectify_info(bad, &VERSION_INFOS, VERSION_ERROR_CAPACITY), Some(info));
        }
    }

    #[test]
    fn test_rectify_info_out_of_reach() {
        // Bits 0..=3 of L/mask 0 flipped lands 4 away
        let bad = FORMAT_INFOS[0b01000] ^ 0b1111;
        let res = rectify_info(bad, &FORMAT_INFOS, FORMAT_ERROR_CAPACITY);
        assert_ne!(res, Some(FORMAT_INFOS[0b01000]));
    }
}
