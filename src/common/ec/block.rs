use super::galois::G;

// Block
//------------------------------------------------------------------------------

/// Data codewords of one RS block followed by their error correction codewords.
#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) struct Block {
    pub(super) data: Vec<u8>,
    // Data length
    pub(super) dlen: usize,
}

impl Block {
    /// Computes `ec_len` error correction codewords for the data codewords.
    pub fn new(raw: &[u8], ec_len: usize) -> Self {
        let dlen = raw.len();
        let mut data = Vec::with_capacity(dlen + ec_len);
        data.extend_from_slice(raw);
        data.extend(ecc(raw, &generator_poly(ec_len)));
        Self { data, dlen }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[cfg(test)]
    pub fn ec_len(&self) -> usize {
        self.data.len() - self.dlen
    }

    #[cfg(test)]
    pub fn full_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..self.dlen]
    }

    pub fn ecc(&self) -> &[u8] {
        &self.data[self.dlen..]
    }
}

/// Generator polynomial (x - a^0)(x - a^1)...(x - a^(n-1)), highest degree first.
/// The leading coefficient is always 1.
pub(crate) fn generator_poly(degree: usize) -> Vec<G> {
    let mut gen = Vec::with_capacity(degree + 1);
    gen.push(G::ONE);
    for i in 0..degree {
        let root = G::gen_pow(i);
        gen.push(G::ZERO);
        for j in (1..gen.len()).rev() {
            let prev = gen[j - 1];
            gen[j] += prev * root;
        }
    }
    gen
}

// Remainder of data * x^n divided by the generator polynomial, by long division.
// Its coefficients are the error correction codewords.
fn ecc(data: &[u8], gen: &[G]) -> Vec<u8> {
    let ec_len = gen.len() - 1;
    let mut rem = vec![G::ZERO; ec_len];
    for &b in data {
        let lead = G(b) + rem.first().copied().unwrap_or(G::ZERO);
        rem.rotate_left(1.min(ec_len));
        if let Some(last) = rem.last_mut() {
            *last = G::ZERO;
        }
        if lead.is_zero() {
            continue;
        }
        for (r, &g) in rem.iter_mut().zip(&gen[1..]) {
            *r += g * lead;
        }
    }
    rem.into_iter().map(u8::from).collect()
}
