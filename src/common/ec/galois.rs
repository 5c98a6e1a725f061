use std::ops::{Add, AddAssign, Div, Mul, Sub};

// Galois field GF(256)
//------------------------------------------------------------------------------

/// Element of GF(256) under the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Default)]
pub struct G(pub u8);

impl G {
    pub const ZERO: G = G(0);
    pub const ONE: G = G(1);

    /// Powers of the generator alpha = 2. Exponent is reduced modulo 255.
    pub fn gen_pow(i: usize) -> Self {
        Self(EXP_TABLE[i % 255])
    }

    /// Discrete log base alpha. Zero has no logarithm.
    pub fn log(self) -> usize {
        debug_assert!(self.0 != 0, "Log of zero is undefined");
        LOG_TABLE[self.0 as usize] as usize
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[cfg(test)]
    pub fn inverse(self) -> Self {
        assert!(self.0 != 0, "Zero has no multiplicative inverse");
        Self(EXP_TABLE[255 - self.log()])
    }
}

impl From<G> for u8 {
    fn from(value: G) -> Self {
        value.0
    }
}

impl Add for G {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}

impl AddAssign for G {
    fn add_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

// Characteristic 2, subtraction is addition
impl Sub for G {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}

impl Mul for G {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        if self.0 == 0 || rhs.0 == 0 {
            return Self(0);
        }
        Self(EXP_TABLE[self.log() + rhs.log()])
    }
}

impl Div for G {
    type Output = Self;
    fn div(self, rhs: Self) -> Self::Output {
        assert!(rhs.0 != 0, "Division by zero in GF(256)");
        if self.0 == 0 {
            return Self(0);
        }
        Self(EXP_TABLE[self.log() + 255 - rhs.log()])
    }
}

// Tables
//------------------------------------------------------------------------------

const PRIMITIVE_POLY: u16 = 0x11D;

// Doubled so that the sum of two logs indexes without reduction
const fn build_exp_table() -> [u8; 512] {
    let mut table = [0u8; 512];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = x as u8;
        table[i + 255] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE_POLY;
        }
        i += 1;
    }
    table[510] = table[0];
    table[511] = table[1];
    table
}

const fn build_log_table() -> [u8; 256] {
    let exp = build_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

pub static EXP_TABLE: [u8; 512] = build_exp_table();

pub static LOG_TABLE: [u8; 256] = build_log_table();
