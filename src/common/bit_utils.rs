use std::fmt::Display;
use std::mem;

use num_traits::PrimInt;

// Bit stream
//------------------------------------------------------------------------------

/// Append-only MSB-first bit buffer bounded by a fixed bit capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitStream {
    data: Vec<u8>,
    // Bit length
    len: usize,
    // Max bit capacity
    capacity: usize,
}

impl BitStream {
    pub fn new(capacity: usize) -> Self {
        Self { data: Vec::with_capacity((capacity + 7) >> 3), len: 0, capacity }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.len
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Iterates over every bit pushed so far, most significant first.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| (self.data[i >> 3] >> (7 - (i & 7))) & 1 == 1)
    }
}

// Push bits for bit stream
//------------------------------------------------------------------------------

impl BitStream {
    /// Appends the `size` least significant bits of `bits`, MSB first.
    pub fn push_bits<T>(&mut self, bits: T, size: usize)
    where
        T: PrimInt + Display,
    {
        let max_bits = mem::size_of::<T>() * 8;
        debug_assert!(size <= max_bits, "Bit count exceeds width of type: Size {size}");
        debug_assert!(
            size >= max_bits - bits.leading_zeros() as usize,
            "Bit count shouldn't exceed bit length: Length {size}, Bits {bits}"
        );
        assert!(
            self.len + size <= self.capacity,
            "Insufficient capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + size
        );

        for i in (0..size).rev() {
            let bit = (bits >> i) & T::one() == T::one();
            self.push_unchecked(bit);
        }
    }

    #[cfg(test)]
    pub fn push(&mut self, bit: bool) {
        assert!(
            self.len < self.capacity,
            "Insufficient capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + 1
        );
        self.push_unchecked(bit);
    }

    fn push_unchecked(&mut self, bit: bool) {
        let offset = self.len & 7;
        if offset == 0 {
            self.data.push(0);
        }
        if bit {
            let last = self.data.len() - 1;
            self.data[last] |= 0b1000_0000 >> offset;
        }
        self.len += 1;
    }

    /// Appends whole bytes. Only valid on a byte boundary.
    pub fn extend(&mut self, arr: &[u8]) {
        debug_assert!(
            (self.len & 7) == 0,
            "Bit offset must be zero to extend from another array: Bit offset {}",
            self.len & 7
        );
        let arr_bits = arr.len() << 3;
        assert!(
            self.len + arr_bits <= self.capacity,
            "Extension shouldn't overflow capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + arr_bits
        );
        self.data.extend_from_slice(arr);
        self.len += arr_bits;
    }
}

#[cfg(test)]
mod bit_stream_tests {
    use super::BitStream;

    #[test]
    fn test_len() {
        let mut bs = BitStream::new(152);
        assert!(bs.is_empty());
        bs.push_bits(0, 0);
        assert_eq!(bs.len(), 0);
        bs.push_bits(0b1000, 4);
        assert_eq!(bs.len(), 4);
        bs.push_bits(0b1000, 8);
        assert_eq!(bs.len(), 12);
        bs.push_bits(0b1111111, 7);
        assert_eq!(bs.len(), 19);
        bs.push_bits(0b111111111111u16, 12);
        assert_eq!(bs.len(), 31);
        bs.push_bits(0xFFFFu16, 16);
        assert_eq!(bs.len(), 47);
        assert_eq!(bs.remaining(), 152 - 47);
    }

    #[test]
    fn test_push() {
        let mut bs = BitStream::new(9);
        bs.push(false);
        assert_eq!(bs.data(), &[0b00000000]);
        bs.push(true);
        assert_eq!(bs.data(), &[0b01000000]);
        for _ in 0..6 {
            bs.push(true);
        }
        bs.push(true);
        assert_eq!(bs.data(), &[0b01111111, 0b10000000]);
    }

    #[test]
    fn test_push_bits_across_bytes() {
        let mut bs = BitStream::new(32);
        bs.push_bits(0b0001u8, 4);
        bs.push_bits(0b0000001000u16, 10);
        bs.push_bits(0b0001100u8, 7);
        // "01" numeric segment header & first group from ISO/IEC 18004
        assert_eq!(bs.data(), &[0b00010000, 0b00100000, 0b01100000]);
        assert_eq!(bs.len(), 21);
    }

    #[test]
    fn test_extend() {
        let mut bs = BitStream::new(24);
        bs.push_bits(0xA5u8, 8);
        bs.extend(&[0x12, 0x34]);
        assert_eq!(bs.data(), &[0xA5, 0x12, 0x34]);
        assert_eq!(bs.len(), 24);
    }

    #[test]
    fn test_bits() {
        let mut bs = BitStream::new(16);
        bs.push_bits(0b101u8, 3);
        bs.push_bits(0b0011u8, 4);
        let bits = bs.bits().collect::<Vec<_>>();
        assert_eq!(bits, vec![true, false, true, false, false, true, true]);
    }

    #[test]
    #[should_panic]
    fn test_push_bits_capacity_overflow() {
        let mut bs = BitStream::new(8);
        bs.push_bits(0xFFu8, 8);
        bs.push(true);
    }
}
