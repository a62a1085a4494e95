use std::ops::RangeInclusive;

/// Helpers to read and write bit fields of instruction words and registers.
/// The index (`bit_idx`) goes from lsb to msb (right to left).
pub trait Bits: Copy {
    const WIDTH: u8;

    fn get_bit(self, bit_idx: u8) -> bool;

    fn set_bit(&mut self, bit_idx: u8, value: bool);

    /// Extracts the inclusive `bits_range` and moves it down to bit 0.
    fn get_bits(self, bits_range: RangeInclusive<u8>) -> Self;

    /// Returns a sign-extended copy of the value, considering only its
    /// `number_of_bits` lowest bits as a two's complement number.
    fn sign_extended(self, number_of_bits: u8) -> Self;
}

macro_rules! impl_bits {
    ($unsigned:ty, $signed:ty) => {
        impl Bits for $unsigned {
            const WIDTH: u8 = <$unsigned>::BITS as u8;

            fn get_bit(self, bit_idx: u8) -> bool {
                debug_assert!(bit_idx < Self::WIDTH);
                (self >> bit_idx) & 1 == 1
            }

            fn set_bit(&mut self, bit_idx: u8, value: bool) {
                debug_assert!(bit_idx < Self::WIDTH);
                if value {
                    *self |= 1 << bit_idx;
                } else {
                    *self &= !(1 << bit_idx);
                }
            }

            fn get_bits(self, bits_range: RangeInclusive<u8>) -> Self {
                let (start, end) = (*bits_range.start(), *bits_range.end());
                debug_assert!(start <= end && end < Self::WIDTH);

                let length = end - start + 1;
                let value = self >> start;

                // A full-width mask would overflow the shift below.
                if length == Self::WIDTH {
                    value
                } else {
                    value & ((1 << length) - 1)
                }
            }

            fn sign_extended(self, number_of_bits: u8) -> Self {
                debug_assert!(number_of_bits > 0 && number_of_bits <= Self::WIDTH);

                // Move the sign bit up to the msb, then let the arithmetic
                // shift of the signed type replicate it on the way back.
                let unused = Self::WIDTH - number_of_bits;
                (((self << unused) as $signed) >> unused) as Self
            }
        }
    };
}

impl_bits!(u64, i64);
impl_bits!(u32, i32);
impl_bits!(u16, i16);
impl_bits!(u8, i8);
