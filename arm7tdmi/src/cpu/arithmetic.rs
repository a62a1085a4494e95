//! Flag computation shared by every arithmetic instruction of both
//! instruction sets.
//!
//! Carries and overflows are read off results widened to 64 bits, so no
//! operand ever needs a special case.

use crate::bitwise::Bits;

#[must_use]
pub fn is_negative_64(value: u64) -> bool {
    value.get_bit(63)
}

#[must_use]
pub const fn is_zero_64(value: u64) -> bool {
    value == 0
}

/// Carry out of an unsigned sum computed in 64 bits.
#[must_use]
pub fn addition_carry(wide_sum: u64) -> bool {
    wide_sum.get_bit(32)
}

/// Carry (NOT borrow) of an unsigned difference computed in 64 bits: the
/// difference is negative exactly when the subtraction borrowed.
#[must_use]
pub fn subtraction_carry(wide_difference: u64) -> bool {
    !wide_difference.get_bit(63)
}

/// Whether a signed result computed in 64 bits does not fit in 32 bits.
#[must_use]
pub fn overflow(wide_signed: i64) -> bool {
    i32::try_from(wide_signed).is_err()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArithmeticOpResult {
    pub result: u32,
    pub carry: bool,
    pub overflow: bool,
}

impl ArithmeticOpResult {
    fn new(result: u32, carry: bool, overflow: bool) -> Self {
        Self {
            result,
            carry,
            overflow,
        }
    }
}

/// `first_op + second_op + carry_in`
#[must_use]
pub fn add_with_carry(first_op: u32, second_op: u32, carry_in: bool) -> ArithmeticOpResult {
    let carry_in = u32::from(carry_in);

    let wide = u64::from(first_op) + u64::from(second_op) + u64::from(carry_in);
    let signed = i64::from(first_op as i32) + i64::from(second_op as i32) + i64::from(carry_in);

    ArithmeticOpResult::new(wide as u32, addition_carry(wide), overflow(signed))
}

/// `first_op - second_op - NOT carry_in`. The resulting carry is set when
/// no borrow happened.
#[must_use]
pub fn sub_with_carry(first_op: u32, second_op: u32, carry_in: bool) -> ArithmeticOpResult {
    let borrow = u32::from(!carry_in);

    let wide = u64::from(first_op)
        .wrapping_sub(u64::from(second_op))
        .wrapping_sub(u64::from(borrow));
    let signed = i64::from(first_op as i32) - i64::from(second_op as i32) - i64::from(borrow);

    ArithmeticOpResult::new(wide as u32, subtraction_carry(wide), overflow(signed))
}

#[must_use]
pub fn add_inner_op(first_op: u32, second_op: u32) -> ArithmeticOpResult {
    add_with_carry(first_op, second_op, false)
}

#[must_use]
pub fn sub_inner_op(first_op: u32, second_op: u32) -> ArithmeticOpResult {
    sub_with_carry(first_op, second_op, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn check_flag_utilities() {
        assert!(is_negative_64(1 << 63));
        assert!(!is_negative_64(0x8000_0000));
        assert!(is_zero_64(0));
        assert!(!is_zero_64(1 << 40));

        assert!(addition_carry(0x1_0000_0000));
        assert!(!addition_carry(0xFFFF_FFFF));
        assert!(subtraction_carry(0));
        assert!(!subtraction_carry(0u64.wrapping_sub(1)));
        assert!(overflow(i64::from(i32::MAX) + 1));
        assert!(overflow(i64::from(i32::MIN) - 1));
        assert!(!overflow(i64::from(i32::MIN)));
    }

    #[test]
    fn check_add_all_ones() {
        let r = add_inner_op(0xFFFF_FFFF, 0xFFFF_FFFF);

        assert_eq!(
            r,
            ArithmeticOpResult {
                result: 0xFFFF_FFFE,
                carry: true,
                overflow: false,
            }
        );
    }

    #[test]
    fn check_adc_all_ones() {
        let r = add_with_carry(0xFFFF_FFFF, 0xFFFF_FFFF, true);

        assert_eq!(r.result, 0xFFFF_FFFF);
        assert!(r.carry);
        assert_ne!(r.result, 0);
        assert!(!r.overflow);
    }

    #[test]
    fn check_add_overflow() {
        let r = add_inner_op(0x7FFF_FFFF, 1);
        assert_eq!(r.result, 0x8000_0000);
        assert!(r.overflow);
        assert!(!r.carry);

        let r = add_inner_op(0x8000_0000, 0x8000_0000);
        assert_eq!(r.result, 0);
        assert!(r.carry);
        assert!(r.overflow);
    }

    #[test]
    fn check_sub() {
        let r = sub_inner_op(5, 5);
        assert_eq!(r.result, 0);
        assert!(r.carry);

        let r = sub_inner_op(3, 5);
        assert_eq!(r.result, 0xFFFF_FFFE);
        assert!(!r.carry);

        let r = sub_inner_op(0x8000_0000, 1);
        assert!(r.overflow);
        assert!(r.carry);
    }

    #[test]
    fn check_sbc_borrow() {
        // 5 - 5 - 1
        let r = sub_with_carry(5, 5, false);
        assert_eq!(r.result, 0xFFFF_FFFF);
        assert!(!r.carry);

        // 0 - 0xFFFF_FFFF - 0
        let r = sub_with_carry(0, 0xFFFF_FFFF, true);
        assert_eq!(r.result, 1);
        assert!(!r.carry);
    }
}
