pub trait NumExt {
    /// Returns the base 2 logarithm of the number, rounding up to the next integer.
    fn ilog2_ceil(self) -> u32;

    /// Returns the offset of the first match of `round` in a flat bracket of `self` slots.
    fn round_offset(self, round: u32) -> Self;
}

impl NumExt for usize {
    #[inline]
    fn ilog2_ceil(self) -> u32 {
        match self {
            0 | 1 => 0,
            n => (n - 1).ilog2() + 1,
        }
    }

    #[inline]
    fn round_offset(self, round: u32) -> Self {
        self - (self >> (round - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::NumExt;

    #[test]
    fn test_ilog2() {
        assert_eq!(1_usize.ilog2_ceil(), 0);
        assert_eq!(2_usize.ilog2_ceil(), 1);
        assert_eq!(3_usize.ilog2_ceil(), 2);
        assert_eq!(4_usize.ilog2_ceil(), 2);
        assert_eq!(5_usize.ilog2_ceil(), 3);
        assert_eq!(8_usize.ilog2_ceil(), 3);
        assert_eq!(9_usize.ilog2_ceil(), 4);
        assert_eq!(16_usize.ilog2_ceil(), 4);
        assert_eq!(17_usize.ilog2_ceil(), 5);
    }

    #[test]
    fn test_round_offset() {
        assert_eq!(8_usize.round_offset(1), 0);
        assert_eq!(8_usize.round_offset(2), 4);
        assert_eq!(8_usize.round_offset(3), 6);
        assert_eq!(2_usize.round_offset(1), 0);
    }
}
