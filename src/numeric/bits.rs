//! Bit-level conversions: sortable float bits and morton interleaving.

const INTERLEAVE_MAGIC: [u64; 6] = [
    0x5555555555555555,
    0x3333333333333333,
    0x0F0F0F0F0F0F0F0F,
    0x00FF00FF00FF00FF,
    0x0000FFFF0000FFFF,
    0x00000000FFFFFFFF,
];

const INTERLEAVE_SHIFT: [u32; 5] = [1, 2, 4, 8, 16];

/// Map an `f64` onto an `i64` whose ordering matches the float ordering.
pub fn float64_to_int64(f: f64) -> i64 {
    let i = f.to_bits() as i64;
    if i < 0 { i ^ 0x7fffffffffffffff } else { i }
}

/// Inverse of [`float64_to_int64`].
pub fn int64_to_float64(i: i64) -> f64 {
    let i = if i < 0 { i ^ 0x7fffffffffffffff } else { i };
    f64::from_bits(i as u64)
}

fn spread(mut v: u64) -> u64 {
    for i in (0..5).rev() {
        v = (v | (v << INTERLEAVE_SHIFT[i])) & INTERLEAVE_MAGIC[i];
    }
    v
}

/// Interleave the low 32 bits of `v1` (even bits) and `v2` (odd bits).
pub fn interleave(v1: u64, v2: u64) -> u64 {
    (spread(v2) << 1) | spread(v1)
}

/// Collect the even bits of `b` back into a contiguous value.
pub fn deinterleave(mut b: u64) -> u64 {
    b &= INTERLEAVE_MAGIC[0];
    for i in 0..5 {
        b = (b ^ (b >> INTERLEAVE_SHIFT[i])) & INTERLEAVE_MAGIC[i + 1];
    }
    b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_ordering_is_preserved() {
        let values = [f64::NEG_INFINITY, -1e10, -1.5, -0.0, 0.0, 1e-9, 2.5, 1e10, f64::INFINITY];
        for pair in values.windows(2) {
            assert!(float64_to_int64(pair[0]) <= float64_to_int64(pair[1]));
        }
        for v in values {
            assert_eq!(int64_to_float64(float64_to_int64(v)), v);
        }
    }

    #[test]
    fn test_interleave() {
        assert_eq!(interleave(0b11, 0b00), 0b0101);
        assert_eq!(interleave(0b00, 0b11), 0b1010);
        assert_eq!(interleave(0xFFFFFFFF, 0xFFFFFFFF), u64::MAX);

        let hash = interleave(12345, 67890);
        assert_eq!(deinterleave(hash), 12345);
        assert_eq!(deinterleave(hash >> 1), 67890);
    }
}
