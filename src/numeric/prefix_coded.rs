//! Prefix-coded 64-bit integer terms.

use std::fmt;

use crate::error::{LancetError, Result};

/// First byte of a prefix-coded int64 term with shift 0.
pub const SHIFT_START_INT64: u8 = 0x20;

/// A prefix-coded integer term.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrefixCoded(Vec<u8>);

impl PrefixCoded {
    /// Encode `value` with the low `shift` bits dropped.
    pub fn new_int64(value: i64, shift: u32) -> Result<Self> {
        if shift > 63 {
            return Err(LancetError::invalid_argument(format!(
                "cannot shift {shift}, must be between 0 and 63"
            )));
        }

        let n_chars = ((63 - shift) / 7 + 1) as usize;
        let mut buf = vec![0u8; n_chars + 1];
        buf[0] = SHIFT_START_INT64 + shift as u8;
        let mut sortable = ((value as u64) ^ 0x8000000000000000) >> shift;
        for slot in buf[1..].iter_mut().rev() {
            *slot = (sortable & 0x7f) as u8;
            sortable >>= 7;
        }
        Ok(PrefixCoded(buf))
    }

    /// Wrap already encoded bytes without validation.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        PrefixCoded(bytes)
    }

    /// The number of low bits dropped from the encoded value.
    pub fn shift(&self) -> Result<u32> {
        if let Some(&first) = self.0.first() {
            let shift = first.wrapping_sub(SHIFT_START_INT64);
            if shift <= 63 {
                return Ok(shift as u32);
            }
        }
        Err(LancetError::invalid_argument("invalid prefix coded value"))
    }

    /// Decode the (shifted) integer value.
    pub fn int64(&self) -> Result<i64> {
        let shift = self.shift()?;
        let mut sortable: u64 = 0;
        for &byte in &self.0[1..] {
            if byte & 0x80 != 0 {
                return Err(LancetError::invalid_argument(
                    "invalid prefix coded byte, high bit set",
                ));
            }
            sortable <<= 7;
            sortable |= byte as u64;
        }
        Ok(((sortable << shift) ^ 0x8000000000000000) as i64)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for PrefixCoded {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for PrefixCoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrefixCoded({:02x?})", self.0)
    }
}

/// Check whether `bytes` is a well formed prefix-coded int64 term and
/// return its shift.
pub fn valid_prefix_coded_term(bytes: &[u8]) -> Option<u32> {
    let first = *bytes.first()?;
    if first < SHIFT_START_INT64 || first > SHIFT_START_INT64 + 63 {
        return None;
    }
    let shift = (first - SHIFT_START_INT64) as u32;
    let n_chars = ((63 - shift) / 7 + 1) as usize;
    if bytes.len() != n_chars + 1 {
        return None;
    }
    Some(shift)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_encodings() {
        let cases: Vec<(i64, u32, Vec<u8>)> = vec![
            (1, 0, vec![0x20, 0x1, 0, 0, 0, 0, 0, 0, 0, 0, 0x1]),
            (
                -1,
                0,
                vec![0x20, 0x0, 0x7f, 0x7f, 0x7f, 0x7f, 0x7f, 0x7f, 0x7f, 0x7f, 0x7f],
            ),
            (
                314729851,
                4,
                vec![0x24, 0x8, 0, 0, 0, 0, 0x9, 0x30, 0x4c, 0x57],
            ),
            (314729851, 8, vec![0x28, 0x40, 0, 0, 0, 0, 0x4b, 0x4, 0x65]),
            (314729851, 16, vec![0x30, 0x20, 0, 0, 0, 0, 0x25, 0x42]),
            (314729851, 32, vec![0x40, 0x8, 0, 0, 0, 0]),
        ];

        for (value, shift, expected) in cases {
            let coded = PrefixCoded::new_int64(value, shift).unwrap();
            assert_eq!(coded.as_bytes(), expected.as_slice(), "{value} shift {shift}");
            assert_eq!(coded.shift().unwrap(), shift);
            assert_eq!(coded.int64().unwrap(), (value >> shift) << shift);
        }
    }

    #[test]
    fn test_ordering_matches_numeric_order() {
        let values = [i64::MIN, -1000, -1, 0, 1, 7, 1000, i64::MAX];
        for pair in values.windows(2) {
            let a = PrefixCoded::new_int64(pair[0], 0).unwrap();
            let b = PrefixCoded::new_int64(pair[1], 0).unwrap();
            assert!(a < b);
        }
    }

    #[test]
    fn test_invalid_terms() {
        assert!(PrefixCoded::new_int64(1, 64).is_err());
        assert!(PrefixCoded::from_bytes(vec![]).shift().is_err());
        assert!(PrefixCoded::from_bytes(vec![0x10, 0x1]).shift().is_err());

        assert_eq!(valid_prefix_coded_term(b"hello"), None);
        assert_eq!(valid_prefix_coded_term(&[]), None);
        let coded = PrefixCoded::new_int64(42, 9).unwrap();
        assert_eq!(valid_prefix_coded_term(coded.as_bytes()), Some(9));
    }
}
