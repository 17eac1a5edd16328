//! XCH amounts.
//!
//! Amounts are carried as integer mojos to avoid floating-point errors.
//! 1 XCH = 1,000,000,000,000 mojos.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ToolsError;

/// Mojos per XCH.
pub const MOJOS_PER_XCH: u64 = 1_000_000_000_000;

/// Number of decimal places in an XCH amount.
const XCH_DECIMALS: usize = 12;

/// An amount in mojos.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Mojos(u64);

impl Mojos {
    pub const ZERO: Self = Self(0);

    pub fn new(mojos: u64) -> Self {
        Self(mojos)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Parse a decimal XCH string (`"1"`, `"0.001"`, `"1.5"`) into mojos.
    ///
    /// Digits past the twelfth decimal place are truncated. An empty string
    /// is zero.
    pub fn from_xch_str(xch: &str) -> Result<Self, ToolsError> {
        let xch = xch.trim();
        if xch.is_empty() {
            return Ok(Self::ZERO);
        }

        let (whole, fraction) = match xch.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (xch, ""),
        };
        if fraction.contains('.') {
            return Err(ToolsError::InvalidAmount(xch.to_string()));
        }

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            parse_digits(whole).ok_or_else(|| ToolsError::InvalidAmount(xch.to_string()))?
        };

        let fraction = &fraction[..fraction.len().min(XCH_DECIMALS)];
        let fraction_mojos = if fraction.is_empty() {
            0
        } else {
            let padded = format!("{fraction:0<width$}", width = XCH_DECIMALS);
            parse_digits(&padded).ok_or_else(|| ToolsError::InvalidAmount(xch.to_string()))?
        };

        whole
            .checked_mul(MOJOS_PER_XCH)
            .and_then(|m| m.checked_add(fraction_mojos))
            .map(Self)
            .ok_or_else(|| ToolsError::AmountOverflow(xch.to_string()))
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_mul(self, factor: u64) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }
}

/// Parse a string consisting only of ASCII digits.
fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl From<u64> for Mojos {
    fn from(mojos: u64) -> Self {
        Self(mojos)
    }
}

impl fmt::Display for Mojos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mojos", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_common_amounts() {
        let cases = [
            ("", 0),
            ("0", 0),
            ("1", MOJOS_PER_XCH),
            ("10", 10 * MOJOS_PER_XCH),
            ("0.001", 1_000_000_000),
            ("1.5", 1_500_000_000_000),
            ("1.50", 1_500_000_000_000),
            (".25", 250_000_000_000),
            ("0.000000000001", 1),
            ("0.0000000000019", 1),
        ];
        for (input, expected) in cases {
            let mojos = Mojos::from_xch_str(input).expect(input);
            assert_eq!(mojos.get(), expected, "input {input:?}");
        }
    }

    #[test]
    fn rejects_malformed_amounts() {
        for input in ["1.2.3", "abc", "-1", "1.x", "+1"] {
            assert!(
                matches!(Mojos::from_xch_str(input), Err(ToolsError::InvalidAmount(_))),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn rejects_overflowing_amounts() {
        assert!(matches!(
            Mojos::from_xch_str("20000000"),
            Err(ToolsError::AmountOverflow(_))
        ));
    }

    #[test]
    fn arithmetic_reports_overflow_instead_of_wrapping() {
        let max = Mojos::new(u64::MAX);
        assert_eq!(max.checked_add(Mojos::new(1)), None);
        assert_eq!(max.checked_mul(2), None);
        assert_eq!(
            Mojos::new(2).checked_add(Mojos::new(3)),
            Some(Mojos::new(5))
        );
        assert_eq!(Mojos::new(3).checked_mul(4), Some(Mojos::new(12)));
    }
}
