//! Fixed-point decimal helpers
//!
//! On-chain amounts are integers (`u64`/`u128` on the ledger) and are carried as
//! [`BigInt`]. Fractional quantities such as slippage tolerances, price impact and
//! exchange ratios are [`BigDecimal`]. Rounding back to an integer is always explicit.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

/// Parse a decimal literal ("0.005", "1e-4", "42").
pub fn d(value: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(value.trim()).ok()
}

/// Lift an integer amount into decimal space.
pub fn to_decimal(value: &BigInt) -> BigDecimal {
    BigDecimal::from(value.clone())
}

/// Round toward negative infinity.
pub fn floor_to_int(value: &BigDecimal) -> BigInt {
    let truncated = truncate(value);
    if value.is_negative() && to_decimal(&truncated) != *value {
        truncated - BigInt::one()
    } else {
        truncated
    }
}

/// Round toward positive infinity.
pub fn ceil_to_int(value: &BigDecimal) -> BigInt {
    let truncated = truncate(value);
    if value.is_positive() && to_decimal(&truncated) != *value {
        truncated + BigInt::one()
    } else {
        truncated
    }
}

fn truncate(value: &BigDecimal) -> BigInt {
    let (digits, scale) = value.with_scale(0).as_bigint_and_exponent();
    debug_assert_eq!(scale, 0);
    digits
}

/// `10^decimals`
pub fn pow10(decimals: u32) -> BigInt {
    num_traits::pow(BigInt::from(10u32), decimals as usize)
}

/// Human amount to raw on-chain units, floored ("1.5" APT with 8 decimals -> 150000000).
pub fn mul_decimals(pretty: &BigDecimal, decimals: u32) -> BigInt {
    floor_to_int(&(pretty.clone() * to_decimal(&pow10(decimals))))
}

/// `numerator / denominator`, or zero when the denominator is zero.
pub fn ratio(numerator: &BigInt, denominator: &BigInt) -> BigDecimal {
    if denominator.is_zero() {
        return BigDecimal::zero();
    }
    to_decimal(numerator) / to_decimal(denominator)
}

/// Serde adapter writing a [`BigInt`] as a decimal string.
///
/// The ledger API encodes `u64`/`u128` as JSON strings; plain JSON numbers are
/// accepted on input as well.
pub mod bigint_str {
    use std::str::FromStr;

    use num_bigint::BigInt;
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(u64),
    }

    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Str(s) => BigInt::from_str(&s).map_err(de::Error::custom),
            Raw::Num(n) => Ok(BigInt::from(n)),
        }
    }
}

/// Serde adapter for `Vec<BigInt>` as a list of decimal strings.
pub mod bigint_vec_str {
    use std::str::FromStr;

    use num_bigint::BigInt;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[BigInt], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|v| v.to_string()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<BigInt>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|s| BigInt::from_str(s).map_err(de::Error::custom))
            .collect()
    }
}

/// Parse a ledger integer string, e.g. a reserve value.
pub fn parse_int(value: &str) -> Option<BigInt> {
    BigInt::from_str(value.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[test]
    fn test_floor_and_ceil() {
        let v = d("95.5").unwrap();
        assert_eq!(floor_to_int(&v), BigInt::from(95));
        assert_eq!(ceil_to_int(&v), BigInt::from(96));

        let exact = d("105").unwrap();
        assert_eq!(floor_to_int(&exact), BigInt::from(105));
        assert_eq!(ceil_to_int(&exact), BigInt::from(105));

        let neg = d("-1.2").unwrap();
        assert_eq!(floor_to_int(&neg), BigInt::from(-2));
        assert_eq!(ceil_to_int(&neg), BigInt::from(-1));
    }

    #[test]
    fn test_decimals_scaling() {
        assert_eq!(pow10(8), BigInt::from(100_000_000u64));
        assert_eq!(
            mul_decimals(&d("1.5").unwrap(), 8),
            BigInt::from(150_000_000u64)
        );
        assert_eq!(
            mul_decimals(&d("0.123456789").unwrap(), 8),
            BigInt::from(12_345_678u64)
        );
    }

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(ratio(&BigInt::from(5), &BigInt::zero()), BigDecimal::zero());
        assert_eq!(
            ratio(&BigInt::from(1), &BigInt::from(4)),
            d("0.25").unwrap()
        );
    }

    #[derive(Serialize, Deserialize)]
    struct Holder {
        #[serde(with = "bigint_str")]
        value: BigInt,
        #[serde(with = "bigint_vec_str")]
        values: Vec<BigInt>,
    }

    #[test]
    fn test_bigint_serde() {
        let h = Holder {
            value: BigInt::from(u64::MAX),
            values: vec![BigInt::from(1), BigInt::from(2)],
        };
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(
            json,
            r#"{"value":"18446744073709551615","values":["1","2"]}"#
        );

        let parsed: Holder = serde_json::from_str(r#"{"value":42,"values":[]}"#).unwrap();
        assert_eq!(parsed.value, BigInt::from(42));
        assert!(serde_json::from_str::<Holder>(r#"{"value":"x1","values":[]}"#).is_err());
    }
}
