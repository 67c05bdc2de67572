use crate::error::{Result, SdkError};
use crate::types::{Felt, Uint256};
use alloy_primitives::U256;
use std::time::{SystemTime, UNIX_EPOCH};

//=============================================================================
// Felt Encoding
//=============================================================================

/// Anything that can be turned into a canonical [`Felt`].
///
/// Integers convert directly. Strings are lower-cased; a `0x` prefix means hex,
/// anything else is read as a decimal numeral.
pub trait ToFelt {
    fn to_felt(&self) -> Result<Felt>;
}

/// Anything that can be turned into a [`Uint256`] (value taken mod 2^256).
pub trait ToUint256 {
    fn to_uint256(&self) -> Result<Uint256>;
}

/// Convert a numeric value or numeric string into its canonical felt.
///
/// String input wider than 256 bits is truncated to its low 256 bits.
pub fn to_felt(value: impl ToFelt) -> Result<Felt> {
    value.to_felt()
}

/// Split a value into low/high 128-bit limbs.
///
/// Values wider than 256 bits are truncated to their low 256 bits, not rejected.
pub fn to_uint256(value: impl ToUint256) -> Result<Uint256> {
    value.to_uint256()
}

/// Left-pad the hex body of a felt to a whole number of bytes.
pub fn hex_pad(felt: &Felt) -> String {
    let body = felt.hex_body();
    if body.len() % 2 == 1 {
        format!("0x0{}", body)
    } else {
        format!("0x{}", body)
    }
}

fn split_u256(value: U256) -> Uint256 {
    let mask = U256::from(u128::MAX);
    Uint256::new(Felt::from(value & mask), Felt::from(value >> 128usize))
}

/// Parse digits in `radix`, reducing the result mod 2^256.
fn parse_digits(digits: &str, radix: u32) -> Result<U256> {
    if digits.is_empty() {
        return Err(SdkError::Encoding("empty numeric string".to_string()));
    }

    let base = U256::from(radix);
    let mut acc = U256::ZERO;
    for c in digits.chars() {
        let d = c.to_digit(radix).ok_or_else(|| {
            SdkError::Encoding(format!("invalid digit {:?} in {:?}", c, digits))
        })?;
        acc = acc.wrapping_mul(base).wrapping_add(U256::from(d));
    }
    Ok(acc)
}

fn parse_numeric(s: &str) -> Result<U256> {
    let s = s.to_lowercase();
    match s.strip_prefix("0x") {
        Some(hex) => parse_digits(hex, 16),
        None => parse_digits(&s, 10),
    }
}

impl ToFelt for Felt {
    fn to_felt(&self) -> Result<Felt> {
        Ok(*self)
    }
}

impl ToFelt for U256 {
    fn to_felt(&self) -> Result<Felt> {
        Ok(Felt::from(*self))
    }
}

impl ToFelt for str {
    fn to_felt(&self) -> Result<Felt> {
        parse_numeric(self).map(Felt::from)
    }
}

impl ToFelt for String {
    fn to_felt(&self) -> Result<Felt> {
        self.as_str().to_felt()
    }
}

impl<T: ToFelt + ?Sized> ToFelt for &T {
    fn to_felt(&self) -> Result<Felt> {
        (**self).to_felt()
    }
}

impl ToUint256 for Felt {
    fn to_uint256(&self) -> Result<Uint256> {
        Ok(split_u256(self.value()))
    }
}

impl ToUint256 for U256 {
    fn to_uint256(&self) -> Result<Uint256> {
        Ok(split_u256(*self))
    }
}

impl ToUint256 for str {
    fn to_uint256(&self) -> Result<Uint256> {
        parse_numeric(self).map(split_u256)
    }
}

impl ToUint256 for String {
    fn to_uint256(&self) -> Result<Uint256> {
        self.as_str().to_uint256()
    }
}

impl<T: ToUint256 + ?Sized> ToUint256 for &T {
    fn to_uint256(&self) -> Result<Uint256> {
        (**self).to_uint256()
    }
}

macro_rules! uint_codecs {
    ($($t:ty),*) => {
        $(
            impl ToFelt for $t {
                fn to_felt(&self) -> Result<Felt> {
                    Ok(Felt::from(*self))
                }
            }

            impl ToUint256 for $t {
                fn to_uint256(&self) -> Result<Uint256> {
                    Ok(split_u256(U256::from(*self)))
                }
            }
        )*
    };
}

uint_codecs!(u8, u16, u32, u64, u128, usize);

//=============================================================================
// Keys & Clock
//=============================================================================

/// Generate a session key felt from 32 random bytes.
///
/// The top bit is cleared so the value stays below the field modulus in naive
/// contexts. Development-grade only: this is not a Stark keypair.
pub fn gen_session_key() -> Felt {
    let mut bytes: [u8; 32] = rand::random();
    bytes[0] &= 0x7f;
    Felt::from(U256::from_be_bytes(bytes))
}

/// Wall-clock seconds since the Unix epoch.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
