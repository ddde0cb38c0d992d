//! Immutable byte sequences with a canonical `0x`-prefixed lowercase hex form.
//!
//! `Bytes` is the value type for calldata and return data everywhere in
//! chainagg. Every operation returns a new value; nothing mutates in place.
//!
//! ```
//! use chainagg_core::Bytes;
//!
//! let b = Bytes::from_hex("0xABcd").unwrap();
//! assert_eq!(b.to_string(), "0xabcd");
//! assert_eq!(b.len(), 2);
//! ```

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::BytesError;

/// An ordered, immutable sequence of bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bytes(Vec<u8>);

impl Bytes {
    /// The canonical zero-length value.
    pub const EMPTY: Bytes = Bytes(Vec::new());

    /// Parse a hex string. The `0x` prefix is optional and case is ignored.
    pub fn from_hex(input: &str) -> Result<Self, BytesError> {
        let digits = input
            .strip_prefix("0x")
            .or_else(|| input.strip_prefix("0X"))
            .unwrap_or(input);
        if digits.len() % 2 != 0 {
            return Err(BytesError::Format {
                input: input.to_string(),
                reason: "odd number of hex digits".into(),
            });
        }
        hex::decode(digits).map(Self).map_err(|e| BytesError::Format {
            input: input.to_string(),
            reason: e.to_string(),
        })
    }

    /// A single byte. Fails unless `value` is in `[0, 255]`.
    pub fn from_byte(value: i64) -> Result<Self, BytesError> {
        Ok(Self(vec![to_byte(value)?]))
    }

    /// Minimal big-endian encoding of a non-negative integer; `0` is empty.
    pub fn from_number(value: U256) -> Self {
        let word: [u8; 32] = value.to_be_bytes::<32>();
        let start = word.iter().position(|b| *b != 0).unwrap_or(word.len());
        Self(word[start..].to_vec())
    }

    /// Build from integer elements, each of which must be in `[0, 255]`.
    pub fn from_byte_array(values: &[i64]) -> Result<Self, BytesError> {
        values
            .iter()
            .map(|v| to_byte(*v))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The byte at `index`.
    pub fn get(&self, index: usize) -> Result<u8, BytesError> {
        self.0.get(index).copied().ok_or(BytesError::Index {
            index,
            len: self.0.len(),
        })
    }

    /// Half-open slice `[start, end)`. Indices are clamped to the length and
    /// an inverted range yields an empty value.
    pub fn slice(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.0.len());
        let start = start.min(end);
        Self(self.0[start..end].to_vec())
    }

    pub fn concat(&self, other: &Bytes) -> Self {
        let mut out = Vec::with_capacity(self.0.len() + other.0.len());
        out.extend_from_slice(&self.0);
        out.extend_from_slice(&other.0);
        Self(out)
    }

    /// Big-endian decode. Empty decodes to zero; leading zero bytes do not
    /// count toward the 32-byte limit.
    pub fn to_number(&self) -> Result<U256, BytesError> {
        let start = self.0.iter().position(|b| *b != 0).unwrap_or(self.0.len());
        if start == self.0.len() {
            return Ok(U256::ZERO);
        }
        U256::try_from_be_slice(&self.0[start..]).ok_or_else(|| {
            BytesError::Range(format!("{} does not fit in 256 bits", self))
        })
    }

    pub fn to_byte_array(&self) -> Vec<u8> {
        self.0.clone()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

fn to_byte(value: i64) -> Result<u8, BytesError> {
    u8::try_from(value).map_err(|_| BytesError::Range(format!("{value} is not a byte")))
}

impl fmt::Display for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl FromStr for Bytes {
    type Err = BytesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl From<&[u8]> for Bytes {
    fn from(v: &[u8]) -> Self {
        Self(v.to_vec())
    }
}

impl From<Address> for Bytes {
    fn from(a: Address) -> Self {
        Self(a.to_vec())
    }
}

impl From<alloy_primitives::Bytes> for Bytes {
    fn from(b: alloy_primitives::Bytes) -> Self {
        Self(b.to_vec())
    }
}

impl From<Bytes> for alloy_primitives::Bytes {
    fn from(b: Bytes) -> Self {
        alloy_primitives::Bytes::from(b.into_vec())
    }
}

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
