//! Block tags: a historical block height or the chain head.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::BytesError;

/// The chain state a read call targets.
///
/// `Latest` orders after every height, so threshold comparisons treat it as
/// the newest possible block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockTag {
    Number(u64),
    #[default]
    Latest,
}

impl BlockTag {
    /// The height, or `None` for `Latest`.
    pub fn number(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Latest => None,
        }
    }

    /// JSON-RPC form: a hex quantity (`0x1b4`) or `"latest"`.
    pub fn to_rpc_param(&self) -> String {
        match self {
            Self::Number(n) => format!("{n:#x}"),
            Self::Latest => "latest".into(),
        }
    }
}

impl From<u64> for BlockTag {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Latest => write!(f, "latest"),
        }
    }
}

impl FromStr for BlockTag {
    type Err = BytesError;

    /// Accepts `latest`, a decimal height, or a `0x` hex quantity.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("latest") {
            return Ok(Self::Latest);
        }
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(digits) => u64::from_str_radix(digits, 16),
            None => s.parse::<u64>(),
        };
        parsed.map(Self::Number).map_err(|e| BytesError::Format {
            input: s.to_string(),
            reason: format!("not a block tag: {e}"),
        })
    }
}

impl Serialize for BlockTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rpc_param())
    }
}

impl<'de> Deserialize<'de> for BlockTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
