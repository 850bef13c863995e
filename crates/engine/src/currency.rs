use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::EngineError;

/// Three-letter currency code of a budget or an expense.
///
/// `BRL`, `USD` and `THB` are the codes the bot knows how to convert between.
/// Any other code made of three ASCII letters is still accepted, so stored
/// documents and user input are never rejected only because of the code; the
/// conversion service decides what to do with it.
///
/// Every supported currency uses 2 minor units (see [`Money`](crate::Money)).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Currency([u8; 3]);

impl Currency {
    pub const BRL: Currency = Currency(*b"BRL");
    pub const USD: Currency = Currency(*b"USD");
    pub const THB: Currency = Currency(*b"THB");

    /// Codes with a known conversion path.
    pub const SUPPORTED: [Currency; 3] = [Currency::BRL, Currency::USD, Currency::THB];

    /// Canonical (upper-case) currency code.
    #[must_use]
    pub fn code(&self) -> &str {
        // Only built from validated ASCII letters.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        Self::SUPPORTED.contains(self)
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl core::fmt::Debug for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Currency({})", self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let upper = value.trim().to_ascii_uppercase();
        match upper.as_bytes() {
            [a, b, c] if upper.bytes().all(|byte| byte.is_ascii_uppercase()) => {
                Ok(Currency([*a, *b, *c]))
            }
            _ => Err(EngineError::InvalidCurrency(format!(
                "not a currency code: {value}"
            ))),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::try_from(s)
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Currency::try_from(raw.as_str()).map_err(serde::de::Error::custom)
    }
}
