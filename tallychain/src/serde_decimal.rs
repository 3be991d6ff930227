//! Big integers as base-10 strings on the wire.
//!
//! Ballot clients exchange key material and ciphertexts as decimal
//! strings, so every `BigUint` field crossing a serialization boundary
//! uses `#[serde(with = "crate::serde_decimal")]`.

use num_bigint::BigUint;
use serde::{de, Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_str_radix(10))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BigUint::parse_bytes(s.as_bytes(), 10)
        .ok_or_else(|| de::Error::custom("invalid decimal big integer"))
}
