pub mod coin;
pub mod descriptor;
pub mod error;
pub mod position;
pub mod ptb;
pub mod simulation;

use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::models::error::AddressParseError;

/// Fully qualified Move type literal, e.g. `0x2::sui::SUI`.
pub type TypeTag = String;

/// Rewrites every address inside a type literal to its full 64 digit lowercase form, so
/// `0x2::sui::SUI` and `0x0000..0002::sui::SUI` compare equal.
pub fn normalize_type_tag(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len() + 64);
    let mut rest = tag.trim();
    while let Some(pos) = rest.find("0x") {
        let at_token_start = rest[..pos]
            .chars()
            .last()
            .map_or(true, |c| !(c.is_ascii_alphanumeric() || c == '_'));
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];
        let digits_len = after
            .chars()
            .take_while(char::is_ascii_hexdigit)
            .count();
        let (digits, tail) = after.split_at(digits_len);
        out.push_str("0x");
        if at_token_start && digits_len > 0 && digits_len <= 64 && tail.starts_with("::") {
            out.push_str(&format!("{:0>64}", digits.to_ascii_lowercase()));
        } else {
            out.push_str(digits);
        }
        rest = tail;
    }
    out.push_str(rest);
    out
}

/// Object id literal type. Objects and accounts share the same 32 byte id space.
pub type ObjectId = Address;

/// A 32 byte account or object identifier.
///
/// Parses both the full 64 digit form and the short form used for system objects
/// (`0x5`, `0x6`). Always displays in the full, zero padded form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; Address::LENGTH]);

impl Address {
    pub const LENGTH: usize = 32;

    /// Builds an address from a small integer, handy for system objects like the clock.
    pub const fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; Address::LENGTH];
        let be = value.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            bytes[Address::LENGTH - 8 + i] = be[i];
            i += 1;
        }
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; Address::LENGTH] {
        &self.0
    }

    pub fn to_hex_literal(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(AddressParseError::Empty);
        }
        if digits.len() > Address::LENGTH * 2 {
            return Err(AddressParseError::TooLong(s.to_string()));
        }
        let padded = format!("{digits:0>64}");
        let decoded = hex::decode(&padded)
            .map_err(|e| AddressParseError::InvalidHex(s.to_string(), e))?;
        let mut bytes = [0u8; Address::LENGTH];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl From<[u8; Address::LENGTH]> for Address {
    fn from(value: [u8; Address::LENGTH]) -> Self {
        Self(value)
    }
}

// Human readable formats (json, yaml) carry the hex literal, BCS carries the raw 32 bytes
// so the same type can be passed as a pure call argument.
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex_literal())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let literal = String::deserialize(deserializer)?;
            Address::from_str(&literal).map_err(de::Error::custom)
        } else {
            <[u8; Address::LENGTH]>::deserialize(deserializer).map(Address)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::clock("0x6", Address::from_low_u64(6))]
    #[case::system_state("0x5", Address::from_low_u64(5))]
    #[case::no_prefix("2", Address::from_low_u64(2))]
    #[case::odd_length("0x123", Address::from_low_u64(0x123))]
    fn test_parse_short_literals(#[case] literal: &str, #[case] expected: Address) {
        assert_eq!(Address::from_str(literal).unwrap(), expected);
    }

    #[test]
    fn test_normalize_type_tag_pads_nested_addresses() {
        let normalized = normalize_type_tag(" 0xABC::vault::Share<0x2::sui::SUI> ");

        assert_eq!(
            normalized,
            format!(
                "0x{:0>64}::vault::Share<0x{:0>64}::sui::SUI>",
                "abc", "2"
            )
        );
        assert_eq!(normalize_type_tag(&normalized), normalized);
    }

    #[test]
    fn test_normalize_type_tag_leaves_identifiers_alone() {
        assert_eq!(normalize_type_tag("u64"), "u64");
        assert_eq!(normalize_type_tag("0x2::coin::Coin<T0x1>"), format!("0x{:0>64}::coin::Coin<T0x1>", "2"));
    }

    #[test]
    fn test_display_is_zero_padded() {
        let clock = Address::from_low_u64(6);
        assert_eq!(
            clock.to_string(),
            "0x0000000000000000000000000000000000000000000000000000000000000006"
        );
    }

    #[rstest]
    #[case::empty("0x")]
    #[case::not_hex("0xzz")]
    fn test_parse_rejects_malformed(#[case] literal: &str) {
        assert!(Address::from_str(literal).is_err());
    }

    #[test]
    fn test_parse_rejects_more_than_32_bytes() {
        let literal = format!("0x{}", "1".repeat(65));
        assert!(matches!(Address::from_str(&literal), Err(AddressParseError::TooLong(_))));
    }

    #[test]
    fn test_bcs_encoding_is_raw_bytes() {
        let address = Address::from_low_u64(0xabcd);
        let encoded = bcs::to_bytes(&address).unwrap();

        assert_eq!(encoded.len(), Address::LENGTH);
        assert_eq!(&encoded[30..], &[0xab, 0xcd]);
        assert_eq!(bcs::from_bytes::<Address>(&encoded).unwrap(), address);
    }

    #[test]
    fn test_json_encoding_is_hex_literal() {
        let address = Address::from_low_u64(6);
        let json = serde_json::to_string(&address).unwrap();

        assert_eq!(json, format!("\"{}\"", address.to_hex_literal()));
        assert_eq!(serde_json::from_str::<Address>("\"0x6\"").unwrap(), address);
    }
}
