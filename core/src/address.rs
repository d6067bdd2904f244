use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha1::Sha1;

pub const ADDRESS_LEN: usize = 20;

/// A fixed-width storage or entity address.
///
/// Addresses name both on-chain storage locations and logical entities, and
/// double as the business key when a document is upserted into the store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("invalid address length: expected {ADDRESS_LEN} bytes, got {0}")]
    InvalidLength(usize),
    #[error("invalid hex string: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        let bytes: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| AddressError::InvalidLength(bytes.len()))?;
        Ok(Address(bytes))
    }

    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Hex encoding without the `0x` prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Derive a child address with the ledger's keyed-hash formula.
    ///
    /// The derived address is HMAC-SHA1 over the address bytes, keyed with
    /// the UTF-8 bytes of `key`. Legacy-layout storage locations (for
    /// example the per-avatar inventory) are derived this way.
    pub fn derive(&self, key: &str) -> Address {
        let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
            .expect("hmac accepts keys of any length");
        mac.update(&self.0);
        Address(mac.finalize().into_bytes().into())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AddressVisitor;

        impl<'de> Visitor<'de> for AddressVisitor {
            type Value = Address;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a hex-encoded address")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Address, E> {
                Address::from_hex(value).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(AddressVisitor)
    }
}

/// Well-known account addresses of the current storage layout.
///
/// Entities created before the account split live under the legacy top-level
/// account instead and are reached through the fallback path of the resolver.
pub mod accounts {
    use super::{Address, ADDRESS_LEN};

    const fn tagged(tag: u8) -> Address {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[ADDRESS_LEN - 1] = tag;
        Address::new(bytes)
    }

    pub const TABLE_SHEET: Address = tagged(0x10);
    pub const ARENA: Address = tagged(0x11);
    pub const AVATAR: Address = tagged(0x1a);
    pub const INVENTORY: Address = tagged(0x1b);
}
