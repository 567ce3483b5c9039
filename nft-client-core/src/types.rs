//! Core value types: addresses, derived addresses, account references and
//! instruction fields.

use std::fmt;
use std::str::FromStr;

use base58::{FromBase58, ToBase58};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::error::NftClientError;

/// Length in bytes of every ledger address.
pub const ADDRESS_LEN: usize = 32;

/// A 32-byte ledger address. Displays as base58.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, BorshSerialize, BorshDeserialize)]
pub struct Address([u8; ADDRESS_LEN]);

/// Identifier of the on-chain program that owns derived accounts.
pub type ProgramId = Address;

/// The native system program (all-zero address).
pub const SYSTEM_PROGRAM_ID: Address = Address([0u8; ADDRESS_LEN]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; ADDRESS_LEN] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Build an address from a slice that must be exactly 32 bytes.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, NftClientError> {
        let arr: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| NftClientError::InvalidAddress {
            input: format!("<{} bytes>", bytes.len()),
            message: format!("expected {} bytes", ADDRESS_LEN),
        })?;
        Ok(Self(arr))
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_base58())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = NftClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.from_base58().map_err(|e| NftClientError::InvalidAddress {
            input: s.to_string(),
            message: format!("not base58: {:?}", e),
        })?;
        if bytes.len() != ADDRESS_LEN {
            return Err(NftClientError::InvalidAddress {
                input: s.to_string(),
                message: format!("base58 decoded to {} bytes, expected {}", bytes.len(), ADDRESS_LEN),
            });
        }
        Self::try_from_slice(&bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A program-derived address together with the bump that pushed it off-curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedAddress {
    pub address: Address,
    pub bump: u8,
}

/// An account referenced by an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountRef {
    pub address: Address,
    pub writable: bool,
    pub signer: bool,
}

impl AccountRef {
    pub fn writable(address: Address, signer: bool) -> Self {
        Self { address, writable: true, signer }
    }

    pub fn readonly(address: Address) -> Self {
        Self { address, writable: false, signer: false }
    }
}

/// Declared type of one instruction field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    U8,
    U16,
    U32,
    U64,
    /// Raw byte array of a fixed width, written without a prefix.
    Bytes(usize),
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::U8 => write!(f, "u8"),
            FieldType::U16 => write!(f, "u16"),
            FieldType::U32 => write!(f, "u32"),
            FieldType::U64 => write!(f, "u64"),
            FieldType::Bytes(n) => write!(f, "[u8; {}]", n),
        }
    }
}

/// A typed instruction field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Str(String),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Bytes(Vec<u8>),
}

impl Field {
    /// The type this value would satisfy in a schema.
    pub fn field_type(&self) -> FieldType {
        match self {
            Field::Str(_) => FieldType::String,
            Field::U8(_) => FieldType::U8,
            Field::U16(_) => FieldType::U16,
            Field::U32(_) => FieldType::U32,
            Field::U64(_) => FieldType::U64,
            Field::Bytes(b) => FieldType::Bytes(b.len()),
        }
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::Str(s.to_string())
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Field::Str(s)
    }
}

impl From<Address> for Field {
    fn from(a: Address) -> Self {
        Field::Bytes(a.to_bytes().to_vec())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Str(s) => write!(f, "\"{}\"", s),
            Field::U8(v) => write!(f, "{}", v),
            Field::U16(v) => write!(f, "{}", v),
            Field::U32(v) => write!(f, "{}", v),
            Field::U64(v) => write!(f, "{}", v),
            Field::Bytes(bytes) if bytes.len() == ADDRESS_LEN => write!(f, "{}", bytes.to_base58()),
            Field::Bytes(bytes) => {
                write!(f, "0x")?;
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}
