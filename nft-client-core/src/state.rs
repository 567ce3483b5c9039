//! On-chain account layouts written by the NFT program.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::{NftClientError, NftResult};
use crate::types::Address;

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_SYMBOL_LEN: usize = 10;
pub const MAX_URI_LEN: usize = 200;

/// Bytes allocated for a collection account.
pub const COLLECTION_ACCOUNT_SIZE: usize = 32 // authority
    + 4 + MAX_NAME_LEN
    + 4 + MAX_SYMBOL_LEN
    + 4 + MAX_URI_LEN
    + 1 // royalty_percentage
    + 1 // is_mutable
    + 8; // total_minted

/// Bytes allocated for an item account.
pub const NFT_ACCOUNT_SIZE: usize = 32 // owner
    + 32 // collection
    + 4 + MAX_URI_LEN
    + 1 // is_minted
    + 8 // serial_number
    + 8 // created_at
    + 8; // updated_at

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CollectionAccount {
    pub authority: Address,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub royalty_percentage: u8,
    pub is_mutable: bool,
    pub total_minted: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct NftAccount {
    pub owner: Address,
    pub collection: Address,
    pub metadata_uri: String,
    pub is_minted: bool,
    pub serial_number: u64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CollectionAccount {
    /// Decode account data. Accounts are allocated at a fixed size, so
    /// the record is followed by zero padding.
    pub fn try_from_account_data(data: &[u8]) -> NftResult<Self> {
        decode_padded(data, "collection")
    }

    /// Serial the next mint should use.
    pub fn next_serial(&self) -> NftResult<u64> {
        self.total_minted
            .checked_add(1)
            .ok_or(NftClientError::SerialExhausted)
    }
}

impl NftAccount {
    pub fn try_from_account_data(data: &[u8]) -> NftResult<Self> {
        decode_padded(data, "nft")
    }
}

fn decode_padded<T: BorshDeserialize>(data: &[u8], account: &str) -> NftResult<T> {
    let mut cursor = data;
    let value = T::deserialize(&mut cursor).map_err(|e| NftClientError::AccountDecode {
        account: account.to_string(),
        message: e.to_string(),
    })?;
    if cursor.iter().any(|b| *b != 0) {
        return Err(NftClientError::AccountDecode {
            account: account.to_string(),
            message: format!("{} non-zero trailing byte(s)", cursor.len()),
        });
    }
    Ok(value)
}
