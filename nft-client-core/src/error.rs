//! Structured error types for address derivation and instruction encoding.
//!
//! Every failure in the core is a distinct variant; nothing falls back to a
//! default value.

use thiserror::Error;

/// Result type alias for core operations.
pub type NftResult<T> = Result<T, NftClientError>;

/// Error type shared by the deriver, the encoder and the validators.
///
/// # Example
/// ```rust
/// use nft_client_core::error::NftClientError;
///
/// fn check_royalty(percentage: u16) -> Result<(), NftClientError> {
///     if percentage > 100 {
///         return Err(NftClientError::InvalidRoyaltyPercentage { percentage });
///     }
///     Ok(())
/// }
///
/// assert_eq!(check_royalty(101).unwrap_err().error_code(), 1200);
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NftClientError {
    /// No bump in 255..=0 produced an off-curve address
    #[error("Unable to find an off-curve address for the given seeds")]
    AddressDerivationExhausted,

    /// A single candidate address landed on the ed25519 curve
    #[error("Provided seeds produce an on-curve address")]
    InvalidSeeds,

    /// A seed is longer than the ledger allows
    #[error("Seed {index} is {len} bytes, max {max}")]
    SeedTooLong {
        index: usize,
        len: usize,
        max: usize,
    },

    /// Too many seeds for one derivation
    #[error("Got {count} seeds, max {max}")]
    TooManySeeds {
        count: usize,
        max: usize,
    },

    /// String field does not fit in a u32 length prefix
    #[error("Field '{field}' is {len} bytes, which exceeds the u32 length prefix")]
    FieldTooLarge {
        field: String,
        len: usize,
    },

    /// Supplied fields do not match the operation's schema
    #[error("Schema mismatch for {operation}: {reason}")]
    SchemaMismatch {
        operation: String,
        reason: String,
    },

    /// Payload starts with a tag outside the schema table
    #[error("Unknown operation tag {tag}")]
    UnknownOperation {
        tag: u8,
    },

    /// Payload could not be decoded against its schema
    #[error("Malformed payload at byte {offset}: {reason}")]
    MalformedPayload {
        offset: usize,
        reason: String,
    },

    #[error("Royalty percentage {percentage} is out of range 0-100")]
    InvalidRoyaltyPercentage {
        percentage: u16,
    },

    /// String is longer than the space reserved in the on-chain account
    #[error("Field '{field}' is {len} bytes, account layout allows {max}")]
    FieldExceedsAccountLimit {
        field: String,
        len: usize,
        max: usize,
    },

    #[error("Invalid metadata URI: {message}")]
    InvalidMetadataUri {
        message: String,
    },

    #[error("Invalid address '{input}': {message}")]
    InvalidAddress {
        input: String,
        message: String,
    },

    /// The serial counter reached u64::MAX
    #[error("Serial numbers exhausted")]
    SerialExhausted,

    /// Account data did not decode into the expected layout
    #[error("Failed to decode {account} account data: {message}")]
    AccountDecode {
        account: String,
        message: String,
    },
}

impl NftClientError {
    pub(crate) fn schema_mismatch(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        NftClientError::SchemaMismatch {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        NftClientError::MalformedPayload {
            offset,
            reason: reason.into(),
        }
    }

    /// Get a numeric error code for client-side handling.
    pub fn error_code(&self) -> u32 {
        match self {
            NftClientError::AddressDerivationExhausted => 1000,
            NftClientError::InvalidSeeds => 1001,
            NftClientError::SeedTooLong { .. } => 1002,
            NftClientError::TooManySeeds { .. } => 1003,
            NftClientError::FieldTooLarge { .. } => 1100,
            NftClientError::SchemaMismatch { .. } => 1101,
            NftClientError::UnknownOperation { .. } => 1102,
            NftClientError::MalformedPayload { .. } => 1103,
            NftClientError::InvalidRoyaltyPercentage { .. } => 1200,
            NftClientError::FieldExceedsAccountLimit { .. } => 1201,
            NftClientError::InvalidMetadataUri { .. } => 1202,
            NftClientError::InvalidAddress { .. } => 1300,
            NftClientError::SerialExhausted => 1301,
            NftClientError::AccountDecode { .. } => 1302,
        }
    }
}
