//! Pre-submission checks.
//!
//! `validate_fields` is the schema gate used by the encoder. The remaining
//! helpers repeat checks the on-chain program performs so a bad request fails
//! before a transaction is built.

use crate::error::{NftClientError, NftResult};
use crate::schema::OperationTag;
use crate::state::{MAX_NAME_LEN, MAX_SYMBOL_LEN, MAX_URI_LEN};
use crate::types::Field;

/// Validate that `fields` match the operation's schema in count, type and width.
pub fn validate_fields(tag: OperationTag, fields: &[Field]) -> NftResult<()> {
    let schema = tag.schema();
    if fields.len() != schema.fields.len() {
        return Err(NftClientError::schema_mismatch(
            schema.name,
            format!("expected {} field(s), got {}", schema.fields.len(), fields.len()),
        ));
    }
    for (index, (spec, value)) in schema.fields.iter().zip(fields).enumerate() {
        let actual = value.field_type();
        if actual != spec.ty {
            return Err(NftClientError::schema_mismatch(
                schema.name,
                format!("field {} '{}' expects {}, got {}", index, spec.name, spec.ty, actual),
            ));
        }
    }
    Ok(())
}

/// Royalty is a whole percentage.
pub fn validate_royalty_percentage(percentage: u8) -> NftResult<()> {
    if percentage > 100 {
        return Err(NftClientError::InvalidRoyaltyPercentage {
            percentage: percentage.into(),
        });
    }
    Ok(())
}

/// Check a string against the space reserved for it in the account layout.
pub fn check_account_limit(field: &str, value: &str, max: usize) -> NftResult<()> {
    if value.len() > max {
        return Err(NftClientError::FieldExceedsAccountLimit {
            field: field.to_string(),
            len: value.len(),
            max,
        });
    }
    Ok(())
}

pub fn validate_metadata_uri(uri: &str) -> NftResult<()> {
    if uri.trim().is_empty() {
        return Err(NftClientError::InvalidMetadataUri {
            message: "URI is empty".to_string(),
        });
    }
    check_account_limit("uri", uri, MAX_URI_LEN)
}

/// All checks for a new collection.
pub fn validate_collection_args(
    name: &str,
    symbol: &str,
    uri: &str,
    royalty_percentage: u8,
) -> NftResult<()> {
    check_account_limit("name", name, MAX_NAME_LEN)?;
    check_account_limit("symbol", symbol, MAX_SYMBOL_LEN)?;
    validate_metadata_uri(uri)?;
    validate_royalty_percentage(royalty_percentage)
}
