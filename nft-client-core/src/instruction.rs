//! Typed instructions for the NFT program.
//!
//! Encoding goes through the schema table, and the bytes come out identical
//! to the borsh encoding the program decodes on-chain.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::encode::{decode_instruction, encode_instruction, InstructionPayload};
use crate::error::{NftClientError, NftResult};
use crate::schema::OperationTag;
use crate::types::{Address, Field};

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum NftInstruction {
    /// Accounts:
    /// 0. `[writable]` collection (PDA)
    /// 1. `[writable, signer]` authority
    /// 2. `[]` system program
    InitializeCollection {
        name: String,
        symbol: String,
        uri: String,
        /// 0-100
        royalty_percentage: u8,
        is_mutable: bool,
    },

    /// Accounts:
    /// 0. `[]` collection
    /// 1. `[writable]` nft (PDA)
    /// 2. `[writable, signer]` authority
    /// 3. `[]` system program
    MintNft {
        metadata_uri: String,
        serial_number: u64,
    },

    /// Accounts:
    /// 0. `[writable]` nft
    /// 1. `[writable, signer]` current owner
    /// 2. `[]` new owner
    TransferNft {
        new_owner: Address,
    },

    /// Accounts:
    /// 0. `[writable]` nft
    /// 1. `[writable, signer]` owner
    BurnNft,

    /// Accounts:
    /// 0. `[writable]` nft
    /// 1. `[writable, signer]` owner
    /// 2. `[]` collection
    UpdateNftMetadata {
        new_metadata_uri: String,
    },

    /// Accounts:
    /// 0. `[writable]` collection
    /// 1. `[writable, signer]` authority
    UpdateCollectionMetadata {
        new_uri: String,
    },
}

impl NftInstruction {
    pub fn tag(&self) -> OperationTag {
        match self {
            NftInstruction::InitializeCollection { .. } => OperationTag::InitializeCollection,
            NftInstruction::MintNft { .. } => OperationTag::Mint,
            NftInstruction::TransferNft { .. } => OperationTag::Transfer,
            NftInstruction::BurnNft => OperationTag::Burn,
            NftInstruction::UpdateNftMetadata { .. } => OperationTag::UpdateItemMetadata,
            NftInstruction::UpdateCollectionMetadata { .. } => OperationTag::UpdateCollectionMetadata,
        }
    }

    /// Field values in schema order.
    pub fn fields(&self) -> Vec<Field> {
        match self {
            NftInstruction::InitializeCollection {
                name,
                symbol,
                uri,
                royalty_percentage,
                is_mutable,
            } => vec![
                Field::from(name.as_str()),
                Field::from(symbol.as_str()),
                Field::from(uri.as_str()),
                Field::U8(*royalty_percentage),
                Field::U8(u8::from(*is_mutable)),
            ],
            NftInstruction::MintNft {
                metadata_uri,
                serial_number,
            } => vec![Field::from(metadata_uri.as_str()), Field::U64(*serial_number)],
            NftInstruction::TransferNft { new_owner } => vec![Field::from(*new_owner)],
            NftInstruction::BurnNft => vec![],
            NftInstruction::UpdateNftMetadata { new_metadata_uri } => {
                vec![Field::from(new_metadata_uri.as_str())]
            }
            NftInstruction::UpdateCollectionMetadata { new_uri } => vec![Field::from(new_uri.as_str())],
        }
    }

    pub fn encode(&self) -> NftResult<InstructionPayload> {
        encode_instruction(self.tag(), &self.fields())
    }

    /// Rebuild a typed instruction from payload bytes.
    pub fn decode(bytes: &[u8]) -> NftResult<Self> {
        let (tag, fields) = decode_instruction(bytes)?;
        let mut fields = fields.into_iter();
        let mut next = || {
            fields.next().ok_or_else(|| {
                NftClientError::malformed(bytes.len(), format!("missing field for {}", tag))
            })
        };

        let ix = match tag {
            OperationTag::InitializeCollection => NftInstruction::InitializeCollection {
                name: expect_str(next()?, tag)?,
                symbol: expect_str(next()?, tag)?,
                uri: expect_str(next()?, tag)?,
                royalty_percentage: expect_u8(next()?, tag)?,
                is_mutable: match expect_u8(next()?, tag)? {
                    0 => false,
                    1 => true,
                    other => {
                        return Err(NftClientError::malformed(
                            bytes.len() - 1,
                            format!("is_mutable must be 0 or 1, got {}", other),
                        ))
                    }
                },
            },
            OperationTag::Mint => NftInstruction::MintNft {
                metadata_uri: expect_str(next()?, tag)?,
                serial_number: match next()? {
                    Field::U64(v) => v,
                    other => return Err(unexpected(tag, &other)),
                },
            },
            OperationTag::Transfer => NftInstruction::TransferNft {
                new_owner: match next()? {
                    Field::Bytes(b) => Address::try_from_slice(&b)?,
                    other => return Err(unexpected(tag, &other)),
                },
            },
            OperationTag::Burn => NftInstruction::BurnNft,
            OperationTag::UpdateItemMetadata => NftInstruction::UpdateNftMetadata {
                new_metadata_uri: expect_str(next()?, tag)?,
            },
            OperationTag::UpdateCollectionMetadata => NftInstruction::UpdateCollectionMetadata {
                new_uri: expect_str(next()?, tag)?,
            },
        };
        Ok(ix)
    }
}

fn unexpected(tag: OperationTag, field: &Field) -> NftClientError {
    NftClientError::schema_mismatch(tag.name(), format!("unexpected field {:?}", field))
}

fn expect_str(field: Field, tag: OperationTag) -> NftResult<String> {
    match field {
        Field::Str(s) => Ok(s),
        other => Err(unexpected(tag, &other)),
    }
}

fn expect_u8(field: Field, tag: OperationTag) -> NftResult<u8> {
    match field {
        Field::U8(v) => Ok(v),
        other => Err(unexpected(tag, &other)),
    }
}
