//! The fixed table of operations understood by the NFT program.
//!
//! Each operation tag maps to an ordered list of fields and the accounts the
//! instruction expects. The encoder, the decoder and the CLI all read from
//! this one table; the serializable view printed by `nft-cli schema` is built
//! from it as well.

use std::fmt;

use serde::Serialize;

use crate::error::NftClientError;
use crate::types::FieldType;

/// Operation selector, written as the first payload byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum OperationTag {
    InitializeCollection = 0,
    Mint = 1,
    Transfer = 2,
    Burn = 3,
    UpdateItemMetadata = 4,
    UpdateCollectionMetadata = 5,
}

impl OperationTag {
    pub const ALL: [OperationTag; 6] = [
        OperationTag::InitializeCollection,
        OperationTag::Mint,
        OperationTag::Transfer,
        OperationTag::Burn,
        OperationTag::UpdateItemMetadata,
        OperationTag::UpdateCollectionMetadata,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        self.schema().name
    }

    pub fn schema(self) -> &'static InstructionSchema {
        &SCHEMAS[self as usize]
    }
}

impl TryFrom<u8> for OperationTag {
    type Error = NftClientError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        OperationTag::ALL
            .get(tag as usize)
            .copied()
            .ok_or(NftClientError::UnknownOperation { tag })
    }
}

impl fmt::Display for OperationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named field slot in an operation's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

/// An account the instruction expects, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccountSpec {
    pub name: &'static str,
    pub writable: bool,
    pub signer: bool,
}

/// Layout of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InstructionSchema {
    pub name: &'static str,
    pub tag: OperationTag,
    pub fields: &'static [FieldSpec],
    pub accounts: &'static [AccountSpec],
}

const fn field(name: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec { name, ty }
}

const fn account(name: &'static str, writable: bool, signer: bool) -> AccountSpec {
    AccountSpec { name, writable, signer }
}

static SCHEMAS: [InstructionSchema; 6] = [
    InstructionSchema {
        name: "initialize_collection",
        tag: OperationTag::InitializeCollection,
        fields: &[
            field("name", FieldType::String),
            field("symbol", FieldType::String),
            field("uri", FieldType::String),
            field("royalty_percentage", FieldType::U8),
            field("is_mutable", FieldType::U8),
        ],
        accounts: &[
            account("collection", true, false),
            account("authority", true, true),
            account("system_program", false, false),
        ],
    },
    InstructionSchema {
        name: "mint",
        tag: OperationTag::Mint,
        fields: &[
            field("metadata_uri", FieldType::String),
            field("serial_number", FieldType::U64),
        ],
        accounts: &[
            account("collection", false, false),
            account("nft", true, false),
            account("authority", true, true),
            account("system_program", false, false),
        ],
    },
    InstructionSchema {
        name: "transfer",
        tag: OperationTag::Transfer,
        fields: &[field("new_owner", FieldType::Bytes(32))],
        accounts: &[
            account("nft", true, false),
            account("owner", true, true),
            account("new_owner", false, false),
        ],
    },
    InstructionSchema {
        name: "burn",
        tag: OperationTag::Burn,
        fields: &[],
        accounts: &[account("nft", true, false), account("owner", true, true)],
    },
    InstructionSchema {
        name: "update_item_metadata",
        tag: OperationTag::UpdateItemMetadata,
        fields: &[field("new_metadata_uri", FieldType::String)],
        accounts: &[
            account("nft", true, false),
            account("owner", true, true),
            account("collection", false, false),
        ],
    },
    InstructionSchema {
        name: "update_collection_metadata",
        tag: OperationTag::UpdateCollectionMetadata,
        fields: &[field("new_uri", FieldType::String)],
        accounts: &[account("collection", true, false), account("authority", true, true)],
    },
];

/// Serializable description of the whole program interface.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramSchema {
    pub name: &'static str,
    pub version: &'static str,
    pub instructions: &'static [InstructionSchema],
}

impl ProgramSchema {
    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub fn program_schema() -> ProgramSchema {
    ProgramSchema {
        name: "nft_program",
        version: env!("CARGO_PKG_VERSION"),
        instructions: &SCHEMAS,
    }
}
