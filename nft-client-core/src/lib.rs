//! # NFT Client Core
//!
//! Program-derived address computation and instruction encoding for the
//! NFT program. Everything here is pure and synchronous.
//!
//! A caller that can fetch account data resumes minting where the collection
//! left off: decode the collection account, seed a [`serial::SerialCounter`]
//! from it, and derive each item address from the reserved serial.
//!
//! ```rust
//! use borsh::to_vec;
//! use nft_client_core::prelude::*;
//! use nft_client_core::state::{CollectionAccount, COLLECTION_ACCOUNT_SIZE};
//!
//! let program_id = Address::new([0x11; 32]);
//! let collection_key = Address::new([0x33; 32]);
//!
//! // Account data as stored on the ledger: the record plus zero padding.
//! let mut data = to_vec(&CollectionAccount {
//!     authority: Address::new([0x22; 32]),
//!     name: "Dragons".to_string(),
//!     symbol: "DRG".to_string(),
//!     uri: "ipfs://dragons".to_string(),
//!     royalty_percentage: 5,
//!     is_mutable: true,
//!     total_minted: 3,
//! })
//! .unwrap();
//! data.resize(COLLECTION_ACCOUNT_SIZE, 0);
//!
//! let collection = CollectionAccount::try_from_account_data(&data).unwrap();
//! let serials = SerialCounter::from_collection(&collection).unwrap();
//! let serial = serials.reserve().unwrap();
//! assert_eq!(serial, 4);
//!
//! let item = item_address(&program_id, &collection_key, serial).unwrap();
//! let payload = NftInstruction::MintNft {
//!     metadata_uri: "ipfs://dragon-4".to_string(),
//!     serial_number: serial,
//! }
//! .encode()
//! .unwrap();
//! assert_eq!(payload.tag(), OperationTag::Mint);
//! assert_ne!(item.address, collection_key);
//! ```

pub mod error;
pub mod types;
pub mod pda;
pub mod schema;
pub mod encode;
pub mod instruction;
pub mod validation;
pub mod state;
pub mod serial;

pub mod prelude {
    pub use crate::encode::{decode_instruction, encode_instruction, InstructionPayload};
    pub use crate::error::{NftClientError, NftResult};
    pub use crate::instruction::NftInstruction;
    pub use crate::pda::{collection_address, find_program_address, item_address};
    pub use crate::schema::OperationTag;
    pub use crate::serial::SerialCounter;
    pub use crate::types::{AccountRef, Address, DerivedAddress, Field, FieldType, ProgramId};
}
