//! NFT workflows: derive the target account, encode the instruction, submit
//! it and wait for confirmation.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use nft_client_core::encode::InstructionPayload;
use nft_client_core::error::NftClientError;
use nft_client_core::instruction::NftInstruction;
use nft_client_core::pda::{collection_address, item_address};
use nft_client_core::serial::SerialCounter;
use nft_client_core::types::{AccountRef, Address, ProgramId, SYSTEM_PROGRAM_ID};
use nft_client_core::validation::{validate_collection_args, validate_metadata_uri};

use crate::submit::{Confirmation, Signature, SubmitError, TransactionSubmitter};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] NftClientError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error("{operation} transaction {signature} was not confirmed")]
    NotConfirmed {
        operation: &'static str,
        signature: Signature,
    },
}

/// Outcome of a confirmed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub signature: Signature,
    /// The account the instruction created or modified.
    pub account: Address,
    /// Set for mints.
    pub serial_number: Option<u64>,
}

pub struct NftService<S> {
    submitter: S,
    program_id: ProgramId,
    authority: Address,
    serials: Arc<SerialCounter>,
}

impl<S: TransactionSubmitter> NftService<S> {
    pub fn new(submitter: S, program_id: ProgramId, authority: Address, serials: Arc<SerialCounter>) -> Self {
        Self {
            submitter,
            program_id,
            authority,
            serials,
        }
    }

    pub fn program_id(&self) -> &ProgramId {
        &self.program_id
    }

    pub fn authority(&self) -> &Address {
        &self.authority
    }

    pub fn submitter(&self) -> &S {
        &self.submitter
    }

    pub async fn initialize_collection(
        &self,
        name: &str,
        symbol: &str,
        uri: &str,
        royalty_percentage: u8,
        is_mutable: bool,
    ) -> Result<Receipt, ServiceError> {
        validate_collection_args(name, symbol, uri, royalty_percentage)?;
        let collection = collection_address(&self.program_id, &self.authority, name)?;
        info!(%name, collection = %collection.address, bump = collection.bump, "initializing collection");

        let payload = NftInstruction::InitializeCollection {
            name: name.to_string(),
            symbol: symbol.to_string(),
            uri: uri.to_string(),
            royalty_percentage,
            is_mutable,
        }
        .encode()?;
        let accounts = [
            AccountRef::writable(collection.address, false),
            AccountRef::writable(self.authority, true),
            AccountRef::readonly(SYSTEM_PROGRAM_ID),
        ];
        let signature = self.send("initialize_collection", &accounts, payload).await?;
        Ok(Receipt {
            signature,
            account: collection.address,
            serial_number: None,
        })
    }

    /// Mint the next item of `collection`. The serial is reserved before
    /// submission and is not reused if the transaction fails.
    pub async fn mint(&self, collection: &Address, metadata_uri: &str) -> Result<Receipt, ServiceError> {
        validate_metadata_uri(metadata_uri)?;
        let serial_number = self.serials.reserve()?;
        let item = item_address(&self.program_id, collection, serial_number)?;
        info!(%collection, serial_number, item = %item.address, "minting");

        let payload = NftInstruction::MintNft {
            metadata_uri: metadata_uri.to_string(),
            serial_number,
        }
        .encode()?;
        let accounts = [
            AccountRef::readonly(*collection),
            AccountRef::writable(item.address, false),
            AccountRef::writable(self.authority, true),
            AccountRef::readonly(SYSTEM_PROGRAM_ID),
        ];
        let signature = self.send("mint", &accounts, payload).await?;
        Ok(Receipt {
            signature,
            account: item.address,
            serial_number: Some(serial_number),
        })
    }

    pub async fn transfer(&self, nft: &Address, new_owner: &Address) -> Result<Receipt, ServiceError> {
        info!(%nft, %new_owner, "transferring");
        let payload = NftInstruction::TransferNft { new_owner: *new_owner }.encode()?;
        let accounts = [
            AccountRef::writable(*nft, false),
            AccountRef::writable(self.authority, true),
            AccountRef::readonly(*new_owner),
        ];
        self.finish("transfer", *nft, &accounts, payload).await
    }

    pub async fn burn(&self, nft: &Address) -> Result<Receipt, ServiceError> {
        info!(%nft, "burning");
        let payload = NftInstruction::BurnNft.encode()?;
        let accounts = [
            AccountRef::writable(*nft, false),
            AccountRef::writable(self.authority, true),
        ];
        self.finish("burn", *nft, &accounts, payload).await
    }

    pub async fn update_item_metadata(
        &self,
        nft: &Address,
        collection: &Address,
        new_metadata_uri: &str,
    ) -> Result<Receipt, ServiceError> {
        validate_metadata_uri(new_metadata_uri)?;
        info!(%nft, %collection, "updating item metadata");
        let payload = NftInstruction::UpdateNftMetadata {
            new_metadata_uri: new_metadata_uri.to_string(),
        }
        .encode()?;
        let accounts = [
            AccountRef::writable(*nft, false),
            AccountRef::writable(self.authority, true),
            AccountRef::readonly(*collection),
        ];
        self.finish("update_item_metadata", *nft, &accounts, payload).await
    }

    pub async fn update_collection_metadata(
        &self,
        collection: &Address,
        new_uri: &str,
    ) -> Result<Receipt, ServiceError> {
        validate_metadata_uri(new_uri)?;
        info!(%collection, "updating collection metadata");
        let payload = NftInstruction::UpdateCollectionMetadata {
            new_uri: new_uri.to_string(),
        }
        .encode()?;
        let accounts = [
            AccountRef::writable(*collection, false),
            AccountRef::writable(self.authority, true),
        ];
        self.finish("update_collection_metadata", *collection, &accounts, payload).await
    }

    async fn finish(
        &self,
        operation: &'static str,
        account: Address,
        accounts: &[AccountRef],
        payload: InstructionPayload,
    ) -> Result<Receipt, ServiceError> {
        let signature = self.send(operation, accounts, payload).await?;
        Ok(Receipt {
            signature,
            account,
            serial_number: None,
        })
    }

    async fn send(
        &self,
        operation: &'static str,
        accounts: &[AccountRef],
        payload: InstructionPayload,
    ) -> Result<Signature, ServiceError> {
        let signature = self.submitter.submit(&self.program_id, accounts, payload).await?;
        info!(operation, %signature, "submitted, waiting for confirmation");
        match self.submitter.confirm(&signature).await? {
            Confirmation::Confirmed => {
                info!(operation, %signature, "confirmed");
                Ok(signature)
            }
            Confirmation::Pending => Err(ServiceError::NotConfirmed { operation, signature }),
        }
    }
}
