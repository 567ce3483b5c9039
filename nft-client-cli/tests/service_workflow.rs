//! Workflow service against the dry-run ledger and scripted submitters.

use std::collections::HashSet;
use std::sync::Arc;

use nft_client_cli::metadata::NftMetadata;
use nft_client_cli::service::{NftService, ServiceError};
use nft_client_cli::submit::{
    BalanceProvider, Confirmation, DryRunSubmitter, Signature, SubmitError, TransactionSubmitter,
};
use nft_client_core::encode::InstructionPayload;
use nft_client_core::error::NftClientError;
use nft_client_core::instruction::NftInstruction;
use nft_client_core::pda::{collection_address, item_address};
use nft_client_core::serial::SerialCounter;
use nft_client_core::types::{AccountRef, Address, ProgramId, SYSTEM_PROGRAM_ID};

fn program_id() -> ProgramId {
    Address::new([0x11; 32])
}

fn authority() -> Address {
    Address::new([0x22; 32])
}

fn dry_run_service(first_serial: u64) -> NftService<DryRunSubmitter> {
    NftService::new(
        DryRunSubmitter::new("http://localhost:8899"),
        program_id(),
        authority(),
        Arc::new(SerialCounter::starting_at(first_serial)),
    )
}

/// Fails every submission with the configured error.
struct FailingSubmitter(SubmitError);

impl TransactionSubmitter for FailingSubmitter {
    async fn submit(
        &self,
        _program_id: &ProgramId,
        _accounts: &[AccountRef],
        _payload: InstructionPayload,
    ) -> Result<Signature, SubmitError> {
        Err(self.0.clone())
    }

    async fn confirm(&self, signature: &Signature) -> Result<Confirmation, SubmitError> {
        Err(SubmitError::UnknownTransaction(signature.clone()))
    }
}

/// Accepts every submission but never confirms it.
struct PendingSubmitter;

impl TransactionSubmitter for PendingSubmitter {
    async fn submit(
        &self,
        _program_id: &ProgramId,
        _accounts: &[AccountRef],
        _payload: InstructionPayload,
    ) -> Result<Signature, SubmitError> {
        Ok(Signature::new("pending-sig"))
    }

    async fn confirm(&self, _signature: &Signature) -> Result<Confirmation, SubmitError> {
        Ok(Confirmation::Pending)
    }
}

#[tokio::test]
async fn test_initialize_collection_targets_derived_address() {
    let service = dry_run_service(1);
    let receipt = service
        .initialize_collection("Dragons", "DRG", "ipfs://dragons", 5, true)
        .await
        .unwrap();

    let expected = collection_address(&program_id(), &authority(), "Dragons").unwrap();
    assert_eq!(receipt.account, expected.address);
    assert_eq!(receipt.serial_number, None);

    let txs = service.submitter().transactions().unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].signature, receipt.signature);
    assert_eq!(txs[0].program_id, program_id());
    assert_eq!(
        txs[0].accounts,
        vec![
            AccountRef::writable(expected.address, false),
            AccountRef::writable(authority(), true),
            AccountRef::readonly(SYSTEM_PROGRAM_ID),
        ]
    );
    let decoded = NftInstruction::decode(&txs[0].data).unwrap();
    assert_eq!(
        decoded,
        NftInstruction::InitializeCollection {
            name: "Dragons".to_string(),
            symbol: "DRG".to_string(),
            uri: "ipfs://dragons".to_string(),
            royalty_percentage: 5,
            is_mutable: true,
        }
    );
}

#[tokio::test]
async fn test_mint_uses_reserved_serial_in_seed_and_payload() {
    let service = dry_run_service(7);
    let collection = Address::new([0x33; 32]);

    let receipt = service.mint(&collection, "ipfs://abc").await.unwrap();
    assert_eq!(receipt.serial_number, Some(7));
    let expected = item_address(&program_id(), &collection, 7).unwrap();
    assert_eq!(receipt.account, expected.address);

    let txs = service.submitter().transactions().unwrap();
    let mut expected_data = vec![1u8, 10, 0, 0, 0];
    expected_data.extend_from_slice(b"ipfs://abc");
    expected_data.extend_from_slice(&7u64.to_le_bytes());
    assert_eq!(txs[0].data, expected_data);
    assert_eq!(txs[0].accounts[0], AccountRef::readonly(collection));
    assert_eq!(txs[0].accounts[1], AccountRef::writable(expected.address, false));

    let second = service.mint(&collection, "ipfs://def").await.unwrap();
    assert_eq!(second.serial_number, Some(8));
    assert_ne!(second.account, receipt.account);
}

#[tokio::test]
async fn test_transfer_and_burn_payloads() {
    let service = dry_run_service(1);
    let nft = Address::new([0x44; 32]);
    let new_owner = Address::new([0x55; 32]);

    let transfer = service.transfer(&nft, &new_owner).await.unwrap();
    assert_eq!(transfer.account, nft);
    let burn = service.burn(&nft).await.unwrap();
    assert_ne!(transfer.signature, burn.signature);

    let txs = service.submitter().transactions().unwrap();
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].data.len(), 33);
    assert_eq!(txs[0].data[0], 2);
    assert_eq!(&txs[0].data[1..], new_owner.as_bytes());
    assert_eq!(txs[0].accounts[2], AccountRef::readonly(new_owner));
    assert_eq!(txs[1].data, vec![3u8]);
    assert_eq!(txs[1].accounts.len(), 2);
}

#[tokio::test]
async fn test_metadata_updates() {
    let service = dry_run_service(1);
    let nft = Address::new([0x44; 32]);
    let collection = Address::new([0x33; 32]);

    service
        .update_item_metadata(&nft, &collection, "ipfs://v2")
        .await
        .unwrap();
    service
        .update_collection_metadata(&collection, "ipfs://c2")
        .await
        .unwrap();

    let txs = service.submitter().transactions().unwrap();
    assert_eq!(txs[0].data[0], 4);
    assert_eq!(txs[0].accounts[2], AccountRef::readonly(collection));
    assert_eq!(txs[1].data[0], 5);
    assert_eq!(txs[1].accounts[0], AccountRef::writable(collection, false));
}

#[tokio::test]
async fn test_validation_fails_before_submission() {
    let service = dry_run_service(1);

    let err = service
        .initialize_collection("Dragons", "DRG", "ipfs://dragons", 101, true)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Core(NftClientError::InvalidRoyaltyPercentage { percentage: 101 })
    ));

    let err = service.mint(&Address::new([0x33; 32]), "  ").await.unwrap_err();
    assert!(matches!(err, ServiceError::Core(NftClientError::InvalidMetadataUri { .. })));

    let long_name = "n".repeat(51);
    let err = service
        .initialize_collection(&long_name, "DRG", "ipfs://dragons", 5, true)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Core(NftClientError::FieldExceedsAccountLimit { .. })
    ));

    assert!(service.submitter().transactions().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_error_propagates_unchanged() {
    let error = SubmitError::InsufficientFunds {
        available: 10,
        required: 5000,
    };
    let serials = Arc::new(SerialCounter::new());
    let service = NftService::new(
        FailingSubmitter(error.clone()),
        program_id(),
        authority(),
        serials.clone(),
    );

    let err = service.burn(&Address::new([0x44; 32])).await.unwrap_err();
    match err {
        ServiceError::Submit(inner) => assert_eq!(inner, error),
        other => panic!("expected submit error, got {:?}", other),
    }

    // A failed mint still consumes its serial.
    let err = service.mint(&Address::new([0x33; 32]), "ipfs://abc").await.unwrap_err();
    assert!(matches!(err, ServiceError::Submit(_)));
    assert_eq!(serials.peek(), 2);
}

#[tokio::test]
async fn test_unconfirmed_transaction_is_an_error() {
    let service = NftService::new(
        PendingSubmitter,
        program_id(),
        authority(),
        Arc::new(SerialCounter::new()),
    );
    let err = service.burn(&Address::new([0x44; 32])).await.unwrap_err();
    match err {
        ServiceError::NotConfirmed { operation, signature } => {
            assert_eq!(operation, "burn");
            assert_eq!(signature.as_str(), "pending-sig");
        }
        other => panic!("expected NotConfirmed, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mints_get_distinct_serials() {
    let service = Arc::new(dry_run_service(1));
    let collection = Address::new([0x33; 32]);

    let mut handles = Vec::new();
    for i in 0..32 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.mint(&collection, &format!("ipfs://item-{}", i)).await
        }));
    }

    let mut serials = HashSet::new();
    let mut accounts = HashSet::new();
    for handle in handles {
        let receipt = handle.await.unwrap().unwrap();
        assert!(serials.insert(receipt.serial_number.unwrap()));
        assert!(accounts.insert(receipt.account));
    }
    assert_eq!(serials, (1..=32).collect::<HashSet<u64>>());
    assert_eq!(service.submitter().transactions().unwrap().len(), 32);
}

#[tokio::test]
async fn test_dry_run_balances() {
    let submitter = DryRunSubmitter::new("http://localhost:8899");
    let wallet = authority();
    assert_eq!(submitter.balance(&wallet).await.unwrap(), 0);

    submitter.request_airdrop(&wallet, 1_500_000_000).await.unwrap();
    submitter.request_airdrop(&wallet, 500_000_000).await.unwrap();
    assert_eq!(submitter.balance(&wallet).await.unwrap(), 2_000_000_000);

    let err = submitter.request_airdrop(&wallet, u64::MAX).await.unwrap_err();
    assert!(matches!(err, SubmitError::Rejected(_)));
}

#[tokio::test]
async fn test_confirm_unknown_signature() {
    let submitter = DryRunSubmitter::new("http://localhost:8899");
    let err = submitter.confirm(&Signature::new("missing")).await.unwrap_err();
    assert_eq!(err, SubmitError::UnknownTransaction(Signature::new("missing")));
}

#[tokio::test]
async fn test_collection_from_metadata_document() {
    let service = dry_run_service(1);
    let document = NftMetadata::from_json(
        r#"{"name": "Dragons", "symbol": "DRG", "seller_fee_basis_points": 750}"#,
    )
    .unwrap();
    let royalty = document.royalty_percentage().unwrap();
    service
        .initialize_collection(&document.name, &document.symbol, "ipfs://dragons", royalty, true)
        .await
        .unwrap();

    let txs = service.submitter().transactions().unwrap();
    match NftInstruction::decode(&txs[0].data).unwrap() {
        NftInstruction::InitializeCollection { royalty_percentage, name, .. } => {
            assert_eq!(royalty_percentage, 7);
            assert_eq!(name, "Dragons");
        }
        other => panic!("unexpected {:?}", other),
    }
}
