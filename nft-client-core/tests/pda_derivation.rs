//! Program-derived address properties: determinism, off-curve results,
//! seed-order sensitivity and seed limits.

use nft_client_core::error::NftClientError;
use nft_client_core::pda::{
    collection_address, create_program_address, find_program_address, is_on_curve, item_address,
    MAX_SEEDS, MAX_SEED_LEN,
};
use nft_client_core::types::Address;
use rand::Rng;

fn program_id() -> Address {
    Address::new([42u8; 32])
}

#[test]
fn test_derivation_is_deterministic() {
    let authority = Address::new([9u8; 32]);
    let first = collection_address(&program_id(), &authority, "Dragons").unwrap();
    for _ in 0..10 {
        let again = collection_address(&program_id(), &authority, "Dragons").unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn test_derived_addresses_are_off_curve() {
    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let seed: [u8; 32] = rng.gen();
        let derived = find_program_address(&[b"nft", &seed], &program_id()).unwrap();
        assert!(!is_on_curve(derived.address.as_bytes()));
    }
}

#[test]
fn test_basepoint_is_on_curve() {
    let mut basepoint = [0x66u8; 32];
    basepoint[0] = 0x58;
    assert!(is_on_curve(&basepoint));
}

#[test]
fn test_seed_order_changes_address() {
    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let a_len = rng.gen_range(1..=MAX_SEED_LEN);
        let b_len = rng.gen_range(1..=MAX_SEED_LEN);
        let mut a = vec![0u8; a_len];
        let mut b = vec![0u8; b_len];
        rng.fill(&mut a[..]);
        rng.fill(&mut b[..]);
        if a == b {
            continue;
        }
        let ab = find_program_address(&[a.as_slice(), b.as_slice()], &program_id()).unwrap();
        let ba = find_program_address(&[b.as_slice(), a.as_slice()], &program_id()).unwrap();
        assert_ne!(ab.address, ba.address, "seeds {:?} / {:?}", a, b);
    }
}

#[test]
fn test_program_id_changes_address() {
    let seeds: &[&[u8]] = &[b"collection", b"same"];
    let a = find_program_address(seeds, &Address::new([1u8; 32])).unwrap();
    let b = find_program_address(seeds, &Address::new([2u8; 32])).unwrap();
    assert_ne!(a.address, b.address);
}

#[test]
fn test_successive_serials_do_not_collide() {
    let collection = collection_address(&program_id(), &Address::new([5u8; 32]), "C").unwrap();
    let first = item_address(&program_id(), &collection.address, 1).unwrap();
    let second = item_address(&program_id(), &collection.address, 2).unwrap();
    assert_ne!(first.address, second.address);
}

#[test]
fn test_item_address_uses_le_serial_seed() {
    let collection = Address::new([5u8; 32]);
    let via_helper = item_address(&program_id(), &collection, 7).unwrap();
    let manual = find_program_address(
        &[b"nft", collection.as_ref(), &7u64.to_le_bytes()],
        &program_id(),
    )
    .unwrap();
    assert_eq!(via_helper, manual);
}

#[test]
fn test_seed_longer_than_32_bytes_rejected() {
    let long = [0u8; MAX_SEED_LEN + 1];
    let err = find_program_address(&[b"nft", &long], &program_id()).unwrap_err();
    assert_eq!(
        err,
        NftClientError::SeedTooLong {
            index: 1,
            len: MAX_SEED_LEN + 1,
            max: MAX_SEED_LEN
        }
    );
}

#[test]
fn test_collection_name_over_seed_limit_rejected() {
    let name = "x".repeat(MAX_SEED_LEN + 1);
    let err = collection_address(&program_id(), &Address::new([1u8; 32]), &name).unwrap_err();
    assert!(matches!(err, NftClientError::SeedTooLong { index: 2, .. }));
}

#[test]
fn test_too_many_seeds_rejected() {
    // One slot stays free for the bump.
    let seed: &[u8] = b"s";
    let seeds = vec![seed; MAX_SEEDS];
    let err = find_program_address(&seeds, &program_id()).unwrap_err();
    assert!(matches!(err, NftClientError::TooManySeeds { count, .. } if count == MAX_SEEDS));

    let seeds = vec![seed; MAX_SEEDS - 1];
    assert!(find_program_address(&seeds, &program_id()).is_ok());
}

#[test]
fn test_create_rejects_more_than_max_seeds() {
    let seed: &[u8] = b"s";
    let seeds = vec![seed; MAX_SEEDS + 1];
    let err = create_program_address(&seeds, &program_id()).unwrap_err();
    assert_eq!(err.error_code(), 1003);
}

#[test]
fn test_empty_seed_list_derives() {
    let derived = find_program_address(&[], &program_id()).unwrap();
    assert!(!is_on_curve(derived.address.as_bytes()));
}

fn addr(s: &str) -> Address {
    s.parse().unwrap()
}

#[test]
fn test_create_program_address_matches_ledger_vectors() {
    let program_id = addr("BPFLoaderUpgradeab1e11111111111111111111111");
    let public_key = addr("SeedPubey1111111111111111111111111111111111");

    assert_eq!(
        create_program_address(&[b"", &[1]], &program_id).unwrap(),
        addr("BwqrghZA2htAcqq8dzP1WDAhTXYTYWj7CHxF5j7TDBAe")
    );
    assert_eq!(
        create_program_address(&["☉".as_bytes(), &[0]], &program_id).unwrap(),
        addr("13yWmRpaTR4r5nAktwLqMpRNr28tnVUZw26rTvPSSB19")
    );
    assert_eq!(
        create_program_address(&[b"Talking", b"Squirrels"], &program_id).unwrap(),
        addr("2fnQrngrQT4SeLcdToJAD96phoEjNL2man2kfRLCASVk")
    );
    assert_eq!(
        create_program_address(&[public_key.as_ref(), &[1]], &program_id).unwrap(),
        addr("976ymqVnfE32QFe6NfGDctSvVa36LWnvYxhU6G2232YL")
    );
}

#[test]
fn test_find_program_address_matches_ledger_vector() {
    let program_id = addr("BPFLoaderUpgradeab1e11111111111111111111111");
    let found = find_program_address(&[b"Lil'", b"Bits"], &program_id).unwrap();
    assert_eq!(found.address, addr("H4feCuM8B43jxwbHAsUHDasw1raRkvWF6py4Fx7suB8N"));
    assert_eq!(found.bump, 254);
}

#[test]
fn test_collection_and_item_addresses_are_pinned() {
    let program_id = Address::new([0x11; 32]);

    let collection = collection_address(&program_id, &Address::new([0x22; 32]), "Dragons").unwrap();
    assert_eq!(collection.address, addr("CXPA596gbq6N7hGYh6n2Mwt4NdMGrioh4ec4yX4irEQL"));
    assert_eq!(collection.bump, 253);

    let item = item_address(&program_id, &Address::new([0x33; 32]), 7).unwrap();
    assert_eq!(item.address, addr("7nWM4CvjAJPbtaoYb1RRob5SSKvGFQyh4PJJhun26pM1"));
    assert_eq!(item.bump, 253);
}
