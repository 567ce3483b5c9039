//! Program-derived address computation.
//!
//! A PDA is `sha256(seeds ‖ bump ‖ program_id ‖ "ProgramDerivedAddress")`,
//! taken at the first bump (scanning 255 down to 0) whose digest is not a
//! valid ed25519 point. No private key exists for such an address, so only
//! the owning program can sign for it.

use ed25519_dalek::VerifyingKey;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{NftClientError, NftResult};
use crate::types::{Address, DerivedAddress, ProgramId, ADDRESS_LEN};

/// Maximum length of a single seed.
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of seeds in one preimage, bump included.
pub const MAX_SEEDS: usize = 16;

/// Domain separator appended to every preimage.
pub const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

pub const COLLECTION_SEED_PREFIX: &[u8] = b"collection";
pub const NFT_SEED_PREFIX: &[u8] = b"nft";

/// Whether `bytes` decompress to a point on the ed25519 curve.
pub fn is_on_curve(bytes: &[u8; ADDRESS_LEN]) -> bool {
    VerifyingKey::from_bytes(bytes).is_ok()
}

fn validate_seeds(seeds: &[&[u8]], max_seeds: usize) -> NftResult<()> {
    if seeds.len() > max_seeds {
        return Err(NftClientError::TooManySeeds {
            count: seeds.len(),
            max: max_seeds,
        });
    }
    for (index, seed) in seeds.iter().enumerate() {
        if seed.len() > MAX_SEED_LEN {
            return Err(NftClientError::SeedTooLong {
                index,
                len: seed.len(),
                max: MAX_SEED_LEN,
            });
        }
    }
    Ok(())
}

fn hash_preimage(seeds: &[&[u8]], bump: Option<u8>, program_id: &ProgramId) -> [u8; ADDRESS_LEN] {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    if let Some(bump) = bump {
        hasher.update([bump]);
    }
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);
    hasher.finalize().into()
}

/// Compute the address for an exact seed list, bump included by the caller.
///
/// Fails with [`NftClientError::InvalidSeeds`] when the digest lands on the
/// curve.
pub fn create_program_address(seeds: &[&[u8]], program_id: &ProgramId) -> NftResult<Address> {
    validate_seeds(seeds, MAX_SEEDS)?;
    let candidate = hash_preimage(seeds, None, program_id);
    if is_on_curve(&candidate) {
        return Err(NftClientError::InvalidSeeds);
    }
    Ok(Address::new(candidate))
}

/// Find the canonical PDA for `seeds`: the highest bump yielding an
/// off-curve address.
pub fn find_program_address(seeds: &[&[u8]], program_id: &ProgramId) -> NftResult<DerivedAddress> {
    scan_bumps(seeds, program_id, is_on_curve)
}

fn scan_bumps<F>(seeds: &[&[u8]], program_id: &ProgramId, on_curve: F) -> NftResult<DerivedAddress>
where
    F: Fn(&[u8; ADDRESS_LEN]) -> bool,
{
    // One slot is reserved for the bump seed.
    validate_seeds(seeds, MAX_SEEDS - 1)?;

    for bump in (0..=u8::MAX).rev() {
        let candidate = hash_preimage(seeds, Some(bump), program_id);
        if !on_curve(&candidate) {
            let address = Address::new(candidate);
            debug!(%address, bump, seeds = seeds.len(), "derived program address");
            return Ok(DerivedAddress { address, bump });
        }
    }
    Err(NftClientError::AddressDerivationExhausted)
}

/// PDA of a collection: `["collection", authority, name]`.
pub fn collection_address(
    program_id: &ProgramId,
    authority: &Address,
    name: &str,
) -> NftResult<DerivedAddress> {
    find_program_address(
        &[COLLECTION_SEED_PREFIX, authority.as_ref(), name.as_bytes()],
        program_id,
    )
}

/// PDA of an item: `["nft", collection, serial as u64 LE]`.
pub fn item_address(
    program_id: &ProgramId,
    collection: &Address,
    serial_number: u64,
) -> NftResult<DerivedAddress> {
    let serial = serial_number.to_le_bytes();
    find_program_address(&[NFT_SEED_PREFIX, collection.as_ref(), &serial], program_id)
}
