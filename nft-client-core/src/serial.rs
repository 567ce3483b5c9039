//! Serial numbers for minted items.
//!
//! Item addresses are derived from the serial, so two mints that observe the
//! same serial would target the same account. The counter hands out each
//! value exactly once; share it between tasks with an `Arc`.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{NftClientError, NftResult};
use crate::state::CollectionAccount;

#[derive(Debug)]
pub struct SerialCounter {
    next: AtomicU64,
}

impl SerialCounter {
    /// Counter whose first reserved serial is 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Resume after the items a collection has already minted.
    pub fn from_collection(collection: &CollectionAccount) -> NftResult<Self> {
        Ok(Self::starting_at(collection.next_serial()?))
    }

    /// Atomically take the next serial. Never wraps.
    pub fn reserve(&self) -> NftResult<u64> {
        self.next
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_add(1))
            .map_err(|_| NftClientError::SerialExhausted)
    }

    /// The serial the next `reserve` would return.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Acquire)
    }
}

impl Default for SerialCounter {
    fn default() -> Self {
        Self::new()
    }
}
