// src/pipeline/diff.rs

//! Batch ordering and checkpoint diffing.

use crate::models::Listing;
use crate::storage::Checkpoint;

/// Sort ascending by `internal_id`, drop duplicate ids and return the
/// batch maximum.
///
/// The sort is stable, so for duplicate ids the first record in document
/// order wins deterministically. Returns `None` for an empty batch.
pub fn normalize(listings: &mut Vec<Listing>) -> Option<i64> {
    listings.sort_by_key(|listing| listing.internal_id);
    listings.dedup_by_key(|listing| listing.internal_id);
    listings.last().map(|listing| listing.internal_id)
}

/// Keep exactly the listings with `internal_id` strictly greater than the
/// checkpoint, preserving the ascending order established upstream.
pub fn filter_new(listings: Vec<Listing>, checkpoint: &Checkpoint) -> Vec<Listing> {
    listings
        .into_iter()
        .filter(|listing| listing.internal_id > checkpoint.last_id)
        .collect()
}
