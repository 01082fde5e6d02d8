//! # Collection Query Decoders
//!
//! Typed decoders for the collection contract's read-only get methods.
//! Each decoder consumes its result tuple in the declared slot order and
//! fails with [`crate::error::QueryError::ShapeMismatch`] on the first
//! disagreement — there are no partial results.

use serde::{Deserialize, Serialize};

use crate::address::TonAddress;
use crate::codec::Cell;
use crate::config;
use crate::error::QueryError;
use crate::query::stack::{StackReader, StackValue};
use crate::state::RoyaltyParams;

// ---------------------------------------------------------------------------
// Result Types
// ---------------------------------------------------------------------------

/// Result of [`config::METHOD_COLLECTION_DATA`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionData {
    /// Index the next single mint will allocate.
    pub next_item_index: u64,
    /// The collection content cell, as stored.
    pub content: Cell,
    /// Current collection administrator.
    pub owner: TonAddress,
}

/// Result of [`config::METHOD_COLLECTION_LIMITS`] — the sale terms a
/// caller needs for mint pre-validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionLimits {
    /// Minimum attached value for a single mint.
    pub mint_price: u128,
    /// Hard ticket cap.
    pub max_supply: u64,
    /// Mint window close, unix seconds.
    pub end_time: u64,
    /// Refund fraction in basis points.
    pub refund_percent: u16,
}

// ---------------------------------------------------------------------------
// Decoders
// ---------------------------------------------------------------------------

/// Decodes `(next_item_index, content, owner)`.
pub fn decode_collection_data(stack: &[StackValue]) -> Result<CollectionData, QueryError> {
    let mut r = StackReader::new(config::METHOD_COLLECTION_DATA, stack);
    Ok(CollectionData {
        next_item_index: r.pop_u64()?,
        content: r.pop_cell()?,
        owner: r.pop_address()?,
    })
}

/// Decodes the item account address for an index.
pub fn decode_nft_address(stack: &[StackValue]) -> Result<TonAddress, QueryError> {
    let mut r = StackReader::new(config::METHOD_NFT_ADDRESS_BY_INDEX, stack);
    r.pop_address()
}

/// Decodes `(factor, base, beneficiary)`.
pub fn decode_royalty_params(stack: &[StackValue]) -> Result<RoyaltyParams, QueryError> {
    let mut r = StackReader::new(config::METHOD_ROYALTY_PARAMS, stack);
    Ok(RoyaltyParams {
        factor: r.pop_u16()?,
        base: r.pop_u16()?,
        beneficiary: r.pop_address()?,
    })
}

/// Decodes `(mint_price, max_supply, end_time, refund_percent)`.
pub fn decode_collection_limits(stack: &[StackValue]) -> Result<CollectionLimits, QueryError> {
    let mut r = StackReader::new(config::METHOD_COLLECTION_LIMITS, stack);
    Ok(CollectionLimits {
        mint_price: r.pop_coins()?,
        max_supply: r.pop_u64()?,
        end_time: r.pop_u64()?,
        refund_percent: r.pop_u16()?,
    })
}

/// Decodes the combined collection + individual content cell.
pub fn decode_nft_content(stack: &[StackValue]) -> Result<Cell, QueryError> {
    let mut r = StackReader::new(config::METHOD_NFT_CONTENT, stack);
    r.pop_cell()
}

/// Decodes the tickets-sold counter.
pub fn decode_tickets_sold(stack: &[StackValue]) -> Result<u64, QueryError> {
    let mut r = StackReader::new(config::METHOD_TICKETS_SOLD, stack);
    r.pop_u64()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
