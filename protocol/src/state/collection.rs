//! # Collection State Layout
//!
//! The canonical persistent-state record of a collection contract. The
//! field order below is the contract's storage layout — the deployed code
//! reads its own state positionally, so this encoder must reproduce it
//! byte for byte, and the decoder must consume it in the identical order.
//!
//! Storage layout, in write order:
//!
//! | Field            | Encoding                                   |
//! |------------------|--------------------------------------------|
//! | owner            | address                                    |
//! | next_item_index  | uint64                                     |
//! | content          | ref: see below                             |
//! | item_code        | ref: opaque code cell                      |
//! | royalty          | ref: uint16 factor, uint16 base, address   |
//! | mint_price       | coins                                      |
//! | max_supply       | uint64                                     |
//! | end_time         | uint64 (unix seconds)                      |
//! | refund_percent   | uint16 (basis points)                      |
//! | tickets_sold     | uint64                                     |
//!
//! The content ref packs two URIs: child 0 is a cell opening with the
//! on-chain marker byte and carrying the collection metadata URI behind a
//! ref, child 1 is the common content prefix as a string-ref tail.

use serde::{Deserialize, Serialize};

use crate::address::TonAddress;
use crate::codec::{Cell, CellBuilder};
use crate::config;
use crate::error::CodecError;

// ---------------------------------------------------------------------------
// RoyaltyParams
// ---------------------------------------------------------------------------

/// Royalty terms advertised by the collection.
///
/// The royalty fraction is `factor / base`. The codec does not police
/// `factor <= base` — that invariant belongs to the contract; this layer
/// encodes whatever the caller configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoyaltyParams {
    /// Numerator of the royalty fraction.
    pub factor: u16,
    /// Denominator of the royalty fraction.
    pub base: u16,
    /// Account receiving royalty payouts.
    pub beneficiary: TonAddress,
}

impl RoyaltyParams {
    /// Packs the royalty sub-cell.
    pub fn to_cell(&self) -> Result<Cell, CodecError> {
        let mut b = CellBuilder::new();
        b.store_uint(self.factor as u64, 16)?
            .store_uint(self.base as u64, 16)?
            .store_address(Some(&self.beneficiary))?;
        Ok(b.build())
    }

    /// Unpacks the royalty sub-cell.
    pub fn from_cell(cell: &Cell) -> Result<Self, CodecError> {
        let mut s = cell.parse();
        Ok(Self {
            factor: s.load_uint(16)? as u16,
            base: s.load_uint(16)? as u16,
            beneficiary: s.load_required_address()?,
        })
    }
}

// ---------------------------------------------------------------------------
// CollectionConfig
// ---------------------------------------------------------------------------

/// Everything a collection contract stores.
///
/// Built once by the deployer to produce the initial state cell (which also
/// determines the contract's address), and decoded only for inspection and
/// tests — production reads go through the typed get-method decoders in
/// [`crate::query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionConfig {
    /// Collection administrator; gates owner/content changes.
    pub owner: TonAddress,
    /// Index the next single mint will allocate. Monotone, never reused.
    pub next_item_index: u64,
    /// Collection metadata URI.
    pub collection_content: String,
    /// Prefix prepended to every item's individual content.
    pub common_content: String,
    /// Code cell every item contract is deployed with. Opaque to this
    /// crate — supplied by the external contract build.
    pub item_code: Cell,
    /// Royalty terms.
    pub royalty: RoyaltyParams,
    /// Minimum attached value for a single mint.
    pub mint_price: u128,
    /// Hard ticket cap; `tickets_sold` never exceeds it.
    pub max_supply: u64,
    /// Mint window close, unix seconds.
    pub end_time: u64,
    /// Refund fraction in basis points (0–10000).
    pub refund_percent: u16,
    /// Tickets sold so far.
    pub tickets_sold: u64,
}

impl CollectionConfig {
    /// Packs the content sub-cell: the tagged collection URI as child 0,
    /// the common prefix as child 1.
    pub fn content_cell(&self) -> Result<Cell, CodecError> {
        let mut meta = CellBuilder::new();
        meta.store_uint(config::ONCHAIN_CONTENT_TAG as u64, 8)?
            .store_string_ref_tail(&self.collection_content)?;

        let mut content = CellBuilder::new();
        content
            .store_ref(meta.build())?
            .store_string_ref_tail(&self.common_content)?;
        Ok(content.build())
    }

    /// Packs the initial state cell in canonical field order.
    pub fn to_cell(&self) -> Result<Cell, CodecError> {
        let mut b = CellBuilder::new();
        b.store_address(Some(&self.owner))?
            .store_uint(self.next_item_index, 64)?
            .store_ref(self.content_cell()?)?
            .store_ref(self.item_code.clone())?
            .store_ref(self.royalty.to_cell()?)?
            .store_coins(self.mint_price)?
            .store_uint(self.max_supply, 64)?
            .store_uint(self.end_time, 64)?
            .store_uint(self.refund_percent as u64, 16)?
            .store_uint(self.tickets_sold, 64)?;
        Ok(b.build())
    }

    /// Unpacks a state cell. Exact mirror of [`Self::to_cell`].
    pub fn from_cell(cell: &Cell) -> Result<Self, CodecError> {
        let mut s = cell.parse();
        let owner = s.load_required_address()?;
        let next_item_index = s.load_u64()?;
        let content = s.load_ref()?;
        let item_code = s.load_ref()?;
        let royalty = RoyaltyParams::from_cell(&*s.load_ref()?)?;
        let mint_price = s.load_coins()?;
        let max_supply = s.load_u64()?;
        let end_time = s.load_u64()?;
        let refund_percent = s.load_uint(16)? as u16;
        let tickets_sold = s.load_u64()?;

        let mut cs = content.parse();
        let meta = cs.load_ref()?;
        let common_content = cs.load_string_ref_tail()?;
        let mut ms = meta.parse();
        if ms.load_uint(8)? as u8 != config::ONCHAIN_CONTENT_TAG {
            return Err(CodecError::Layout(
                "collection content must open with the on-chain marker byte",
            ));
        }
        let collection_content = ms.load_string_ref_tail()?;

        Ok(Self {
            owner,
            next_item_index,
            collection_content,
            common_content,
            item_code: (*item_code).clone(),
            royalty,
            mint_price,
            max_supply,
            end_time,
            refund_percent,
            tickets_sold,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
