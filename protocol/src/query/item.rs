//! # Item Query Decoder
//!
//! The single read-only get method an item contract exposes. The owner and
//! content slots are genuinely optional — a burned item reports both as
//! absent while staying `initialized` — so the decoder distinguishes
//! "absent" from "wrong type" carefully.

use crate::address::TonAddress;
use crate::codec::Cell;
use crate::config;
use crate::error::QueryError;
use crate::query::stack::{StackReader, StackValue};

/// Result of [`config::METHOD_NFT_DATA`].
#[derive(Debug, Clone, PartialEq)]
pub struct NftItemData {
    /// Whether the item's state has been initialized. Stays `true` after a
    /// burn — the account persists, only ownership and content are gone.
    pub initialized: bool,
    /// Position inside the collection.
    pub index: u64,
    /// The owning collection.
    pub collection: TonAddress,
    /// Current owner; `None` once burned.
    pub owner: Option<TonAddress>,
    /// Individual content; `None` once burned.
    pub content: Option<Cell>,
}

impl NftItemData {
    /// `true` while the item has an owner.
    pub fn is_live(&self) -> bool {
        self.owner.is_some()
    }
}

/// Decodes `(initialized, index, collection, owner?, content?)`.
pub fn decode_nft_data(stack: &[StackValue]) -> Result<NftItemData, QueryError> {
    let mut r = StackReader::new(config::METHOD_NFT_DATA, stack);
    Ok(NftItemData {
        initialized: r.pop_bool()?,
        index: r.pop_u64()?,
        collection: r.pop_address()?,
        owner: r.pop_address_opt()?,
        content: r.pop_cell_opt()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CellBuilder;

    fn addr(byte: u8) -> TonAddress {
        TonAddress::base([byte; 32])
    }

    fn content_cell() -> Cell {
        let mut b = CellBuilder::new();
        b.store_string_ref_tail("/item/0.json").unwrap();
        b.build()
    }

    #[test]
    fn live_item_decodes() {
        let stack = vec![
            StackValue::bool(true),
            StackValue::Int(0),
            StackValue::address(&addr(0xAA)).unwrap(),
            StackValue::address(&addr(0xBB)).unwrap(),
            StackValue::Cell(content_cell()),
        ];
        let data = decode_nft_data(&stack).unwrap();
        assert!(data.initialized);
        assert!(data.is_live());
        assert_eq!(data.owner, Some(addr(0xBB)));
        assert_eq!(data.content, Some(content_cell()));
    }

    #[test]
    fn burned_item_reports_absent_owner_and_content() {
        let stack = vec![
            StackValue::bool(true),
            StackValue::Int(3),
            StackValue::address(&addr(0xAA)).unwrap(),
            StackValue::Null,
            StackValue::Null,
        ];
        let data = decode_nft_data(&stack).unwrap();
        assert!(data.initialized);
        assert!(!data.is_live());
        assert_eq!(data.owner, None);
        assert_eq!(data.content, None);
        assert_eq!(data.index, 3);
    }

    #[test]
    fn mandatory_collection_slot_rejects_null() {
        let stack = vec![
            StackValue::bool(true),
            StackValue::Int(0),
            StackValue::Null,
            StackValue::Null,
            StackValue::Null,
        ];
        let err = decode_nft_data(&stack).unwrap_err();
        assert!(matches!(
            err,
            QueryError::ShapeMismatch {
                slot: 2,
                expected: "address slice",
                ..
            }
        ));
    }
}
