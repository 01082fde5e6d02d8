//! # Item State Layout
//!
//! Per-ticket contract state: index, back-reference to the collection,
//! current owner, and the individual content string behind a ref.
//!
//! The owner field doubles as the liveness flag. A live item has a concrete
//! owner address; a burned item stores `addr_none` there and an empty
//! content cell, while index and collection stay readable for provenance.
//! Both forms round-trip through this codec.

use crate::address::TonAddress;
use crate::codec::{Cell, CellBuilder};
use crate::error::CodecError;

/// Everything an item contract stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemConfig {
    /// Position of this item inside its collection. Never reused.
    pub index: u64,
    /// The collection this item belongs to (back-reference, not ownership).
    pub collection: TonAddress,
    /// Current owner; `None` means the item is burned and permanently inert.
    pub owner: Option<TonAddress>,
    /// Individual content, appended to the collection's common prefix.
    pub content: String,
}

impl ItemConfig {
    /// Packs the item state cell: index, collection, owner, content ref.
    pub fn to_cell(&self) -> Result<Cell, CodecError> {
        let mut content = CellBuilder::new();
        content.store_string_ref_tail(&self.content)?;

        let mut b = CellBuilder::new();
        b.store_uint(self.index, 64)?
            .store_address(Some(&self.collection))?
            .store_address(self.owner.as_ref())?
            .store_ref(content.build())?;
        Ok(b.build())
    }

    /// Unpacks an item state cell. Exact mirror of [`Self::to_cell`].
    pub fn from_cell(cell: &Cell) -> Result<Self, CodecError> {
        let mut s = cell.parse();
        let index = s.load_u64()?;
        let collection = s.load_required_address()?;
        let owner = s.load_address()?;
        let content = s.load_ref()?.parse().load_string_ref_tail()?;
        Ok(Self {
            index,
            collection,
            owner,
            content,
        })
    }

    /// `true` while the item has an owner (i.e. has not been burned).
    pub fn is_live(&self) -> bool {
        self.owner.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ItemConfig {
        ItemConfig {
            index: 17,
            collection: TonAddress::base([0xAA; 32]),
            owner: Some(TonAddress::base([0xBB; 32])),
            content: "/item/17.json".into(),
        }
    }

    #[test]
    fn live_item_roundtrip() {
        let item = sample();
        let cell = item.to_cell().unwrap();
        assert_eq!(ItemConfig::from_cell(&cell).unwrap(), item);
        assert!(item.is_live());
    }

    #[test]
    fn burned_item_roundtrip() {
        // A burned item keeps index and collection for provenance; owner
        // and content are gone.
        let burned = ItemConfig {
            owner: None,
            content: String::new(),
            ..sample()
        };
        let cell = burned.to_cell().unwrap();
        let decoded = ItemConfig::from_cell(&cell).unwrap();
        assert_eq!(decoded, burned);
        assert!(!decoded.is_live());
        assert_eq!(decoded.index, 17);
        assert_eq!(decoded.collection, TonAddress::base([0xAA; 32]));
    }

    #[test]
    fn field_order_swap_breaks_roundtrip() {
        // Transpose collection and owner: both are addresses, so decoding
        // succeeds but attributes the item to the wrong accounts.
        let item = sample();
        let mut content = CellBuilder::new();
        content.store_string_ref_tail(&item.content).unwrap();

        let mut b = CellBuilder::new();
        b.store_uint(item.index, 64)
            .unwrap()
            .store_address(item.owner.as_ref()) // transposed
            .unwrap()
            .store_address(Some(&item.collection)) // transposed
            .unwrap()
            .store_ref(content.build())
            .unwrap();

        let decoded = ItemConfig::from_cell(&b.build()).unwrap();
        assert_ne!(decoded, item);
        assert_eq!(decoded.collection, item.owner.unwrap());
    }
}
