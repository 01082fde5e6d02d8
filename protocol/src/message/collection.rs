//! # Collection Operations
//!
//! The five message bodies a collection contract accepts. Every non-empty
//! body opens with a 32-bit operation tag and a 64-bit query id; the query
//! id is caller-chosen, echoed back verbatim by well-behaved counterparties,
//! and never interpreted here — uniqueness is the caller's problem.
//!
//! Deploy is the degenerate case: an empty body with no tag at all.

use crate::address::TonAddress;
use crate::codec::{dict, Cell, CellBuilder};
use crate::config;
use crate::error::CodecError;

// ---------------------------------------------------------------------------
// DeployListEntry
// ---------------------------------------------------------------------------

/// One slot of a batch-mint deploy list: the value forwarded to the item
/// deployment plus its content cell.
///
/// The wire format has no beneficiary field for batch entries. By
/// convention of this deployment the beneficiary rides *inside* the
/// content cell (address, then the real content behind a ref) — see
/// [`DeployListEntry::attributed`]. That is a convention of this content
/// encoding, not a protocol guarantee; entries with opaque content are
/// equally valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployListEntry {
    /// Value forwarded to the item contract deployment.
    pub amount: u128,
    /// Opaque per-item content.
    pub content: Cell,
}

impl DeployListEntry {
    /// An entry with fully opaque content.
    pub fn new(amount: u128, content: Cell) -> Self {
        Self { amount, content }
    }

    /// Packs the attribution convention: the beneficiary address followed
    /// by the individual content behind a ref.
    pub fn attributed(
        amount: u128,
        beneficiary: &TonAddress,
        content: &str,
    ) -> Result<Self, CodecError> {
        let mut inner = CellBuilder::new();
        inner.store_string_tail(content)?;
        let mut b = CellBuilder::new();
        b.store_address(Some(beneficiary))?.store_ref(inner.build())?;
        Ok(Self {
            amount,
            content: b.build(),
        })
    }

    /// Reads the attribution convention back, if this entry follows it.
    pub fn attribution(&self) -> Option<(TonAddress, String)> {
        let mut s = self.content.parse();
        let beneficiary = s.load_address().ok()??;
        let content = s.load_ref().ok()?.parse().load_string_tail().ok()?;
        Some((beneficiary, content))
    }
}

// ---------------------------------------------------------------------------
// CollectionMessage
// ---------------------------------------------------------------------------

/// A message body addressed to the collection contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionMessage {
    /// Deploy the contract; the state rides in the attached state init,
    /// the body is empty.
    Deploy,
    /// Mint one item at `item_index`, forwarding `amount` to the new item
    /// contract. Advances both `tickets_sold` and `next_item_index`.
    Mint {
        /// Index to deploy the item at.
        item_index: u64,
        /// Value forwarded to the item deployment.
        amount: u128,
        /// Initial owner of the minted item.
        beneficiary: TonAddress,
        /// Individual content for the minted item.
        content: String,
    },
    /// Deploy a batch of pre-indexed items. Advances `tickets_sold` only —
    /// `next_item_index` is untouched, so callers mixing single and batch
    /// mints must allocate indices themselves to avoid collisions.
    BatchMint {
        /// Slot-indexed deploy list, any order; encoded sorted ascending.
        deploy_list: Vec<(u64, DeployListEntry)>,
    },
    /// Replace the collection owner.
    ChangeOwner {
        /// The new administrator.
        new_owner: TonAddress,
    },
    /// Replace the collection content cell.
    ChangeContent {
        /// The replacement content tree, taken as-is.
        new_content: Cell,
    },
}

impl CollectionMessage {
    /// Packs the message body, stamping it with `query_id`.
    pub fn to_cell(&self, query_id: u64) -> Result<Cell, CodecError> {
        let mut b = CellBuilder::new();
        match self {
            Self::Deploy => {}
            Self::Mint {
                item_index,
                amount,
                beneficiary,
                content,
            } => {
                let mut content_cell = CellBuilder::new();
                content_cell.store_string_tail(content)?;
                let mut item_message = CellBuilder::new();
                item_message
                    .store_address(Some(beneficiary))?
                    .store_ref(content_cell.build())?;

                b.store_uint(config::OP_MINT as u64, 32)?
                    .store_uint(query_id, 64)?
                    .store_uint(*item_index, 64)?
                    .store_coins(*amount)?
                    .store_ref(item_message.build())?;
            }
            Self::BatchMint { deploy_list } => {
                let list = dict::build_direct(
                    config::DEPLOY_LIST_KEY_BITS,
                    deploy_list,
                    |b, entry: &DeployListEntry| {
                        b.store_coins(entry.amount)?;
                        b.store_ref(entry.content.clone())?;
                        Ok(())
                    },
                )?;
                b.store_uint(config::OP_BATCH_MINT as u64, 32)?
                    .store_uint(query_id, 64)?
                    .store_ref(list)?;
            }
            Self::ChangeOwner { new_owner } => {
                b.store_uint(config::OP_CHANGE_OWNER as u64, 32)?
                    .store_uint(query_id, 64)?
                    .store_address(Some(new_owner))?;
            }
            Self::ChangeContent { new_content } => {
                b.store_uint(config::OP_CHANGE_CONTENT as u64, 32)?
                    .store_uint(query_id, 64)?
                    .store_ref(new_content.clone())?;
            }
        }
        Ok(b.build())
    }

    /// Unpacks a message body into `(message, query_id)`. Deploy bodies
    /// carry no query id and report 0.
    pub fn parse(cell: &Cell) -> Result<(Self, u64), CodecError> {
        let mut s = cell.parse();
        if s.is_empty() {
            return Ok((Self::Deploy, 0));
        }
        let op = s.load_u32()?;
        let query_id = s.load_u64()?;
        let message = match op {
            config::OP_MINT => {
                let item_index = s.load_u64()?;
                let amount = s.load_coins()?;
                let item_message = s.load_ref()?;
                let mut im = item_message.parse();
                let beneficiary = im.load_required_address()?;
                let content = im.load_ref()?.parse().load_string_tail()?;
                Self::Mint {
                    item_index,
                    amount,
                    beneficiary,
                    content,
                }
            }
            config::OP_BATCH_MINT => {
                let list = s.load_ref()?;
                let deploy_list =
                    dict::parse_direct(&list, config::DEPLOY_LIST_KEY_BITS, |s| {
                        let amount = s.load_coins()?;
                        let content = (*s.load_ref()?).clone();
                        Ok(DeployListEntry { amount, content })
                    })?;
                Self::BatchMint { deploy_list }
            }
            config::OP_CHANGE_OWNER => Self::ChangeOwner {
                new_owner: s.load_required_address()?,
            },
            config::OP_CHANGE_CONTENT => Self::ChangeContent {
                new_content: (*s.load_ref()?).clone(),
            },
            other => return Err(CodecError::UnknownTag { tag: other }),
        };
        Ok((message, query_id))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> TonAddress {
        TonAddress::base([byte; 32])
    }

    #[test]
    fn deploy_is_an_empty_body() {
        let cell = CollectionMessage::Deploy.to_cell(99).unwrap();
        assert_eq!(cell.bit_len(), 0);
        assert_eq!(cell.refs().len(), 0);
        assert_eq!(
            CollectionMessage::parse(&cell).unwrap(),
            (CollectionMessage::Deploy, 0)
        );
    }

    #[test]
    fn mint_roundtrip() {
        let msg = CollectionMessage::Mint {
            item_index: 12,
            amount: 100_000_000,
            beneficiary: addr(0x05),
            content: "/item/12.json".into(),
        };
        let cell = msg.to_cell(777).unwrap();
        assert_eq!(CollectionMessage::parse(&cell).unwrap(), (msg, 777));
    }

    #[test]
    fn mint_wire_layout_is_positional() {
        let msg = CollectionMessage::Mint {
            item_index: 3,
            amount: 42,
            beneficiary: addr(0x01),
            content: "x".into(),
        };
        let cell = msg.to_cell(0).unwrap();
        let mut s = cell.parse();
        assert_eq!(s.load_u32().unwrap(), config::OP_MINT);
        assert_eq!(s.load_u64().unwrap(), 0);
        assert_eq!(s.load_u64().unwrap(), 3);
        assert_eq!(s.load_coins().unwrap(), 42);
        assert_eq!(s.remaining_refs(), 1);
    }

    #[test]
    fn batch_mint_roundtrip_sorted() {
        let entries = vec![
            (1u64, DeployListEntry::attributed(10, &addr(0x0A), "/a").unwrap()),
            (0u64, DeployListEntry::attributed(20, &addr(0x0B), "/b").unwrap()),
        ];
        let msg = CollectionMessage::BatchMint {
            deploy_list: entries.clone(),
        };
        let cell = msg.to_cell(5).unwrap();
        let (parsed, query_id) = CollectionMessage::parse(&cell).unwrap();
        assert_eq!(query_id, 5);
        match parsed {
            CollectionMessage::BatchMint { deploy_list } => {
                // Decoded ascending by slot regardless of input order.
                assert_eq!(deploy_list[0].0, 0);
                assert_eq!(deploy_list[1].0, 1);
                assert_eq!(deploy_list[0].1, entries[1].1);
                assert_eq!(deploy_list[1].1, entries[0].1);
            }
            other => panic!("expected BatchMint, got {other:?}"),
        }
    }

    #[test]
    fn batch_mint_refuses_empty_list() {
        let msg = CollectionMessage::BatchMint {
            deploy_list: Vec::new(),
        };
        assert_eq!(msg.to_cell(0).unwrap_err(), CodecError::EmptyDictionary);
    }

    #[test]
    fn change_owner_roundtrip() {
        let msg = CollectionMessage::ChangeOwner {
            new_owner: addr(0x3C),
        };
        let cell = msg.to_cell(1).unwrap();
        assert_eq!(CollectionMessage::parse(&cell).unwrap(), (msg, 1));
    }

    #[test]
    fn change_content_roundtrip() {
        let mut content = CellBuilder::new();
        content.store_uint(0xF00D, 16).unwrap();
        let msg = CollectionMessage::ChangeContent {
            new_content: content.build(),
        };
        let cell = msg.to_cell(2).unwrap();
        assert_eq!(CollectionMessage::parse(&cell).unwrap(), (msg, 2));
    }

    #[test]
    fn query_id_survives_verbatim() {
        for query_id in [0u64, 1, u64::MAX] {
            let msg = CollectionMessage::ChangeOwner {
                new_owner: addr(0x01),
            };
            let (_, back) = CollectionMessage::parse(&msg.to_cell(query_id).unwrap()).unwrap();
            assert_eq!(back, query_id);
        }
    }

    #[test]
    fn unknown_tag_is_surfaced() {
        let mut b = CellBuilder::new();
        b.store_uint(0x0BAD_BEEF, 32).unwrap();
        b.store_uint(0, 64).unwrap();
        assert_eq!(
            CollectionMessage::parse(&b.build()).unwrap_err(),
            CodecError::UnknownTag { tag: 0x0BAD_BEEF }
        );
    }

    #[test]
    fn attribution_convention_roundtrips() {
        let entry = DeployListEntry::attributed(7, &addr(0x44), "/vip/1").unwrap();
        assert_eq!(entry.attribution(), Some((addr(0x44), "/vip/1".into())));
    }

    #[test]
    fn opaque_content_has_no_attribution() {
        let mut opaque = CellBuilder::new();
        opaque.store_uint(3, 8).unwrap();
        let entry = DeployListEntry::new(7, opaque.build());
        assert_eq!(entry.attribution(), None);
    }
}
