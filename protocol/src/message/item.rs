//! # Item Operations
//!
//! The message bodies an item contract accepts: deploy (empty), the TEP-62
//! transfer, and burn. Transfer and burn are owner-gated on the contract
//! side; this codec packs them for anyone, and the eligibility layer is
//! where a caller checks whether the ledger will agree.

use crate::address::TonAddress;
use crate::codec::{Cell, CellBuilder, CellSlice};
use crate::config;
use crate::error::CodecError;

/// A message body addressed to an item contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemMessage {
    /// Deploy the item contract; empty body, state rides in the state init.
    Deploy,
    /// Hand ownership to `new_owner` (TEP-62 layout).
    Transfer {
        /// The owner after the transfer.
        new_owner: TonAddress,
        /// Where the contract sends the excess attached value.
        response_destination: TonAddress,
        /// Opaque payload for the new owner's contract, if any.
        custom_payload: Option<Cell>,
        /// Value forwarded with the ownership notification.
        forward_amount: u128,
        /// Payload attached to the ownership notification, if any.
        forward_payload: Option<Cell>,
    },
    /// Burn the item: owner and content are cleared, the account stays.
    Burn,
}

impl ItemMessage {
    /// Packs the message body, stamping it with `query_id`.
    pub fn to_cell(&self, query_id: u64) -> Result<Cell, CodecError> {
        let mut b = CellBuilder::new();
        match self {
            Self::Deploy => {}
            Self::Transfer {
                new_owner,
                response_destination,
                custom_payload,
                forward_amount,
                forward_payload,
            } => {
                b.store_uint(config::OP_TRANSFER as u64, 32)?
                    .store_uint(query_id, 64)?
                    .store_address(Some(new_owner))?
                    .store_address(Some(response_destination))?;
                store_maybe_ref(&mut b, custom_payload.as_ref())?;
                b.store_coins(*forward_amount)?;
                store_maybe_ref(&mut b, forward_payload.as_ref())?;
            }
            Self::Burn => {
                b.store_uint(config::OP_BURN as u64, 32)?
                    .store_uint(query_id, 64)?;
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
            config::OP_TRANSFER => {
                let new_owner = s.load_required_address()?;
                let response_destination = s.load_required_address()?;
                let custom_payload = load_maybe_ref(&mut s)?;
                let forward_amount = s.load_coins()?;
                let forward_payload = load_maybe_ref(&mut s)?;
                Self::Transfer {
                    new_owner,
                    response_destination,
                    custom_payload,
                    forward_amount,
                    forward_payload,
                }
            }
            config::OP_BURN => Self::Burn,
            other => return Err(CodecError::UnknownTag { tag: other }),
        };
        Ok((message, query_id))
    }
}

/// One presence bit, then the cell as a ref when present.
fn store_maybe_ref(b: &mut CellBuilder, cell: Option<&Cell>) -> Result<(), CodecError> {
    match cell {
        None => {
            b.store_bit(false)?;
        }
        Some(c) => {
            b.store_bit(true)?;
            b.store_ref(c.clone())?;
        }
    }
    Ok(())
}

fn load_maybe_ref(s: &mut CellSlice<'_>) -> Result<Option<Cell>, CodecError> {
    if s.load_bit()? {
        Ok(Some((*s.load_ref()?).clone()))
    } else {
        Ok(None)
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

    fn sample_transfer() -> ItemMessage {
        ItemMessage::Transfer {
            new_owner: addr(0x10),
            response_destination: addr(0x20),
            custom_payload: None,
            forward_amount: 10_000_000,
            forward_payload: None,
        }
    }

    #[test]
    fn transfer_roundtrip_minimal() {
        let msg = sample_transfer();
        let cell = msg.to_cell(42).unwrap();
        assert_eq!(ItemMessage::parse(&cell).unwrap(), (msg, 42));
    }

    #[test]
    fn transfer_roundtrip_with_payloads() {
        let mut payload = CellBuilder::new();
        payload.store_uint(0xCAFE, 16).unwrap();
        let payload = payload.build();

        let msg = ItemMessage::Transfer {
            new_owner: addr(0x10),
            response_destination: addr(0x20),
            custom_payload: Some(payload.clone()),
            forward_amount: 0,
            forward_payload: Some(payload),
        };
        let cell = msg.to_cell(1).unwrap();
        assert_eq!(ItemMessage::parse(&cell).unwrap(), (msg, 1));
    }

    #[test]
    fn transfer_wire_layout() {
        let cell = sample_transfer().to_cell(0).unwrap();
        let mut s = cell.parse();
        assert_eq!(s.load_u32().unwrap(), 0x5fcc3d14);
        assert_eq!(s.load_u64().unwrap(), 0);
        assert_eq!(s.load_address().unwrap(), Some(addr(0x10)));
        assert_eq!(s.load_address().unwrap(), Some(addr(0x20)));
        assert!(!s.load_bit().unwrap()); // absent custom payload
        assert_eq!(s.load_coins().unwrap(), 10_000_000);
        assert!(!s.load_bit().unwrap()); // absent forward payload
        assert!(s.is_empty());
    }

    #[test]
    fn burn_is_header_only() {
        let cell = ItemMessage::Burn.to_cell(9).unwrap();
        assert_eq!(cell.bit_len(), 32 + 64);
        assert_eq!(ItemMessage::parse(&cell).unwrap(), (ItemMessage::Burn, 9));
    }

    #[test]
    fn deploy_is_an_empty_body() {
        let cell = ItemMessage::Deploy.to_cell(0).unwrap();
        assert_eq!(cell.bit_len(), 0);
        assert_eq!(ItemMessage::parse(&cell).unwrap(), (ItemMessage::Deploy, 0));
    }

    #[test]
    fn collection_tags_do_not_parse_as_item_messages() {
        let mut b = CellBuilder::new();
        b.store_uint(config::OP_MINT as u64, 32).unwrap();
        b.store_uint(0, 64).unwrap();
        assert_eq!(
            ItemMessage::parse(&b.build()).unwrap_err(),
            CodecError::UnknownTag {
                tag: config::OP_MINT
            }
        );
    }
}
