//! # State Init & Address Derivation
//!
//! A contract's address is not assigned — it is the hash of its initial
//! `(code, data)` pair, packed into the standard state-init cell. That is
//! what lets this client compute where a collection or item *will* live
//! before anything touches the network.
//!
//! State-init layout: five header bits `00110` (no split depth, not
//! special, code present, data present, no library), then the code cell
//! and the data cell as references.

use crate::address::TonAddress;
use crate::codec::{Cell, CellBuilder};
use crate::error::CodecError;

/// The initial `(code, data)` pair a contract is deployed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateInit {
    /// Compiled contract code. Opaque to this crate.
    pub code: Cell,
    /// Initial persistent state, from one of the layouts in
    /// [`crate::state`].
    pub data: Cell,
}

impl StateInit {
    /// Bundles code and data.
    pub fn new(code: Cell, data: Cell) -> Self {
        Self { code, data }
    }

    /// Packs the state-init cell.
    pub fn to_cell(&self) -> Result<Cell, CodecError> {
        let mut b = CellBuilder::new();
        b.store_uint(0b00110, 5)?
            .store_ref(self.code.clone())?
            .store_ref(self.data.clone())?;
        Ok(b.build())
    }

    /// Unpacks a state-init cell. Exact mirror of [`Self::to_cell`].
    pub fn from_cell(cell: &Cell) -> Result<Self, CodecError> {
        let mut s = cell.parse();
        if s.load_uint(5)? != 0b00110 {
            return Err(CodecError::Layout(
                "state init must carry exactly a code ref and a data ref",
            ));
        }
        let code = s.load_ref()?;
        let data = s.load_ref()?;
        Ok(Self {
            code: (*code).clone(),
            data: (*data).clone(),
        })
    }

    /// The address this contract will occupy once deployed: the state-init
    /// cell hash, in the given workchain.
    pub fn derive_address(&self, workchain: i8) -> Result<TonAddress, CodecError> {
        Ok(TonAddress::new(workchain, *self.to_cell()?.hash()))
    }
}
