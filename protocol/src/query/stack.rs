//! # Get-Method Stack Values
//!
//! A read-only query returns an ordered tuple of typed slots. This module
//! models the runtime values ([`StackValue`]) and provides [`StackReader`],
//! a positional cursor that turns "wrong type in slot N" into a
//! [`QueryError::ShapeMismatch`] carrying the method name, the slot index,
//! and both sides of the disagreement.
//!
//! Decoders must consume slots strictly in declared order; the reader
//! enforces that by construction, the same way `CellSlice` does for bits.

use crate::address::TonAddress;
use crate::codec::{Cell, CellBuilder};
use crate::error::{CodecError, QueryError};

// ---------------------------------------------------------------------------
// StackValue
// ---------------------------------------------------------------------------

/// One slot of a get-method result.
#[derive(Debug, Clone, PartialEq)]
pub enum StackValue {
    /// A 257-bit TVM integer; everything this protocol returns fits i128.
    Int(i128),
    /// A full cell.
    Cell(Cell),
    /// A cell read as a slice (addresses arrive this way).
    Slice(Cell),
    /// An explicit null (absent owner, absent content).
    Null,
}

impl StackValue {
    /// Runtime type name, used in mismatch reports.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Cell(_) => "cell",
            Self::Slice(_) => "slice",
            Self::Null => "null",
        }
    }

    /// Packs an address into the slice form get-methods return.
    pub fn address(addr: &TonAddress) -> Result<Self, CodecError> {
        let mut b = CellBuilder::new();
        b.store_address(Some(addr))?;
        Ok(Self::Slice(b.build()))
    }

    /// Packs an optional address: `addr_none` in a slice when absent.
    pub fn maybe_address(addr: Option<&TonAddress>) -> Result<Self, CodecError> {
        let mut b = CellBuilder::new();
        b.store_address(addr)?;
        Ok(Self::Slice(b.build()))
    }

    /// A TVM boolean: -1 for true, 0 for false.
    pub fn bool(value: bool) -> Self {
        Self::Int(if value { -1 } else { 0 })
    }
}

// ---------------------------------------------------------------------------
// StackReader
// ---------------------------------------------------------------------------

/// Positional reader over a get-method result tuple.
pub struct StackReader<'a> {
    method: &'static str,
    values: &'a [StackValue],
    pos: usize,
}

impl<'a> StackReader<'a> {
    /// Opens a reader for `method`'s result.
    pub fn new(method: &'static str, values: &'a [StackValue]) -> Self {
        Self {
            method,
            values,
            pos: 0,
        }
    }

    fn next(&mut self, expected: &'static str) -> Result<&'a StackValue, QueryError> {
        let value = self.values.get(self.pos).ok_or(QueryError::ShapeMismatch {
            method: self.method,
            slot: self.pos,
            expected,
            got: "end of stack",
        })?;
        self.pos += 1;
        Ok(value)
    }

    fn mismatch(&self, expected: &'static str, got: &StackValue) -> QueryError {
        QueryError::ShapeMismatch {
            method: self.method,
            slot: self.pos - 1,
            expected,
            got: got.type_name(),
        }
    }

    /// Reads an integer slot.
    pub fn pop_int(&mut self) -> Result<i128, QueryError> {
        match self.next("int")? {
            StackValue::Int(v) => Ok(*v),
            other => Err(self.mismatch("int", other)),
        }
    }

    /// Reads an integer slot that must fit an unsigned 64-bit counter.
    pub fn pop_u64(&mut self) -> Result<u64, QueryError> {
        let v = match self.next("non-negative int")? {
            StackValue::Int(v) => *v,
            other => return Err(self.mismatch("non-negative int", other)),
        };
        u64::try_from(v).map_err(|_| QueryError::ShapeMismatch {
            method: self.method,
            slot: self.pos - 1,
            expected: "non-negative 64-bit int",
            got: "out-of-range int",
        })
    }

    /// Reads an integer slot that must fit a 16-bit field.
    pub fn pop_u16(&mut self) -> Result<u16, QueryError> {
        let v = self.pop_u64()?;
        u16::try_from(v).map_err(|_| QueryError::ShapeMismatch {
            method: self.method,
            slot: self.pos - 1,
            expected: "16-bit int",
            got: "out-of-range int",
        })
    }

    /// Reads an integer slot that must fit a coin amount.
    pub fn pop_coins(&mut self) -> Result<u128, QueryError> {
        let v = match self.next("non-negative int")? {
            StackValue::Int(v) => *v,
            other => return Err(self.mismatch("non-negative int", other)),
        };
        u128::try_from(v).map_err(|_| QueryError::ShapeMismatch {
            method: self.method,
            slot: self.pos - 1,
            expected: "non-negative coin amount",
            got: "negative int",
        })
    }

    /// Reads a TVM boolean slot (-1/0, any non-zero counts as true).
    pub fn pop_bool(&mut self) -> Result<bool, QueryError> {
        Ok(self.pop_int()? != 0)
    }

    /// Reads a cell slot.
    pub fn pop_cell(&mut self) -> Result<Cell, QueryError> {
        match self.next("cell")? {
            StackValue::Cell(c) => Ok(c.clone()),
            other => Err(self.mismatch("cell", other)),
        }
    }

    /// Reads a cell slot that may be null.
    pub fn pop_cell_opt(&mut self) -> Result<Option<Cell>, QueryError> {
        match self.next("cell or null")? {
            StackValue::Cell(c) => Ok(Some(c.clone())),
            StackValue::Null => Ok(None),
            other => Err(self.mismatch("cell or null", other)),
        }
    }

    /// Reads a mandatory address slot (a slice holding `addr_std`).
    pub fn pop_address(&mut self) -> Result<TonAddress, QueryError> {
        match self.next("address slice")? {
            StackValue::Slice(c) => Ok(c.parse().load_required_address()?),
            other => Err(self.mismatch("address slice", other)),
        }
    }

    /// Reads an address slot that may be absent, either as an explicit
    /// null or as `addr_none` inside the slice.
    pub fn pop_address_opt(&mut self) -> Result<Option<TonAddress>, QueryError> {
        match self.next("address slice or null")? {
            StackValue::Slice(c) => Ok(c.parse().load_address()?),
            StackValue::Null => Ok(None),
            other => Err(self.mismatch("address slice or null", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
