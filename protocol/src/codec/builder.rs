//! # CellBuilder — append-only cell construction
//!
//! The wire format has no self-describing tags: a cell is read back in
//! exactly the order it was written, and nothing on the wire says where one
//! field ends and the next begins. Encode and decode must therefore be
//! strict mirrors — an order mismatch is a silent data-corruption bug, not
//! a caught error. Keep every `store_*` sequence next to its `load_*` twin.
//!
//! All writes are checked: a value wider than its declared field fails with
//! [`CodecError::Overflow`], and a write past 1023 bits or 4 references
//! fails with [`CodecError::CapacityExceeded`] before touching the buffer.

use std::sync::Arc;

use crate::address::TonAddress;
use crate::codec::cell::Cell;
use crate::config;
use crate::error::CodecError;

// ---------------------------------------------------------------------------
// CellBuilder
// ---------------------------------------------------------------------------

/// Append-only writer producing an immutable [`Cell`].
///
/// Methods return `&mut Self` so writes chain with `?`:
///
/// ```
/// use porta_protocol::codec::CellBuilder;
///
/// # fn main() -> Result<(), porta_protocol::error::CodecError> {
/// let mut b = CellBuilder::new();
/// b.store_uint(7, 32)?.store_coins(100_000_000)?;
/// let cell = b.build();
/// assert_eq!(cell.bit_len(), 32 + 4 + 32);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct CellBuilder {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
}

impl CellBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Data bits written so far.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Data bits still available.
    pub fn available_bits(&self) -> usize {
        config::MAX_CELL_BITS - self.bit_len
    }

    /// Reference slots still available.
    pub fn available_refs(&self) -> usize {
        config::MAX_CELL_REFS - self.refs.len()
    }

    /// Seals the builder into an immutable, hashed cell.
    pub fn build(self) -> Cell {
        Cell::assemble(self.data, self.bit_len, self.refs)
    }

    fn ensure_bits(&self, extra: usize) -> Result<(), CodecError> {
        if self.bit_len + extra > config::MAX_CELL_BITS {
            return Err(CodecError::CapacityExceeded {
                bits: self.bit_len + extra,
                refs: self.refs.len(),
            });
        }
        Ok(())
    }

    fn push_bit(&mut self, bit: bool) {
        if self.bit_len % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            self.data[self.bit_len / 8] |= 0x80 >> (self.bit_len % 8);
        }
        self.bit_len += 1;
    }

    /// Appends a single bit.
    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self, CodecError> {
        self.ensure_bits(1)?;
        self.push_bit(bit);
        Ok(self)
    }

    /// Appends `bits` (0–64) of `value`, most significant bit first.
    ///
    /// `value` must fit in the declared width; a zero-width store accepts
    /// only zero. Widths beyond 64 bits go through [`Self::store_bytes`].
    pub fn store_uint(&mut self, value: u64, bits: usize) -> Result<&mut Self, CodecError> {
        debug_assert!(bits <= 64, "store_uint is limited to 64-bit fields");
        if bits < 64 && value >> bits != 0 {
            return Err(CodecError::Overflow {
                value: value as u128,
                bits: bits as u32,
            });
        }
        self.ensure_bits(bits)?;
        for i in (0..bits).rev() {
            self.push_bit((value >> i) & 1 == 1);
        }
        Ok(self)
    }

    /// Appends whole bytes (covers fixed fields wider than 64 bits, such
    /// as account hashes).
    pub fn store_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, CodecError> {
        self.ensure_bits(bytes.len() * 8)?;
        if self.bit_len % 8 == 0 {
            self.data.extend_from_slice(bytes);
            self.bit_len += bytes.len() * 8;
        } else {
            for &b in bytes {
                for i in (0..8).rev() {
                    self.push_bit((b >> i) & 1 == 1);
                }
            }
        }
        Ok(self)
    }

    /// Appends a coin amount: a 4-bit byte-length nibble followed by that
    /// many big-endian value bytes. Zero encodes as a lone zero nibble.
    pub fn store_coins(&mut self, amount: u128) -> Result<&mut Self, CodecError> {
        let byte_len = (u128::BITS - amount.leading_zeros() + 7) / 8;
        if byte_len > config::COINS_MAX_BYTES {
            return Err(CodecError::Overflow {
                value: amount,
                bits: config::COINS_MAX_BYTES * 8,
            });
        }
        self.ensure_bits(4 + byte_len as usize * 8)?;
        self.store_uint(byte_len as u64, 4)?;
        for i in (0..byte_len).rev() {
            self.store_uint(((amount >> (8 * i)) & 0xff) as u64, 8)?;
        }
        Ok(self)
    }

    /// Appends an address: `addr_std` (tag `10`, no anycast, workchain,
    /// hash) for `Some`, the 2-bit `addr_none` tag for `None`.
    pub fn store_address(&mut self, addr: Option<&TonAddress>) -> Result<&mut Self, CodecError> {
        match addr {
            None => {
                self.store_uint(0b00, 2)?;
            }
            Some(a) => {
                self.ensure_bits(2 + 1 + 8 + 256)?;
                self.store_uint(0b10, 2)?;
                self.store_bit(false)?; // no anycast
                self.store_uint(a.workchain as u8 as u64, 8)?;
                self.store_bytes(&a.hash)?;
            }
        }
        Ok(self)
    }

    /// Attaches a child reference.
    pub fn store_ref(&mut self, cell: Cell) -> Result<&mut Self, CodecError> {
        self.store_ref_shared(Arc::new(cell))
    }

    /// Attaches an already-shared child reference without copying it.
    pub fn store_ref_shared(&mut self, cell: Arc<Cell>) -> Result<&mut Self, CodecError> {
        if self.refs.len() >= config::MAX_CELL_REFS {
            return Err(CodecError::CapacityExceeded {
                bits: self.bit_len,
                refs: self.refs.len() + 1,
            });
        }
        self.refs.push(cell);
        Ok(self)
    }

    /// Appends a string in tail form: raw UTF-8 bytes into this cell, with
    /// any overflow chained into a trailing child reference (and so on).
    ///
    /// Chaining claims the last reference slot of each cell in the chain,
    /// so callers storing refs after a potentially long tail should wrap
    /// the tail with [`Self::store_string_ref_tail`] instead.
    pub fn store_string_tail(&mut self, s: &str) -> Result<&mut Self, CodecError> {
        self.store_bytes_chained(s.as_bytes())
    }

    /// Appends a string tail behind a single child reference.
    pub fn store_string_ref_tail(&mut self, s: &str) -> Result<&mut Self, CodecError> {
        let mut tail = CellBuilder::new();
        tail.store_string_tail(s)?;
        self.store_ref(tail.build())
    }

    fn store_bytes_chained(&mut self, bytes: &[u8]) -> Result<&mut Self, CodecError> {
        let fit = self.available_bits() / 8;
        if bytes.len() <= fit {
            self.store_bytes(bytes)?;
        } else {
            self.store_bytes(&bytes[..fit])?;
            let mut next = CellBuilder::new();
            next.store_bytes_chained(&bytes[fit..])?;
            self.store_ref(next.build())?;
        }
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
