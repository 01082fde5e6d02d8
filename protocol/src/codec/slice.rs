//! # CellSlice — sequential cell reading
//!
//! The read-side mirror of [`crate::codec::CellBuilder`]. A slice walks a
//! cell's bits and references in order; since the format carries no tags,
//! the caller must issue `load_*` calls in exactly the order the matching
//! `store_*` calls ran. Reads past the end fail with
//! [`CodecError::Truncated`] rather than wrapping or padding.

use std::sync::Arc;

use crate::address::TonAddress;
use crate::codec::cell::Cell;
use crate::error::CodecError;

/// Cursor over one cell's data bits and child references.
#[derive(Debug, Clone)]
pub struct CellSlice<'a> {
    cell: &'a Cell,
    bit_pos: usize,
    ref_pos: usize,
}

impl<'a> CellSlice<'a> {
    /// Opens a cursor at the first bit and first reference of `cell`.
    pub fn new(cell: &'a Cell) -> Self {
        Self {
            cell,
            bit_pos: 0,
            ref_pos: 0,
        }
    }

    /// Bits not yet consumed.
    pub fn remaining_bits(&self) -> usize {
        self.cell.bit_len() - self.bit_pos
    }

    /// References not yet consumed.
    pub fn remaining_refs(&self) -> usize {
        self.cell.refs().len() - self.ref_pos
    }

    /// `true` once every bit and reference has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining_bits() == 0 && self.remaining_refs() == 0
    }

    fn ensure_bits(&self, wanted: usize) -> Result<(), CodecError> {
        if wanted > self.remaining_bits() {
            return Err(CodecError::Truncated {
                wanted,
                remaining: self.remaining_bits(),
                unit: "bits",
            });
        }
        Ok(())
    }

    fn read_bit(&mut self) -> bool {
        let byte = self.cell.data()[self.bit_pos / 8];
        let bit = byte & (0x80 >> (self.bit_pos % 8)) != 0;
        self.bit_pos += 1;
        bit
    }

    /// Reads a single bit.
    pub fn load_bit(&mut self) -> Result<bool, CodecError> {
        self.ensure_bits(1)?;
        Ok(self.read_bit())
    }

    /// Reads `bits` (0–64) as an unsigned integer, MSB first.
    pub fn load_uint(&mut self, bits: usize) -> Result<u64, CodecError> {
        debug_assert!(bits <= 64, "load_uint is limited to 64-bit fields");
        self.ensure_bits(bits)?;
        let mut value = 0u64;
        for _ in 0..bits {
            value = (value << 1) | self.read_bit() as u64;
        }
        Ok(value)
    }

    /// Reads a 32-bit unsigned integer.
    pub fn load_u32(&mut self) -> Result<u32, CodecError> {
        Ok(self.load_uint(32)? as u32)
    }

    /// Reads a 64-bit unsigned integer.
    pub fn load_u64(&mut self) -> Result<u64, CodecError> {
        self.load_uint(64)
    }

    /// Reads `n` whole bytes.
    pub fn load_bytes(&mut self, n: usize) -> Result<Vec<u8>, CodecError> {
        self.ensure_bits(n * 8)?;
        let mut out = Vec::with_capacity(n);
        if self.bit_pos % 8 == 0 {
            let start = self.bit_pos / 8;
            out.extend_from_slice(&self.cell.data()[start..start + n]);
            self.bit_pos += n * 8;
        } else {
            for _ in 0..n {
                out.push(self.load_uint(8)? as u8);
            }
        }
        Ok(out)
    }

    /// Reads a coin amount (4-bit length nibble + big-endian bytes).
    pub fn load_coins(&mut self) -> Result<u128, CodecError> {
        let byte_len = self.load_uint(4)?;
        let mut amount = 0u128;
        for _ in 0..byte_len {
            amount = (amount << 8) | self.load_uint(8)? as u128;
        }
        Ok(amount)
    }

    /// Reads an address field: `Some` for `addr_std`, `None` for
    /// `addr_none`. External and anycast forms are not handled and fail
    /// with [`CodecError::UnsupportedAddress`].
    pub fn load_address(&mut self) -> Result<Option<TonAddress>, CodecError> {
        let tag = self.load_uint(2)? as u8;
        match tag {
            0b00 => Ok(None),
            0b10 => {
                if self.load_bit()? {
                    // Anycast prefixes never occur in this deployment.
                    return Err(CodecError::UnsupportedAddress { tag });
                }
                let workchain = self.load_uint(8)? as u8 as i8;
                let bytes = self.load_bytes(32)?;
                let mut hash = [0u8; 32];
                hash.copy_from_slice(&bytes);
                Ok(Some(TonAddress::new(workchain, hash)))
            }
            other => Err(CodecError::UnsupportedAddress { tag: other }),
        }
    }

    /// Reads an address field that must be present.
    pub fn load_required_address(&mut self) -> Result<TonAddress, CodecError> {
        self.load_address()?
            .ok_or(CodecError::Layout("expected an address, found addr_none"))
    }

    /// Takes the next child reference (shared, cheap to clone).
    pub fn load_ref(&mut self) -> Result<Arc<Cell>, CodecError> {
        let cell = self
            .cell
            .refs()
            .get(self.ref_pos)
            .ok_or(CodecError::Truncated {
                wanted: 1,
                remaining: 0,
                unit: "refs",
            })?
            .clone();
        self.ref_pos += 1;
        Ok(cell)
    }

    /// Reads a string stored in tail form: the remaining whole bytes of
    /// this cell, then the chain of trailing child references, if any.
    pub fn load_string_tail(&mut self) -> Result<String, CodecError> {
        let mut bytes = self.load_bytes(self.remaining_bits() / 8)?;
        let mut next = if self.remaining_refs() > 0 {
            Some(self.load_ref()?)
        } else {
            None
        };
        while let Some(cell) = next.take() {
            let mut s = cell.parse();
            bytes.extend_from_slice(&s.load_bytes(s.remaining_bits() / 8)?);
            if s.remaining_refs() > 0 {
                next = Some(s.load_ref()?);
            }
        }
        String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)
    }

    /// Reads a string tail stored behind a single child reference.
    pub fn load_string_ref_tail(&mut self) -> Result<String, CodecError> {
        let cell = self.load_ref()?;
        cell.parse().load_string_tail()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CellBuilder;

    #[test]
    fn mirror_reads_recover_mirror_writes() {
        let addr = TonAddress::base([0x42; 32]);
        let mut b = CellBuilder::new();
        b.store_uint(7, 32)
            .unwrap()
            .store_coins(1_500_000_000)
            .unwrap()
            .store_address(Some(&addr))
            .unwrap()
            .store_bit(true)
            .unwrap();
        let cell = b.build();

        let mut s = cell.parse();
        assert_eq!(s.load_u32().unwrap(), 7);
        assert_eq!(s.load_coins().unwrap(), 1_500_000_000);
        assert_eq!(s.load_address().unwrap(), Some(addr));
        assert!(s.load_bit().unwrap());
        assert!(s.is_empty());
    }

    #[test]
    fn truncated_read_reports_counts() {
        let mut b = CellBuilder::new();
        b.store_uint(0, 8).unwrap();
        let cell = b.build();
        let mut s = cell.parse();
        let err = s.load_uint(16).unwrap_err();
        assert_eq!(
            err,
            CodecError::Truncated {
                wanted: 16,
                remaining: 8,
                unit: "bits"
            }
        );
    }

    #[test]
    fn coins_roundtrip_extremes() {
        for amount in [0u128, 1, 255, 256, u64::MAX as u128, (1u128 << 120) - 1] {
            let mut b = CellBuilder::new();
            b.store_coins(amount).unwrap();
            let cell = b.build();
            assert_eq!(cell.parse().load_coins().unwrap(), amount, "amount {amount}");
        }
    }

    #[test]
    fn address_roundtrip_including_none() {
        let addr = TonAddress::new(-1, [0x99; 32]);
        let mut b = CellBuilder::new();
        b.store_address(Some(&addr)).unwrap();
        b.store_address(None).unwrap();
        let cell = b.build();

        let mut s = cell.parse();
        assert_eq!(s.load_address().unwrap(), Some(addr));
        assert_eq!(s.load_address().unwrap(), None);
    }

    #[test]
    fn required_address_rejects_addr_none() {
        let mut b = CellBuilder::new();
        b.store_address(None).unwrap();
        let cell = b.build();
        assert!(matches!(
            cell.parse().load_required_address(),
            Err(CodecError::Layout(_))
        ));
    }

    #[test]
    fn unknown_address_tag_is_unsupported() {
        let mut b = CellBuilder::new();
        b.store_uint(0b01, 2).unwrap(); // addr_extern
        let cell = b.build();
        assert_eq!(
            cell.parse().load_address(),
            Err(CodecError::UnsupportedAddress { tag: 0b01 })
        );
    }

    #[test]
    fn string_tail_roundtrip_short_and_chained() {
        let long = "u".repeat(500);
        for s in ["", "ipfs://QmTicket", long.as_str()] {
            let mut b = CellBuilder::new();
            b.store_string_tail(s).unwrap();
            let cell = b.build();
            assert_eq!(cell.parse().load_string_tail().unwrap(), s);
        }
    }

    #[test]
    fn string_ref_tail_roundtrip() {
        let mut b = CellBuilder::new();
        b.store_uint(5, 8).unwrap();
        b.store_string_ref_tail("common/uri").unwrap();
        let cell = b.build();

        let mut s = cell.parse();
        assert_eq!(s.load_uint(8).unwrap(), 5);
        assert_eq!(s.load_string_ref_tail().unwrap(), "common/uri");
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let mut b = CellBuilder::new();
        b.store_bytes(&[0xff, 0xfe]).unwrap();
        let cell = b.build();
        assert_eq!(
            cell.parse().load_string_tail(),
            Err(CodecError::InvalidUtf8)
        );
    }

    #[test]
    fn refs_are_consumed_in_order() {
        let mut first = CellBuilder::new();
        first.store_uint(1, 8).unwrap();
        let mut second = CellBuilder::new();
        second.store_uint(2, 8).unwrap();

        let mut b = CellBuilder::new();
        b.store_ref(first.build()).unwrap();
        b.store_ref(second.build()).unwrap();
        let cell = b.build();

        let mut s = cell.parse();
        assert_eq!(s.load_ref().unwrap().parse().load_uint(8).unwrap(), 1);
        assert_eq!(s.load_ref().unwrap().parse().load_uint(8).unwrap(), 2);
        assert!(matches!(
            s.load_ref(),
            Err(CodecError::Truncated { unit: "refs", .. })
        ));
    }
}
