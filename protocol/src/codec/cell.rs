//! # Cell — the immutable unit of on-ledger data
//!
//! A cell is an ordered bit string (0–1023 bits) plus up to four ordered
//! child references. Everything a contract stores or receives is a tree of
//! cells, and every layout in this crate bottoms out here.
//!
//! Cells are immutable and content-addressed: the identity of a cell is the
//! SHA-256 *representation hash* over its descriptor bytes, its padded data,
//! and the depths and hashes of its children. Two cells are equal iff their
//! hashes are equal, which makes structural comparison a 32-byte memcmp.
//! Children must exist before a parent can reference them, so cycles are
//! impossible by construction.

use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::codec::slice::CellSlice;
use crate::config;
use crate::error::CodecError;

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// An immutable, content-addressed tree node.
///
/// Construction goes through [`crate::codec::CellBuilder`]; once built, a
/// cell never changes. Children are reference-counted so large shared
/// subtrees (item code, metadata) are cheap to attach in many places.
#[derive(Clone)]
pub struct Cell {
    /// Bit-packed data, MSB-first, zero-padded to whole bytes.
    data: Vec<u8>,
    /// Number of meaningful bits in `data`.
    bit_len: usize,
    /// Ordered child references.
    refs: Vec<Arc<Cell>>,
    /// Representation hash, computed once at assembly.
    hash: [u8; config::CELL_HASH_BYTES],
    /// Distance to the deepest leaf (0 for a leaf).
    depth: u16,
}

impl Cell {
    /// Assembles a cell from raw parts and seals it with its hash.
    ///
    /// Callers must guarantee `data` is zero-padded past `bit_len`; the
    /// builder is the only production caller and does.
    pub(crate) fn assemble(data: Vec<u8>, bit_len: usize, refs: Vec<Arc<Cell>>) -> Self {
        debug_assert!(bit_len <= config::MAX_CELL_BITS);
        debug_assert!(refs.len() <= config::MAX_CELL_REFS);
        debug_assert_eq!(data.len(), (bit_len + 7) / 8);

        let depth = refs
            .iter()
            .map(|r| r.depth + 1)
            .max()
            .unwrap_or(0);
        let hash = Self::representation_hash(&data, bit_len, &refs);
        Self {
            data,
            bit_len,
            refs,
            hash,
            depth,
        }
    }

    /// The empty cell: zero bits, zero children. Used as the deploy body.
    pub fn empty() -> Self {
        Self::assemble(Vec::new(), 0, Vec::new())
    }

    /// Number of data bits.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// The packed data bytes (zero-padded past `bit_len`).
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The child references, in order.
    pub fn refs(&self) -> &[Arc<Cell>] {
        &self.refs
    }

    /// The representation hash.
    pub fn hash(&self) -> &[u8; config::CELL_HASH_BYTES] {
        &self.hash
    }

    /// The representation hash as lowercase hex.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Distance to the deepest descendant leaf.
    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// Opens a reader positioned at the first bit and first reference.
    pub fn parse(&self) -> CellSlice<'_> {
        CellSlice::new(self)
    }

    /// Child at `index`, or [`CodecError::Truncated`] if out of range.
    pub fn reference(&self, index: usize) -> Result<&Arc<Cell>, CodecError> {
        self.refs.get(index).ok_or(CodecError::Truncated {
            wanted: index + 1,
            remaining: self.refs.len(),
            unit: "refs",
        })
    }

    /// The standard representation hash.
    ///
    /// Layout fed to SHA-256, in order: two descriptor bytes
    /// (`d1 = ref count`, `d2 = floor(bits/8) + ceil(bits/8)`), the data
    /// with a completion tag when `bit_len` is not byte-aligned (a lone 1
    /// bit after the payload, zeros to the byte boundary), each child's
    /// depth as big-endian u16, then each child's hash.
    fn representation_hash(
        data: &[u8],
        bit_len: usize,
        refs: &[Arc<Cell>],
    ) -> [u8; config::CELL_HASH_BYTES] {
        let mut hasher = Sha256::new();

        let d1 = refs.len() as u8;
        let d2 = (bit_len / 8 + (bit_len + 7) / 8) as u8;
        hasher.update([d1, d2]);

        if bit_len % 8 == 0 {
            hasher.update(data);
        } else {
            let mut padded = data.to_vec();
            let last = padded.len() - 1;
            padded[last] |= 0x80 >> (bit_len % 8);
            hasher.update(&padded);
        }

        for r in refs {
            hasher.update(r.depth.to_be_bytes());
        }
        for r in refs {
            hasher.update(r.hash);
        }

        hasher.finalize().into()
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Cell {}

impl std::hash::Hash for Cell {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write(&self.hash);
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cell({} bits, {} refs, {})",
            self.bit_len,
            self.refs.len(),
            &self.hash_hex()[..16]
        )
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
    fn empty_cell_is_a_leaf() {
        let cell = Cell::empty();
        assert_eq!(cell.bit_len(), 0);
        assert_eq!(cell.refs().len(), 0);
        assert_eq!(cell.depth(), 0);
    }

    #[test]
    fn empty_cell_hash_is_stable() {
        // sha256 of the two descriptor bytes 0x00 0x00 of an empty cell.
        // Pinned so an accidental change to the hash layout cannot slip by.
        assert_eq!(
            Cell::empty().hash_hex(),
            "96a296d224f285c67bee93c30f8a309157f0daa35dc5b87e410b78630a09cfc7"
        );
    }

    #[test]
    fn identical_content_means_identical_hash() {
        let mut a = CellBuilder::new();
        a.store_uint(42, 32).unwrap();
        let mut b = CellBuilder::new();
        b.store_uint(42, 32).unwrap();
        assert_eq!(a.build(), b.build());
    }

    #[test]
    fn single_bit_difference_changes_hash() {
        let mut a = CellBuilder::new();
        a.store_uint(42, 32).unwrap();
        let mut b = CellBuilder::new();
        b.store_uint(43, 32).unwrap();
        assert_ne!(a.build(), b.build());
    }

    #[test]
    fn hash_covers_children() {
        let mut inner_a = CellBuilder::new();
        inner_a.store_uint(1, 8).unwrap();
        let mut inner_b = CellBuilder::new();
        inner_b.store_uint(2, 8).unwrap();

        let mut a = CellBuilder::new();
        a.store_ref(inner_a.build()).unwrap();
        let mut b = CellBuilder::new();
        b.store_ref(inner_b.build()).unwrap();

        assert_ne!(a.build(), b.build());
    }

    #[test]
    fn completion_tag_distinguishes_bit_lengths() {
        // Seven zero bits and eight zero bits pack to the same data byte;
        // only the completion tag in the hash input tells them apart.
        let mut a = CellBuilder::new();
        a.store_uint(0, 7).unwrap();
        let mut b = CellBuilder::new();
        b.store_uint(0, 8).unwrap();
        assert_ne!(a.build(), b.build());
    }

    #[test]
    fn depth_tracks_deepest_branch() {
        let leaf = Cell::empty();
        let mut mid = CellBuilder::new();
        mid.store_ref(leaf).unwrap();
        let mid = mid.build();
        assert_eq!(mid.depth(), 1);

        let mut root = CellBuilder::new();
        root.store_ref(Cell::empty()).unwrap();
        root.store_ref(mid).unwrap();
        let root = root.build();
        assert_eq!(root.depth(), 2);
    }

    #[test]
    fn reference_out_of_range_is_truncated() {
        let cell = Cell::empty();
        assert!(matches!(
            cell.reference(0),
            Err(CodecError::Truncated { unit: "refs", .. })
        ));
    }
}
