//! # Trie Dictionary — sorted integer-keyed maps inside a cell
//!
//! The ledger's dictionary format is a binary trie: every edge carries a
//! label (the key bits shared by everything below it), every fork branches
//! on the next bit (left = 0, right = 1), and every leaf holds one caller-
//! encoded payload. Because keys are fixed-width and the trie branches
//! bitwise, an in-order walk yields entries in ascending numeric key order
//! for free.
//!
//! Labels come in three interchangeable encodings — `short` (unary length),
//! `long` (binary length), and `same` (run of one repeated bit) — and the
//! serializer must pick the shortest for each edge to stay byte-compatible
//! with the reference implementation. The reader accepts all three.
//!
//! Everything here encodes the *direct* form, where the root edge sits in
//! the cell itself. The direct form cannot represent an empty map, hence
//! [`CodecError::EmptyDictionary`].

use crate::codec::builder::CellBuilder;
use crate::codec::cell::Cell;
use crate::error::CodecError;

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Serializes `entries` into a direct-form dictionary cell.
///
/// Keys are `key_bits` wide (1–64). Entries may arrive in any order; they
/// are sorted internally. `write_value` appends one payload to the leaf
/// cell it is given — the payload shares the leaf with the final label, so
/// it must fit in the remaining bits/refs.
///
/// Fails with [`CodecError::DuplicateKey`] on repeated keys,
/// [`CodecError::EmptyDictionary`] on zero entries, and
/// [`CodecError::Overflow`] when a key does not fit in `key_bits`.
pub fn build_direct<V, F>(
    key_bits: u32,
    entries: &[(u64, V)],
    mut write_value: F,
) -> Result<Cell, CodecError>
where
    F: FnMut(&mut CellBuilder, &V) -> Result<(), CodecError>,
{
    debug_assert!((1..=64).contains(&key_bits));
    if entries.is_empty() {
        return Err(CodecError::EmptyDictionary);
    }

    let mut sorted: Vec<(u64, &V)> = entries.iter().map(|(k, v)| (*k, v)).collect();
    for &(key, _) in &sorted {
        if key_bits < 64 && key >> key_bits != 0 {
            return Err(CodecError::Overflow {
                value: key as u128,
                bits: key_bits,
            });
        }
    }
    sorted.sort_by_key(|&(k, _)| k);
    for pair in sorted.windows(2) {
        if pair[0].0 == pair[1].0 {
            return Err(CodecError::DuplicateKey { key: pair[0].0 });
        }
    }

    let mut root = CellBuilder::new();
    write_edge(&mut root, &sorted, key_bits, &mut write_value)?;
    Ok(root.build())
}

/// Writes one `hm_edge`: a label, then either a leaf payload or two forks.
fn write_edge<V, F>(
    b: &mut CellBuilder,
    keys: &[(u64, &V)],
    n: u32,
    write_value: &mut F,
) -> Result<(), CodecError>
where
    F: FnMut(&mut CellBuilder, &V) -> Result<(), CodecError>,
{
    let first = keys[0].0;
    let last = keys[keys.len() - 1].0;

    // Keys are sorted, so the prefix shared by first and last is shared by
    // every key in between.
    let l = if keys.len() == 1 {
        n
    } else {
        let xor = (first ^ last) & mask(n);
        (xor.leading_zeros() - (64 - n)).min(n)
    };
    let label = if l == 0 { 0 } else { (first >> (n - l)) & mask(l) };
    write_label(b, label, l, n)?;

    let m = n - l;
    if m == 0 {
        return write_value(b, keys[0].1);
    }

    let split = keys.partition_point(|&(k, _)| (k >> (m - 1)) & 1 == 0);
    debug_assert!(split > 0 && split < keys.len());

    let mut left = CellBuilder::new();
    write_edge(&mut left, &keys[..split], m - 1, write_value)?;
    let mut right = CellBuilder::new();
    write_edge(&mut right, &keys[split..], m - 1, write_value)?;
    b.store_ref(left.build())?;
    b.store_ref(right.build())?;
    Ok(())
}

/// Writes an `l`-bit label under an `n`-bit remaining keyspace, choosing
/// the shortest of the three encodings (ties resolved the same way the
/// reference serializer resolves them: same only when strictly shortest,
/// then long only when strictly shorter than short).
fn write_label(b: &mut CellBuilder, label: u64, l: u32, n: u32) -> Result<(), CodecError> {
    let len_field = len_bits(n);
    let size_short = 1 + (l + 1) + l;
    let size_long = 2 + len_field + l;
    let size_same = 2 + 1 + len_field;
    let is_same = l > 0 && (label == 0 || label == mask(l));

    if is_same && size_same < size_long && size_same < size_short {
        b.store_uint(0b11, 2)?;
        b.store_bit(label != 0)?;
        b.store_uint(l as u64, len_field as usize)?;
    } else if size_long < size_short {
        b.store_uint(0b10, 2)?;
        b.store_uint(l as u64, len_field as usize)?;
        b.store_uint(label, l as usize)?;
    } else {
        b.store_bit(false)?;
        for _ in 0..l {
            b.store_bit(true)?;
        }
        b.store_bit(false)?;
        b.store_uint(label, l as usize)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

/// Decodes a direct-form dictionary cell into `(key, value)` pairs in
/// ascending key order.
///
/// `read_value` consumes one payload from the leaf slice it is given.
pub fn parse_direct<V, F>(
    root: &Cell,
    key_bits: u32,
    mut read_value: F,
) -> Result<Vec<(u64, V)>, CodecError>
where
    F: FnMut(&mut crate::codec::CellSlice<'_>) -> Result<V, CodecError>,
{
    debug_assert!((1..=64).contains(&key_bits));
    let mut out = Vec::new();
    read_edge(root, key_bits, 0, &mut out, &mut read_value)?;
    Ok(out)
}

fn read_edge<V, F>(
    cell: &Cell,
    n: u32,
    prefix: u64,
    out: &mut Vec<(u64, V)>,
    read_value: &mut F,
) -> Result<(), CodecError>
where
    F: FnMut(&mut crate::codec::CellSlice<'_>) -> Result<V, CodecError>,
{
    let mut s = cell.parse();
    let (label, l) = read_label(&mut s, n)?;
    let m = n - l;
    let prefix = shl_or(prefix, l, label);

    if m == 0 {
        let value = read_value(&mut s)?;
        out.push((prefix, value));
        return Ok(());
    }

    let left = s.load_ref()?;
    let right = s.load_ref()?;
    read_edge(&left, m - 1, prefix << 1, out, read_value)?;
    read_edge(&right, m - 1, (prefix << 1) | 1, out, read_value)?;
    Ok(())
}

/// Reads a label in any of the three encodings; returns `(bits, length)`.
fn read_label(s: &mut crate::codec::CellSlice<'_>, n: u32) -> Result<(u64, u32), CodecError> {
    let overrun = CodecError::Layout("trie label longer than the remaining key bits");
    if !s.load_bit()? {
        // short: unary length, then the bits themselves.
        let mut l = 0u32;
        while s.load_bit()? {
            l += 1;
            if l > n {
                return Err(overrun);
            }
        }
        let label = s.load_uint(l as usize)?;
        return Ok((label, l));
    }
    if !s.load_bit()? {
        // long: binary length, then the bits themselves.
        let l = s.load_uint(len_bits(n) as usize)? as u32;
        if l > n {
            return Err(overrun);
        }
        let label = s.load_uint(l as usize)?;
        return Ok((label, l));
    }
    // same: one bit repeated a binary-encoded number of times.
    let bit = s.load_bit()?;
    let l = s.load_uint(len_bits(n) as usize)? as u32;
    if l > n {
        return Err(overrun);
    }
    let label = if bit { mask(l) } else { 0 };
    Ok((label, l))
}

// ---------------------------------------------------------------------------
// Bit helpers
// ---------------------------------------------------------------------------

/// Bits needed to store any value in `0..=n`.
fn len_bits(n: u32) -> u32 {
    32 - n.leading_zeros()
}

/// Low `l` bits set.
fn mask(l: u32) -> u64 {
    if l >= 64 {
        u64::MAX
    } else {
        (1u64 << l) - 1
    }
}

/// `(prefix << l) | value`, tolerating a 64-bit shift for the single-entry
/// root case.
fn shl_or(prefix: u64, l: u32, value: u64) -> u64 {
    if l >= 64 {
        value
    } else {
        (prefix << l) | value
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn write_u32(b: &mut CellBuilder, v: &u32) -> Result<(), CodecError> {
        b.store_uint(*v as u64, 32)?;
        Ok(())
    }

    fn read_u32(s: &mut crate::codec::CellSlice<'_>) -> Result<u32, CodecError> {
        s.load_u32()
    }

    fn roundtrip(key_bits: u32, entries: &[(u64, u32)]) -> Vec<(u64, u32)> {
        let root = build_direct(key_bits, entries, write_u32).unwrap();
        parse_direct(&root, key_bits, read_u32).unwrap()
    }

    #[test]
    fn single_entry() {
        assert_eq!(roundtrip(64, &[(42, 7)]), vec![(42, 7)]);
    }

    #[test]
    fn adjacent_keys() {
        assert_eq!(
            roundtrip(64, &[(0, 10), (1, 11)]),
            vec![(0, 10), (1, 11)]
        );
    }

    #[test]
    fn entries_come_back_sorted() {
        let entries = [(9u64, 90u32), (3, 30), (7, 70), (0, 0), (8, 80)];
        let decoded = roundtrip(64, &entries);
        assert_eq!(
            decoded,
            vec![(0, 0), (3, 30), (7, 70), (8, 80), (9, 90)]
        );
    }

    #[test]
    fn extreme_keys_share_no_prefix() {
        assert_eq!(
            roundtrip(64, &[(0, 1), (u64::MAX, 2)]),
            vec![(0, 1), (u64::MAX, 2)]
        );
    }

    #[test]
    fn narrow_keyspace() {
        assert_eq!(
            roundtrip(8, &[(0, 1), (127, 2), (255, 3)]),
            vec![(0, 1), (127, 2), (255, 3)]
        );
    }

    #[test]
    fn dense_keyspace_exercises_every_label_form() {
        // 0..32 under 64-bit keys: long zero-prefixes (same form), unary
        // short labels near the leaves, and binary long labels in between.
        let entries: Vec<(u64, u32)> = (0u64..32).map(|k| (k, k as u32 * 3)).collect();
        let decoded = roundtrip(64, &entries);
        assert_eq!(decoded, entries);
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let err = build_direct(64, &[(5u64, 1u32), (5, 2)], write_u32).unwrap_err();
        assert_eq!(err, CodecError::DuplicateKey { key: 5 });
    }

    #[test]
    fn empty_dictionary_is_rejected() {
        let err = build_direct(64, &[] as &[(u64, u32)], write_u32).unwrap_err();
        assert_eq!(err, CodecError::EmptyDictionary);
    }

    #[test]
    fn oversized_key_is_rejected() {
        let err = build_direct(8, &[(256u64, 1u32)], write_u32).unwrap_err();
        assert_eq!(err, CodecError::Overflow { value: 256, bits: 8 });
    }

    #[test]
    fn single_key_zero_uses_same_label() {
        // One 64-bit key of all zeros: the `same` form stores the whole
        // label in 2 + 1 + 7 bits, far below the 130-bit short form.
        let root = build_direct(64, &[(0u64, 9u32)], write_u32).unwrap();
        assert_eq!(root.bit_len(), 2 + 1 + 7 + 32);
    }

    #[test]
    fn fork_structure_for_two_distant_keys() {
        // Keys 0 and 2^63 differ at the first bit: the root label is empty
        // and both subtrees hang off the root as refs.
        let root = build_direct(64, &[(0u64, 1u32), (1u64 << 63, 2)], write_u32).unwrap();
        assert_eq!(root.refs().len(), 2);
        let decoded = parse_direct(&root, 64, read_u32).unwrap();
        assert_eq!(decoded, vec![(0, 1), (1u64 << 63, 2)]);
    }

    #[test]
    fn randomized_keysets_roundtrip() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        // Seeded so a failure reproduces.
        let mut rng = StdRng::seed_from_u64(0x5EED);
        for _ in 0..50 {
            let count = rng.gen_range(1..=40);
            let mut keys: Vec<u64> = (0..count).map(|_| rng.gen()).collect();
            keys.sort_unstable();
            keys.dedup();
            let entries: Vec<(u64, u32)> =
                keys.iter().map(|&k| (k, k as u32)).collect();
            assert_eq!(roundtrip(64, &entries), entries);
        }
    }

    #[test]
    fn payloads_with_refs_survive() {
        let entries: Vec<(u64, String)> =
            vec![(1, "alpha".into()), (2, "beta".into())];
        let root = build_direct(64, &entries, |b, v: &String| {
            b.store_string_ref_tail(v)?;
            Ok(())
        })
        .unwrap();
        let decoded = parse_direct(&root, 64, |s| s.load_string_ref_tail()).unwrap();
        assert_eq!(decoded, entries);
    }
}
