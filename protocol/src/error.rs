//! # Error Taxonomy
//!
//! Three failure families live here, and they are deliberately kept apart:
//!
//! - [`CodecError`] — local, deterministic cell-level failures. Always
//!   recoverable by fixing the caller's input, never retried, never ignored.
//! - [`QueryError`] — a get-method result did not have the shape the decoder
//!   declared. This signals a protocol-version or layout mismatch between
//!   this client and the deployed contract; it is surfaced, not retried.
//! - [`ProtocolError`] — the umbrella the client layer returns, including
//!   on-ledger rejections that arrive *after* a successful submission.
//!
//! Rejection exit codes are opaque integers owned by the deployed contracts.
//! [`RejectReason`] classifies the codes this deployment has been seen to
//! return and funnels everything else into [`RejectReason::Unrecognized`] —
//! an unknown code is information for the caller, not a crash.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

// ---------------------------------------------------------------------------
// CodecError
// ---------------------------------------------------------------------------

/// Errors raised while packing or unpacking cells.
///
/// Every variant is deterministic: the same input produces the same error.
/// None of these can be caused by network conditions or ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A read requested more bits or references than the cell has left.
    #[error("truncated read: wanted {wanted} more {unit}, only {remaining} remaining")]
    Truncated {
        /// How many bits/refs the read asked for.
        wanted: usize,
        /// How many were actually left.
        remaining: usize,
        /// `"bits"` or `"refs"`.
        unit: &'static str,
    },

    /// A written value does not fit in its declared field width.
    #[error("overflow: value {value} does not fit in {bits} bits")]
    Overflow {
        /// The value the caller tried to store.
        value: u128,
        /// The declared field width in bits.
        bits: u32,
    },

    /// A write would push the cell past 1023 data bits or 4 references.
    #[error("cell capacity exceeded: write would need {bits} bits / {refs} refs")]
    CapacityExceeded {
        /// Total data bits the cell would hold after the write.
        bits: usize,
        /// Total references the cell would hold after the write.
        refs: usize,
    },

    /// Two dictionary entries share the same key.
    #[error("duplicate dictionary key {key}")]
    DuplicateKey {
        /// The offending key.
        key: u64,
    },

    /// A dictionary with zero entries was requested where the wire format
    /// has no empty representation.
    #[error("empty dictionary: the direct encoding requires at least one entry")]
    EmptyDictionary,

    /// An address field used an encoding this client does not handle
    /// (external addresses, anycast prefixes, or `addr_none` where a
    /// concrete address is mandatory).
    #[error("unsupported address encoding (tag 0b{tag:02b})")]
    UnsupportedAddress {
        /// The 2-bit address constructor tag as read from the wire.
        tag: u8,
    },

    /// A message body carried an operation tag this protocol does not define.
    #[error("unknown operation tag 0x{tag:08x}")]
    UnknownTag {
        /// The 32-bit tag as read from the wire.
        tag: u32,
    },

    /// A string payload decoded to bytes that are not valid UTF-8.
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    /// A structural rule of a fixed layout was violated (wrong marker byte,
    /// trie label longer than the remaining key, and similar).
    #[error("layout violation: {0}")]
    Layout(&'static str),
}

// ---------------------------------------------------------------------------
// QueryError
// ---------------------------------------------------------------------------

/// Errors raised while decoding a get-method result tuple.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A result slot held a different runtime type than the decoder declared.
    ///
    /// Slots are read strictly in declared order, so the first mismatch wins
    /// and decoding stops — partial results are never returned.
    #[error("shape mismatch in `{method}` result slot {slot}: expected {expected}, got {got}")]
    ShapeMismatch {
        /// The get-method whose result was being decoded.
        method: &'static str,
        /// Zero-based index of the offending slot.
        slot: usize,
        /// What the decoder declared for this slot.
        expected: &'static str,
        /// What the runtime actually returned.
        got: &'static str,
    },

    /// A slot had the right runtime type but its cell contents were
    /// malformed (e.g. a truncated address slice).
    #[error("malformed cell in query result: {0}")]
    Codec(#[from] CodecError),
}

// ---------------------------------------------------------------------------
// RejectReason
// ---------------------------------------------------------------------------

/// Advisory classification of an on-ledger rejection.
///
/// The numeric exit codes are contract-side constants of *this* deployment,
/// not a universal set (see [`config`]). The mapping here covers the codes
/// observed in practice; anything else lands in [`RejectReason::Unrecognized`]
/// and is surfaced verbatim — never reinterpreted, never panicked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The attached amount is below the collection's mint price.
    PriceShortfall,
    /// The mint window has closed (`now > end_time`).
    DeadlineExpired,
    /// The sender is not the owner required for this operation.
    OwnershipViolation,
    /// Every ticket has been sold (`tickets_sold == max_supply`).
    CapacityExhausted,
    /// An exit code outside the known mapping, carried through untouched.
    Unrecognized(i32),
}

impl RejectReason {
    /// Classifies a raw exit code into an advisory reason.
    ///
    /// Unknown codes are preserved in [`RejectReason::Unrecognized`]; the
    /// mapping is deployment configuration, not a stable protocol guarantee.
    pub fn from_exit_code(code: i32) -> Self {
        match code {
            config::EXIT_NOT_OWNER => Self::OwnershipViolation,
            config::EXIT_MINT_CLOSED => Self::DeadlineExpired,
            config::EXIT_MINT_UNDERPAID => Self::PriceShortfall,
            other => Self::Unrecognized(other),
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PriceShortfall => write!(f, "price shortfall"),
            Self::DeadlineExpired => write!(f, "deadline expired"),
            Self::OwnershipViolation => write!(f, "ownership violation"),
            Self::CapacityExhausted => write!(f, "capacity exhausted"),
            Self::Unrecognized(code) => write!(f, "unrecognized exit code {}", code),
        }
    }
}

// ---------------------------------------------------------------------------
// ProtocolError
// ---------------------------------------------------------------------------

/// The error type returned by the typed client layer.
///
/// Retry policy is deliberately absent: nothing in this crate retries.
/// Whether and how to retry belongs to the transport implementation.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A message or state cell could not be built or read.
    #[error("codec failure: {0}")]
    Codec(#[from] CodecError),

    /// A get-method result did not decode.
    #[error("query decode failure: {0}")]
    Query(#[from] QueryError),

    /// The message was delivered and the contract refused it.
    #[error("rejected with exit code {exit_code} ({advisory})")]
    Rejected {
        /// The raw exit code, surfaced verbatim.
        exit_code: i32,
        /// Best-effort classification of the code.
        advisory: RejectReason,
    },

    /// The underlying transport failed before the contract saw the message.
    #[error("transport failure: {0}")]
    Transport(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
