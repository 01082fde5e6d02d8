// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # PORTA Protocol — Core Library
//!
//! The client-side protocol layer for PORTA: NFT ticketing on TON. One
//! collection contract sells the tickets; one item contract per ticket
//! carries ownership. This crate is everything an off-chain client needs
//! to talk to both — byte-exact state and message encoding, query result
//! decoding, and a local model of the mint rules — without ever executing
//! contract code itself.
//!
//! ## Architecture
//!
//! The modules stack bottom-up, the way the data does:
//!
//! - **codec** — cells, builders, slices, trie dictionaries. The bit-exact
//!   foundation; everything else is a layout on top of it.
//! - **address** — account identifiers (workchain + 256-bit hash).
//! - **state** — collection/item persistent-state layouts, state init,
//!   address derivation.
//! - **message** — the tag-discriminated operation bodies, both directions.
//! - **query** — typed decoders for the read-only get methods.
//! - **eligibility** — the mint acceptance rules, predicted client-side.
//! - **transport** — the async boundary a real network client implements.
//! - **sandbox** — an in-memory ledger emulation for tests and examples.
//! - **client** — typed collection/item handles over a transport.
//! - **config** — every protocol and deployment constant.
//! - **error** — the codec/query/rejection taxonomy.
//!
//! ## Design Philosophy
//!
//! 1. The wire format has no tags: every encode has exactly one mirror
//!    decode, kept adjacent in source and guarded by round-trip tests.
//! 2. The contract decides; the client predicts. Eligibility checks are
//!    advisory and rejections always surface the raw exit code.
//! 3. Unknown is not an error state to hide: unrecognized exit codes pass
//!    through verbatim.

pub mod address;
pub mod client;
pub mod codec;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod message;
pub mod query;
pub mod sandbox;
pub mod state;
pub mod transport;
