//! # Account Addresses
//!
//! A ledger account is identified by a workchain id and a 256-bit hash.
//! For contracts the hash is the representation hash of the initial
//! (code, data) pair, which is why [`crate::state::StateInit`] can derive an
//! address before anything is deployed.
//!
//! Parsing the human-readable base64 form is the job of an external wallet
//! library and stays out of this crate; everything here works with raw
//! parts. `Display` renders the raw form (`workchain:hex`) for logs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config;

/// A standard internal account address: workchain id plus account hash.
///
/// The *absence* of an address (a burned item's owner, an empty payload
/// slot) is modeled as `Option<TonAddress>` — the wire-level `addr_none`
/// tag never leaks into the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TonAddress {
    /// Workchain id. Fixed to [`config::BASE_WORKCHAIN`] in this deployment.
    pub workchain: i8,
    /// 256-bit account hash.
    pub hash: [u8; config::ADDRESS_HASH_BYTES],
}

impl TonAddress {
    /// Creates an address from raw parts.
    pub fn new(workchain: i8, hash: [u8; config::ADDRESS_HASH_BYTES]) -> Self {
        Self { workchain, hash }
    }

    /// Creates an address in the base workchain.
    pub fn base(hash: [u8; config::ADDRESS_HASH_BYTES]) -> Self {
        Self::new(config::BASE_WORKCHAIN, hash)
    }

    /// Returns the raw string form, `workchain:hex`.
    pub fn to_raw_string(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash))
    }
}

impl fmt::Display for TonAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_raw_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_string_form() {
        let addr = TonAddress::base([0xab; 32]);
        let s = addr.to_raw_string();
        assert!(s.starts_with("0:abab"));
        assert_eq!(s.len(), 2 + 64);
    }

    #[test]
    fn equality_covers_workchain() {
        let a = TonAddress::new(0, [1; 32]);
        let b = TonAddress::new(-1, [1; 32]);
        assert_ne!(a, b);
    }

    #[test]
    fn serde_roundtrip() {
        let addr = TonAddress::base([7; 32]);
        let json = serde_json::to_string(&addr).unwrap();
        let back: TonAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);
    }
}
