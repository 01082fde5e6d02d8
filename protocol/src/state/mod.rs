//! # Persistent State Layouts
//!
//! Canonical cell layouts for the two contract types plus state-init
//! packing and address derivation. Encoding is the production path (the
//! initial state cell fixes the contract address); decoding exists for
//! inspection and tests — live reads go through [`crate::query`].

pub mod collection;
pub mod init;
pub mod item;

pub use collection::{CollectionConfig, RoyaltyParams};
pub use init::StateInit;
pub use item::ItemConfig;
