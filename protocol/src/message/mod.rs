//! # Operation Messages
//!
//! Tag-discriminated message bodies for both contract types, with symmetric
//! pack/parse so the client can both produce messages and interpret ones it
//! observes. Collection and item tags are disjoint sets; parsing a body
//! against the wrong contract type fails with
//! [`crate::error::CodecError::UnknownTag`] instead of misreading it.

pub mod collection;
pub mod item;

pub use collection::{CollectionMessage, DeployListEntry};
pub use item::ItemMessage;
