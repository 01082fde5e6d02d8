//! # Cell Codec
//!
//! The bit-exact serialization layer everything else in this crate is built
//! on. The ledger stores data as trees of *cells* — up to 1023 bits plus up
//! to four child references each — and a contract's state, every message it
//! accepts, and every value it returns are all cell trees with fixed
//! positional layouts.
//!
//! The module split mirrors the data flow:
//!
//! - **cell** — the immutable, content-addressed tree node.
//! - **builder** — append-only construction with checked widths.
//! - **slice** — sequential reading, the strict mirror of the builder.
//! - **dict** — integer-keyed sorted maps as binary tries inside a cell.
//!
//! There are no self-describing tags anywhere in this format. Whoever
//! writes a layout owns its read order too; keep the two sides adjacent in
//! source and guard them with round-trip tests.

pub mod builder;
pub mod cell;
pub mod dict;
pub mod slice;

// Re-export the things people actually need so they don't have to memorize
// our module hierarchy.
pub use builder::CellBuilder;
pub use cell::Cell;
pub use slice::CellSlice;
