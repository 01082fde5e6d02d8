//! # Protocol Configuration & Constants
//!
//! Every magic number in PORTA lives here. If you're hardcoding a constant
//! somewhere else, you're doing it wrong and you owe the team coffee.
//!
//! Two kinds of constants share this file and the distinction matters:
//!
//! - **Protocol constants** (cell limits, operation tags, get-method names)
//!   are fixed by the ledger and the TEP-62 message layout. Changing them
//!   breaks wire compatibility with every deployed contract.
//! - **Deployment constants** (the `EXIT_*` rejection codes) are behaviors
//!   of the contracts *we* deploy, observed from their test suite. They are
//!   configuration data for this deployment, not a universal set — treat an
//!   unknown code as unknown, never as a gap to fill in.

// ---------------------------------------------------------------------------
// Cell Geometry
// ---------------------------------------------------------------------------

/// Maximum number of data bits a single cell can hold.
pub const MAX_CELL_BITS: usize = 1023;

/// Maximum number of child references a single cell can hold.
pub const MAX_CELL_REFS: usize = 4;

/// Length of a cell representation hash in bytes (SHA-256).
pub const CELL_HASH_BYTES: usize = 32;

/// Length of the account-identifier hash part in bytes.
pub const ADDRESS_HASH_BYTES: usize = 32;

/// Maximum number of value bytes a coin amount may occupy. The 4-bit length
/// nibble tops out at 15, which bounds amounts to 120 bits.
pub const COINS_MAX_BYTES: u32 = 15;

// ---------------------------------------------------------------------------
// Ledger Parameters
// ---------------------------------------------------------------------------

/// The workchain every PORTA contract lives in. Fixed per deployment.
pub const BASE_WORKCHAIN: i8 = 0;

/// Denominator for basis-point fields (`refund_percent`: 5000 = 50%).
pub const BASIS_POINTS: u16 = 10_000;

/// Marker byte opening the collection metadata cell (on-chain content
/// layout, TEP-64).
pub const ONCHAIN_CONTENT_TAG: u8 = 0x01;

/// Key width of the batch-mint deploy list dictionary.
pub const DEPLOY_LIST_KEY_BITS: u32 = 64;

// ---------------------------------------------------------------------------
// Operation Tags
// ---------------------------------------------------------------------------
//
// The first 32 bits of every non-empty message body. Collection and item
// contracts have disjoint tag sets; a deploy is an empty body with no tag
// at all.

/// Mint a single item (collection contract).
pub const OP_MINT: u32 = 1;

/// Mint a batch of pre-indexed items (collection contract).
pub const OP_BATCH_MINT: u32 = 2;

/// Replace the collection owner (collection contract).
pub const OP_CHANGE_OWNER: u32 = 3;

/// Replace the collection content cell (collection contract).
pub const OP_CHANGE_CONTENT: u32 = 4;

/// Transfer item ownership (item contract, TEP-62).
pub const OP_TRANSFER: u32 = 0x5fcc3d14;

/// Burn an item (item contract).
pub const OP_BURN: u32 = 0x595f07bc;

/// Notification an item sends its new owner after a transfer (TEP-62).
/// Emitted by contracts, never built by this client.
pub const OP_OWNERSHIP_ASSIGNED: u32 = 0x05138d91;

/// Return of excess attached value after an operation (TEP-62).
pub const OP_EXCESSES: u32 = 0xd53276db;

// ---------------------------------------------------------------------------
// Exit Codes (deployment configuration)
// ---------------------------------------------------------------------------

/// The operation was accepted and state advanced.
pub const EXIT_SUCCESS: i32 = 0;

/// Sender is not the owner required for the operation.
pub const EXIT_NOT_OWNER: i32 = 401;

/// The mint window has closed (`now > end_time`).
pub const EXIT_MINT_CLOSED: i32 = 406;

/// The attached amount is below the mint price.
pub const EXIT_MINT_UNDERPAID: i32 = 408;

/// Every ticket has been sold. The deployed contracts have not been seen
/// returning a sold-out code; the sandbox uses this value, and rejection
/// classification deliberately leaves it unrecognized.
pub const EXIT_MINT_SOLD_OUT: i32 = 405;

// ---------------------------------------------------------------------------
// Get-Method Names
// ---------------------------------------------------------------------------

/// Collection: `(next_item_index, content, owner)`.
pub const METHOD_COLLECTION_DATA: &str = "get_collection_data";

/// Collection: item account address for an index.
pub const METHOD_NFT_ADDRESS_BY_INDEX: &str = "get_nft_address_by_index";

/// Collection: `(factor, base, beneficiary)`.
pub const METHOD_ROYALTY_PARAMS: &str = "royalty_params";

/// Collection: `(mint_price, max_supply, end_time, refund_percent)`.
pub const METHOD_COLLECTION_LIMITS: &str = "get_collection_limits";

/// Collection: combined collection + individual content for an item.
pub const METHOD_NFT_CONTENT: &str = "get_nft_content";

/// Collection: tickets sold so far.
pub const METHOD_TICKETS_SOLD: &str = "get_tickets_sold";

/// Item: `(initialized, index, collection, owner?, content?)`.
pub const METHOD_NFT_DATA: &str = "get_nft_data";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns `true` if an exit code means the operation was accepted.
pub fn is_success(exit_code: i32) -> bool {
    exit_code == EXIT_SUCCESS
}

/// Returns a human-readable name for an operation tag, mainly for logging.
/// Unknown tags get a hex dump because we're helpful like that.
pub fn opcode_name(op: u32) -> String {
    match op {
        OP_MINT => "mint".to_string(),
        OP_BATCH_MINT => "batch_mint".to_string(),
        OP_CHANGE_OWNER => "change_owner".to_string(),
        OP_CHANGE_CONTENT => "change_content".to_string(),
        OP_TRANSFER => "transfer".to_string(),
        OP_BURN => "burn".to_string(),
        OP_OWNERSHIP_ASSIGNED => "ownership_assigned".to_string(),
        OP_EXCESSES => "excesses".to_string(),
        other => format!("unknown(0x{:08x})", other),
    }
}
