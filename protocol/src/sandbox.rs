//! # In-Memory Ledger Sandbox
//!
//! A [`Transport`] implementation that emulates the two contract types in
//! process, for tests and examples. It executes no contract bytecode:
//! incoming bodies go through the same message parsers callers use
//! ([`crate::message`]), the acceptance rules come from
//! [`crate::eligibility`], and rejections surface the deployment's exit
//! codes — so a round trip through the sandbox exercises both directions
//! of the codec plus the state machine a real ledger would apply.
//!
//! Handles sharing one chain are cheap: [`InMemoryLedger::as_sender`]
//! clones the handle under a different sender identity, the way tests
//! need a deployer and a stranger side by side. The clock is explicit
//! ([`InMemoryLedger::set_now`]) because deadline tests must not depend
//! on wall time.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::address::TonAddress;
use crate::codec::{Cell, CellBuilder};
use crate::config;
use crate::eligibility::{check_owner_gate, MintSnapshot};
use crate::error::{ProtocolError, RejectReason};
use crate::message::{CollectionMessage, ItemMessage};
use crate::query::{StackReader, StackValue};
use crate::state::{CollectionConfig, ItemConfig, StateInit};
use crate::transport::{SubmitReceipt, Transport};

// ---------------------------------------------------------------------------
// Chain state
// ---------------------------------------------------------------------------

/// A deployed collection: the typed state plus the current content cell
/// (kept separately because change-content replaces it wholesale with an
/// arbitrary tree).
#[derive(Debug, Clone)]
struct CollectionAccount {
    state: CollectionConfig,
    content: Cell,
}

#[derive(Debug, Default)]
struct Chain {
    collections: HashMap<TonAddress, CollectionAccount>,
    items: HashMap<TonAddress, ItemConfig>,
}

// ---------------------------------------------------------------------------
// InMemoryLedger
// ---------------------------------------------------------------------------

/// An in-process ledger emulation. See the module docs for scope.
#[derive(Clone)]
pub struct InMemoryLedger {
    sender: TonAddress,
    now: Arc<AtomicU64>,
    chain: Arc<Mutex<Chain>>,
}

impl InMemoryLedger {
    /// Opens a fresh chain with `sender` as the acting identity and the
    /// clock at `now` (unix seconds).
    pub fn new(sender: TonAddress, now: u64) -> Self {
        Self {
            sender,
            now: Arc::new(AtomicU64::new(now)),
            chain: Arc::new(Mutex::new(Chain::default())),
        }
    }

    /// A handle onto the same chain acting as a different sender.
    pub fn as_sender(&self, sender: TonAddress) -> Self {
        Self {
            sender,
            now: Arc::clone(&self.now),
            chain: Arc::clone(&self.chain),
        }
    }

    /// Moves the chain clock.
    pub fn set_now(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// Current chain time, unix seconds.
    pub fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Chain> {
        // Lock poisoning only happens if a test already panicked; don't
        // compound it.
        self.chain.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Registers the account described by `init`, if it is new.
    fn register(&self, account: &TonAddress, init: &StateInit) -> Result<(), ProtocolError> {
        let derived = init.derive_address(account.workchain)?;
        if derived != *account {
            return Err(ProtocolError::Transport(format!(
                "state init hashes to {derived}, not to the target {account}"
            )));
        }

        let mut chain = self.lock();
        if chain.collections.contains_key(account) || chain.items.contains_key(account) {
            return Ok(()); // redeploys are no-ops
        }

        if let Ok(state) = CollectionConfig::from_cell(&init.data) {
            let content = state.content_cell()?;
            info!(account = %account, kind = "collection", "sandbox deploy");
            chain
                .collections
                .insert(*account, CollectionAccount { state, content });
            return Ok(());
        }
        if let Ok(item) = ItemConfig::from_cell(&init.data) {
            info!(account = %account, kind = "item", "sandbox deploy");
            chain.items.insert(*account, item);
            return Ok(());
        }
        Err(ProtocolError::Transport(
            "state init data matches neither contract layout".into(),
        ))
    }

    /// The deterministic item account for `index`: the item code plus the
    /// index/collection pair, owner and content blank. Mint and the
    /// address query must agree on this basis or addresses drift.
    fn item_address(
        item_code: &Cell,
        collection: &TonAddress,
        index: u64,
    ) -> Result<TonAddress, ProtocolError> {
        let basis = ItemConfig {
            index,
            collection: *collection,
            owner: None,
            content: String::new(),
        };
        let init = StateInit::new(item_code.clone(), basis.to_cell()?);
        Ok(init.derive_address(collection.workchain)?)
    }

    fn apply_collection_message(
        &self,
        account: &TonAddress,
        body: &Cell,
        attached: u128,
    ) -> Result<SubmitReceipt, ProtocolError> {
        let (message, query_id) = CollectionMessage::parse(body)?;
        let now = self.now();
        let mut guard = self.lock();
        let chain = &mut *guard;
        let coll = chain
            .collections
            .get_mut(account)
            .ok_or_else(|| ProtocolError::Transport(format!("no account at {account}")))?;

        let receipt = match message {
            CollectionMessage::Deploy => SubmitReceipt::accepted(),
            CollectionMessage::Mint {
                item_index,
                beneficiary,
                content,
                ..
            } => {
                let snapshot =
                    MintSnapshot::from_limits(&collection_limits(&coll.state), coll.state.tickets_sold);
                match snapshot.check_single_mint(attached, now) {
                    Err(reason) => SubmitReceipt::rejected(exit_code_for(reason)),
                    Ok(()) => {
                        coll.state.tickets_sold += 1;
                        coll.state.next_item_index += 1;
                        let addr =
                            Self::item_address(&coll.state.item_code, account, item_index)?;
                        chain.items.entry(addr).or_insert(ItemConfig {
                            index: item_index,
                            collection: *account,
                            owner: Some(beneficiary),
                            content,
                        });
                        SubmitReceipt::accepted()
                    }
                }
            }
            CollectionMessage::BatchMint { deploy_list } => {
                let count = deploy_list.len() as u64;
                let snapshot =
                    MintSnapshot::from_limits(&collection_limits(&coll.state), coll.state.tickets_sold);
                match snapshot.check_batch_mint(count, now) {
                    Err(reason) => SubmitReceipt::rejected(exit_code_for(reason)),
                    Ok(()) => {
                        // tickets_sold advances by the batch size;
                        // next_item_index stays put by definition of the
                        // batch path.
                        coll.state.tickets_sold += count;
                        let item_code = coll.state.item_code.clone();
                        for (index, entry) in deploy_list {
                            let addr = Self::item_address(&item_code, account, index)?;
                            // Attribution convention: beneficiary packed
                            // inside the content cell; fall back to the
                            // sender for opaque content.
                            let (owner, content) = entry
                                .attribution()
                                .unwrap_or_else(|| (self.sender, String::new()));
                            chain.items.entry(addr).or_insert(ItemConfig {
                                index,
                                collection: *account,
                                owner: Some(owner),
                                content,
                            });
                        }
                        SubmitReceipt::accepted()
                    }
                }
            }
            CollectionMessage::ChangeOwner { new_owner } => {
                match check_owner_gate(&self.sender, Some(&coll.state.owner)) {
                    Err(reason) => SubmitReceipt::rejected(exit_code_for(reason)),
                    Ok(()) => {
                        coll.state.owner = new_owner;
                        SubmitReceipt::accepted()
                    }
                }
            }
            CollectionMessage::ChangeContent { new_content } => {
                match check_owner_gate(&self.sender, Some(&coll.state.owner)) {
                    Err(reason) => SubmitReceipt::rejected(exit_code_for(reason)),
                    Ok(()) => {
                        coll.content = new_content;
                        SubmitReceipt::accepted()
                    }
                }
            }
        };

        debug!(
            account = %account,
            query_id,
            exit_code = receipt.exit_code,
            "sandbox collection message"
        );
        Ok(receipt)
    }

    fn apply_item_message(
        &self,
        account: &TonAddress,
        body: &Cell,
    ) -> Result<SubmitReceipt, ProtocolError> {
        let (message, query_id) = ItemMessage::parse(body)?;
        let mut guard = self.lock();
        let item = guard
            .items
            .get_mut(account)
            .ok_or_else(|| ProtocolError::Transport(format!("no account at {account}")))?;

        let receipt = match message {
            ItemMessage::Deploy => SubmitReceipt::accepted(),
            ItemMessage::Transfer { new_owner, .. } => {
                match check_owner_gate(&self.sender, item.owner.as_ref()) {
                    Err(reason) => SubmitReceipt::rejected(exit_code_for(reason)),
                    Ok(()) => {
                        item.owner = Some(new_owner);
                        SubmitReceipt::accepted()
                    }
                }
            }
            ItemMessage::Burn => match check_owner_gate(&self.sender, item.owner.as_ref()) {
                Err(reason) => SubmitReceipt::rejected(exit_code_for(reason)),
                Ok(()) => {
                    item.owner = None;
                    item.content.clear();
                    SubmitReceipt::accepted()
                }
            },
        };

        debug!(
            account = %account,
            query_id,
            exit_code = receipt.exit_code,
            "sandbox item message"
        );
        Ok(receipt)
    }

    fn collection_get(
        &self,
        account: &TonAddress,
        method: &str,
        args: &[StackValue],
    ) -> Result<Vec<StackValue>, ProtocolError> {
        let chain = self.lock();
        let coll = chain
            .collections
            .get(account)
            .ok_or_else(|| ProtocolError::Transport(format!("no account at {account}")))?;
        let state = &coll.state;
        match method {
            config::METHOD_COLLECTION_DATA => Ok(vec![
                StackValue::Int(state.next_item_index as i128),
                StackValue::Cell(coll.content.clone()),
                StackValue::address(&state.owner)?,
            ]),
            config::METHOD_NFT_ADDRESS_BY_INDEX => {
                let mut r = StackReader::new(config::METHOD_NFT_ADDRESS_BY_INDEX, args);
                let index = r.pop_u64()?;
                let addr = Self::item_address(&state.item_code, account, index)?;
                Ok(vec![StackValue::address(&addr)?])
            }
            config::METHOD_ROYALTY_PARAMS => Ok(vec![
                StackValue::Int(state.royalty.factor as i128),
                StackValue::Int(state.royalty.base as i128),
                StackValue::address(&state.royalty.beneficiary)?,
            ]),
            config::METHOD_COLLECTION_LIMITS => Ok(vec![
                StackValue::Int(state.mint_price as i128),
                StackValue::Int(state.max_supply as i128),
                StackValue::Int(state.end_time as i128),
                StackValue::Int(state.refund_percent as i128),
            ]),
            config::METHOD_NFT_CONTENT => {
                let mut r = StackReader::new(config::METHOD_NFT_CONTENT, args);
                let _index = r.pop_u64()?;
                let individual = r.pop_cell()?;
                let tail = individual.parse().load_string_ref_tail()?;
                let mut combined = CellBuilder::new();
                combined.store_string_tail(&format!("{}{}", state.common_content, tail))?;
                Ok(vec![StackValue::Cell(combined.build())])
            }
            config::METHOD_TICKETS_SOLD => {
                Ok(vec![StackValue::Int(state.tickets_sold as i128)])
            }
            other => Err(ProtocolError::Transport(format!(
                "collection has no get method `{other}`"
            ))),
        }
    }

    fn item_get(
        &self,
        account: &TonAddress,
        method: &str,
    ) -> Result<Vec<StackValue>, ProtocolError> {
        let chain = self.lock();
        let item = chain
            .items
            .get(account)
            .ok_or_else(|| ProtocolError::Transport(format!("no account at {account}")))?;
        match method {
            config::METHOD_NFT_DATA => {
                let content = match item.owner {
                    Some(_) => {
                        let mut b = CellBuilder::new();
                        b.store_string_ref_tail(&item.content)?;
                        StackValue::Cell(b.build())
                    }
                    None => StackValue::Null,
                };
                Ok(vec![
                    StackValue::bool(true),
                    StackValue::Int(item.index as i128),
                    StackValue::address(&item.collection)?,
                    StackValue::maybe_address(item.owner.as_ref())?,
                    content,
                ])
            }
            other => Err(ProtocolError::Transport(format!(
                "item has no get method `{other}`"
            ))),
        }
    }
}

#[async_trait]
impl Transport for InMemoryLedger {
    fn sender(&self) -> TonAddress {
        self.sender
    }

    async fn submit(
        &self,
        account: &TonAddress,
        body: Cell,
        attached: u128,
        init: Option<&StateInit>,
    ) -> Result<SubmitReceipt, ProtocolError> {
        if let Some(init) = init {
            self.register(account, init)?;
        }

        let kind = {
            let chain = self.lock();
            if chain.collections.contains_key(account) {
                Some(true)
            } else if chain.items.contains_key(account) {
                Some(false)
            } else {
                None
            }
        };
        match kind {
            Some(true) => self.apply_collection_message(account, &body, attached),
            Some(false) => self.apply_item_message(account, &body),
            None => Err(ProtocolError::Transport(format!(
                "no account at {account}"
            ))),
        }
    }

    async fn run_get_method(
        &self,
        account: &TonAddress,
        method: &str,
        args: &[StackValue],
    ) -> Result<Vec<StackValue>, ProtocolError> {
        let is_collection = self.lock().collections.contains_key(account);
        if is_collection {
            self.collection_get(account, method, args)
        } else if self.lock().items.contains_key(account) {
            self.item_get(account, method)
        } else {
            Err(ProtocolError::Transport(format!(
                "no account at {account}"
            )))
        }
    }

    async fn wait_for_deploy(&self, account: &TonAddress) -> Result<(), ProtocolError> {
        let chain = self.lock();
        if chain.collections.contains_key(account) || chain.items.contains_key(account) {
            Ok(())
        } else {
            Err(ProtocolError::Transport(format!(
                "account {account} never deployed"
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The limits view of a collection state, shaped like the query result.
fn collection_limits(state: &CollectionConfig) -> crate::query::CollectionLimits {
    crate::query::CollectionLimits {
        mint_price: state.mint_price,
        max_supply: state.max_supply,
        end_time: state.end_time,
        refund_percent: state.refund_percent,
    }
}

/// Maps an advisory reason onto this deployment's exit codes; unrecognized
/// reasons carry their code through unchanged.
fn exit_code_for(reason: RejectReason) -> i32 {
    match reason {
        RejectReason::PriceShortfall => config::EXIT_MINT_UNDERPAID,
        RejectReason::DeadlineExpired => config::EXIT_MINT_CLOSED,
        RejectReason::OwnershipViolation => config::EXIT_NOT_OWNER,
        RejectReason::CapacityExhausted => config::EXIT_MINT_SOLD_OUT,
        RejectReason::Unrecognized(code) => code,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
