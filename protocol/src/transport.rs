//! # Transport Boundary
//!
//! Everything network-shaped lives behind the [`Transport`] trait: submit
//! a message body to an account, run a read-only get method, wait for a
//! deployment to land. This crate only defines the values crossing the
//! boundary — real implementations (a liteserver client, an RPC bridge)
//! live elsewhere, and the in-process [`crate::sandbox`] implements the
//! same trait for tests and examples.
//!
//! No retries, no timeouts, no ordering guarantees are provided here. The
//! ledger serializes messages per account; two concurrent submissions may
//! land in either order, and the only safe assumption about interleaved
//! mints is that each accepted one advances `tickets_sold` by exactly one.

use std::sync::Arc;

use async_trait::async_trait;

use crate::address::TonAddress;
use crate::codec::Cell;
use crate::config;
use crate::error::{ProtocolError, RejectReason};
use crate::query::StackValue;
use crate::state::StateInit;

// ---------------------------------------------------------------------------
// SubmitReceipt
// ---------------------------------------------------------------------------

/// Outcome of a delivered submission.
///
/// Delivery and acceptance are different things: a message can reach the
/// contract and still be refused by its acceptance rules. The raw exit
/// code is always surfaced; classification is advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitReceipt {
    /// Exit code reported by the ledger. Zero means accepted.
    pub exit_code: i32,
}

impl SubmitReceipt {
    /// A receipt for an accepted operation.
    pub fn accepted() -> Self {
        Self {
            exit_code: config::EXIT_SUCCESS,
        }
    }

    /// A receipt for a refused operation.
    pub fn rejected(exit_code: i32) -> Self {
        Self { exit_code }
    }

    /// `true` when the operation was accepted and state advanced.
    pub fn is_accepted(&self) -> bool {
        config::is_success(self.exit_code)
    }

    /// Advisory classification of the exit code, `None` when accepted.
    pub fn reject_reason(&self) -> Option<RejectReason> {
        if self.is_accepted() {
            None
        } else {
            Some(RejectReason::from_exit_code(self.exit_code))
        }
    }

    /// Converts a rejection into [`ProtocolError::Rejected`], for callers
    /// who treat refusal as a hard error.
    pub fn into_result(self) -> Result<(), ProtocolError> {
        match self.reject_reason() {
            None => Ok(()),
            Some(advisory) => Err(ProtocolError::Rejected {
                exit_code: self.exit_code,
                advisory,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// The asynchronous boundary to the ledger.
#[async_trait]
pub trait Transport: Send + Sync {
    /// The account this transport signs and sends from. Contracts see it
    /// as the message sender, which is what ownership gates check.
    fn sender(&self) -> TonAddress;

    /// Delivers `body` to `account` with `attached` value. `init` carries
    /// the state-init pair on deployment messages.
    async fn submit(
        &self,
        account: &TonAddress,
        body: Cell,
        attached: u128,
        init: Option<&StateInit>,
    ) -> Result<SubmitReceipt, ProtocolError>;

    /// Runs a read-only get method against the account's current state.
    async fn run_get_method(
        &self,
        account: &TonAddress,
        method: &str,
        args: &[StackValue],
    ) -> Result<Vec<StackValue>, ProtocolError>;

    /// Resolves once `account` exists on the ledger.
    async fn wait_for_deploy(&self, account: &TonAddress) -> Result<(), ProtocolError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn sender(&self) -> TonAddress {
        (**self).sender()
    }

    async fn submit(
        &self,
        account: &TonAddress,
        body: Cell,
        attached: u128,
        init: Option<&StateInit>,
    ) -> Result<SubmitReceipt, ProtocolError> {
        (**self).submit(account, body, attached, init).await
    }

    async fn run_get_method(
        &self,
        account: &TonAddress,
        method: &str,
        args: &[StackValue],
    ) -> Result<Vec<StackValue>, ProtocolError> {
        (**self).run_get_method(account, method, args).await
    }

    async fn wait_for_deploy(&self, account: &TonAddress) -> Result<(), ProtocolError> {
        (**self).wait_for_deploy(account).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_receipt() {
        let receipt = SubmitReceipt::accepted();
        assert!(receipt.is_accepted());
        assert_eq!(receipt.reject_reason(), None);
        assert!(receipt.into_result().is_ok());
    }

    #[test]
    fn rejected_receipt_classifies_and_errors() {
        let receipt = SubmitReceipt::rejected(config::EXIT_MINT_UNDERPAID);
        assert!(!receipt.is_accepted());
        assert_eq!(
            receipt.reject_reason(),
            Some(RejectReason::PriceShortfall)
        );
        match receipt.into_result().unwrap_err() {
            ProtocolError::Rejected {
                exit_code,
                advisory,
            } => {
                assert_eq!(exit_code, config::EXIT_MINT_UNDERPAID);
                assert_eq!(advisory, RejectReason::PriceShortfall);
            }
            other => panic!("expected Rejected, got {other}"),
        }
    }

    #[test]
    fn unknown_exit_code_survives_the_receipt() {
        let receipt = SubmitReceipt::rejected(9999);
        assert_eq!(
            receipt.reject_reason(),
            Some(RejectReason::Unrecognized(9999))
        );
    }
}
