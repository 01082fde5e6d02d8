//! # Mint Eligibility
//!
//! The contract decides; this module predicts. The acceptance rules the
//! deployed collection applies to mints are simple and fully observable
//! through two queries (`get_collection_limits` and `get_tickets_sold`),
//! so a caller can evaluate them locally before paying for a doomed
//! submission. Nothing here talks to the network, and nothing here is
//! authoritative — between a query and a submission another mint may land,
//! which is exactly why [`RejectReason`] also exists for the post-hoc path.
//!
//! Check order matters and mirrors the contract: price first, deadline
//! second, capacity last. A mint that is both underpaid and late reports
//! the price shortfall.

use serde::{Deserialize, Serialize};

use crate::address::TonAddress;
use crate::error::RejectReason;
use crate::query::CollectionLimits;

// ---------------------------------------------------------------------------
// MintSnapshot
// ---------------------------------------------------------------------------

/// A point-in-time view of everything the mint rules depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintSnapshot {
    /// Minimum attached value for a single mint.
    pub mint_price: u128,
    /// Hard ticket cap.
    pub max_supply: u64,
    /// Mint window close, unix seconds (inclusive).
    pub end_time: u64,
    /// Tickets sold at snapshot time.
    pub tickets_sold: u64,
}

impl MintSnapshot {
    /// Combines the two query results that feed the mint rules.
    pub fn from_limits(limits: &CollectionLimits, tickets_sold: u64) -> Self {
        Self {
            mint_price: limits.mint_price,
            max_supply: limits.max_supply,
            end_time: limits.end_time,
            tickets_sold,
        }
    }

    /// `true` once every ticket is sold.
    pub fn is_sold_out(&self) -> bool {
        self.tickets_sold >= self.max_supply
    }

    /// `true` once the mint window has closed.
    pub fn is_closed(&self, now: u64) -> bool {
        now > self.end_time
    }

    /// Tickets still available.
    pub fn remaining_supply(&self) -> u64 {
        self.max_supply.saturating_sub(self.tickets_sold)
    }

    /// Predicts whether a single mint would be accepted.
    ///
    /// Checks run in the contract's order — price, deadline, capacity —
    /// so the predicted reason matches the exit code the contract would
    /// pick when several rules fail at once.
    pub fn check_single_mint(&self, attached: u128, now: u64) -> Result<(), RejectReason> {
        if attached < self.mint_price {
            return Err(RejectReason::PriceShortfall);
        }
        if self.is_closed(now) {
            return Err(RejectReason::DeadlineExpired);
        }
        if self.is_sold_out() {
            return Err(RejectReason::CapacityExhausted);
        }
        Ok(())
    }

    /// Predicts whether a batch mint of `count` entries would be accepted.
    ///
    /// Batch deployments carry their value per entry, so there is no
    /// aggregate price floor to check — only the window and the cap.
    pub fn check_batch_mint(&self, count: u64, now: u64) -> Result<(), RejectReason> {
        if self.is_closed(now) {
            return Err(RejectReason::DeadlineExpired);
        }
        if self.tickets_sold.saturating_add(count) > self.max_supply {
            return Err(RejectReason::CapacityExhausted);
        }
        Ok(())
    }

    /// Applies an accepted single mint to the snapshot: one more ticket
    /// sold. The caller tracking `next_item_index` advances it alongside.
    pub fn record_single_mint(&mut self) {
        self.tickets_sold += 1;
    }

    /// Applies an accepted batch mint: `count` more tickets sold,
    /// `next_item_index` untouched by definition of the batch path.
    pub fn record_batch_mint(&mut self, count: u64) {
        self.tickets_sold += count;
    }
}

// ---------------------------------------------------------------------------
// Ownership gate
// ---------------------------------------------------------------------------

/// Predicts the owner gate for transfer and burn: the sender must be the
/// current owner, and a burned item (no owner) accepts nothing.
pub fn check_owner_gate(
    sender: &TonAddress,
    owner: Option<&TonAddress>,
) -> Result<(), RejectReason> {
    match owner {
        Some(current) if current == sender => Ok(()),
        _ => Err(RejectReason::OwnershipViolation),
    }
}

/// Current unix time in seconds, for callers that do not bring their own
/// clock.
pub fn now_unix() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const T: u64 = 1_760_000_000;

    fn snapshot() -> MintSnapshot {
        MintSnapshot {
            mint_price: 100_000_000,
            max_supply: 1000,
            end_time: T,
            tickets_sold: 0,
        }
    }

    #[test]
    fn well_funded_mint_inside_window_is_accepted() {
        let mut s = snapshot();
        assert_eq!(s.check_single_mint(200_000_000, T - 10), Ok(()));
        s.record_single_mint();
        assert_eq!(s.tickets_sold, 1);
    }

    #[test]
    fn underpaid_mint_is_a_price_shortfall() {
        let s = snapshot();
        assert_eq!(
            s.check_single_mint(50_000_000, T - 10),
            Err(RejectReason::PriceShortfall)
        );
        assert_eq!(s.tickets_sold, 0);
    }

    #[test]
    fn late_mint_is_deadline_expired() {
        let s = snapshot();
        assert_eq!(
            s.check_single_mint(200_000_000, T + 1),
            Err(RejectReason::DeadlineExpired)
        );
    }

    #[test]
    fn end_time_itself_is_still_open() {
        let s = snapshot();
        assert_eq!(s.check_single_mint(100_000_000, T), Ok(()));
    }

    #[test]
    fn price_outranks_deadline() {
        // Underpaid *and* late: the contract checks price first, so the
        // prediction must too.
        let s = snapshot();
        assert_eq!(
            s.check_single_mint(1, T + 100),
            Err(RejectReason::PriceShortfall)
        );
    }

    #[test]
    fn sold_out_is_capacity_exhausted() {
        let mut s = snapshot();
        s.tickets_sold = s.max_supply;
        assert!(s.is_sold_out());
        assert_eq!(
            s.check_single_mint(200_000_000, T - 10),
            Err(RejectReason::CapacityExhausted)
        );
    }

    #[test]
    fn exact_price_is_sufficient() {
        let s = snapshot();
        assert_eq!(s.check_single_mint(100_000_000, T - 10), Ok(()));
    }

    #[test]
    fn batch_checks_window_and_cap_only() {
        let mut s = snapshot();
        s.tickets_sold = 999;
        assert_eq!(s.check_batch_mint(1, T - 10), Ok(()));
        assert_eq!(
            s.check_batch_mint(2, T - 10),
            Err(RejectReason::CapacityExhausted)
        );
        assert_eq!(
            s.check_batch_mint(1, T + 1),
            Err(RejectReason::DeadlineExpired)
        );
    }

    #[test]
    fn batch_record_advances_tickets_only() {
        let mut s = snapshot();
        s.record_batch_mint(5);
        assert_eq!(s.tickets_sold, 5);
        assert_eq!(s.remaining_supply(), 995);
    }

    #[test]
    fn owner_gate_accepts_owner_only() {
        let owner = TonAddress::base([0x01; 32]);
        let stranger = TonAddress::base([0x02; 32]);
        assert_eq!(check_owner_gate(&owner, Some(&owner)), Ok(()));
        assert_eq!(
            check_owner_gate(&stranger, Some(&owner)),
            Err(RejectReason::OwnershipViolation)
        );
    }

    #[test]
    fn owner_gate_rejects_everything_on_burned_items() {
        let sender = TonAddress::base([0x01; 32]);
        assert_eq!(
            check_owner_gate(&sender, None),
            Err(RejectReason::OwnershipViolation)
        );
    }

    #[test]
    fn snapshot_builds_from_query_results() {
        let limits = CollectionLimits {
            mint_price: 7,
            max_supply: 10,
            end_time: T,
            refund_percent: 5000,
        };
        let s = MintSnapshot::from_limits(&limits, 3);
        assert_eq!(s.mint_price, 7);
        assert_eq!(s.tickets_sold, 3);
        assert_eq!(s.remaining_supply(), 7);
    }
}
