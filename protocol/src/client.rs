//! # Typed Contract Clients
//!
//! Thin, typed handles over a [`Transport`]: one per contract type, each
//! method packing a message or decoding a query result with the codec
//! underneath. The handles hold no state beyond the target address — every
//! call reflects the chain as it is, not as it was.
//!
//! [`CollectionClient::mint_snapshot`] bridges to [`crate::eligibility`]:
//! fetch the sale terms, predict locally, then submit. Prediction is
//! advisory — another mint can land between the query and the submission —
//! so rejected receipts still surface their exit codes.

use tracing::debug;

use crate::address::TonAddress;
use crate::codec::Cell;
use crate::config;
use crate::eligibility::MintSnapshot;
use crate::error::{CodecError, ProtocolError};
use crate::message::{CollectionMessage, DeployListEntry, ItemMessage};
use crate::query::{
    decode_collection_data, decode_collection_limits, decode_nft_address, decode_nft_content,
    decode_nft_data, decode_royalty_params, decode_tickets_sold, CollectionData,
    CollectionLimits, NftItemData, StackValue,
};
use crate::state::{CollectionConfig, ItemConfig, RoyaltyParams, StateInit};
use crate::transport::{SubmitReceipt, Transport};

// ---------------------------------------------------------------------------
// CollectionClient
// ---------------------------------------------------------------------------

/// A handle on a collection contract.
pub struct CollectionClient<T: Transport> {
    /// The collection account.
    pub address: TonAddress,
    transport: T,
}

impl<T: Transport> CollectionClient<T> {
    /// Wraps an already-deployed collection.
    pub fn new(address: TonAddress, transport: T) -> Self {
        Self { address, transport }
    }

    /// Computes the deployment address for `config` under `code` and
    /// returns the handle together with the state init to deploy with.
    pub fn from_config(
        config_: &CollectionConfig,
        code: Cell,
        transport: T,
    ) -> Result<(Self, StateInit), CodecError> {
        let init = StateInit::new(code, config_.to_cell()?);
        let address = init.derive_address(config::BASE_WORKCHAIN)?;
        Ok((Self::new(address, transport), init))
    }

    /// Deploys the collection: an empty body carrying the state init.
    pub async fn send_deploy(
        &self,
        init: &StateInit,
        attached: u128,
    ) -> Result<SubmitReceipt, ProtocolError> {
        debug!(collection = %self.address, "deploy");
        let body = CollectionMessage::Deploy.to_cell(0)?;
        self.transport
            .submit(&self.address, body, attached, Some(init))
            .await
    }

    /// Mints a single item to the sender, forwarding `amount` to the item
    /// deployment. The attached value is what the price floor checks.
    pub async fn send_mint(
        &self,
        query_id: u64,
        item_index: u64,
        amount: u128,
        content: &str,
        attached: u128,
    ) -> Result<SubmitReceipt, ProtocolError> {
        debug!(collection = %self.address, item_index, attached, "mint");
        let body = CollectionMessage::Mint {
            item_index,
            amount,
            beneficiary: self.transport.sender(),
            content: content.to_string(),
        }
        .to_cell(query_id)?;
        self.transport
            .submit(&self.address, body, attached, None)
            .await
    }

    /// Deploys a batch of pre-indexed items in one message.
    pub async fn send_batch_mint(
        &self,
        query_id: u64,
        deploy_list: Vec<(u64, DeployListEntry)>,
        attached: u128,
    ) -> Result<SubmitReceipt, ProtocolError> {
        debug!(
            collection = %self.address,
            entries = deploy_list.len(),
            "batch mint"
        );
        let body = CollectionMessage::BatchMint { deploy_list }.to_cell(query_id)?;
        self.transport
            .submit(&self.address, body, attached, None)
            .await
    }

    /// Hands the collection to a new administrator.
    pub async fn send_change_owner(
        &self,
        query_id: u64,
        new_owner: TonAddress,
        attached: u128,
    ) -> Result<SubmitReceipt, ProtocolError> {
        debug!(collection = %self.address, new_owner = %new_owner, "change owner");
        let body = CollectionMessage::ChangeOwner { new_owner }.to_cell(query_id)?;
        self.transport
            .submit(&self.address, body, attached, None)
            .await
    }

    /// Replaces the collection content cell wholesale.
    pub async fn send_change_content(
        &self,
        query_id: u64,
        new_content: Cell,
        attached: u128,
    ) -> Result<SubmitReceipt, ProtocolError> {
        debug!(collection = %self.address, "change content");
        let body = CollectionMessage::ChangeContent { new_content }.to_cell(query_id)?;
        self.transport
            .submit(&self.address, body, attached, None)
            .await
    }

    /// `(next_item_index, content, owner)`.
    pub async fn get_collection_data(&self) -> Result<CollectionData, ProtocolError> {
        let stack = self
            .transport
            .run_get_method(&self.address, config::METHOD_COLLECTION_DATA, &[])
            .await?;
        Ok(decode_collection_data(&stack)?)
    }

    /// The item account address for `index`.
    pub async fn get_nft_address_by_index(
        &self,
        index: u64,
    ) -> Result<TonAddress, ProtocolError> {
        let stack = self
            .transport
            .run_get_method(
                &self.address,
                config::METHOD_NFT_ADDRESS_BY_INDEX,
                &[StackValue::Int(index as i128)],
            )
            .await?;
        Ok(decode_nft_address(&stack)?)
    }

    /// `(factor, base, beneficiary)`.
    pub async fn get_royalty_params(&self) -> Result<RoyaltyParams, ProtocolError> {
        let stack = self
            .transport
            .run_get_method(&self.address, config::METHOD_ROYALTY_PARAMS, &[])
            .await?;
        Ok(decode_royalty_params(&stack)?)
    }

    /// `(mint_price, max_supply, end_time, refund_percent)`.
    pub async fn get_collection_limits(&self) -> Result<CollectionLimits, ProtocolError> {
        let stack = self
            .transport
            .run_get_method(&self.address, config::METHOD_COLLECTION_LIMITS, &[])
            .await?;
        Ok(decode_collection_limits(&stack)?)
    }

    /// Combined collection + individual content for an item.
    pub async fn get_nft_content(
        &self,
        index: u64,
        individual_content: Cell,
    ) -> Result<Cell, ProtocolError> {
        let stack = self
            .transport
            .run_get_method(
                &self.address,
                config::METHOD_NFT_CONTENT,
                &[
                    StackValue::Int(index as i128),
                    StackValue::Cell(individual_content),
                ],
            )
            .await?;
        Ok(decode_nft_content(&stack)?)
    }

    /// Tickets sold so far.
    pub async fn get_tickets_sold(&self) -> Result<u64, ProtocolError> {
        let stack = self
            .transport
            .run_get_method(&self.address, config::METHOD_TICKETS_SOLD, &[])
            .await?;
        Ok(decode_tickets_sold(&stack)?)
    }

    /// Fetches everything the mint rules depend on, ready for
    /// [`MintSnapshot::check_single_mint`] before paying for a doomed
    /// submission.
    pub async fn mint_snapshot(&self) -> Result<MintSnapshot, ProtocolError> {
        let limits = self.get_collection_limits().await?;
        let tickets_sold = self.get_tickets_sold().await?;
        Ok(MintSnapshot::from_limits(&limits, tickets_sold))
    }

    /// Resolves once the collection exists on the ledger.
    pub async fn wait_for_deploy(&self) -> Result<(), ProtocolError> {
        self.transport.wait_for_deploy(&self.address).await
    }
}

// ---------------------------------------------------------------------------
// ItemClient
// ---------------------------------------------------------------------------

/// A handle on an item contract.
pub struct ItemClient<T: Transport> {
    /// The item account.
    pub address: TonAddress,
    transport: T,
}

impl<T: Transport> ItemClient<T> {
    /// Wraps an already-deployed item.
    pub fn new(address: TonAddress, transport: T) -> Self {
        Self { address, transport }
    }

    /// Computes the deployment address for `config` under `code` and
    /// returns the handle together with the state init to deploy with.
    pub fn from_config(
        config_: &ItemConfig,
        code: Cell,
        transport: T,
    ) -> Result<(Self, StateInit), CodecError> {
        let init = StateInit::new(code, config_.to_cell()?);
        let address = init.derive_address(config::BASE_WORKCHAIN)?;
        Ok((Self::new(address, transport), init))
    }

    /// Deploys the item: an empty body carrying the state init.
    pub async fn send_deploy(
        &self,
        init: &StateInit,
        attached: u128,
    ) -> Result<SubmitReceipt, ProtocolError> {
        debug!(item = %self.address, "deploy");
        let body = ItemMessage::Deploy.to_cell(0)?;
        self.transport
            .submit(&self.address, body, attached, Some(init))
            .await
    }

    /// Transfers ownership (TEP-62).
    #[allow(clippy::too_many_arguments)]
    pub async fn send_transfer(
        &self,
        query_id: u64,
        new_owner: TonAddress,
        response_destination: TonAddress,
        custom_payload: Option<Cell>,
        forward_amount: u128,
        forward_payload: Option<Cell>,
        attached: u128,
    ) -> Result<SubmitReceipt, ProtocolError> {
        debug!(item = %self.address, new_owner = %new_owner, "transfer");
        let body = ItemMessage::Transfer {
            new_owner,
            response_destination,
            custom_payload,
            forward_amount,
            forward_payload,
        }
        .to_cell(query_id)?;
        self.transport
            .submit(&self.address, body, attached, None)
            .await
    }

    /// Burns the item. Terminal: afterwards only queries succeed.
    pub async fn send_burn(
        &self,
        query_id: u64,
        attached: u128,
    ) -> Result<SubmitReceipt, ProtocolError> {
        debug!(item = %self.address, "burn");
        let body = ItemMessage::Burn.to_cell(query_id)?;
        self.transport
            .submit(&self.address, body, attached, None)
            .await
    }

    /// `(initialized, index, collection, owner?, content?)`.
    pub async fn get_nft_data(&self) -> Result<NftItemData, ProtocolError> {
        let stack = self
            .transport
            .run_get_method(&self.address, config::METHOD_NFT_DATA, &[])
            .await?;
        Ok(decode_nft_data(&stack)?)
    }

    /// Resolves once the item exists on the ledger.
    pub async fn wait_for_deploy(&self) -> Result<(), ProtocolError> {
        self.transport.wait_for_deploy(&self.address).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
