//! Terminal walkthrough of the full ticket lifecycle against the
//! in-memory sandbox: deploy a collection, preflight and mint a ticket,
//! batch-deploy two more, transfer, burn, and read everything back.
//!
//! Run with:
//!   cargo run --example demo

use porta_protocol::address::TonAddress;
use porta_protocol::client::{CollectionClient, ItemClient};
use porta_protocol::codec::{Cell, CellBuilder};
use porta_protocol::error::RejectReason;
use porta_protocol::message::DeployListEntry;
use porta_protocol::sandbox::InMemoryLedger;
use porta_protocol::state::{CollectionConfig, RoyaltyParams};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";

fn section(title: &str) {
    println!("\n{BOLD}{BLUE}── {title} ──{RESET}");
}

fn ok(line: &str) {
    println!("  {GREEN}✓{RESET} {line}");
}

fn warn(line: &str) {
    println!("  {YELLOW}✗{RESET} {line}");
}

fn opaque_code(marker: u64) -> Cell {
    // Stands in for the compiled contract code an external build supplies.
    let mut b = CellBuilder::new();
    b.store_uint(marker, 32).unwrap();
    b.build()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let organizer = TonAddress::base([0x01; 32]);
    let fan = TonAddress::base([0x02; 32]);
    let end_time = 1_760_000_000u64;
    let ledger = InMemoryLedger::new(organizer, end_time - 3600);

    section("Deploy the collection");
    let config = CollectionConfig {
        owner: organizer,
        next_item_index: 0,
        collection_content: "https://porta.example/show.json".into(),
        common_content: "https://porta.example".into(),
        item_code: opaque_code(0x17EA),
        royalty: RoyaltyParams {
            factor: 100,
            base: 1000,
            beneficiary: organizer,
        },
        mint_price: 100_000_000,
        max_supply: 1000,
        end_time,
        refund_percent: 5000,
        tickets_sold: 0,
    };
    let (collection, init) =
        CollectionClient::from_config(&config, opaque_code(0xC011), ledger.clone())?;
    collection.send_deploy(&init, 50_000_000).await?.into_result()?;
    collection.wait_for_deploy().await?;
    ok(&format!("collection at {}", collection.address));

    section("Preflight, then mint ticket #0");
    let snapshot = collection.mint_snapshot().await?;
    match snapshot.check_single_mint(50_000_000, ledger.now()) {
        Err(RejectReason::PriceShortfall) => {
            warn("50_000_000 attached would be refused: price shortfall (predicted, not sent)")
        }
        other => println!("  unexpected prediction: {other:?}"),
    }
    let receipt = collection
        .send_mint(1, 0, 100_000_000, "/ticket/0.json", 200_000_000)
        .await?;
    ok(&format!(
        "mint accepted (exit code {}), tickets sold: {}",
        receipt.exit_code,
        collection.get_tickets_sold().await?
    ));

    section("Batch-deploy tickets #100 and #101");
    let deploy_list = vec![
        (
            100u64,
            DeployListEntry::attributed(100_000_000, &fan, "/ticket/100.json")?,
        ),
        (
            101u64,
            DeployListEntry::attributed(100_000_000, &fan, "/ticket/101.json")?,
        ),
    ];
    collection
        .send_batch_mint(2, deploy_list, 500_000_000)
        .await?
        .into_result()?;
    let data = collection.get_collection_data().await?;
    ok(&format!(
        "tickets sold: {}, next index still {} (batch allocates nothing)",
        collection.get_tickets_sold().await?,
        data.next_item_index
    ));

    section("Transfer ticket #0 to the fan");
    let ticket = ItemClient::new(
        collection.get_nft_address_by_index(0).await?,
        ledger.clone(),
    );
    ticket
        .send_transfer(3, fan, organizer, None, 10_000_000, None, 50_000_000)
        .await?
        .into_result()?;
    ok(&format!(
        "ticket #0 owner is now {}",
        ticket.get_nft_data().await?.owner.expect("live ticket")
    ));

    section("The fan burns the ticket at the venue gate");
    let ticket_as_fan = ItemClient::new(ticket.address, ledger.as_sender(fan));
    ticket_as_fan.send_burn(4, 50_000_000).await?.into_result()?;
    let nft = ticket_as_fan.get_nft_data().await?;
    ok(&format!(
        "burned: initialized={}, owner={:?}, content={:?}",
        nft.initialized, nft.owner, nft.content
    ));

    section("Ownership gates hold");
    let receipt = ticket.send_burn(5, 50_000_000).await?;
    warn(&format!(
        "organizer burning the dead ticket: exit code {} ({})",
        receipt.exit_code,
        receipt.reject_reason().expect("rejected")
    ));

    println!("\n{BOLD}Lifecycle complete.{RESET}");
    Ok(())
}
