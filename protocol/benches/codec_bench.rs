//! Criterion benchmarks for the hot codec paths: state packing, state
//! parsing, and deploy-list trie construction. These run on every cell the
//! client ever sends, so regressions here show up directly in submission
//! latency.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use porta_protocol::address::TonAddress;
use porta_protocol::codec::{Cell, CellBuilder};
use porta_protocol::message::{CollectionMessage, DeployListEntry};
use porta_protocol::state::{CollectionConfig, RoyaltyParams};

fn item_code() -> Cell {
    let mut b = CellBuilder::new();
    b.store_uint(0x17EA, 32).unwrap();
    b.build()
}

fn sample_config() -> CollectionConfig {
    let owner = TonAddress::base([0x01; 32]);
    CollectionConfig {
        owner,
        next_item_index: 0,
        collection_content: "https://porta.example/collection.json".into(),
        common_content: "https://porta.example".into(),
        item_code: item_code(),
        royalty: RoyaltyParams {
            factor: 100,
            base: 1000,
            beneficiary: owner,
        },
        mint_price: 100_000_000,
        max_supply: 1000,
        end_time: 1_760_000_000,
        refund_percent: 5000,
        tickets_sold: 0,
    }
}

fn bench_state_encode(c: &mut Criterion) {
    let config = sample_config();
    c.bench_function("collection_state_encode", |b| {
        b.iter(|| black_box(&config).to_cell().unwrap())
    });
}

fn bench_state_decode(c: &mut Criterion) {
    let cell = sample_config().to_cell().unwrap();
    c.bench_function("collection_state_decode", |b| {
        b.iter(|| CollectionConfig::from_cell(black_box(&cell)).unwrap())
    });
}

fn bench_batch_mint_encode(c: &mut Criterion) {
    let beneficiary = TonAddress::base([0x0A; 32]);
    let deploy_list: Vec<(u64, DeployListEntry)> = (0..100)
        .map(|i| {
            (
                i,
                DeployListEntry::attributed(100_000_000, &beneficiary, &format!("/batch/{i}"))
                    .unwrap(),
            )
        })
        .collect();
    let message = CollectionMessage::BatchMint { deploy_list };
    c.bench_function("batch_mint_encode_100", |b| {
        b.iter(|| black_box(&message).to_cell(0).unwrap())
    });
}

fn bench_batch_mint_roundtrip(c: &mut Criterion) {
    let beneficiary = TonAddress::base([0x0A; 32]);
    let deploy_list: Vec<(u64, DeployListEntry)> = (0..100)
        .map(|i| {
            (
                i,
                DeployListEntry::attributed(100_000_000, &beneficiary, &format!("/batch/{i}"))
                    .unwrap(),
            )
        })
        .collect();
    let cell = CollectionMessage::BatchMint { deploy_list }
        .to_cell(0)
        .unwrap();
    c.bench_function("batch_mint_parse_100", |b| {
        b.iter(|| CollectionMessage::parse(black_box(&cell)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_state_encode,
    bench_state_decode,
    bench_batch_mint_encode,
    bench_batch_mint_roundtrip
);
criterion_main!(benches);
