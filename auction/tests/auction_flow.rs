use std::sync::Arc;

use farm_auction::*;
use farm_core::{
    Currency, EconomyConfig, EconomyError, LotKind, LotStatus, ManualClock, SharedClock,
};
use farm_storage::{AssetStore, Ledger, Store};

const SELLER: u64 = 100;
const ALICE: u64 = 200;
const BOB: u64 = 300;

struct Fixture {
    store: Store,
    clock: Arc<ManualClock>,
    house: AuctionHouse,
    ledger: Ledger,
    assets: AssetStore,
}

fn fixture() -> Fixture {
    fixture_with(EconomyConfig::default())
}

fn fixture_with(config: EconomyConfig) -> Fixture {
    let store = Store::temporary().unwrap();
    for id in [SELLER, ALICE, BOB] {
        store
            .transact(|tx| tx.get_or_create_account(id, 1_000, 0, 0))
            .unwrap();
    }
    let clock = Arc::new(ManualClock::new(1_000_000));
    let shared: SharedClock = clock.clone();
    let house = AuctionHouse::new(store.clone(), Arc::new(config), shared);
    Fixture {
        ledger: Ledger::new(store.clone()),
        assets: AssetStore::new(store.clone()),
        store,
        clock,
        house,
    }
}

fn nft_listing(starting_price: u64) -> ListingRequest {
    ListingRequest {
        kind: LotKind::Nft,
        asset_type: "snoop_dogg".into(),
        starting_price,
        duration_hours: Some(24),
    }
}

fn primary(f: &Fixture, id: u64) -> u64 {
    f.ledger.balance(id, Currency::Primary).unwrap()
}

#[test]
fn test_settlement_pays_seller_and_refunds_outbid() {
    let f = fixture();
    let nft = f.assets.add_nft(SELLER, "snoop_dogg", 0).unwrap();
    let supply_before = f.ledger.total_supply(Currency::Primary).unwrap();

    let lot = f.house.create_lot(SELLER, &nft_listing(500)).unwrap();
    assert_eq!(lot.current_bid, 500);
    assert!(f.assets.list_by_owner(SELLER).unwrap().1.is_empty());

    f.house.place_bid(lot.id, ALICE, 600).unwrap();
    assert_eq!(primary(&f, ALICE), 400);

    f.house.place_bid(lot.id, BOB, 700).unwrap();
    assert_eq!(primary(&f, ALICE), 1_000);
    assert_eq!(primary(&f, BOB), 300);

    // bids only move currency into escrow
    let escrowed = f.house.lot(lot.id).unwrap().escrowed_currency();
    assert_eq!(
        f.ledger.total_supply(Currency::Primary).unwrap() + escrowed,
        supply_before
    );

    f.clock.advance_hours(24.0);
    let settled = f.house.settle_expired().unwrap();
    assert_eq!(settled.len(), 1);
    assert_eq!(
        settled[0].outcome,
        SettlementOutcome::Sold {
            winner: BOB,
            price: 700,
            asset_id: nft.id
        }
    );

    assert_eq!(primary(&f, SELLER), 1_700);
    assert_eq!(primary(&f, ALICE), 1_000);
    assert_eq!(primary(&f, BOB), 300);
    assert_eq!(f.assets.list_by_owner(BOB).unwrap().1[0].id, nft.id);
    assert_eq!(f.house.lot(lot.id).unwrap().status, LotStatus::Ended);
    assert_eq!(f.ledger.total_supply(Currency::Primary).unwrap(), supply_before);
}

#[test]
fn test_no_bid_lot_returns_asset() {
    let f = fixture();
    let mut farm = f.assets.add_farm(SELLER, "basic", 0).unwrap();
    farm.speed_level = 3;
    f.store.transact(|tx| tx.put_farm(&farm)).unwrap();

    let lot = f
        .house
        .create_lot(
            SELLER,
            &ListingRequest {
                kind: LotKind::Farm,
                asset_type: "basic".into(),
                starting_price: 100,
                duration_hours: None,
            },
        )
        .unwrap();
    assert!(f.assets.list_by_owner(SELLER).unwrap().0.is_empty());

    f.clock.advance_hours(24.0);
    let settlement = f.house.settle_expired().unwrap().remove(0);
    assert_eq!(
        settlement.outcome,
        SettlementOutcome::Returned { seller: SELLER }
    );

    let farms = f.assets.list_by_owner(SELLER).unwrap().0;
    assert_eq!(farms.len(), 1);
    assert_eq!(farms[0].id, farm.id);
    assert_eq!(farms[0].speed_level, 3);
    assert_eq!(primary(&f, SELLER), 1_000);
    assert_eq!(f.house.lot(lot.id).unwrap().status, LotStatus::Ended);
}

#[test]
fn test_bid_rejections() {
    let f = fixture();
    f.assets.add_nft(SELLER, "snoop_dogg", 0).unwrap();
    let lot = f.house.create_lot(SELLER, &nft_listing(500)).unwrap();

    assert_eq!(
        f.house.place_bid(lot.id, ALICE, 500).unwrap_err(),
        EconomyError::BidTooLow { current: 500 }
    );
    assert_eq!(
        f.house.place_bid(lot.id, SELLER, 600).unwrap_err(),
        EconomyError::SelfBid
    );
    assert!(matches!(
        f.house.place_bid(lot.id, ALICE, 1_001).unwrap_err(),
        EconomyError::InsufficientFunds { .. }
    ));
    assert_eq!(
        f.house.place_bid(999, ALICE, 600).unwrap_err(),
        EconomyError::AuctionNotFound(999)
    );
    assert_eq!(primary(&f, ALICE), 1_000);
}

#[test]
fn test_bid_after_expiry_settles_lot() {
    let f = fixture();
    f.assets.add_nft(SELLER, "snoop_dogg", 0).unwrap();
    let lot = f.house.create_lot(SELLER, &nft_listing(500)).unwrap();
    f.house.place_bid(lot.id, ALICE, 600).unwrap();

    f.clock.advance_hours(24.0);
    assert_eq!(
        f.house.place_bid(lot.id, BOB, 900).unwrap_err(),
        EconomyError::AuctionExpired(lot.id)
    );
    assert_eq!(f.house.lot(lot.id).unwrap().status, LotStatus::Ended);
    assert_eq!(primary(&f, SELLER), 1_600);
    assert_eq!(primary(&f, BOB), 1_000);
    assert_eq!(f.assets.list_by_owner(ALICE).unwrap().1.len(), 1);

    assert_eq!(
        f.house.place_bid(lot.id, BOB, 1_000).unwrap_err(),
        EconomyError::AuctionNotFound(lot.id)
    );
}

#[test]
fn test_settling_twice_reports_not_found() {
    let f = fixture();
    f.assets.add_nft(SELLER, "snoop_dogg", 0).unwrap();
    let lot = f.house.create_lot(SELLER, &nft_listing(500)).unwrap();
    f.house.place_bid(lot.id, ALICE, 550).unwrap();

    f.house.settle(lot.id).unwrap();
    assert_eq!(
        f.house.settle(lot.id).unwrap_err(),
        EconomyError::AuctionNotFound(lot.id)
    );
    assert_eq!(primary(&f, SELLER), 1_550);
}

#[test]
fn test_listing_validation() {
    let f = fixture();
    f.assets.add_nft(SELLER, "snoop_dogg", 0).unwrap();

    // 5000 / 1.5 caps the starting price at 3333
    assert!(matches!(
        f.house.create_lot(SELLER, &nft_listing(3_334)),
        Err(EconomyError::Validation(_))
    ));
    assert!(matches!(
        f.house.create_lot(SELLER, &nft_listing(0)),
        Err(EconomyError::Validation(_))
    ));
    assert!(matches!(
        f.house.create_lot(ALICE, &nft_listing(100)),
        Err(EconomyError::InvalidState(_))
    ));
    let mut long = nft_listing(100);
    long.duration_hours = Some(1_000);
    assert!(matches!(
        f.house.create_lot(SELLER, &long),
        Err(EconomyError::Validation(_))
    ));
    assert!(f.house.create_lot(SELLER, &nft_listing(3_333)).is_ok());
}

#[test]
fn test_house_lot_burns_bid_and_mints() {
    let f = fixture();
    let lot = f
        .house
        .create_house_lot(&ListingRequest {
            kind: LotKind::Farm,
            asset_type: "advanced".into(),
            starting_price: 50,
            duration_hours: Some(1),
        })
        .unwrap();
    assert!(lot.is_house_lot());

    f.house.place_bid(lot.id, ALICE, 80).unwrap();
    let settlement = f.house.settle(lot.id).unwrap();
    assert!(matches!(
        settlement.outcome,
        SettlementOutcome::Sold { winner: ALICE, price: 80, .. }
    ));
    assert_eq!(primary(&f, ALICE), 920);
    let farms = f.assets.list_by_owner(ALICE).unwrap().0;
    assert_eq!(farms[0].farm_type, "advanced");
    assert!(!farms[0].active);
}

fn capped_crown_fixture() -> Fixture {
    let mut config = EconomyConfig::default();
    if let Some(entry) = config.catalog.nfts.get_mut("golden_crown") {
        entry.mint_cap = Some(1);
    }
    fixture_with(config)
}

fn crown_house_listing() -> ListingRequest {
    ListingRequest {
        kind: LotKind::Nft,
        asset_type: "golden_crown".into(),
        starting_price: 10,
        duration_hours: Some(1),
    }
}

fn mint_crown(f: &Fixture, owner: u64) {
    f.store
        .transact(|tx| {
            tx.record_mint("golden_crown", Some(1))?;
            tx.add_nft(owner, "golden_crown", 0)
        })
        .unwrap();
}

#[test]
fn test_house_lot_rejected_for_sold_out_collectible() {
    let f = capped_crown_fixture();
    mint_crown(&f, BOB);

    assert!(matches!(
        f.house.create_house_lot(&crown_house_listing()).unwrap_err(),
        EconomyError::InvalidState(_)
    ));
    assert!(f.house.list_active(LotKind::Nft).unwrap().is_empty());
}

#[test]
fn test_house_lot_refunds_winner_when_cap_reached_mid_auction() {
    let f = capped_crown_fixture();
    let lot = f.house.create_house_lot(&crown_house_listing()).unwrap();
    f.house.place_bid(lot.id, ALICE, 20).unwrap();
    assert_eq!(primary(&f, ALICE), 980);

    mint_crown(&f, BOB);
    let settlement = f.house.settle(lot.id).unwrap();

    assert_eq!(settlement.outcome, SettlementOutcome::Unsold);
    assert_eq!(primary(&f, ALICE), 1_000);
    assert!(f.assets.list_by_owner(ALICE).unwrap().1.is_empty());
    let minted = f.store.transact(|tx| tx.minted("golden_crown")).unwrap();
    assert_eq!(minted, 1);
    assert_eq!(f.house.lot(lot.id).unwrap().status, LotStatus::Ended);
}

#[test]
fn test_house_lot_mint_counts_toward_cap() {
    let f = capped_crown_fixture();
    let lot = f.house.create_house_lot(&crown_house_listing()).unwrap();
    f.house.place_bid(lot.id, ALICE, 20).unwrap();
    let settlement = f.house.settle(lot.id).unwrap();
    assert!(matches!(
        settlement.outcome,
        SettlementOutcome::Sold { winner: ALICE, price: 20, .. }
    ));

    let minted = f.store.transact(|tx| tx.minted("golden_crown")).unwrap();
    assert_eq!(minted, 1);
    assert!(f.house.create_house_lot(&crown_house_listing()).is_err());
}

#[test]
fn test_top_bidder_raise_needs_only_the_increment() {
    let f = fixture();
    f.assets.add_nft(SELLER, "snoop_dogg", 0).unwrap();
    let lot = f.house.create_lot(SELLER, &nft_listing(500)).unwrap();

    f.house.place_bid(lot.id, ALICE, 700).unwrap();
    assert_eq!(primary(&f, ALICE), 300);
    // 900 exceeds the free balance but not balance plus the escrowed 700
    let lot = f.house.place_bid(lot.id, ALICE, 900).unwrap();
    assert_eq!(lot.current_bid, 900);
    assert_eq!(primary(&f, ALICE), 100);
    assert!(matches!(
        f.house.place_bid(lot.id, ALICE, 1_001).unwrap_err(),
        EconomyError::InsufficientFunds { .. }
    ));
}

#[test]
fn test_active_lots_sorted_by_expiry() {
    let f = fixture();
    for _ in 0..2 {
        f.assets.add_nft(SELLER, "snoop_dogg", 0).unwrap();
    }
    let mut late = nft_listing(100);
    late.duration_hours = Some(48);
    let late = f.house.create_lot(SELLER, &late).unwrap();
    let early = f.house.create_lot(SELLER, &nft_listing(100)).unwrap();

    let lots = f.house.list_active(LotKind::Nft).unwrap();
    assert_eq!(
        lots.iter().map(|l| l.id).collect::<Vec<_>>(),
        vec![early.id, late.id]
    );
    assert!(f.house.list_active(LotKind::Farm).unwrap().is_empty());

    f.clock.advance_hours(30.0);
    let lots = f.house.list_active(LotKind::Nft).unwrap();
    assert_eq!(lots.len(), 1);
    assert_eq!(lots[0].id, late.id);
}

#[test]
fn test_concurrent_bids_keep_escrow_consistent() {
    let f = fixture();
    f.assets.add_nft(SELLER, "snoop_dogg", 0).unwrap();
    let lot = f.house.create_lot(SELLER, &nft_listing(500)).unwrap();

    std::thread::scope(|s| {
        s.spawn(|| f.house.place_bid(lot.id, ALICE, 600));
        s.spawn(|| f.house.place_bid(lot.id, BOB, 600));
    });

    let lot = f.house.lot(lot.id).unwrap();
    assert_eq!(lot.current_bid, 600);
    let winner = lot.current_bidder.unwrap();
    let loser = if winner == ALICE { BOB } else { ALICE };
    assert_eq!(primary(&f, winner), 400);
    assert_eq!(primary(&f, loser), 1_000);
}
