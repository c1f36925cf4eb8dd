use auction_widget::bidding::{fast_bids, BidController, FastBid, FAST_BID_COUNT};
use auction_widget::domain::Auction;
mod utils;
use utils::*;

fn increments(fast_bids: &[FastBid]) -> Vec<i64> {
    fast_bids.iter().map(|fast_bid| fast_bid.increment).collect()
}

#[test]
fn test_first_bid_ladder_starts_at_starting_price() {
    let auction = Auction {
        bids: Vec::new(),
        highest_bid: None,
        ..factory_auction()
    };
    let ladder = fast_bids(&auction);

    assert_eq!(ladder.len(), FAST_BID_COUNT);
    // (k - 1) * step over the starting price
    assert_eq!(increments(&ladder), vec![0, 100, 200]);
    assert_eq!(
        ladder.iter().map(|fast_bid| fast_bid.amount).collect::<Vec<_>>(),
        vec![10_000, 10_100, 10_200]
    );
}

#[test]
fn test_ladder_over_existing_bids() {
    let highest = factory_bid();
    let auction = Auction {
        bids: vec![highest.clone()],
        highest_bid: Some(highest.clone()),
        ..factory_auction()
    };
    let ladder = fast_bids(&auction);

    // k * step over the highest bid
    assert_eq!(increments(&ladder), vec![100, 200, 300]);
    assert_eq!(
        ladder.iter().map(|fast_bid| fast_bid.amount).collect::<Vec<_>>(),
        vec![1100, 1200, 1300]
    );
}

#[test]
fn test_ladder_falls_back_to_last_bid_without_highest_bid() {
    let auction = Auction {
        bids: vec![bid_of(10_000), bid_of(12_000)],
        highest_bid: None,
        step: 500,
        ..factory_auction()
    };
    let ladder = fast_bids(&auction);
    assert_eq!(ladder[0].amount, 12_500);
    assert_eq!(ladder[2].amount, 13_500);
}

#[test]
fn test_button_labels() {
    let controller = BidController::new(factory_auction()).unwrap();
    assert_eq!(controller.fast_bid_labels(), vec!["+ 0 €", "+ 100 €", "+ 200 €"]);

    let with_bids = BidController::new(Auction {
        bids: vec![factory_bid()],
        highest_bid: Some(factory_bid()),
        ..factory_auction()
    }).unwrap();
    assert_eq!(with_bids.fast_bid_labels(), vec!["+ 100 €", "+ 200 €", "+ 300 €"]);
}
