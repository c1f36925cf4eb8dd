// src/bidding/ladder.rs
use crate::domain::Auction;
use crate::money::{format_increment, AmountValue, Currency};

pub const FAST_BID_COUNT: usize = 3;

/// One-click suggestion: `increment` is what the button shows, `amount` is
/// what gets bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastBid {
    pub increment: AmountValue,
    pub amount: AmountValue,
}

impl FastBid {
    pub fn label(&self, currency: &Currency) -> String {
        format_increment(currency, self.increment)
    }
}

/// The first bid only has to meet the starting price, so without bids the
/// ladder starts at +0 over it. Later bids must beat the highest bid by at
/// least one step.
pub fn fast_bids(auction: &Auction) -> [FastBid; FAST_BID_COUNT] {
    let (baseline, first_multiplier) = if auction.has_bids() {
        (auction.highest_amount().unwrap_or(auction.starting_price), 1)
    } else {
        (auction.starting_price, 0)
    };

    std::array::from_fn(|k| {
        let increment = (first_multiplier + k as AmountValue) * auction.step;
        FastBid {
            increment,
            amount: baseline + increment,
        }
    })
}
