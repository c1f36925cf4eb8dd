// src/bidding/view.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::Auction;
use super::messages::Locale;
use super::phase::{AuctionPhase, Countdown};

/// Everything the auction panel displays, already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuctionView {
    #[serde(skip)]
    pub phase: AuctionPhase,
    pub phase_label: &'static str,
    pub countdown: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub starting_price: String,
    pub step: String,
    pub highest_bid: Option<String>,
}

impl AuctionView {
    pub fn build(auction: &Auction, now: DateTime<Utc>, locale: Locale) -> Self {
        let countdown = Countdown::for_auction(auction, now);
        let currency = &auction.currency;
        AuctionView {
            phase: countdown.phase,
            phase_label: locale.phase_label(countdown.phase),
            countdown: countdown.remaining.map(|remaining| locale.countdown(remaining)),
            start_date: locale.date(auction.start_date),
            end_date: locale.date(auction.end_date),
            starting_price: currency.format(auction.starting_price),
            step: currency.format(auction.step),
            highest_bid: auction
                .highest_amount()
                .filter(|amount| *amount > 0)
                .map(|amount| currency.format(amount)),
        }
    }
}
