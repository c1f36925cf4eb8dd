// src/bidding/phase.rs
use chrono::{DateTime, Duration, Utc};
use crate::domain::Auction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuctionPhase {
    NotStarted,
    InProgress,
    /// Terminal: no bid is accepted any more.
    Ended,
}

/// `start` belongs to `InProgress`, `end` belongs to `Ended`.
pub fn phase_at(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> AuctionPhase {
    if now < start {
        AuctionPhase::NotStarted
    } else if now < end {
        AuctionPhase::InProgress
    } else {
        AuctionPhase::Ended
    }
}

pub fn auction_phase(auction: &Auction, now: DateTime<Utc>) -> AuctionPhase {
    phase_at(auction.start_date, auction.end_date, now)
}

/// Phase plus the time left until the next phase change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub phase: AuctionPhase,
    /// Until the start when not started, until the end while in progress,
    /// `None` once ended.
    pub remaining: Option<Duration>,
}

impl Countdown {
    pub fn at(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let phase = phase_at(start, end, now);
        let remaining = match phase {
            AuctionPhase::NotStarted => Some(start - now),
            AuctionPhase::InProgress => Some(end - now),
            AuctionPhase::Ended => None,
        };
        Countdown { phase, remaining }
    }

    pub fn for_auction(auction: &Auction, now: DateTime<Utc>) -> Self {
        Countdown::at(auction.start_date, auction.end_date, now)
    }
}
