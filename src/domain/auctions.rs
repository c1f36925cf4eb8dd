// src/domain/auctions.rs
use chrono::serde::ts_milliseconds;
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use crate::money::{AmountValue, Currency};
use super::bids::Bid;
use super::core::{AuctionId, Errors};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[serde(default)]
    pub is_user_allowed: bool,
}

/// Snapshot of an auction as served by the auction API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    pub id: AuctionId,
    #[serde(with = "ts_milliseconds")]
    pub start_date: DateTime<Utc>,
    #[serde(with = "ts_milliseconds")]
    pub end_date: DateTime<Utc>,
    pub starting_price: AmountValue,
    pub step: AmountValue,
    /// Chronological, oldest first.
    #[serde(default)]
    pub bids: Vec<Bid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest_bid: Option<Bid>,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub registration: Option<Registration>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_phone: Option<String>,
}

/// What `Auction::apply_bid` changed besides recording the bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndDateChange {
    Unchanged,
    Moved {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
}

impl Auction {
    /// End after start, and the highest bid (when given) is the last and
    /// greatest of the bids.
    pub fn validate(&self) -> Result<(), Errors> {
        if self.end_date <= self.start_date {
            return Err(Errors::EndsBeforeStart(self.id.clone()));
        }
        if let Some(last) = self.bids.last() {
            if self.bids.iter().any(|bid| bid.amount > last.amount) {
                return Err(Errors::LastBidNotGreatest(self.id.clone()));
            }
        }
        if let Some(highest) = &self.highest_bid {
            if self.bids.last() != Some(highest) {
                return Err(Errors::HighestBidNotLast(self.id.clone()));
            }
        }
        Ok(())
    }

    pub fn has_bids(&self) -> bool {
        !self.bids.is_empty()
    }

    /// Amount of the current highest bid, falling back to the most recent bid
    /// when the snapshot omitted `highestBid`.
    pub fn highest_amount(&self) -> Option<AmountValue> {
        self.highest_bid
            .as_ref()
            .or_else(|| self.bids.last())
            .map(|bid| bid.amount)
    }

    /// Private auctions only take bids from users whose registration was accepted.
    pub fn requires_registration(&self) -> bool {
        self.is_private
            && !self
                .registration
                .as_ref()
                .is_some_and(|registration| registration.is_user_allowed)
    }

    /// Records an accepted bid: it becomes the highest bid, is appended to the
    /// bid sequence, and its `new_end_date` replaces the end date when they differ.
    pub fn apply_bid(&mut self, bid: Bid) -> EndDateChange {
        let change = if bid.new_end_date != self.end_date {
            let from = self.end_date;
            self.end_date = bid.new_end_date;
            debug!("Auction {} end date moved from {} to {}", self.id, from, bid.new_end_date);
            EndDateChange::Moved {
                from,
                to: bid.new_end_date,
            }
        } else {
            EndDateChange::Unchanged
        };

        self.highest_bid = Some(bid.clone());
        self.bids.push(bid);
        change
    }
}
