// src/bidding/session.rs
use log::{debug, info};
use thiserror::Error;

use crate::client::BidRejection;
use crate::domain::{Auction, Bid, EndDateChange};
use crate::money::AmountValue;
use super::messages::{rejection_message, Locale};
use super::phase::AuctionPhase;

/// Where one bidding interaction stands.
///
/// A failed submission goes straight back to `Confirming` with the error
/// attached, so the modal stays open and the amount is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BidState {
    Idle,
    AmountSelected { amount: AmountValue },
    Confirming { amount: AmountValue, error: Option<String> },
    Submitting { amount: AmountValue },
    Success { bid: Bid },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Bid amount must be a positive whole number, got '{0}'")]
    InvalidAmount(String),

    #[error("No fast bid at position {0}")]
    UnknownFastBid(usize),

    #[error("No bid amount selected")]
    NothingSelected,

    #[error("No bid amount is awaiting confirmation")]
    NotConfirming,

    #[error("A bid is already being submitted")]
    AlreadySubmitting,

    #[error("Bidding is closed ({0:?})")]
    BiddingClosed(AuctionPhase),

    #[error("Registration to this private auction is required")]
    RegistrationRequired,
}

/// Handle for one outstanding place-bid call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    pub amount: AmountValue,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Accepted { bid: Bid, end_date: EndDateChange },
    Rejected { message: String },
    /// The submission was abandoned (modal dismissed) before its result came back.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct BidSession {
    state: BidState,
    generation: u64,
}

impl Default for BidSession {
    fn default() -> Self {
        BidSession {
            state: BidState::Idle,
            generation: 0,
        }
    }
}

impl BidSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &BidState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, BidState::Submitting { .. })
    }

    /// Whether the confirm button is enabled.
    pub fn can_confirm(&self) -> bool {
        matches!(self.state, BidState::Confirming { .. })
    }

    pub fn select_amount(&mut self, amount: AmountValue) -> Result<(), SessionError> {
        if self.is_submitting() {
            return Err(SessionError::AlreadySubmitting);
        }
        if amount <= 0 {
            return Err(SessionError::InvalidAmount(amount.to_string()));
        }
        self.state = BidState::AmountSelected { amount };
        Ok(())
    }

    /// Parses what the user typed in the custom amount field.
    pub fn enter_amount(&mut self, input: &str) -> Result<(), SessionError> {
        let amount = input
            .trim()
            .parse::<AmountValue>()
            .map_err(|_| SessionError::InvalidAmount(input.to_string()))?;
        self.select_amount(amount)
    }

    pub fn open_confirmation(&mut self) -> Result<(), SessionError> {
        match self.state {
            BidState::AmountSelected { amount } => {
                self.state = BidState::Confirming { amount, error: None };
                Ok(())
            }
            BidState::Confirming { .. } => Ok(()),
            BidState::Submitting { .. } => Err(SessionError::AlreadySubmitting),
            BidState::Idle | BidState::Success { .. } => Err(SessionError::NothingSelected),
        }
    }

    /// Closes the modal. An in-flight submission keeps running but its
    /// result will be ignored.
    pub fn dismiss(&mut self) {
        if self.is_submitting() {
            debug!("Abandoning in-flight bid submission");
        }
        self.generation += 1;
        self.state = BidState::Idle;
    }

    pub fn begin_submission(&mut self) -> Result<Submission, SessionError> {
        match self.state {
            BidState::Confirming { amount, .. } => {
                self.generation += 1;
                self.state = BidState::Submitting { amount };
                Ok(Submission {
                    amount,
                    generation: self.generation,
                })
            }
            BidState::Submitting { .. } => Err(SessionError::AlreadySubmitting),
            _ => Err(SessionError::NotConfirming),
        }
    }

    /// Applies the outcome of `submission`. Accepted bids are recorded on
    /// `auction`; stale outcomes change nothing.
    pub fn complete(
        &mut self,
        submission: Submission,
        result: Result<Bid, BidRejection>,
        auction: &mut Auction,
        locale: Locale,
    ) -> Completion {
        if !self.is_submitting() || submission.generation != self.generation {
            debug!("Ignoring outcome of abandoned bid of {}", submission.amount);
            return Completion::Ignored;
        }

        match result {
            Ok(bid) => {
                let end_date = auction.apply_bid(bid.clone());
                info!("Bid of {} placed on auction {}", bid.amount, auction.id);
                self.state = BidState::Success { bid: bid.clone() };
                Completion::Accepted { bid, end_date }
            }
            Err(rejection) => {
                let message = rejection_message(&rejection, &auction.currency, locale);
                info!("Bid of {} on auction {} failed: {}", submission.amount, auction.id, rejection);
                self.state = BidState::Confirming {
                    amount: submission.amount,
                    error: Some(message.clone()),
                };
                Completion::Rejected { message }
            }
        }
    }
}
