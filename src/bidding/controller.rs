// src/bidding/controller.rs
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, error};
use tokio::sync::watch;

use crate::client::{BidPlacer, BidRejection};
use crate::domain::{Auction, Bid, EndDateChange, Errors};
use super::ladder::{fast_bids, FastBid, FAST_BID_COUNT};
use super::messages::Locale;
use super::phase::{auction_phase, AuctionPhase, Countdown};
use super::session::{BidSession, BidState, Completion, SessionError, Submission};
use super::ticker::CountdownTicker;
use super::view::AuctionView;

/// Display state and bid placement for one auction.
#[derive(Debug)]
pub struct BidController {
    auction: Auction,
    session: BidSession,
    locale: Locale,
    ticker: Option<CountdownTicker>,
}

impl BidController {
    /// Refuses snapshots that break the auction invariants.
    pub fn new(auction: Auction) -> Result<Self, Errors> {
        Self::with_locale(auction, Locale::default())
    }

    pub fn with_locale(auction: Auction, locale: Locale) -> Result<Self, Errors> {
        auction.validate().map_err(|e| {
            error!("Invalid auction snapshot: {}", e);
            e
        })?;
        Ok(BidController {
            auction,
            session: BidSession::new(),
            locale,
            ticker: None,
        })
    }

    /// Starts the countdown for this auction, replacing any previous ticker.
    /// Must be called from within a tokio runtime.
    pub fn start_ticker(&mut self, period: Duration) -> watch::Receiver<Countdown> {
        self.start_ticker_with_clock(period, Utc::now)
    }

    pub fn start_ticker_with_clock<C>(&mut self, period: Duration, clock: C) -> watch::Receiver<Countdown>
    where
        C: Fn() -> DateTime<Utc> + Send + 'static,
    {
        let ticker = CountdownTicker::spawn_with_clock(
            self.auction.start_date,
            self.auction.end_date,
            period,
            clock,
        );
        let updates = ticker.subscribe();
        self.ticker = Some(ticker);
        updates
    }

    pub fn ticker(&self) -> Option<&CountdownTicker> {
        self.ticker.as_ref()
    }

    pub fn stop_ticker(&mut self) {
        self.ticker = None;
    }

    pub fn auction(&self) -> &Auction {
        &self.auction
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn state(&self) -> &BidState {
        self.session.state()
    }

    pub fn phase(&self, now: DateTime<Utc>) -> AuctionPhase {
        auction_phase(&self.auction, now)
    }

    pub fn countdown(&self, now: DateTime<Utc>) -> Countdown {
        Countdown::for_auction(&self.auction, now)
    }

    pub fn view(&self, now: DateTime<Utc>) -> AuctionView {
        AuctionView::build(&self.auction, now, self.locale)
    }

    pub fn fast_bids(&self) -> [FastBid; FAST_BID_COUNT] {
        fast_bids(&self.auction)
    }

    pub fn fast_bid_labels(&self) -> Vec<String> {
        self.fast_bids()
            .iter()
            .map(|fast_bid| fast_bid.label(&self.auction.currency))
            .collect()
    }

    fn ensure_open(&self, now: DateTime<Utc>) -> Result<(), SessionError> {
        let phase = self.phase(now);
        if phase == AuctionPhase::Ended {
            return Err(SessionError::BiddingClosed(phase));
        }
        if self.auction.requires_registration() {
            return Err(SessionError::RegistrationRequired);
        }
        Ok(())
    }

    /// Clicking a fast-bid button opens the confirmation step for its amount.
    pub fn choose_fast_bid(&mut self, index: usize, now: DateTime<Utc>) -> Result<(), SessionError> {
        self.ensure_open(now)?;
        let fast_bid = self
            .fast_bids()
            .get(index)
            .copied()
            .ok_or(SessionError::UnknownFastBid(index))?;
        self.session.select_amount(fast_bid.amount)?;
        self.session.open_confirmation()
    }

    pub fn enter_custom_amount(&mut self, input: &str) -> Result<(), SessionError> {
        self.session.enter_amount(input)
    }

    pub fn submit_custom_amount(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        self.ensure_open(now)?;
        self.session.open_confirmation()
    }

    /// Text of the confirmation modal while it is open.
    pub fn confirmation_prompt(&self) -> Option<String> {
        match self.session.state() {
            BidState::Confirming { amount, .. } | BidState::Submitting { amount } => Some(
                self.locale
                    .confirm_prompt(&self.auction.currency.format(*amount)),
            ),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self.session.state() {
            BidState::Confirming { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    pub fn can_confirm(&self) -> bool {
        self.session.can_confirm()
    }

    pub fn dismiss(&mut self) {
        self.session.dismiss();
    }

    pub fn begin_submission(&mut self) -> Result<Submission, SessionError> {
        self.session.begin_submission()
    }

    /// Applies a place-bid outcome. A soft-close extension is passed on to
    /// the running countdown.
    pub fn complete(&mut self, submission: Submission, result: Result<Bid, BidRejection>) -> Completion {
        let completion = self
            .session
            .complete(submission, result, &mut self.auction, self.locale);
        if let Completion::Accepted {
            end_date: EndDateChange::Moved { to, .. },
            ..
        } = &completion
        {
            if let Some(ticker) = &self.ticker {
                debug!("Countdown now runs to {}", to);
                ticker.set_end_date(*to);
            }
        }
        completion
    }

    /// The confirm button: sends the bid awaiting confirmation and applies
    /// the answer.
    pub async fn confirm<P: BidPlacer + ?Sized>(&mut self, placer: &P) -> Result<Completion, SessionError> {
        let submission = self.begin_submission()?;
        let result = placer.place_bid(&self.auction.id, submission.amount).await;
        Ok(self.complete(submission, result))
    }
}
