// src/web/sandbox.rs
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::auth::challenge_from_verifier;
use crate::bidding::messages::{AUCTION_ENDED, AUCTION_NOT_STARTED, BID_AMOUNT_TOO_LOW};
use crate::bidding::{auction_phase, AuctionPhase};
use crate::client::ApiError;
use crate::domain::{Auction, AuctionId, Bid, Errors, User};
use crate::money::{AmountValue, Currency};
use super::types::{AuthorizeParams, TokenRequest, TokenResponse};

/// A bid arriving this close to the end pushes the end back by the same amount.
pub const SOFT_CLOSE_SECONDS: i64 = 120;

pub const DEMO_AUCTION_ID: &str = "demo";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OAuthError {
    #[error("Only response_type=code is supported")]
    UnsupportedResponseType,

    #[error("Only the S256 code challenge method is supported")]
    UnsupportedChallengeMethod,

    #[error("Only the authorization_code grant is supported")]
    UnsupportedGrantType,

    #[error("Invalid redirect URI: {0}")]
    InvalidRedirectUri(String),

    #[error("Invalid grant: {0}")]
    InvalidGrant(&'static str),
}

impl OAuthError {
    /// RFC 6749 error code.
    pub fn code(&self) -> &'static str {
        match self {
            OAuthError::UnsupportedResponseType => "unsupported_response_type",
            OAuthError::UnsupportedChallengeMethod | OAuthError::InvalidRedirectUri(_) => "invalid_request",
            OAuthError::UnsupportedGrantType => "unsupported_grant_type",
            OAuthError::InvalidGrant(_) => "invalid_grant",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlaceBidError {
    #[error("Unknown auction: {0}")]
    UnknownAuction(AuctionId),

    #[error("Bid refused: {0}")]
    Refused(ApiError),
}

#[derive(Debug, Clone)]
struct PendingCode {
    challenge: String,
    client_id: String,
    redirect_uri: String,
}

/// In-memory auction backend with just enough rules to exercise the widget.
#[derive(Debug, Default)]
pub struct Sandbox {
    auctions: HashMap<AuctionId, Auction>,
    codes: HashMap<String, PendingCode>,
    tokens: HashMap<String, User>,
    users_issued: u64,
}

pub fn demo_auction(now: DateTime<Utc>) -> Auction {
    Auction {
        id: DEMO_AUCTION_ID.to_string(),
        start_date: now - Duration::hours(1),
        end_date: now + Duration::days(1),
        starting_price: 100_000,
        step: 1_000,
        bids: Vec::new(),
        highest_bid: None,
        currency: Currency::euro(),
        registration: None,
        is_private: false,
        agent_email: Some("agent@example.com".to_string()),
        agent_phone: None,
    }
}

impl Sandbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(now: DateTime<Utc>) -> Self {
        let mut sandbox = Sandbox::new();
        sandbox.auctions.insert(DEMO_AUCTION_ID.to_string(), demo_auction(now));
        sandbox
    }

    pub fn add_auction(&mut self, auction: Auction) -> Result<(), Errors> {
        auction.validate()?;
        self.auctions.insert(auction.id.clone(), auction);
        Ok(())
    }

    pub fn auction(&self, auction_id: &str) -> Option<&Auction> {
        self.auctions.get(auction_id)
    }

    /// Auto-approves the request and returns where to send the browser back.
    pub fn authorize(&mut self, params: &AuthorizeParams) -> Result<Url, OAuthError> {
        if params.response_type != "code" {
            return Err(OAuthError::UnsupportedResponseType);
        }
        if params.code_challenge_method != "S256" {
            return Err(OAuthError::UnsupportedChallengeMethod);
        }
        let mut redirect = Url::parse(&params.redirect_uri)
            .map_err(|_| OAuthError::InvalidRedirectUri(params.redirect_uri.clone()))?;

        let code = Uuid::new_v4().simple().to_string();
        self.codes.insert(
            code.clone(),
            PendingCode {
                challenge: params.code_challenge.clone(),
                client_id: params.client_id.clone(),
                redirect_uri: params.redirect_uri.clone(),
            },
        );

        {
            let mut query = redirect.query_pairs_mut();
            query.append_pair("code", &code);
            if let Some(state) = &params.state {
                query.append_pair("state", state);
            }
        }
        Ok(redirect)
    }

    /// Codes are single use: a failed exchange burns the code too.
    pub fn exchange(&mut self, request: &TokenRequest) -> Result<TokenResponse, OAuthError> {
        if request.grant_type != "authorization_code" {
            return Err(OAuthError::UnsupportedGrantType);
        }
        let pending = self
            .codes
            .remove(&request.code)
            .ok_or(OAuthError::InvalidGrant("unknown or already used code"))?;
        if pending.client_id != request.client_id {
            return Err(OAuthError::InvalidGrant("client_id does not match"));
        }
        if !same_redirect(&pending.redirect_uri, &request.redirect_uri) {
            return Err(OAuthError::InvalidGrant("redirect_uri does not match"));
        }
        if challenge_from_verifier(&request.code_verifier) != pending.challenge {
            return Err(OAuthError::InvalidGrant("code_verifier does not match the challenge"));
        }

        self.users_issued += 1;
        let user = User::new(format!("user-{}", self.users_issued))
            .with_email(format!("user{}@example.com", self.users_issued));
        let access_token = Uuid::new_v4().simple().to_string();
        self.tokens.insert(access_token.clone(), user);

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
        })
    }

    pub fn user_for(&self, token: &str) -> Option<&User> {
        self.tokens.get(token)
    }

    pub fn place_bid(
        &mut self,
        auction_id: &str,
        bidder: &User,
        amount: AmountValue,
        now: DateTime<Utc>,
    ) -> Result<Bid, PlaceBidError> {
        let auction = self
            .auctions
            .get_mut(auction_id)
            .ok_or_else(|| PlaceBidError::UnknownAuction(auction_id.to_string()))?;

        match auction_phase(auction, now) {
            AuctionPhase::NotStarted => return Err(PlaceBidError::Refused(ApiError::new(AUCTION_NOT_STARTED))),
            AuctionPhase::Ended => return Err(PlaceBidError::Refused(ApiError::new(AUCTION_ENDED))),
            AuctionPhase::InProgress => {}
        }

        // First bid only has to meet the starting price
        let min = match auction.highest_amount() {
            Some(highest) if auction.has_bids() => highest + auction.step,
            _ => auction.starting_price,
        };
        if amount < min {
            return Err(PlaceBidError::Refused(ApiError::new(BID_AMOUNT_TOO_LOW).with("min", min)));
        }

        let soft_close = Duration::seconds(SOFT_CLOSE_SECONDS);
        let new_end_date = std::cmp::max(auction.end_date, now + soft_close);

        let bid = Bid {
            id: Uuid::new_v4().to_string(),
            amount,
            created_at: now,
            new_end_date,
            user_anonymous_id: Some(bidder.id.clone()),
            participant_id: Some(format!("participant-{}", bidder.id)),
        };
        auction.apply_bid(bid.clone());
        Ok(bid)
    }
}

/// The client strips the query before exchanging, so compare without it.
fn same_redirect(registered: &str, presented: &str) -> bool {
    match (Url::parse(registered), Url::parse(presented)) {
        (Ok(mut registered), Ok(mut presented)) => {
            registered.set_query(None);
            presented.set_query(None);
            registered == presented
        }
        _ => registered == presented,
    }
}
