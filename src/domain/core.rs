// src/domain/core.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type UserId = String;
pub type AuctionId = String;
pub type BidId = String;

/// The authenticated identity returned by the identity endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    pub fn new(id: impl Into<UserId>) -> Self {
        User {
            id: id.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.email {
            Some(email) => write!(f, "{}|{}", self.id, email),
            None => write!(f, "{}", self.id),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Errors {
    #[error("Auction {0} must end after it starts")]
    EndsBeforeStart(AuctionId),

    #[error("Auction {0}: the last bid is not the greatest bid")]
    LastBidNotGreatest(AuctionId),

    #[error("Auction {0}: the highest bid is not the last bid")]
    HighestBidNotLast(AuctionId),
}
