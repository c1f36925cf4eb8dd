// src/domain/bids.rs
use chrono::serde::ts_milliseconds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::money::AmountValue;
use super::core::{BidId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: BidId,
    pub amount: AmountValue,
    #[serde(with = "ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// End of the auction once this bid is accepted. Later than the previous
    /// end when the bid triggered a soft-close extension.
    #[serde(with = "ts_milliseconds")]
    pub new_end_date: DateTime<Utc>,
    #[serde(default)]
    pub user_anonymous_id: Option<UserId>,
    #[serde(default)]
    pub participant_id: Option<String>,
}
