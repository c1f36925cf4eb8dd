// src/client.rs
use std::fmt;
use std::future::Future;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use url::Url;

use crate::auth::Session;
use crate::config::WidgetConfig;
use crate::domain::Bid;
use crate::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::money::AmountValue;

/// Structured rejection returned by the auction API, e.g.
/// `{"code": "bid_amount_too_low", "min": 1500}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    #[serde(flatten)]
    pub context: Map<String, Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>) -> Self {
        ApiError {
            code: code.into(),
            context: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    /// Integer context value such as `min`; numeric strings are accepted too.
    pub fn amount(&self, key: &str) -> Option<AmountValue> {
        match self.context.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} {}", self.code, Value::Object(self.context.clone()))
        }
    }
}

/// Why a place-bid call did not return a bid.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BidRejection {
    #[error("Bid rejected: {0}")]
    Api(ApiError),

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Unexpected response (HTTP {status}): {message}")]
    Malformed { status: u16, message: String },
}

/// The remote "place bid" operation.
pub trait BidPlacer {
    fn place_bid(
        &self,
        auction_id: &str,
        amount: AmountValue,
    ) -> impl Future<Output = Result<Bid, BidRejection>>;
}

/// Client for the auction API. Owns the session the auth flow fills in.
#[derive(Debug)]
pub struct ApiClient<T> {
    base_url: Url,
    client_id: String,
    transport: T,
    session: Session,
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn new(base_url: Url, client_id: impl Into<String>, transport: T) -> Self {
        ApiClient {
            base_url,
            client_id: client_id.into(),
            transport,
            session: Session::new(),
        }
    }

    pub fn from_config(config: &WidgetConfig, transport: T) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(config.base_url())?;
        Ok(Self::new(base_url, config.api_key.clone(), transport))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `path` is appended to whatever path the base URL already has.
    pub(crate) fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!("{}{}", self.base_url.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        url.set_query(None);
        url
    }

    pub async fn place_bid(
        &self,
        auction_id: &str,
        amount: AmountValue,
    ) -> Result<Bid, BidRejection> {
        let url = self.endpoint(&format!("/api/v1/auctions/{}/bids", auction_id));
        let mut request = HttpRequest::post_json(url, json!({ "amount": amount }));
        match self.session.access_token() {
            Some(token) => request = request.with_bearer(token.as_str()),
            None => debug!("Placing bid on auction {} without an access token", auction_id),
        }

        let response = self.transport.send(request).await.map_err(|e| {
            warn!("Place bid on auction {} failed: {}", auction_id, e);
            BidRejection::Transport(e.to_string())
        })?;

        let result = parse_bid_response(&response);
        match &result {
            Ok(bid) => info!("Bid {} of {} accepted on auction {}", bid.id, bid.amount, auction_id),
            Err(rejection) => info!("Bid of {} on auction {} refused: {}", amount, auction_id, rejection),
        }
        result
    }
}

fn parse_bid_response(response: &HttpResponse) -> Result<Bid, BidRejection> {
    if response.status == 401 {
        return Err(BidRejection::Unauthorized);
    }
    if response.is_success() {
        return response.json().map_err(|e| BidRejection::Malformed {
            status: response.status,
            message: e.to_string(),
        });
    }
    match response.json::<ApiError>() {
        Ok(error) => Err(BidRejection::Api(error)),
        Err(_) => Err(BidRejection::Malformed {
            status: response.status,
            message: response.body.chars().take(200).collect(),
        }),
    }
}

impl<T: HttpTransport> BidPlacer for ApiClient<T> {
    async fn place_bid(&self, auction_id: &str, amount: AmountValue) -> Result<Bid, BidRejection> {
        ApiClient::place_bid(self, auction_id, amount).await
    }
}
