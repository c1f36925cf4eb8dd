#![allow(dead_code)]
// Shared factories and fakes. Override fields with struct update syntax:
// `Auction { step: 200, ..factory_auction() }`.

use auction_widget::auth::Pkce;
use auction_widget::client::{BidPlacer, BidRejection};
use auction_widget::domain::{Auction, Bid, User};
use auction_widget::host::RandomSource;
use auction_widget::http::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use auction_widget::money::{AmountValue, Currency};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use url::Url;

pub fn sample_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// Starts in 10 seconds, ends in 20 seconds, no bids.
pub fn factory_auction() -> Auction {
    Auction {
        id: "auction1".to_string(),
        start_date: sample_now() + Duration::seconds(10),
        end_date: sample_now() + Duration::seconds(20),
        starting_price: 10_000,
        step: 100,
        bids: Vec::new(),
        highest_bid: None,
        currency: Currency::euro(),
        registration: None,
        is_private: false,
        agent_email: Some("agent@example.com".to_string()),
        agent_phone: Some("123456789".to_string()),
    }
}

pub fn in_progress_auction() -> Auction {
    Auction {
        start_date: sample_now() - Duration::seconds(10),
        end_date: sample_now() + Duration::hours(1),
        ..factory_auction()
    }
}

pub fn factory_bid() -> Bid {
    Bid {
        id: "bid1".to_string(),
        amount: 1000,
        created_at: sample_now(),
        new_end_date: sample_now() + Duration::hours(1),
        user_anonymous_id: Some("user1".to_string()),
        participant_id: Some("participant1".to_string()),
    }
}

pub fn bid_of(amount: AmountValue) -> Bid {
    Bid {
        id: format!("bid-{}", amount),
        amount,
        ..factory_bid()
    }
}

pub fn factory_user() -> User {
    User::new("123")
}

pub fn page_url() -> Url {
    Url::parse("https://agency.example/listing/42").unwrap()
}

/// Counts up so that every generated string is distinct and predictable.
pub struct CountingRandom(pub u32);

impl RandomSource for CountingRandom {
    fn fill_u32(&mut self, dest: &mut [u32]) {
        for word in dest.iter_mut() {
            *word = self.0;
            self.0 = self.0.wrapping_add(1);
        }
    }
}

pub fn expected_pkce(seed: u32) -> Pkce {
    // The state is drawn first, then the verifier
    let mut rng = CountingRandom(seed);
    let _state = auction_widget::auth::random_string(&mut rng);
    Pkce::generate(&mut rng)
}

pub enum Scripted {
    Respond(HttpResponse),
    Fail(String),
}

/// Answers requests from a script and remembers what was sent.
#[derive(Default)]
pub struct FakeTransport {
    script: Mutex<VecDeque<Scripted>>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: serde_json::Value) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Respond(HttpResponse::new(status, body.to_string())));
        self
    }

    pub fn respond_raw(self, status: u16, body: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Respond(HttpResponse::new(status, body)));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Fail(message.to_string()));
        self
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }
}

impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.clone();
        self.sent.lock().unwrap().push(request);
        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(TransportError::Request { url, message }),
            None => panic!("Unexpected request to {}", url),
        }
    }
}

/// Stands in for the remote place-bid operation.
pub struct FakePlacer {
    outcome: Result<Bid, BidRejection>,
    calls: Mutex<Vec<(String, AmountValue)>>,
}

impl FakePlacer {
    pub fn accepting(bid: Bid) -> Self {
        FakePlacer {
            outcome: Ok(bid),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(rejection: BidRejection) -> Self {
        FakePlacer {
            outcome: Err(rejection),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, AmountValue)> {
        self.calls.lock().unwrap().clone()
    }
}

impl BidPlacer for FakePlacer {
    async fn place_bid(&self, auction_id: &str, amount: AmountValue) -> Result<Bid, BidRejection> {
        self.calls.lock().unwrap().push((auction_id.to_string(), amount));
        self.outcome.clone()
    }
}
