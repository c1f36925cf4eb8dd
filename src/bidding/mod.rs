pub mod controller;
pub mod ladder;
pub mod messages;
pub mod phase;
pub mod session;
pub mod ticker;
pub mod view;

pub use self::controller::BidController;
pub use self::ladder::{fast_bids, FastBid, FAST_BID_COUNT};
pub use self::messages::{rejection_message, Locale};
pub use self::phase::{auction_phase, phase_at, AuctionPhase, Countdown};
pub use self::session::{BidSession, BidState, Completion, SessionError, Submission};
pub use self::ticker::{CountdownTicker, Schedule, DEFAULT_TICK};
pub use self::view::AuctionView;
