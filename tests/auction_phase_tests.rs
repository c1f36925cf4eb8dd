use auction_widget::bidding::{
    auction_phase, AuctionPhase, AuctionView, BidController, Countdown, CountdownTicker, Locale,
};
use auction_widget::domain::{Auction, Bid};
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};
mod utils;
use utils::*;

#[test]
fn test_phase_before_start_is_not_started() {
    let auction = factory_auction();
    assert_eq!(
        auction_phase(&auction, auction.start_date - Duration::milliseconds(1)),
        AuctionPhase::NotStarted
    );
}

#[test]
fn test_phase_boundaries() {
    let auction = factory_auction();

    // Start belongs to the running auction
    assert_eq!(auction_phase(&auction, auction.start_date), AuctionPhase::InProgress);
    assert_eq!(
        auction_phase(&auction, auction.end_date - Duration::milliseconds(1)),
        AuctionPhase::InProgress
    );

    // End belongs to the finished auction
    assert_eq!(auction_phase(&auction, auction.end_date), AuctionPhase::Ended);
    assert_eq!(
        auction_phase(&auction, auction.end_date + Duration::days(3)),
        AuctionPhase::Ended
    );
}

#[test]
fn test_countdown_targets_next_phase_change() {
    let auction = factory_auction();
    let now = sample_now();

    let before = Countdown::for_auction(&auction, now);
    assert_eq!(before.remaining, Some(Duration::seconds(10)));

    let during = Countdown::for_auction(&auction, now + Duration::seconds(15));
    assert_eq!(during.phase, AuctionPhase::InProgress);
    assert_eq!(during.remaining, Some(Duration::seconds(5)));

    let after = Countdown::for_auction(&auction, now + Duration::seconds(20));
    assert_eq!(after.phase, AuctionPhase::Ended);
    assert_eq!(after.remaining, None);
}

#[test]
fn test_view_shows_starts_in_when_not_started() {
    let view = AuctionView::build(&factory_auction(), sample_now(), Locale::Fr);
    assert_eq!(view.phase_label, "Démarre dans");
    assert_eq!(view.countdown.as_deref(), Some("00h 00m 10s"));
}

#[test]
fn test_view_shows_ends_in_when_in_progress() {
    let auction = Auction {
        start_date: sample_now() - Duration::seconds(10),
        end_date: sample_now() + Duration::days(2) + Duration::hours(3) + Duration::seconds(4),
        ..factory_auction()
    };
    let view = AuctionView::build(&auction, sample_now(), Locale::Fr);
    assert_eq!(view.phase_label, "Se termine dans");
    assert_eq!(view.countdown.as_deref(), Some("2j 03h 00m 04s"));
}

#[test]
fn test_view_shows_sale_over_when_ended() {
    let auction = Auction {
        start_date: sample_now() - Duration::seconds(20),
        end_date: sample_now() - Duration::seconds(10),
        ..factory_auction()
    };
    let view = AuctionView::build(&auction, sample_now(), Locale::Fr);
    assert_eq!(view.phase_label, "Vente terminée");
    assert_eq!(view.countdown, None);

    let english = AuctionView::build(&auction, sample_now(), Locale::En);
    assert_eq!(english.phase_label, "Auction ended");
}

#[test]
fn test_view_formats_auction_details() {
    let highest: Bid = factory_bid();
    let auction = Auction {
        starting_price: 1500,
        step: 200,
        highest_bid: Some(highest.clone()),
        ..factory_auction()
    };
    let view = AuctionView::build(&auction, sample_now(), Locale::Fr);

    assert_eq!(view.starting_price, "1500 €");
    assert_eq!(view.step, "200 €");
    assert_eq!(view.highest_bid, Some(format!("{} €", highest.amount)));
    assert_eq!(view.start_date, "01/03/2024 12:00:10");
    assert_eq!(view.end_date, "01/03/2024 12:00:20");
}

#[test]
fn test_view_hides_highest_bid_without_bids() {
    let view = AuctionView::build(&factory_auction(), sample_now(), Locale::Fr);
    assert_eq!(view.highest_bid, None);
}

fn shared_clock(start: DateTime<Utc>) -> (Arc<Mutex<DateTime<Utc>>>, impl Fn() -> DateTime<Utc> + Send + 'static) {
    let now = Arc::new(Mutex::new(start));
    let reader = now.clone();
    (now, move || *reader.lock().unwrap())
}

#[tokio::test(start_paused = true)]
async fn test_ticker_publishes_phase_changes() {
    let auction = factory_auction();
    let (now, clock) = shared_clock(sample_now());
    let ticker = CountdownTicker::spawn_with_clock(
        auction.start_date,
        auction.end_date,
        std::time::Duration::from_secs(1),
        clock,
    );
    assert_eq!(ticker.latest().phase, AuctionPhase::NotStarted);

    let mut updates = ticker.subscribe();
    *now.lock().unwrap() = auction.start_date + Duration::seconds(1);
    tokio::time::advance(std::time::Duration::from_secs(1)).await;
    updates.changed().await.unwrap();
    assert_eq!(updates.borrow().phase, AuctionPhase::InProgress);
}

#[tokio::test(start_paused = true)]
async fn test_ticker_goes_quiet_once_auction_ended() {
    let auction = factory_auction();
    let (_now, clock) = shared_clock(auction.end_date + Duration::seconds(1));
    let ticker = CountdownTicker::spawn_with_clock(
        auction.start_date,
        auction.end_date,
        std::time::Duration::from_secs(1),
        clock,
    );
    let mut updates = ticker.subscribe();

    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().phase, AuctionPhase::Ended);

    // Nothing more is published while the end date stays put
    let quiet = tokio::time::timeout(std::time::Duration::from_secs(30), updates.changed()).await;
    assert!(quiet.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_moved_end_date_resumes_ended_countdown() {
    let auction = factory_auction();
    let now = auction.end_date + Duration::seconds(1);
    let (_now, clock) = shared_clock(now);
    let ticker = CountdownTicker::spawn_with_clock(
        auction.start_date,
        auction.end_date,
        std::time::Duration::from_secs(1),
        clock,
    );
    let mut updates = ticker.subscribe();
    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().phase, AuctionPhase::Ended);

    let extended = auction.end_date + Duration::minutes(2);
    ticker.set_end_date(extended);
    updates.changed().await.unwrap();

    let countdown = *updates.borrow_and_update();
    assert_eq!(countdown.phase, AuctionPhase::InProgress);
    assert_eq!(countdown.remaining, Some(extended - now));
    assert_eq!(ticker.schedule().end, extended);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_follows_soft_close_extension() {
    let auction = in_progress_auction();
    let old_end = auction.end_date;
    let extended_end = old_end + Duration::minutes(2);
    let mut controller = BidController::new(auction).unwrap();
    let (now, clock) = shared_clock(sample_now());
    let mut updates = controller.start_ticker_with_clock(std::time::Duration::from_secs(1), clock);

    controller.choose_fast_bid(0, sample_now()).unwrap();
    let placer = FakePlacer::accepting(Bid {
        new_end_date: extended_end,
        ..bid_of(10_000)
    });
    controller.confirm(&placer).await.unwrap();

    // Past the original end, before the extended one
    let later = old_end + Duration::seconds(5);
    *now.lock().unwrap() = later;
    updates.borrow_and_update();
    tokio::time::advance(std::time::Duration::from_secs(1)).await;
    updates.changed().await.unwrap();

    assert_eq!(controller.phase(later), AuctionPhase::InProgress);
    assert_eq!(updates.borrow().phase, AuctionPhase::InProgress);
    assert_eq!(updates.borrow().remaining, Some(extended_end - later));
    assert_eq!(controller.ticker().unwrap().schedule().end, extended_end);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_ticker_stops_updates() {
    let auction = in_progress_auction();
    let (_now, clock) = shared_clock(sample_now());
    let ticker = CountdownTicker::spawn_with_clock(
        auction.start_date,
        auction.end_date,
        std::time::Duration::from_secs(1),
        clock,
    );
    let mut updates = ticker.subscribe();
    drop(ticker);

    let drained = tokio::time::timeout(std::time::Duration::from_secs(30), async {
        while updates.changed().await.is_ok() {}
    })
    .await;
    assert!(drained.is_ok(), "ticker kept running after being dropped");
}
