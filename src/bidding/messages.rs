//! User-facing copy. The widget ships in French; English is available for
//! hosts that ask for it.

use chrono::{DateTime, Duration, Utc};

use crate::client::BidRejection;
use crate::money::Currency;
use super::phase::AuctionPhase;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    Fr,
    En,
}

pub const BID_AMOUNT_TOO_LOW: &str = "bid_amount_too_low";
pub const AUCTION_NOT_STARTED: &str = "auction_not_started";
pub const AUCTION_ENDED: &str = "auction_ended";

impl Locale {
    pub fn phase_label(self, phase: AuctionPhase) -> &'static str {
        match (self, phase) {
            (Locale::Fr, AuctionPhase::NotStarted) => "Démarre dans",
            (Locale::Fr, AuctionPhase::InProgress) => "Se termine dans",
            (Locale::Fr, AuctionPhase::Ended) => "Vente terminée",
            (Locale::En, AuctionPhase::NotStarted) => "Starts in",
            (Locale::En, AuctionPhase::InProgress) => "Ends in",
            (Locale::En, AuctionPhase::Ended) => "Auction ended",
        }
    }

    pub fn starting_price_label(self) -> &'static str {
        match self {
            Locale::Fr => "Prix de départ",
            Locale::En => "Starting price",
        }
    }

    pub fn step_label(self) -> &'static str {
        match self {
            Locale::Fr => "Palier",
            Locale::En => "Step",
        }
    }

    pub fn highest_bid_label(self) -> &'static str {
        match self {
            Locale::Fr => "Meilleure offre",
            Locale::En => "Highest bid",
        }
    }

    pub fn bid_button_label(self) -> &'static str {
        match self {
            Locale::Fr => "Enchérir",
            Locale::En => "Bid",
        }
    }

    pub fn confirm_button_label(self) -> &'static str {
        match self {
            Locale::Fr => "Confirmer",
            Locale::En => "Confirm",
        }
    }

    pub fn confirm_prompt(self, amount: &str) -> String {
        match self {
            Locale::Fr => format!("Vous êtes sur le point d'enchérir {}", amount),
            Locale::En => format!("You are about to bid {}", amount),
        }
    }

    /// "2j 03h 04m 05s"; days are left out when there are none.
    pub fn countdown(self, remaining: Duration) -> String {
        let total = remaining.num_seconds().max(0);
        let (days, hours, minutes, seconds) =
            (total / 86_400, total % 86_400 / 3_600, total % 3_600 / 60, total % 60);
        let day_unit = match self {
            Locale::Fr => "j",
            Locale::En => "d",
        };
        if days > 0 {
            format!("{}{} {:02}h {:02}m {:02}s", days, day_unit, hours, minutes, seconds)
        } else {
            format!("{:02}h {:02}m {:02}s", hours, minutes, seconds)
        }
    }

    pub fn date(self, date: DateTime<Utc>) -> String {
        match self {
            Locale::Fr => date.format("%d/%m/%Y %H:%M:%S").to_string(),
            Locale::En => date.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        }
    }

    fn generic_failure(self) -> &'static str {
        match self {
            Locale::Fr => "Une erreur est survenue lors de l'enchère, veuillez réessayer.",
            Locale::En => "Something went wrong while placing your bid, please try again.",
        }
    }
}

/// Message shown in the confirmation modal when a bid was not accepted.
pub fn rejection_message(rejection: &BidRejection, currency: &Currency, locale: Locale) -> String {
    let error = match rejection {
        BidRejection::Api(error) => error,
        BidRejection::Unauthorized => {
            return match locale {
                Locale::Fr => "Vous devez être connecté pour enchérir.".to_string(),
                Locale::En => "You must be signed in to bid.".to_string(),
            }
        }
        BidRejection::Transport(_) | BidRejection::Malformed { .. } => {
            return locale.generic_failure().to_string()
        }
    };

    match (error.code.as_str(), locale) {
        (BID_AMOUNT_TOO_LOW, _) => match (error.amount("min"), locale) {
            (Some(min), Locale::Fr) => format!("Vous devez au moins enchérir {}.", currency.format(min)),
            (Some(min), Locale::En) => format!("You must bid at least {}.", currency.format(min)),
            (None, Locale::Fr) => "Votre enchère est trop basse.".to_string(),
            (None, Locale::En) => "Your bid is too low.".to_string(),
        },
        (AUCTION_NOT_STARTED, Locale::Fr) => "La vente n'a pas encore commencé.".to_string(),
        (AUCTION_NOT_STARTED, Locale::En) => "The auction has not started yet.".to_string(),
        (AUCTION_ENDED, Locale::Fr) => "La vente est terminée.".to_string(),
        (AUCTION_ENDED, Locale::En) => "The auction has ended.".to_string(),
        _ => locale.generic_failure().to_string(),
    }
}
