use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::{error, web, App, HttpRequest, HttpResponse, HttpServer, Result};
use chrono::Utc;
use log::info;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::client::ApiError;
use super::sandbox::{OAuthError, PlaceBidError, Sandbox};
use super::types::{AppState, AuthorizeParams, BidRequest, ErrorBody, OAuthErrorBody, TokenRequest};

// Initialize application state with the demo auction
pub fn init_app_state() -> AppState {
    Arc::new(Mutex::new(Sandbox::seeded(Utc::now())))
}

fn lock(data: &web::Data<AppState>) -> Result<MutexGuard<'_, Sandbox>> {
    data.lock()
        .map_err(|_| error::ErrorInternalServerError("sandbox state poisoned"))
}

// Read the token from an `Authorization: Bearer ...` header
fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn oauth_error(err: &OAuthError) -> HttpResponse {
    HttpResponse::BadRequest().json(OAuthErrorBody {
        error: err.code().to_string(),
        error_description: err.to_string(),
    })
}

// Approve every authorization request and send the browser back with a code
async fn authorize(
    params: web::Query<AuthorizeParams>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut sandbox = lock(&data)?;
    match sandbox.authorize(&params) {
        Ok(redirect) => Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, redirect.as_str()))
            .finish()),
        Err(err) => Ok(oauth_error(&err)),
    }
}

async fn token(
    request: web::Json<TokenRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut sandbox = lock(&data)?;
    match sandbox.exchange(&request) {
        Ok(token) => Ok(HttpResponse::Ok().json(token)),
        Err(err) => {
            info!("Token exchange refused: {}", err);
            Ok(oauth_error(&err))
        }
    }
}

async fn me(req: HttpRequest, data: web::Data<AppState>) -> Result<HttpResponse> {
    let sandbox = lock(&data)?;
    match bearer_token(&req).and_then(|token| sandbox.user_for(&token).cloned()) {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Ok(HttpResponse::Unauthorized().json(ErrorBody {
            error: "Unauthorized".to_string(),
        })),
    }
}

async fn get_auction(
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    let auction_id = path.into_inner();
    let sandbox = lock(&data)?;
    match sandbox.auction(&auction_id) {
        Some(auction) => Ok(HttpResponse::Ok().json(auction)),
        None => Ok(HttpResponse::NotFound().json(ErrorBody {
            error: "Auction not found".to_string(),
        })),
    }
}

async fn place_bid(
    req: HttpRequest,
    path: web::Path<String>,
    bid_req: web::Json<BidRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse> {
    let auction_id = path.into_inner();
    let mut sandbox = lock(&data)?;

    let Some(bidder) = bearer_token(&req).and_then(|token| sandbox.user_for(&token).cloned()) else {
        return Ok(HttpResponse::Unauthorized().json(ApiError::new("unauthorized")));
    };

    match sandbox.place_bid(&auction_id, &bidder, bid_req.amount, Utc::now()) {
        Ok(bid) => Ok(HttpResponse::Ok().json(bid)),
        Err(PlaceBidError::UnknownAuction(_)) => Ok(HttpResponse::NotFound().json(ApiError::new("auction_not_found"))),
        Err(PlaceBidError::Refused(err)) => Ok(HttpResponse::UnprocessableEntity().json(err)),
    }
}

// Configure routes
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .route("/oauth/authorize", web::get().to(authorize))
            .route("/oauth/token", web::post().to(token))
            .route("/api/v1/me", web::get().to(me))
            .route("/api/v1/auctions/{id}", web::get().to(get_auction))
            .route("/api/v1/auctions/{id}/bids", web::post().to(place_bid)),
    );
}

pub async fn run_app(port: u16) -> std::io::Result<()> {
    let app_state = init_app_state();

    info!("Starting sandbox API on port {}", port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(Logger::default())
            .configure(configure_app)
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await
}
