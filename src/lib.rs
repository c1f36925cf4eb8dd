// src/lib.rs
pub mod auth;
pub mod bidding;
pub mod client;
pub mod config;
pub mod domain;
pub mod host;
pub mod http;
pub mod money;
pub mod persistence;
pub mod web;
pub mod widget;

pub use domain::*;
pub use money::*;
