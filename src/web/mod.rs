//! Local stand-in for the auction API, served by the `auction-widget-sandbox`
//! binary for the `local` environment.

pub mod app;
pub mod sandbox;
pub mod types;

pub use self::sandbox::Sandbox;
