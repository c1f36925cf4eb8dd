use auction_widget::web::app::run_app;
use log::warn;

const DEFAULT_PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let port = match std::env::var("SANDBOX_PORT") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid SANDBOX_PORT '{}', using {}", raw, DEFAULT_PORT);
            DEFAULT_PORT
        }),
        Err(_) => DEFAULT_PORT,
    };

    run_app(port).await
}
