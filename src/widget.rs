// src/widget.rs
use log::{error, info};
use thiserror::Error;

use crate::auth::AuthOutcome;
use crate::bidding::{BidController, Locale};
use crate::client::ApiClient;
use crate::config::{ConfigError, HostElement, WidgetConfig};
use crate::domain::{Auction, Errors, User};
use crate::host::{KeyValueStore, Location, RandomSource};
use crate::http::{HttpTransport, ReqwestTransport};

#[derive(Debug, Error)]
pub enum BootError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Auction widget: invalid API base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

/// A booted widget: validated configuration plus the API client.
#[derive(Debug)]
pub struct Widget<T> {
    config: WidgetConfig,
    client: ApiClient<T>,
    locale: Locale,
}

impl Widget<ReqwestTransport> {
    /// Reads the host element and builds a widget talking to the configured
    /// environment. Fails fast on any configuration problem.
    pub fn boot<E: HostElement + ?Sized>(root: Option<&E>) -> Result<Self, BootError> {
        Self::boot_with_transport(root, ReqwestTransport::new())
    }
}

impl<T: HttpTransport> Widget<T> {
    pub fn boot_with_transport<E: HostElement + ?Sized>(
        root: Option<&E>,
        transport: T,
    ) -> Result<Self, BootError> {
        let config = WidgetConfig::from_element(root).map_err(|e| {
            error!("{}", e);
            e
        })?;
        let client = ApiClient::from_config(&config, transport)?;
        info!(
            "Auction widget booted for {:?} against {} ({})",
            config.property,
            config.environment,
            client.base_url()
        );
        Ok(Widget {
            config,
            client,
            locale: Locale::default(),
        })
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut ApiClient<T> {
        &mut self.client
    }

    pub async fn sign_in<L, S, R>(&mut self, location: &mut L, store: &mut S, rng: &mut R) -> AuthOutcome
    where
        L: Location + ?Sized,
        S: KeyValueStore + ?Sized,
        R: RandomSource + ?Sized,
    {
        self.client.authenticate(location, store, rng).await
    }

    pub async fn current_user(&self) -> Option<User> {
        self.client.me().await
    }

    pub fn bid_controller(&self, auction: Auction) -> Result<BidController, Errors> {
        BidController::with_locale(auction, self.locale)
    }
}
