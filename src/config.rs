// src/config.rs
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

/// Id of the element the host page mounts the widget on.
pub const ROOT_ELEMENT_ID: &str = "auction-widget";

/// Read access to the attributes of the element hosting the widget.
pub trait HostElement {
    fn attribute(&self, name: &str) -> Option<String>;
}

impl HostElement for HashMap<String, String> {
    fn attribute(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Auction widget: No root element found with id '{ROOT_ELEMENT_ID}'. Did you forget to add it? Or maybe the id attribute got misspelled?")]
    MissingRoot,

    #[error("Auction widget: No 'api-key' attribute found. Did you forget to add it? Or maybe the attribute got misspelled?")]
    MissingApiKey,

    #[error("Auction widget: Either 'property-id' or 'source-name', 'source-agency-id', and 'source-id' must be provided. Did you forget to add them? Or maybe the attributes got misspelled?")]
    MissingPropertyInfo,

    #[error("Auction widget: 'api-env' must be one of 'local', 'staging' or 'production', got '{0}'.")]
    UnknownApiEnv(String),

    #[error("Auction widget: 'tos-url' is not a valid URL.")]
    InvalidTosUrl(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiEnv {
    Local,
    Staging,
    #[default]
    Production,
}

impl ApiEnv {
    pub fn base_url(&self) -> &'static str {
        match self {
            ApiEnv::Local => "http://localhost:8080",
            ApiEnv::Staging => "https://api.staging.encheres-immo.com",
            ApiEnv::Production => "https://api.encheres-immo.com",
        }
    }
}

impl fmt::Display for ApiEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiEnv::Local => write!(f, "local"),
            ApiEnv::Staging => write!(f, "staging"),
            ApiEnv::Production => write!(f, "production"),
        }
    }
}

impl FromStr for ApiEnv {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(ApiEnv::Local),
            "staging" => Ok(ApiEnv::Staging),
            "production" => Ok(ApiEnv::Production),
            _ => Err(ConfigError::UnknownApiEnv(s.to_string())),
        }
    }
}

/// Which property the widget shows the auction for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyInfo {
    PropertyId(String),
    /// Property identified by the listing source that published it.
    Source {
        name: String,
        agency_id: String,
        id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Also used as the OAuth client id.
    pub api_key: String,
    pub environment: ApiEnv,
    pub property: PropertyInfo,
    pub allow_user_registration: bool,
    pub tos_url: Option<Url>,
}

impl WidgetConfig {
    /// Reads and validates the host element attributes. Empty attributes
    /// count as missing.
    pub fn from_element<E: HostElement + ?Sized>(root: Option<&E>) -> Result<Self, ConfigError> {
        let root = root.ok_or(ConfigError::MissingRoot)?;
        let attr = |name: &str| root.attribute(name).filter(|value| !value.is_empty());

        let api_key = attr("api-key").ok_or(ConfigError::MissingApiKey)?;

        let environment = match attr("api-env") {
            Some(env) => env.parse()?,
            None => ApiEnv::default(),
        };

        let property = match attr("property-id") {
            Some(id) => PropertyInfo::PropertyId(id),
            None => match (attr("source-name"), attr("source-agency-id"), attr("source-id")) {
                (Some(name), Some(agency_id), Some(id)) => PropertyInfo::Source { name, agency_id, id },
                _ => return Err(ConfigError::MissingPropertyInfo),
            },
        };

        let allow_user_registration = root
            .attribute("allow-user-registration")
            .is_some_and(|value| value == "true");

        let tos_url = attr("tos-url")
            .map(|raw| Url::parse(&raw).map_err(|_| ConfigError::InvalidTosUrl(raw)))
            .transpose()?;

        Ok(WidgetConfig {
            api_key,
            environment,
            property,
            allow_user_registration,
            tos_url,
        })
    }

    pub fn base_url(&self) -> &'static str {
        self.environment.base_url()
    }
}
