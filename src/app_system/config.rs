use thiserror::Error;

use crate::resource::Routes;

pub const DEFAULT_CHANNEL_BUFFER: usize = 32;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Which back-end the system talks to.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendKind {
    Http { base_url: String, csrf_token: Option<String> },
    InMemory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub backend: BackendKind,
    pub routes: Routes,
    pub channel_buffer: usize,
}

impl ClientConfig {
    /// Reads the configuration from the environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from a variable lookup.
    ///
    /// - `BASKETS_BASE_URL`: API root; unset selects the in-memory back-end
    /// - `BASKETS_CSRF_TOKEN`: token sent with mutating requests
    /// - `BASKETS_DELIVERIES_PATH`, `BASKETS_ORDERS_PATH`: route prefixes
    /// - `BASKETS_CHANNEL_BUFFER`: request channel capacity
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let backend = match non_empty("BASKETS_BASE_URL") {
            Some(base_url) => BackendKind::Http {
                base_url,
                csrf_token: non_empty("BASKETS_CSRF_TOKEN"),
            },
            None => BackendKind::InMemory,
        };

        let defaults = Routes::default();
        let routes = Routes {
            deliveries: non_empty("BASKETS_DELIVERIES_PATH").unwrap_or(defaults.deliveries),
            orders: non_empty("BASKETS_ORDERS_PATH").unwrap_or(defaults.orders),
        };

        let channel_buffer = match non_empty("BASKETS_CHANNEL_BUFFER") {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "BASKETS_CHANNEL_BUFFER",
                        value,
                    })
                }
            },
            None => DEFAULT_CHANNEL_BUFFER,
        };

        Ok(Self {
            backend,
            routes,
            channel_buffer,
        })
    }
}
