use std::{env, time::Duration};

pub const PLACEHOLDER_STORE_URL: &str = "https://placeholder.supabase.co";
pub const PLACEHOLDER_STORE_KEY: &str = "placeholder-key";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STATIC_DIR: &str = "./static";
const DEFAULT_FALLBACK_DELAY_MS: u64 = 1500;
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CAROUSEL_INTERVAL_MS: u64 = 5000;

/// Credentials for the hosted bookings table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreSettings {
    pub url: String,
    pub anon_key: String,
}

impl StoreSettings {
    /// Returns `None` when either value is missing, blank, or still the
    /// placeholder shipped in the sample environment.
    pub fn from_values(url: Option<String>, anon_key: Option<String>) -> Option<Self> {
        let url = url.map(|value| value.trim().to_string())?;
        let anon_key = anon_key.map(|value| value.trim().to_string())?;
        if url.is_empty() || anon_key.is_empty() {
            return None;
        }
        if url == PLACEHOLDER_STORE_URL || anon_key == PLACEHOLDER_STORE_KEY {
            return None;
        }
        Some(Self { url, anon_key })
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub static_dir: String,
    pub store: Option<StoreSettings>,
    pub store_timeout: Duration,
    pub fallback_delay: Duration,
    pub carousel_interval: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let store = StoreSettings::from_values(
            lookup("SUPABASE_URL").or_else(|| lookup("VITE_SUPABASE_URL")),
            lookup("SUPABASE_ANON_KEY").or_else(|| lookup("VITE_SUPABASE_ANON_KEY")),
        );

        let port = lookup("PORT")
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let static_dir = lookup("STATIC_DIR")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string());

        Self {
            port,
            static_dir,
            store,
            store_timeout: Duration::from_secs(parse_or(
                &lookup,
                "STORE_TIMEOUT_SECS",
                DEFAULT_STORE_TIMEOUT_SECS,
            )),
            fallback_delay: Duration::from_millis(parse_or(
                &lookup,
                "BOOKING_FALLBACK_DELAY_MS",
                DEFAULT_FALLBACK_DELAY_MS,
            )),
            carousel_interval: Duration::from_millis(
                parse_or(&lookup, "CAROUSEL_INTERVAL_MS", DEFAULT_CAROUSEL_INTERVAL_MS).max(1),
            ),
        }
    }
}

fn parse_or<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {key}={value}; using {default}");
            default
        }),
        None => default,
    }
}
