//! Data store client for the hosted `bookings` table.
//!
//! The site only ever appends rows, so the seam is a single insert call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::{
    config::StoreSettings,
    models::{NewBooking, BOOKINGS_TABLE},
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store answered but refused the row.
    #[error("store rejected booking ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// The request never produced a store answer.
    #[error("store request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreSetupError {
    #[error("invalid store url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert_booking(&self, booking: &NewBooking) -> Result<(), StoreError>;
}

/// PostgREST-style REST adapter.
pub struct RestBookingStore {
    client: Client,
    endpoint: Url,
    anon_key: String,
}

impl RestBookingStore {
    pub fn new(settings: &StoreSettings, timeout: Duration) -> Result<Self, StoreSetupError> {
        let endpoint = table_endpoint(&settings.url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            anon_key: settings.anon_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn table_endpoint(base: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!(
        "{}/rest/v1/{BOOKINGS_TABLE}",
        base.trim_end_matches('/')
    ))
}

#[derive(Deserialize)]
struct StoreErrorBody {
    message: Option<String>,
}

#[async_trait]
impl BookingStore for RestBookingStore {
    async fn insert_booking(&self, booking: &NewBooking) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("apikey", self.anon_key.as_str())
            .header(header::AUTHORIZATION, format!("Bearer {}", self.anon_key))
            .header("Prefer", "return=minimal")
            .json(&[booking])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.bytes().await.unwrap_or_default();
        Err(rejection(status, &body))
    }
}

fn rejection(status: StatusCode, body: &[u8]) -> StoreError {
    let message = serde_json::from_slice::<StoreErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());
    StoreError::Rejected {
        status: status.as_u16(),
        message,
    }
}
