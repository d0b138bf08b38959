//! HTTP client for the customer/transaction backend.

use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::error::{Result, TallyError};
use crate::models::{Customer, Dataset, Transaction};
use crate::settings::Settings;

pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(&settings.base_url, Duration::from_secs(settings.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn fetch_customers(&self) -> Result<Vec<Customer>> {
        self.get_json("customers")
    }

    pub fn fetch_transactions(&self) -> Result<Vec<Transaction>> {
        self.get_json("transactions")
    }

    /// Fetch both collections. Either failing fails the whole load.
    pub fn fetch_dataset(&self) -> Result<Dataset> {
        tracing::info!(base_url = %self.base_url, "Fetching customers and transactions");
        let customers = self.fetch_customers()?;
        let transactions = self.fetch_transactions()?;
        tracing::info!(
            customers = customers.len(),
            transactions = transactions.len(),
            "Fetch complete"
        );
        Ok(Dataset {
            customers,
            transactions,
        })
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(%url, "GET");

        let response = self.http.get(&url).send().map_err(|e| {
            tracing::warn!(%url, error = %e, "Request failed");
            e
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "Non-success response");
            return Err(TallyError::Status {
                url,
                status: status.as_u16(),
            });
        }

        Ok(response.json::<T>()?)
    }
}

/// Run `fetch_dataset` on a background thread. The receiver yields exactly
/// one result.
pub fn spawn_fetch(client: ApiClient) -> Receiver<Result<Dataset>> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(client.fetch_dataset());
    });
    rx
}
