//! In-memory response cache for weather lookups.
//!
//! Entries live for ten minutes. Concurrent requests for the same URL share one
//! network call: later callers wait for the first to finish and read its result.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
};

use chrono::{DateTime, Duration, Utc};
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;

use crate::client::{
    api::helper::{get, send_request},
    model::error::ApiError,
};

const TTL_MINUTES: i64 = 10;
const POLL_MS: u32 = 50;

struct Entry {
    fetched_at: DateTime<Utc>,
    body: String,
}

thread_local! {
    static ENTRIES: RefCell<HashMap<String, Entry>> = RefCell::new(HashMap::new());
    static IN_FLIGHT: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

fn fresh(url: &str) -> Option<String> {
    let cutoff = Utc::now() - Duration::minutes(TTL_MINUTES);
    ENTRIES.with_borrow(|entries| {
        entries
            .get(url)
            .filter(|entry| entry.fetched_at > cutoff)
            .map(|entry| entry.body.clone())
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError {
        status: 500,
        message: format!("Failed to parse response: {}", e),
    })
}

/// Drops every cached response.
pub fn clear() {
    ENTRIES.with_borrow_mut(HashMap::clear);
}

/// GETs `url`, serving a cached body when one is younger than ten minutes.
pub async fn cached_get<T: DeserializeOwned>(url: &str) -> Result<T, ApiError> {
    loop {
        if let Some(body) = fresh(url) {
            return decode(&body);
        }
        if !IN_FLIGHT.with_borrow(|in_flight| in_flight.contains(url)) {
            break;
        }
        TimeoutFuture::new(POLL_MS).await;
    }

    IN_FLIGHT.with_borrow_mut(|in_flight| in_flight.insert(url.to_string()));

    let result = match send_request(|| get(url)).await {
        Ok(response) => response.text().await.map_err(|e| ApiError {
            status: 500,
            message: format!("Failed to read response: {}", e),
        }),
        Err(e) => Err(e),
    };

    IN_FLIGHT.with_borrow_mut(|in_flight| in_flight.remove(url));

    let body = result?;
    ENTRIES.with_borrow_mut(|entries| {
        entries.insert(
            url.to_string(),
            Entry {
                fetched_at: Utc::now(),
                body: body.clone(),
            },
        )
    });

    decode(&body)
}
