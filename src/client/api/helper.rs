use gloo_timers::future::TimeoutFuture;
use reqwasm::http::{Request, Response};
use serde::de::DeserializeOwned;

use crate::{
    client::{constant::TOKEN_KEY, model::error::ApiError},
    model::api::ErrorDto,
};

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY_MS: u32 = 1_000;

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

pub fn stored_token() -> Option<String> {
    storage()?.get_item(TOKEN_KEY).ok().flatten()
}

pub fn store_token(token: &str) {
    if let Some(storage) = storage() {
        let _ = storage.set_item(TOKEN_KEY, token);
    }
}

pub fn clear_token() {
    if let Some(storage) = storage() {
        let _ = storage.remove_item(TOKEN_KEY);
    }
}

fn with_auth(request: Request) -> Request {
    match stored_token() {
        Some(token) => request.header("Authorization", &format!("Bearer {token}")),
        None => request,
    }
}

/// Create a GET request carrying the stored bearer token
pub fn get(url: &str) -> Request {
    with_auth(Request::get(url))
}

/// Create a POST request with the bearer token and JSON content type
pub fn post(url: &str) -> Request {
    with_auth(Request::post(url)).header("Content-Type", "application/json")
}

/// Create a PUT request with the bearer token and JSON content type
pub fn put(url: &str) -> Request {
    with_auth(Request::put(url)).header("Content-Type", "application/json")
}

/// Create a DELETE request carrying the stored bearer token
pub fn delete(url: &str) -> Request {
    with_auth(Request::delete(url))
}

async fn error_from(response: Response) -> ApiError {
    let status = response.status() as u64;
    let message = match response.json::<ErrorDto>().await {
        Ok(error_dto) => error_dto.message,
        Err(_) => format!("Request failed with status {status}"),
    };

    ApiError { status, message }
}

/// Sends a request, retrying network failures and 5xx responses.
///
/// Requests can't be cloned, so `build` is called once per attempt. Up to three
/// attempts are made with a fixed one second pause between them.
pub async fn send_request<F>(build: F) -> Result<Response, ApiError>
where
    F: Fn() -> Request,
{
    let mut attempt = 1;
    loop {
        let err = match build().send().await {
            Ok(response) if (200..300).contains(&response.status()) => return Ok(response),
            Ok(response) => error_from(response).await,
            Err(e) => ApiError {
                status: 0,
                message: format!("Failed to send request: {e}"),
            },
        };

        if !err.is_retryable() || attempt >= MAX_ATTEMPTS {
            return Err(err);
        }

        attempt += 1;
        TimeoutFuture::new(RETRY_DELAY_MS).await;
    }
}

/// Parses a successful JSON body.
pub async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response.json::<T>().await.map_err(|e| ApiError {
        status: 500,
        message: format!("Failed to parse response: {}", e),
    })
}

/// Sends a request and parses the JSON body.
pub async fn fetch_json<T, F>(build: F) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    F: Fn() -> Request,
{
    let response = send_request(build).await?;
    parse_response(response).await
}

/// Serialize a payload to JSON string
pub fn serialize_json<T: serde::Serialize>(payload: &T) -> Result<String, ApiError> {
    serde_json::to_string(payload).map_err(|e| ApiError {
        status: 500,
        message: format!("Failed to serialize request: {}", e),
    })
}
