use reqwasm::http::Request;
use web_sys::{js_sys, Blob, FormData};

use crate::{
    client::{api::helper::fetch_json, model::error::ApiError},
    model::cccd::CccdExtractResponseDto,
};

fn js_error(err: web_sys::wasm_bindgen::JsValue) -> ApiError {
    ApiError {
        status: 0,
        message: format!("Failed to prepare upload: {:?}", err),
    }
}

/// Uploads a card image and returns the fields read from it.
pub async fn extract_cccd(
    filename: &str,
    bytes: &[u8],
) -> Result<CccdExtractResponseDto, ApiError> {
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let blob = Blob::new_with_u8_array_sequence(&parts).map_err(js_error)?;
    let form = FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename("cccdImage", &blob, filename)
        .map_err(js_error)?;

    fetch_json(|| Request::post("/api/cccd/register").body(form.clone())).await
}
