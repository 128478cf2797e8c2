use crate::{
    client::{
        api::helper::{fetch_json, get, post, send_request, serialize_json},
        model::error::ApiError,
    },
    model::auth::{AuthResponseDto, CccdLoginDto, LoginDto, MeResponseDto, RegisterDto},
    model::user::PublicUserDto,
};

pub async fn register(payload: &RegisterDto) -> Result<AuthResponseDto, ApiError> {
    let body = serialize_json(payload)?;
    fetch_json(|| post("/api/auth/register").body(body.clone())).await
}

pub async fn login(payload: &LoginDto) -> Result<AuthResponseDto, ApiError> {
    let body = serialize_json(payload)?;
    fetch_json(|| post("/api/auth/login").body(body.clone())).await
}

pub async fn login_cccd(payload: &CccdLoginDto) -> Result<AuthResponseDto, ApiError> {
    let body = serialize_json(payload)?;
    fetch_json(|| post("/api/auth/login/cccd").body(body.clone())).await
}

/// Current user for the stored token; `None` when there is no token or it was rejected.
pub async fn get_user() -> Result<Option<PublicUserDto>, ApiError> {
    if super::helper::stored_token().is_none() {
        return Ok(None);
    }

    match send_request(|| get("/api/auth/me")).await {
        Ok(response) => {
            let me: MeResponseDto = super::helper::parse_response(response).await?;
            Ok(Some(me.user))
        }
        Err(err) if err.status == 401 || err.status == 403 => {
            super::helper::clear_token();
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
