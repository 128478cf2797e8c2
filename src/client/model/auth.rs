use dioxus::prelude::*;

use crate::{client::model::error::ApiError, model::user::PublicUserDto};

#[derive(Clone, Copy)]
pub struct AuthContext {
    inner: Signal<AuthState>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self {
            inner: Signal::new(AuthState::Initializing),
        }
    }

    pub fn read(&self) -> impl std::ops::Deref<Target = AuthState> + '_ {
        self.inner.read()
    }

    pub fn set(&mut self, state: AuthState) {
        self.inner.set(state);
    }

    /// Stores the token from a login or registration and marks the user signed in.
    #[cfg(feature = "web")]
    pub fn sign_in(&mut self, token: &str, user: PublicUserDto) {
        crate::client::api::helper::store_token(token);
        self.inner.set(AuthState::Authenticated(user));
    }

    #[cfg(feature = "web")]
    pub fn sign_out(&mut self) {
        crate::client::api::helper::clear_token();
        crate::client::api::cache::clear();
        self.inner.set(AuthState::NotLoggedIn);
    }
}

#[derive(Clone)]
pub enum AuthState {
    /// Initial state - haven't checked the stored token yet
    Initializing,
    /// User is authenticated
    Authenticated(PublicUserDto),
    /// No token, or the token was rejected
    NotLoggedIn,
    /// Failed to check authentication
    Error(ApiError),
}

impl From<Option<PublicUserDto>> for AuthState {
    fn from(opt: Option<PublicUserDto>) -> Self {
        match opt {
            Some(user) => AuthState::Authenticated(user),
            None => AuthState::NotLoggedIn,
        }
    }
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|user| user.role == "admin")
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, AuthState::Initializing)
    }

    pub fn user(&self) -> Option<&PublicUserDto> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}
