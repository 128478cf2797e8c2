use dioxus::prelude::*;

use crate::client::{constant::SITE_NAME, model::auth::AuthContext, router::Route};

#[cfg(feature = "web")]
use crate::client::{api::auth::get_user, model::auth::AuthState};

const MAIN_CSS: Asset = asset!("/assets/main.css");

#[component]
pub fn App() -> Element {
    #[allow(unused_mut)]
    let mut auth = use_context_provider(AuthContext::new);

    // Resolve the stored token on first load
    #[cfg(feature = "web")]
    {
        let user = use_resource(get_user);
        use_effect(move || {
            if let Some(result) = &*user.read_unchecked() {
                auth.set(match result {
                    Ok(user) => AuthState::from(user.clone()),
                    Err(e) => AuthState::Error(e.clone()),
                });
            }
        });
    }

    rsx! {
        Title { "{SITE_NAME}" }
        document::Meta {
            name: "description",
            content: "Current weather, forecasts and Discord weather notifications"
        }
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        Router::<Route> {}
    }
}
