use dioxus::prelude::*;
use dioxus_free_icons::{icons::fa_solid_icons::FaCloudSun, Icon};

use crate::client::{constant::SITE_NAME, model::auth::AuthContext, router::Route};

#[component]
pub fn Header() -> Element {
    #[allow(unused_mut)]
    let mut auth = use_context::<AuthContext>();
    let nav = navigator();

    let settled = auth.read().is_settled();
    let logged_in = auth.read().is_authenticated();
    let is_admin = auth.read().is_admin();
    let username = auth
        .read()
        .user()
        .map(|u| u.username.clone())
        .unwrap_or_default();

    rsx!(div {
        class: "fixed flex justify-between gap-4 w-full h-20 py-2 px-4 bg-base-200 z-20",
        Link {
            to: Route::Home {},
            div {
                class: "flex items-center gap-3 h-full",
                Icon { width: 32, height: 32, icon: FaCloudSun }
                p { class: "md:text-xl", {SITE_NAME} }
            }
        }
        div {
            class: "flex items-center gap-2",
            if settled && logged_in {
                Link { to: Route::Favorites {}, class: "btn btn-ghost", "Favorites" }
                Link { to: Route::Settings {}, class: "btn btn-ghost", "Settings" }
                if is_admin {
                    Link { to: Route::Admin {}, class: "btn btn-outline", "Admin" }
                }
                span { class: "hidden md:inline opacity-70", "{username}" }
                button {
                    class: "btn btn-outline",
                    onclick: move |_| {
                        #[cfg(feature = "web")]
                        auth.sign_out();
                        nav.push(Route::Login {});
                    },
                    "Logout"
                }
            } else if settled {
                Link { to: Route::Login {}, class: "btn btn-outline", "Login" }
                Link { to: Route::Register {}, class: "btn btn-primary", "Register" }
            }
        }
    })
}
