use dioxus::prelude::*;

use crate::client::component::{Layout, RequiresAdmin, RequiresLoggedIn};
use crate::client::route::{
    admin::{AdminAudit, AdminUsers},
    Admin, Favorites, Home, Login, NotFound, Register, Settings,
};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
    #[route("/login")]
    Login {},

    #[route("/register")]
    Register {},

    #[layout(RequiresLoggedIn)]
    #[route("/")]
    Home {},

    #[route("/favorites")]
    Favorites {},

    #[route("/settings")]
    Settings {},
    #[end_layout]

    #[layout(RequiresAdmin)]
    #[nest("/admin")]
        #[route("/")]
        Admin {},

        #[route("/users")]
        AdminUsers {},

        #[route("/audit")]
        AdminAudit {},
    #[end_nest]
    #[end_layout]
    #[end_layout]

    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}
