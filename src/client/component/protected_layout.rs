use dioxus::prelude::*;

use crate::client::{
    component::page::{ErrorPage, LoadingPage},
    model::auth::AuthContext,
    router::Route,
};

#[derive(PartialEq, Clone)]
pub enum Permission {
    LoggedIn,
    Admin,
}

#[component]
pub fn RequiresLoggedIn() -> Element {
    rsx! {
        ProtectedLayout { permissions: vec![Permission::LoggedIn] }
    }
}

#[component]
pub fn RequiresAdmin() -> Element {
    rsx! {
        ProtectedLayout { permissions: vec![Permission::Admin] }
    }
}

#[component]
pub fn ProtectedLayout(permissions: Vec<Permission>) -> Element {
    let auth = use_context::<AuthContext>();
    let nav = navigator();

    let settled = auth.read().is_settled();
    let logged_in = auth.read().is_authenticated();
    let allowed = permissions.iter().all(|perm| match perm {
        Permission::LoggedIn => logged_in,
        Permission::Admin => auth.read().is_admin(),
    });

    use_effect(use_reactive!(|(logged_in, settled)| {
        if settled && !logged_in {
            nav.push(Route::Login {});
        }
    }));

    rsx! {
        if !settled {
            LoadingPage {}
        } else if logged_in && !allowed {
            ErrorPage { status: 403, message: "You don't have permission to view this page" }
        } else if allowed {
            Outlet::<Route> {}
        }
    }
}
