use dioxus::prelude::*;

use crate::client::{
    component::{LoadingPage, Page},
    constant::SITE_NAME,
    model::auth::AuthContext,
    router::Route,
};

#[cfg(feature = "web")]
use crate::{
    client::api::auth::{login, login_cccd},
    model::auth::{CccdLoginDto, LoginDto},
};

#[derive(Clone, Copy, PartialEq)]
enum LoginMethod {
    Email,
    Cccd,
}

#[component]
pub fn Login() -> Element {
    #[allow(unused_mut)]
    let mut auth = use_context::<AuthContext>();
    let nav = navigator();

    let mut method = use_signal(|| LoginMethod::Email);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut so_cccd = use_signal(String::new);
    #[allow(unused_mut)]
    let mut error = use_signal(|| None::<String>);
    #[allow(unused_mut)]
    let mut submitting = use_signal(|| false);

    use_effect(move || {
        if auth.read().is_authenticated() {
            nav.push(Route::Home {});
        }
    });

    if !auth.read().is_settled() || auth.read().is_authenticated() {
        return rsx! { LoadingPage {} };
    }

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        #[cfg(feature = "web")]
        spawn(async move {
            submitting.set(true);
            error.set(None);

            let result = match method() {
                LoginMethod::Email => {
                    login(&LoginDto {
                        email: email(),
                        password: password(),
                    })
                    .await
                }
                LoginMethod::Cccd => login_cccd(&CccdLoginDto { so_cccd: so_cccd() }).await,
            };

            match result {
                Ok(response) => {
                    auth.sign_in(&response.token, response.user);
                    nav.push(Route::Home {});
                }
                Err(e) => error.set(Some(e.message)),
            }
            submitting.set(false);
        });
    };

    rsx! {
        Title { "Login | {SITE_NAME}" }
        Page {
            class: "flex flex-col items-center justify-center",
            div {
                class: "card bg-base-200 w-full max-w-md",
                div {
                    class: "card-body gap-4",
                    h1 { class: "card-title text-2xl", "Sign in" }
                    div {
                        role: "tablist",
                        class: "tabs tabs-boxed",
                        a {
                            role: "tab",
                            class: if method() == LoginMethod::Email { "tab tab-active" } else { "tab" },
                            onclick: move |_| method.set(LoginMethod::Email),
                            "Email"
                        }
                        a {
                            role: "tab",
                            class: if method() == LoginMethod::Cccd { "tab tab-active" } else { "tab" },
                            onclick: move |_| method.set(LoginMethod::Cccd),
                            "CCCD"
                        }
                    }
                    form {
                        class: "flex flex-col gap-3",
                        onsubmit: on_submit,
                        if method() == LoginMethod::Email {
                            input {
                                r#type: "email",
                                class: "input input-bordered",
                                placeholder: "Email",
                                value: "{email}",
                                oninput: move |evt| email.set(evt.value()),
                            }
                            input {
                                r#type: "password",
                                class: "input input-bordered",
                                placeholder: "Password",
                                value: "{password}",
                                oninput: move |evt| password.set(evt.value()),
                            }
                        } else {
                            input {
                                class: "input input-bordered",
                                placeholder: "Số CCCD (12 digits)",
                                inputmode: "numeric",
                                value: "{so_cccd}",
                                oninput: move |evt| so_cccd.set(evt.value()),
                            }
                        }
                        if let Some(message) = error() {
                            div { class: "alert alert-error text-sm", "{message}" }
                        }
                        button {
                            r#type: "submit",
                            class: "btn btn-primary",
                            disabled: submitting(),
                            if submitting() {
                                span { class: "loading loading-spinner loading-sm" }
                            }
                            "Login"
                        }
                    }
                    p {
                        class: "text-sm text-center",
                        "No account? "
                        Link { to: Route::Register {}, class: "link link-primary", "Register" }
                    }
                }
            }
        }
    }
}
