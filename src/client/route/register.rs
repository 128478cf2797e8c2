use dioxus::prelude::*;

use crate::client::{
    component::{LoadingPage, Page},
    constant::SITE_NAME,
    model::auth::AuthContext,
    router::Route,
};

#[cfg(feature = "web")]
use crate::{
    client::api::{auth::register, cccd::extract_cccd},
    model::auth::RegisterDto,
};

/// Optional field: blank input becomes `None`.
#[cfg(feature = "web")]
fn optional(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

#[component]
fn TextField(label: &'static str, value: Signal<String>, kind: Option<&'static str>) -> Element {
    let mut value = value;

    rsx! {
        label {
            class: "form-control w-full",
            span { class: "label-text mb-1", "{label}" }
            input {
                r#type: kind.unwrap_or("text"),
                class: "input input-bordered w-full",
                value: "{value}",
                oninput: move |evt| value.set(evt.value()),
            }
        }
    }
}

#[component]
pub fn Register() -> Element {
    #[allow(unused_mut)]
    let mut auth = use_context::<AuthContext>();
    let nav = navigator();

    #[allow(unused_mut)]
    let mut username = use_signal(String::new);
    let email = use_signal(String::new);
    let password = use_signal(String::new);
    #[allow(unused_mut)]
    let mut full_name = use_signal(String::new);
    #[allow(unused_mut)]
    let mut cccd = use_signal(String::new);
    #[allow(unused_mut)]
    let mut date_of_birth = use_signal(String::new);
    let mut gender = use_signal(String::new);
    #[allow(unused_mut)]
    let mut address = use_signal(String::new);

    #[allow(unused_mut)]
    let mut error = use_signal(|| None::<String>);
    #[allow(unused_mut)]
    let mut notice = use_signal(|| None::<String>);
    #[allow(unused_mut)]
    let mut scanning = use_signal(|| false);
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

    #[allow(unused_variables)]
    let on_scan = move |evt: FormEvent| {
        #[cfg(feature = "web")]
        spawn(async move {
            let Some(file) = evt.files().into_iter().next() else {
                return;
            };
            scanning.set(true);
            error.set(None);
            notice.set(None);

            let bytes = match file.read_bytes().await {
                Ok(bytes) => bytes,
                Err(e) => {
                    error.set(Some(format!("Could not read the image: {e}")));
                    scanning.set(false);
                    return;
                }
            };

            match extract_cccd(&file.name(), &bytes).await {
                Ok(response) => {
                    let data = response.extracted;
                    if let Some(value) = data.so_cccd {
                        cccd.set(value);
                    }
                    if let Some(value) = data.ho_va_ten {
                        full_name.set(value);
                    }
                    if let Some(value) = data.ngay_sinh {
                        date_of_birth.set(value);
                    }
                    if let Some(value) = data.gioi_tinh {
                        gender.set(value);
                    }
                    if let Some(value) = data.noi_thuong_tru {
                        address.set(value);
                    }
                    notice.set(Some(if response.exists {
                        "This CCCD is already registered. You can log in with it.".to_string()
                    } else {
                        "Card details filled in. Check them before registering.".to_string()
                    }));
                }
                Err(e) => error.set(Some(e.message)),
            }
            scanning.set(false);
        });
    };

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        #[cfg(feature = "web")]
        spawn(async move {
            submitting.set(true);
            error.set(None);

            let payload = RegisterDto {
                username: optional(username()),
                email: email().trim().to_string(),
                password: password(),
                cccd: optional(cccd()),
                name: None,
                full_name: optional(full_name()),
                date_of_birth: optional(date_of_birth()),
                gender: optional(gender()),
                address: optional(address()),
            };

            match register(&payload).await {
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
        Title { "Register | {SITE_NAME}" }
        Page {
            class: "flex flex-col items-center",
            div {
                class: "card bg-base-200 w-full max-w-xl",
                div {
                    class: "card-body gap-4",
                    h1 { class: "card-title text-2xl", "Create an account" }
                    label {
                        class: "form-control w-full",
                        span { class: "label-text mb-1", "Fill in from a CCCD photo" }
                        input {
                            r#type: "file",
                            accept: "image/*",
                            class: "file-input file-input-bordered w-full",
                            disabled: scanning(),
                            onchange: on_scan,
                        }
                    }
                    if scanning() {
                        div { class: "flex items-center gap-2 text-sm",
                            span { class: "loading loading-spinner loading-sm" }
                            "Reading card..."
                        }
                    }
                    if let Some(message) = notice() {
                        div { class: "alert alert-info text-sm", "{message}" }
                    }
                    form {
                        class: "grid grid-cols-1 md:grid-cols-2 gap-3",
                        onsubmit: on_submit,
                        TextField { label: "Username", value: username }
                        TextField { label: "Email", value: email, kind: "email" }
                        TextField { label: "Password", value: password, kind: "password" }
                        TextField { label: "Full name", value: full_name }
                        TextField { label: "CCCD number", value: cccd }
                        TextField { label: "Date of birth (DD/MM/YYYY)", value: date_of_birth }
                        label {
                            class: "form-control w-full",
                            span { class: "label-text mb-1", "Gender" }
                            select {
                                class: "select select-bordered w-full",
                                value: "{gender}",
                                onchange: move |evt| gender.set(evt.value()),
                                option { value: "", "-" }
                                option { value: "Nam", "Nam" }
                                option { value: "Nữ", "Nữ" }
                                option { value: "Khác", "Khác" }
                            }
                        }
                        TextField { label: "Address", value: address }
                        if let Some(message) = error() {
                            div { class: "alert alert-error text-sm md:col-span-2", "{message}" }
                        }
                        button {
                            r#type: "submit",
                            class: "btn btn-primary md:col-span-2",
                            disabled: submitting(),
                            "Register"
                        }
                    }
                    p {
                        class: "text-sm text-center",
                        "Already registered? "
                        Link { to: Route::Login {}, class: "link link-primary", "Login" }
                    }
                }
            }
        }
    }
}
