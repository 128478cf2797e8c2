use dioxus::prelude::*;

use crate::{
    client::{component::Page, constant::SITE_NAME, model::auth::AuthContext},
    model::discord::DiscordStatusDto,
};

#[cfg(feature = "web")]
use crate::{
    client::{
        api::{
            discord::{connect, get_status, subscribe, unsubscribe, update_city},
            user::{clear_search_history, update_preferences},
            weather::search_cities,
        },
        model::auth::AuthState,
    },
    model::{
        discord::{ConnectDiscordDto, SubscribeDto, UpdateCityDto},
        user::UpdatePreferencesDto,
    },
};

#[cfg(feature = "web")]
fn optional(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

#[component]
pub fn Settings() -> Element {
    rsx! {
        Title { "Settings | {SITE_NAME}" }
        Page {
            class: "flex flex-col items-center",
            div {
                class: "w-full max-w-2xl flex flex-col gap-6",
                h1 { class: "text-2xl", "Settings" }
                PreferencesCard {}
                DiscordCard {}
                HistoryCard {}
            }
        }
    }
}

#[component]
fn PreferencesCard() -> Element {
    #[allow(unused_mut)]
    let mut auth = use_context::<AuthContext>();
    let (initial_unit, initial_language) = auth
        .read()
        .user()
        .map(|u| (u.preferences.temperature_unit.clone(), u.preferences.language.clone()))
        .unwrap_or_else(|| ("celsius".to_string(), "en".to_string()));

    let mut unit = use_signal(|| initial_unit);
    let mut language = use_signal(|| initial_language);
    #[allow(unused_mut)]
    let mut status = use_signal(|| None::<Result<String, String>>);

    let on_save = move |evt: FormEvent| {
        evt.prevent_default();
        #[cfg(feature = "web")]
        spawn(async move {
            let payload = UpdatePreferencesDto {
                temperature_unit: Some(unit()),
                language: Some(language()),
            };
            match update_preferences(&payload).await {
                Ok(response) => {
                    let updated = auth.read().user().cloned().map(|mut user| {
                        user.preferences = response.preferences.clone();
                        user
                    });
                    if let Some(user) = updated {
                        auth.set(AuthState::Authenticated(user));
                    }
                    crate::client::api::cache::clear();
                    status.set(Some(Ok(response.message)));
                }
                Err(e) => status.set(Some(Err(e.message))),
            }
        });
    };

    rsx! {
        div {
            class: "card bg-base-200",
            form {
                class: "card-body gap-3",
                onsubmit: on_save,
                h2 { class: "card-title", "Preferences" }
                label {
                    class: "form-control",
                    span { class: "label-text mb-1", "Temperature unit" }
                    select {
                        class: "select select-bordered",
                        value: "{unit}",
                        onchange: move |evt| unit.set(evt.value()),
                        option { value: "celsius", "Celsius" }
                        option { value: "fahrenheit", "Fahrenheit" }
                    }
                }
                label {
                    class: "form-control",
                    span { class: "label-text mb-1", "Language" }
                    select {
                        class: "select select-bordered",
                        value: "{language}",
                        onchange: move |evt| language.set(evt.value()),
                        option { value: "en", "English" }
                        option { value: "vi", "Tiếng Việt" }
                    }
                }
                StatusLine { status: status() }
                button { r#type: "submit", class: "btn btn-primary", "Save" }
            }
        }
    }
}

#[component]
fn StatusLine(status: Option<Result<String, String>>) -> Element {
    match status {
        Some(Ok(message)) => rsx! { div { class: "alert alert-success text-sm", "{message}" } },
        Some(Err(message)) => rsx! { div { class: "alert alert-error text-sm", "{message}" } },
        None => rsx! {},
    }
}

#[component]
fn DiscordCard() -> Element {
    #[allow(unused_mut)]
    let mut link = use_signal(|| None::<DiscordStatusDto>);
    #[allow(unused_mut)]
    let mut status = use_signal(|| None::<Result<String, String>>);
    #[allow(unused_mut)]
    let mut refresh = use_signal(|| 0u32);

    let mut discord_user_id = use_signal(String::new);
    let mut channel_id = use_signal(String::new);
    let mut city = use_signal(String::new);
    let mut notification_time = use_signal(String::new);

    #[cfg(feature = "web")]
    let fetched = use_resource(move || async move {
        let _ = refresh();
        get_status().await
    });

    #[cfg(feature = "web")]
    use_effect(move || match &*fetched.read_unchecked() {
        Some(Ok(response)) => {
            if let Some(current) = &response.discord.notification_city {
                city.set(current.clone());
            }
            if let Some(time) = &response.discord.notification_time {
                notification_time.set(time.clone());
            }
            link.set(Some(response.discord.clone()));
        }
        Some(Err(e)) => status.set(Some(Err(e.message.clone()))),
        None => {}
    });

    let on_connect = move |evt: FormEvent| {
        evt.prevent_default();
        #[cfg(feature = "web")]
        spawn(async move {
            let payload = ConnectDiscordDto {
                discord_user_id: discord_user_id(),
                channel_id: channel_id(),
            };
            match connect(&payload).await {
                Ok(response) => {
                    status.set(Some(Ok(response.message)));
                    refresh.set(refresh() + 1);
                }
                Err(e) => status.set(Some(Err(e.message))),
            }
        });
    };

    let on_subscribe = move |evt: FormEvent| {
        evt.prevent_default();
        #[cfg(feature = "web")]
        spawn(async move {
            let subscribed = link().is_some_and(|l| l.subscribed);
            let result = if subscribed {
                update_city(&UpdateCityDto {
                    city: city(),
                    notification_time: optional(notification_time()),
                })
                .await
            } else {
                // The subscription needs coordinates; resolve the city first.
                match search_cities(&city()).await {
                    Ok(found) => match found.results.first() {
                        Some(place) => {
                            subscribe(&SubscribeDto {
                                city: city(),
                                lat: Some(place.lat),
                                lon: Some(place.lon),
                                notification_time: optional(notification_time()),
                            })
                            .await
                        }
                        None => {
                            status.set(Some(Err(format!("City \"{}\" not found", city()))));
                            return;
                        }
                    },
                    Err(e) => Err(e),
                }
            };
            match result {
                Ok(response) => {
                    status.set(Some(Ok(response.message)));
                    refresh.set(refresh() + 1);
                }
                Err(e) => status.set(Some(Err(e.message))),
            }
        });
    };

    let on_unsubscribe = move |_| {
        #[cfg(feature = "web")]
        spawn(async move {
            match unsubscribe().await {
                Ok(response) => {
                    status.set(Some(Ok(response.message)));
                    refresh.set(refresh() + 1);
                }
                Err(e) => status.set(Some(Err(e.message))),
            }
        });
    };

    let current = link();
    let connected = current.as_ref().is_some_and(|l| l.connected);
    let subscribed = current.as_ref().is_some_and(|l| l.subscribed);

    rsx! {
        div {
            class: "card bg-base-200",
            div {
                class: "card-body gap-3",
                h2 { class: "card-title", "Discord notifications" }
                if let Some(l) = &current {
                    p {
                        class: "text-sm",
                        if l.connected { "Discord account linked. " } else { "No Discord account linked. " }
                        if l.subscribed {
                            "Notifications for {l.notification_city.clone().unwrap_or_default()}"
                            match &l.notification_time {
                                Some(time) => rsx! { " daily at {time}." },
                                None => rsx! { " every hour." },
                            }
                        }
                    }
                }
                form {
                    class: "flex flex-col gap-2",
                    onsubmit: on_connect,
                    input {
                        class: "input input-bordered",
                        placeholder: "Discord user ID",
                        value: "{discord_user_id}",
                        oninput: move |evt| discord_user_id.set(evt.value()),
                    }
                    input {
                        class: "input input-bordered",
                        placeholder: "Channel ID",
                        value: "{channel_id}",
                        oninput: move |evt| channel_id.set(evt.value()),
                    }
                    button {
                        r#type: "submit",
                        class: "btn btn-outline",
                        if connected { "Relink Discord" } else { "Link Discord" }
                    }
                }
                if connected {
                    form {
                        class: "flex flex-col gap-2",
                        onsubmit: on_subscribe,
                        input {
                            class: "input input-bordered",
                            placeholder: "City",
                            value: "{city}",
                            oninput: move |evt| city.set(evt.value()),
                        }
                        input {
                            r#type: "time",
                            class: "input input-bordered",
                            value: "{notification_time}",
                            oninput: move |evt| notification_time.set(evt.value()),
                        }
                        span { class: "text-xs opacity-60", "Leave the time empty for hourly updates." }
                        div {
                            class: "flex gap-2",
                            button {
                                r#type: "submit",
                                class: "btn btn-primary",
                                if subscribed { "Update city" } else { "Subscribe" }
                            }
                            if subscribed {
                                button {
                                    r#type: "button",
                                    class: "btn btn-error btn-outline",
                                    onclick: on_unsubscribe,
                                    "Unsubscribe"
                                }
                            }
                        }
                    }
                }
                StatusLine { status: status() }
            }
        }
    }
}

#[component]
fn HistoryCard() -> Element {
    #[allow(unused_mut)]
    let mut status = use_signal(|| None::<Result<String, String>>);

    let on_clear = move |_| {
        #[cfg(feature = "web")]
        spawn(async move {
            match clear_search_history().await {
                Ok(response) => status.set(Some(Ok(response.message))),
                Err(e) => status.set(Some(Err(e.message))),
            }
        });
    };

    rsx! {
        div {
            class: "card bg-base-200",
            div {
                class: "card-body gap-3",
                h2 { class: "card-title", "Search history" }
                StatusLine { status: status() }
                button { class: "btn btn-outline", onclick: on_clear, "Clear search history" }
            }
        }
    }
}
