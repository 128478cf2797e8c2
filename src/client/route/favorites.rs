use dioxus::prelude::*;

use crate::{
    client::{
        component::{weather::CurrentWeatherCard, ErrorPage, LoadingPage, Page},
        constant::SITE_NAME,
        model::{auth::AuthContext, cache::Cache},
    },
    model::{user::FavoriteCityDto, weather::CurrentWeatherResponseDto},
};

#[cfg(feature = "web")]
use crate::client::api::{
    user::{get_favorites, remove_favorite},
    weather::get_current,
};

#[component]
pub fn Favorites() -> Element {
    let auth = use_context::<AuthContext>();
    let units = match auth.read().user().map(|u| u.preferences.temperature_unit.clone()) {
        Some(unit) if unit == "fahrenheit" => "imperial",
        _ => "metric",
    };

    #[allow(unused_mut)]
    let mut favorites = use_signal(Cache::<Vec<FavoriteCityDto>>::default);
    #[allow(unused_mut)]
    let mut preview = use_signal(|| None::<CurrentWeatherResponseDto>);
    #[allow(unused_mut)]
    let mut error = use_signal(|| None::<String>);

    #[cfg(feature = "web")]
    use_future(move || async move {
        favorites.set(Cache::Loading);
        favorites.set(get_favorites().await.map(|r| r.favorites).into());
    });

    let state = favorites.read().clone();
    let list = match state {
        Cache::Fetched(list) => list,
        Cache::Error(err) => {
            return rsx! { ErrorPage { status: err.status, message: err.message } };
        }
        Cache::NotFetched | Cache::Loading => return rsx! { LoadingPage {} },
    };

    rsx! {
        Title { "Favorites | {SITE_NAME}" }
        Page {
            class: "flex flex-col items-center",
            div {
                class: "w-full max-w-4xl flex flex-col gap-4",
                h1 { class: "text-2xl", "Favorite cities" }
                if let Some(message) = error() {
                    div { class: "alert alert-error", "{message}" }
                }
                if list.is_empty() {
                    p { class: "opacity-60 py-8 text-center", "No favorites yet. Search for a city on the home page to add one." }
                }
                div {
                    class: "grid grid-cols-1 md:grid-cols-2 gap-3",
                    for city in list {
                        div {
                            key: "{city.id}",
                            class: "card bg-base-200",
                            div {
                                class: "card-body flex-row items-center justify-between p-4",
                                div {
                                    p { class: "font-semibold", "{city.name}, {city.country}" }
                                    p { class: "text-xs opacity-60", "{city.lat:.2}, {city.lon:.2}" }
                                }
                                div {
                                    class: "flex gap-2",
                                    button {
                                        class: "btn btn-sm",
                                        onclick: {
                                            #[allow(unused_variables)]
                                            let (lat, lon) = (city.lat, city.lon);
                                            move |_| {
                                                #[cfg(feature = "web")]
                                                spawn(async move {
                                                    match get_current(lat, lon, units).await {
                                                        Ok(data) => preview.set(Some(data)),
                                                        Err(e) => error.set(Some(e.message)),
                                                    }
                                                });
                                            }
                                        },
                                        "Weather"
                                    }
                                    button {
                                        class: "btn btn-sm btn-error btn-outline",
                                        onclick: {
                                            #[allow(unused_variables)]
                                            let id = city.id;
                                            move |_| {
                                                #[cfg(feature = "web")]
                                                spawn(async move {
                                                    match remove_favorite(id).await {
                                                        Ok(r) => favorites.set(Cache::Fetched(r.favorites)),
                                                        Err(e) => error.set(Some(e.message)),
                                                    }
                                                });
                                            }
                                        },
                                        "Remove"
                                    }
                                }
                            }
                        }
                    }
                }
                if let Some(data) = preview() {
                    CurrentWeatherCard { data, units: units.to_string() }
                }
            }
        }
    }
}
