use dioxus::prelude::*;

use crate::{
    client::{
        component::{
            weather::{CurrentWeatherCard, ForecastList},
            Page,
        },
        constant::SITE_NAME,
        model::auth::AuthContext,
    },
    model::{
        user::SearchHistoryEntryDto,
        weather::{CitySearchResultDto, CurrentWeatherResponseDto, ForecastResponseDto},
    },
};

#[cfg(feature = "web")]
use crate::{
    client::api::{
        user::{add_favorite, add_search_history, get_search_history, update_last_location},
        weather::{get_current, get_forecast, search_cities},
    },
    model::user::{AddFavoriteDto, AddSearchHistoryDto, UpdateLastLocationDto},
};

/// OpenWeatherMap `units` for a stored temperature preference.
fn units_for(temperature_unit: &str) -> &'static str {
    match temperature_unit {
        "fahrenheit" => "imperial",
        _ => "metric",
    }
}

#[derive(Clone, PartialEq)]
struct Selected {
    place: CitySearchResultDto,
    current: CurrentWeatherResponseDto,
    forecast: ForecastResponseDto,
}

#[component]
pub fn Home() -> Element {
    let auth = use_context::<AuthContext>();
    let units = auth
        .read()
        .user()
        .map(|u| units_for(&u.preferences.temperature_unit))
        .unwrap_or("metric")
        .to_string();

    let mut query = use_signal(String::new);
    #[allow(unused_mut)]
    let mut results = use_signal(Vec::<CitySearchResultDto>::new);
    #[allow(unused_mut)]
    let mut selected = use_signal(|| None::<Selected>);
    #[allow(unused_mut)]
    let mut error = use_signal(|| None::<String>);
    #[allow(unused_mut)]
    let mut notice = use_signal(|| None::<String>);
    #[allow(unused_mut)]
    let mut loading = use_signal(|| false);
    #[allow(unused_mut)]
    let mut history_version = use_signal(|| 0u32);

    #[cfg(feature = "web")]
    let history = use_resource(move || async move {
        let _ = history_version();
        get_search_history().await
    });

    #[allow(unused_variables)]
    let units_for_select = units.clone();
    #[allow(unused_variables)]
    let select = move |place: CitySearchResultDto| {
        #[cfg(feature = "web")]
        {
            let units = units_for_select.clone();
            spawn(async move {
                loading.set(true);
                error.set(None);
                notice.set(None);
                results.set(Vec::new());

                let (current, forecast) = (
                    get_current(place.lat, place.lon, &units).await,
                    get_forecast(place.lat, place.lon, &units).await,
                );

                match (current, forecast) {
                    (Ok(current), Ok(forecast)) => {
                        let country = place.country.clone().unwrap_or_default();
                        let search = AddSearchHistoryDto {
                            city: place.name.clone(),
                            country: country.clone(),
                        };
                        let location = UpdateLastLocationDto {
                            lat: Some(place.lat),
                            lon: Some(place.lon),
                            city: place.name.clone(),
                            country,
                        };
                        if add_search_history(&search).await.is_ok() {
                            history_version.set(history_version() + 1);
                        }
                        let _ = update_last_location(&location).await;

                        selected.set(Some(Selected {
                            place,
                            current,
                            forecast,
                        }));
                    }
                    (Err(e), _) | (_, Err(e)) => error.set(Some(e.message)),
                }
                loading.set(false);
            });
        }
    };

    let on_search = move |evt: FormEvent| {
        evt.prevent_default();
        #[cfg(feature = "web")]
        spawn(async move {
            let q = query();
            if q.trim().is_empty() {
                return;
            }
            error.set(None);
            match search_cities(&q).await {
                Ok(found) if found.results.is_empty() => {
                    results.set(Vec::new());
                    error.set(Some(format!("No cities found for \"{}\"", q.trim())));
                }
                Ok(found) => results.set(found.results),
                Err(e) => error.set(Some(e.message)),
            }
        });
    };

    let on_favorite = move |_| {
        #[cfg(feature = "web")]
        spawn(async move {
            let Some(current) = selected() else {
                return;
            };
            let payload = AddFavoriteDto {
                name: current.place.name.clone(),
                country: current.place.country.clone().unwrap_or_default(),
                lat: Some(current.place.lat),
                lon: Some(current.place.lon),
            };
            match add_favorite(&payload).await {
                Ok(response) => notice.set(response.message),
                Err(e) => error.set(Some(e.message)),
            }
        });
    };

    #[cfg(feature = "web")]
    let recent = history
        .read()
        .as_ref()
        .and_then(|r| r.as_ref().ok())
        .map(|h| h.search_history.clone())
        .unwrap_or_default();
    #[cfg(not(feature = "web"))]
    let recent = Vec::new();

    rsx! {
        Title { "{SITE_NAME}" }
        Page {
            class: "flex flex-col items-center",
            div {
                class: "w-full max-w-4xl flex flex-col gap-4",
                form {
                    class: "join w-full",
                    onsubmit: on_search,
                    input {
                        class: "input input-bordered join-item w-full",
                        placeholder: "Search for a city",
                        value: "{query}",
                        oninput: move |evt| query.set(evt.value()),
                    }
                    button { r#type: "submit", class: "btn btn-primary join-item", "Search" }
                }
                if !results().is_empty() {
                    ul {
                        class: "menu bg-base-200 rounded-box weather-search-results",
                        for place in results() {
                            li {
                                key: "{place.lat},{place.lon}",
                                a {
                                    onclick: {
                                        let place = place.clone();
                                        let mut select = select.clone();
                                        move |_| select(place.clone())
                                    },
                                    "{place.name}"
                                    if let Some(state) = &place.state {
                                        ", {state}"
                                    }
                                    if let Some(country) = &place.country {
                                        span { class: "badge badge-ghost", "{country}" }
                                    }
                                }
                            }
                        }
                    }
                }
                if let Some(message) = error() {
                    div { class: "alert alert-error", "{message}" }
                }
                if let Some(message) = notice() {
                    div { class: "alert alert-success", "{message}" }
                }
                if loading() {
                    div { class: "flex justify-center py-8",
                        span { class: "loading loading-spinner loading-lg" }
                    }
                } else if let Some(current) = selected() {
                    CurrentWeatherCard { data: current.current.clone(), units: units.clone() }
                    div {
                        class: "flex justify-end",
                        button { class: "btn btn-outline btn-sm", onclick: on_favorite, "★ Add to favorites" }
                    }
                    h3 { class: "text-lg font-semibold", "5-day forecast" }
                    ForecastList { days: current.forecast.daily.clone(), units: units.clone() }
                }
                RecentSearches {
                    entries: recent,
                    on_pick: move |city: String| query.set(city),
                }
            }
        }
    }
}

#[component]
fn RecentSearches(
    entries: Vec<SearchHistoryEntryDto>,
    on_pick: EventHandler<String>,
) -> Element {
    if entries.is_empty() {
        return rsx! {};
    }

    rsx! {
        div {
            class: "flex flex-wrap gap-2 items-center",
            span { class: "text-sm opacity-70", "Recent:" }
            for entry in entries {
                button {
                    key: "{entry.id}",
                    class: "btn btn-xs btn-ghost",
                    onclick: {
                        let city = entry.city.clone();
                        move |_| on_pick.call(city.clone())
                    },
                    "{entry.city}, {entry.country}"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_temperature_preference_to_units() {
        assert_eq!(units_for("celsius"), "metric");
        assert_eq!(units_for("fahrenheit"), "imperial");
        assert_eq!(units_for("anything"), "metric");
    }
}
