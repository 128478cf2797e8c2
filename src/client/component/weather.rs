use dioxus::prelude::*;

use crate::model::weather::{CurrentWeatherResponseDto, DailyForecastDto};

/// `°C`, `°F` or `K` for an OpenWeatherMap units value.
pub fn unit_symbol(units: &str) -> &'static str {
    match units {
        "imperial" => "°F",
        "standard" => "K",
        _ => "°C",
    }
}

/// Wind speed unit for an OpenWeatherMap units value.
pub fn speed_unit(units: &str) -> &'static str {
    if units == "imperial" {
        "mph"
    } else {
        "m/s"
    }
}

fn icon_url(icon: &str) -> String {
    format!("https://openweathermap.org/img/wn/{icon}@2x.png")
}

#[component]
pub fn CurrentWeatherCard(data: CurrentWeatherResponseDto, units: String) -> Element {
    let symbol = unit_symbol(&units);
    let speed = speed_unit(&units);
    let current = &data.current;
    let sunrise = current.sunrise.format("%H:%M UTC").to_string();
    let sunset = current.sunset.format("%H:%M UTC").to_string();

    rsx!(div {
        class: "card bg-base-200",
        div {
            class: "card-body",
            div {
                class: "flex items-center justify-between",
                div {
                    h2 { class: "card-title text-2xl", "{data.location.name}, {data.location.country}" }
                    p { class: "capitalize opacity-70", "{current.weather.description}" }
                }
                img { width: 80, height: 80, src: icon_url(&current.weather.icon) }
            }
            p { class: "text-5xl font-bold", "{current.temperature}{symbol}" }
            div {
                class: "grid grid-cols-2 md:grid-cols-4 gap-2 mt-2 text-sm",
                span { "Feels like {current.feels_like}{symbol}" }
                span { "Humidity {current.humidity}%" }
                span { "Wind {current.wind.speed} {speed}" }
                span { "Pressure {current.pressure} hPa" }
                span { "Visibility {current.visibility} km" }
                span { "UV {current.uv_index}" }
                span { "Sunrise {sunrise}" }
                span { "Sunset {sunset}" }
            }
        }
    })
}

#[component]
pub fn ForecastList(days: Vec<DailyForecastDto>, units: String) -> Element {
    let symbol = unit_symbol(&units);

    rsx!(div {
        class: "grid grid-cols-2 md:grid-cols-5 gap-2",
        for day in days {
            div {
                key: "{day.date}",
                class: "card bg-base-200 p-3 items-center text-center",
                p { class: "font-semibold", {day.date.format("%a %d/%m").to_string()} }
                img { width: 48, height: 48, src: icon_url(&day.weather.icon) }
                p { "{day.temperature.min}{symbol} / {day.temperature.max}{symbol}" }
                p { class: "text-xs capitalize opacity-70", "{day.weather.description}" }
            }
        }
    })
}
