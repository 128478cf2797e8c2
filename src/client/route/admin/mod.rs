pub mod audit;
pub mod users;

use dioxus::prelude::*;

use crate::{
    client::{
        component::{ErrorPage, LoadingPage, Page},
        constant::SITE_NAME,
        model::cache::Cache,
        router::Route,
    },
    model::admin::{AdminStatsDto, MetricPointDto},
};

pub use audit::AdminAudit;
pub use users::AdminUsers;

#[cfg(feature = "web")]
use crate::client::api::admin::{get_metrics, get_stats};

#[derive(Clone, Copy, PartialEq)]
pub enum AdminTab {
    Dashboard,
    Users,
    Audit,
}

#[component]
pub fn AdminTabs(active_tab: AdminTab) -> Element {
    let tab_class = |tab: AdminTab| if tab == active_tab { "tab tab-active" } else { "tab" };

    rsx! {
        div {
            role: "tablist",
            class: "tabs tabs-boxed mb-6",
            Link { to: Route::Admin {}, class: tab_class(AdminTab::Dashboard), "Dashboard" }
            Link { to: Route::AdminUsers {}, class: tab_class(AdminTab::Users), "Users" }
            Link { to: Route::AdminAudit {}, class: tab_class(AdminTab::Audit), "Audit log" }
        }
    }
}

const METRICS: [(&str, &str); 4] = [
    ("api_events", "API requests"),
    ("searches", "Searches"),
    ("new_users", "New users"),
    ("discord_notifications", "Discord notifications"),
];

#[component]
pub fn Admin() -> Element {
    #[allow(unused_mut)]
    let mut stats = use_signal(Cache::<AdminStatsDto>::default);
    let mut metric = use_signal(|| "api_events".to_string());
    let mut days = use_signal(|| 7u32);

    #[cfg(feature = "web")]
    use_future(move || async move {
        stats.set(Cache::Loading);
        stats.set(get_stats().await.into());
    });

    #[cfg(feature = "web")]
    let series = use_resource(move || async move { get_metrics(&metric(), days()).await });

    #[cfg(feature = "web")]
    let points: Vec<MetricPointDto> = series
        .read()
        .as_ref()
        .and_then(|r| r.as_ref().ok())
        .map(|r| r.data.clone())
        .unwrap_or_default();
    #[cfg(not(feature = "web"))]
    let points: Vec<MetricPointDto> = Vec::new();

    let state = stats.read().clone();
    let data = match state {
        Cache::Fetched(data) => data,
        Cache::Error(err) => return rsx! { ErrorPage { status: err.status, message: err.message } },
        Cache::NotFetched | Cache::Loading => return rsx! { LoadingPage {} },
    };

    let cards = [
        ("Users", data.users_count),
        ("Banned", data.banned_count),
        ("Active (7d)", data.active7d),
        ("Events today", data.events_today),
        ("Total events", data.total_events),
        ("Discord linked", data.discord_connections),
        ("Discord subscribed", data.discord_subscribed),
    ];
    let peak = points.iter().map(|p| p.count).max().unwrap_or(0).max(1);

    rsx! {
        Title { "Admin | {SITE_NAME}" }
        Page {
            class: "flex flex-col items-center",
            div {
                class: "w-full max-w-6xl",
                h1 { class: "text-lg sm:text-2xl mb-6", "Admin Panel" }
                AdminTabs { active_tab: AdminTab::Dashboard }
                div {
                    class: "stats stats-vertical md:stats-horizontal shadow w-full flex-wrap",
                    for (label, value) in cards {
                        div {
                            key: "{label}",
                            class: "stat",
                            div { class: "stat-title", "{label}" }
                            div { class: "stat-value text-2xl", "{value}" }
                        }
                    }
                }
                div {
                    class: "grid grid-cols-1 md:grid-cols-3 gap-4 mt-6",
                    div {
                        class: "card bg-base-200 md:col-span-2",
                        div {
                            class: "card-body",
                            div {
                                class: "flex gap-2 items-center",
                                select {
                                    class: "select select-bordered select-sm",
                                    value: "{metric}",
                                    onchange: move |evt| metric.set(evt.value()),
                                    for (value, label) in METRICS {
                                        option { value, "{label}" }
                                    }
                                }
                                select {
                                    class: "select select-bordered select-sm",
                                    value: "{days}",
                                    onchange: move |evt| {
                                        if let Ok(value) = evt.value().parse() {
                                            days.set(value);
                                        }
                                    },
                                    option { value: "1", "24 hours" }
                                    option { value: "7", "7 days" }
                                    option { value: "30", "30 days" }
                                }
                            }
                            if points.is_empty() {
                                p { class: "opacity-60 py-6 text-center", "No data for this range" }
                            }
                            div {
                                class: "flex flex-col gap-1 mt-2",
                                for point in points.iter() {
                                    div {
                                        key: "{point.bucket}",
                                        class: "flex items-center gap-2 text-xs",
                                        span { class: "w-32 shrink-0 opacity-70", "{point.bucket}" }
                                        progress {
                                            class: "progress progress-primary w-full",
                                            value: "{point.count}",
                                            max: "{peak}",
                                        }
                                        span { class: "w-10 text-right", "{point.count}" }
                                    }
                                }
                            }
                        }
                    }
                    div {
                        class: "card bg-base-200",
                        div {
                            class: "card-body",
                            h2 { class: "card-title text-base", "Top searched cities" }
                            if data.top_cities.is_empty() {
                                p { class: "opacity-60", "No searches yet" }
                            }
                            ol {
                                class: "list-decimal list-inside",
                                for city in data.top_cities.iter() {
                                    li { key: "{city.query}", "{city.query} ({city.count})" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
