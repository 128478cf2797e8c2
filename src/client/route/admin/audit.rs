use dioxus::prelude::*;

use crate::{
    client::{
        component::{Page, Pager},
        constant::SITE_NAME,
        route::admin::{AdminTab, AdminTabs},
    },
    model::admin::AuditListDto,
};

#[cfg(feature = "web")]
use crate::client::api::admin::get_audit_log;

const PER_PAGE: u64 = 50;

#[component]
pub fn AdminAudit() -> Element {
    let page = use_signal(|| 1u64);

    #[cfg(feature = "web")]
    let audits = use_resource(move || async move { get_audit_log(page(), PER_PAGE).await });

    #[cfg(feature = "web")]
    let (list, error): (Option<AuditListDto>, Option<String>) = match &*audits.read() {
        Some(Ok(list)) => (Some(list.clone()), None),
        Some(Err(e)) => (None, Some(e.message.clone())),
        None => (None, None),
    };
    #[cfg(not(feature = "web"))]
    let (list, error): (Option<AuditListDto>, Option<String>) = (None, None);

    rsx! {
        Title { "Admin - Audit | {SITE_NAME}" }
        Page {
            class: "flex flex-col items-center",
            div {
                class: "w-full max-w-6xl",
                h1 { class: "text-lg sm:text-2xl mb-6", "Admin Panel" }
                AdminTabs { active_tab: AdminTab::Audit }
                if let Some(message) = error.as_ref() {
                    div { class: "alert alert-error", "{message}" }
                }
                if let Some(list) = list {
                    div {
                        class: "overflow-x-auto",
                        table {
                            class: "table table-zebra w-full",
                            thead {
                                tr {
                                    th { "Time" }
                                    th { "Admin" }
                                    th { "Action" }
                                    th { "Target" }
                                    th { "IP" }
                                }
                            }
                            tbody {
                                for entry in list.audits.iter() {
                                    tr {
                                        key: "{entry.id}",
                                        td { {entry.ts.format("%Y-%m-%d %H:%M").to_string()} }
                                        td {
                                            {entry.admin.as_ref().map(|a| a.username.clone()).unwrap_or_else(|| format!("#{}", entry.admin_id))}
                                        }
                                        td { span { class: "badge", "{entry.action}" } }
                                        td {
                                            {entry
                                                .target_user
                                                .as_ref()
                                                .map(|u| u.username.clone())
                                                .or_else(|| entry.target_email.clone())
                                                .unwrap_or_else(|| "-".to_string())}
                                        }
                                        td { {entry.ip.clone().unwrap_or_else(|| "-".to_string())} }
                                    }
                                }
                            }
                        }
                    }
                    Pager { page, per_page: list.per_page, total: list.total }
                } else if error.is_none() {
                    div { class: "flex justify-center py-8",
                        span { class: "loading loading-spinner loading-lg" }
                    }
                }
            }
        }
    }
}
