use dioxus::prelude::*;

use crate::{
    client::{
        component::{ConfirmDialog, Page, Pager},
        constant::SITE_NAME,
        route::admin::{AdminTab, AdminTabs},
    },
    model::admin::{AdminUserDto, UserListDto},
};

#[cfg(feature = "web")]
use crate::client::api::admin::{delete_user, get_users, set_banned};

const PER_PAGE: u64 = 20;

#[component]
pub fn AdminUsers() -> Element {
    let page = use_signal(|| 1u64);
    let mut search = use_signal(String::new);
    #[allow(unused_mut)]
    let mut refetch_trigger = use_signal(|| 0u32);
    #[allow(unused_mut)]
    let mut error = use_signal(|| None::<String>);

    let mut show_delete_modal = use_signal(|| false);
    let mut user_to_delete = use_signal(|| None::<(i32, String)>);
    #[allow(unused_mut)]
    let mut is_deleting = use_signal(|| false);

    #[cfg(feature = "web")]
    let users = use_resource(move || async move {
        let _ = refetch_trigger();
        get_users(page(), PER_PAGE, &search()).await
    });

    #[cfg(feature = "web")]
    let (list, load_error): (Option<UserListDto>, Option<String>) = match &*users.read() {
        Some(Ok(list)) => (Some(list.clone()), None),
        Some(Err(e)) => (None, Some(e.message.clone())),
        None => (None, None),
    };
    #[cfg(not(feature = "web"))]
    let (list, load_error): (Option<UserListDto>, Option<String>) = (None, None);

    #[allow(unused_variables)]
    let toggle_ban = move |id: i32, banned: bool| {
        #[cfg(feature = "web")]
        spawn(async move {
            match set_banned(id, banned).await {
                Ok(_) => refetch_trigger.set(refetch_trigger() + 1),
                Err(e) => error.set(Some(e.message)),
            }
        });
    };

    let on_confirm_delete = move |_| {
        #[cfg(feature = "web")]
        spawn(async move {
            let Some((id, _)) = user_to_delete() else {
                return;
            };
            is_deleting.set(true);
            match delete_user(id).await {
                Ok(_) => {
                    show_delete_modal.set(false);
                    refetch_trigger.set(refetch_trigger() + 1);
                }
                Err(e) => error.set(Some(e.message)),
            }
            is_deleting.set(false);
        });
    };

    let delete_name = user_to_delete().map(|(_, name)| name).unwrap_or_default();

    rsx! {
        Title { "Admin - Users | {SITE_NAME}" }
        Page {
            class: "flex flex-col items-center",
            div {
                class: "w-full max-w-6xl",
                h1 { class: "text-lg sm:text-2xl mb-6", "Admin Panel" }
                AdminTabs { active_tab: AdminTab::Users }
                input {
                    class: "input input-bordered w-full mb-4",
                    placeholder: "Search by username, email or name",
                    value: "{search}",
                    oninput: move |evt| search.set(evt.value()),
                }
                if let Some(message) = error().or(load_error.clone()) {
                    div { class: "alert alert-error mb-4", "{message}" }
                }
                if let Some(list) = list {
                    UsersTable {
                        users: list.users.clone(),
                        on_toggle_ban: move |(id, banned)| toggle_ban(id, banned),
                        on_delete: move |(id, name)| {
                            user_to_delete.set(Some((id, name)));
                            show_delete_modal.set(true);
                        },
                    }
                    Pager { page, per_page: list.per_page, total: list.total }
                } else if load_error.is_none() {
                    div { class: "flex justify-center py-8",
                        span { class: "loading loading-spinner loading-lg" }
                    }
                }
            }
        }
        ConfirmDialog {
            open: show_delete_modal,
            heading: "Delete user".to_string(),
            body: format!("Delete {delete_name}? Their favorites and history are removed too."),
            action_label: "Delete".to_string(),
            busy: is_deleting(),
            on_confirm: on_confirm_delete,
        }
    }
}

#[component]
fn UsersTable(
    users: Vec<AdminUserDto>,
    on_toggle_ban: EventHandler<(i32, bool)>,
    on_delete: EventHandler<(i32, String)>,
) -> Element {
    if users.is_empty() {
        return rsx! {
            div { class: "text-center py-8 opacity-50", "No users found" }
        };
    }

    rsx! {
        div {
            class: "overflow-x-auto",
            table {
                class: "table table-zebra w-full",
                thead {
                    tr {
                        th { "Username" }
                        th { "Email" }
                        th { "Role" }
                        th { "Discord" }
                        th { "Joined" }
                        th { class: "text-right", "Actions" }
                    }
                }
                tbody {
                    for user in users {
                        {
                            let id = user.id;
                            let banned = user.banned;
                            let name = user.username.clone();
                            let joined = user.created_at.format("%Y-%m-%d").to_string();
                            rsx! {
                                tr {
                                    key: "{id}",
                                    td {
                                        "{user.username}"
                                        if banned {
                                            span { class: "badge badge-sm badge-error ml-2", "banned" }
                                        }
                                    }
                                    td { "{user.email}" }
                                    td { "{user.role}" }
                                    td { if user.discord.subscribed { "subscribed" } else if user.discord.user_id.is_some() { "linked" } else { "-" } }
                                    td { "{joined}" }
                                    td {
                                        div {
                                            class: "flex gap-2 justify-end",
                                            button {
                                                class: "btn btn-sm",
                                                onclick: move |_| on_toggle_ban.call((id, !banned)),
                                                if banned { "Unban" } else { "Ban" }
                                            }
                                            button {
                                                class: "btn btn-sm btn-error",
                                                onclick: move |_| on_delete.call((id, name.clone())),
                                                "Delete"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
