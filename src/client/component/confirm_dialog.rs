use dioxus::prelude::*;

/// Destructive-action prompt. Dismissal is locked while `busy`.
#[component]
pub fn ConfirmDialog(
    open: Signal<bool>,
    heading: String,
    body: String,
    action_label: String,
    busy: bool,
    on_confirm: EventHandler<()>,
) -> Element {
    let mut dismiss = move || {
        if !busy {
            open.set(false);
        }
    };

    if !open() {
        return rsx!();
    }

    rsx!(
        div {
            class: "modal modal-open",
            role: "alertdialog",
            tabindex: "-1",
            onkeydown: move |evt| {
                if evt.key() == Key::Escape {
                    dismiss();
                }
            },
            div {
                class: "modal-box max-w-md",
                h3 { class: "font-bold text-lg text-error", "{heading}" }
                p { class: "py-4", "{body}" }
                div {
                    class: "modal-action",
                    button {
                        class: "btn btn-ghost",
                        disabled: busy,
                        onclick: move |_| dismiss(),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-error",
                        disabled: busy,
                        onclick: move |_| on_confirm.call(()),
                        if busy {
                            span { class: "loading loading-spinner loading-sm" }
                        } else {
                            "{action_label}"
                        }
                    }
                }
            }
            div { class: "modal-backdrop", onclick: move |_| dismiss() }
        }
    )
}
