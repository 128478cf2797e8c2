use dioxus::prelude::*;

/// Previous/next controls over 1-based pages.
#[component]
pub fn Pager(page: Signal<u64>, per_page: u64, total: u64) -> Element {
    let total_pages = total.div_ceil(per_page.max(1)).max(1);
    let current = page();
    let first = if total == 0 { 0 } else { current.saturating_sub(1) * per_page + 1 };
    let last = (current * per_page).min(total);

    rsx!(
        div {
            class: "flex justify-between items-center mt-4 gap-4",
            span {
                class: "text-xs sm:text-sm opacity-70",
                "Showing {first} to {last} of {total}"
            }
            div {
                class: "join",
                button {
                    class: "join-item btn btn-sm",
                    disabled: current <= 1,
                    onclick: move |_| page.set(current.saturating_sub(1).max(1)),
                    "«"
                }
                button {
                    class: "join-item btn btn-sm btn-disabled",
                    "Page {current} of {total_pages}"
                }
                button {
                    class: "join-item btn btn-sm",
                    disabled: current >= total_pages,
                    onclick: move |_| page.set(current + 1),
                    "»"
                }
            }
        }
    )
}
