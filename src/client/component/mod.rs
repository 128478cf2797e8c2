pub mod confirm_dialog;
pub mod header;
pub mod layout;
pub mod page;
pub mod pagination;
pub mod protected_layout;
pub mod weather;

pub use confirm_dialog::ConfirmDialog;
pub use header::Header;
pub use layout::Layout;
pub use page::{ErrorPage, LoadingPage, Page};
pub use pagination::Pager;
pub use protected_layout::{RequiresAdmin, RequiresLoggedIn};
