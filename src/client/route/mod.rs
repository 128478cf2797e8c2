pub mod admin;
pub mod favorites;
pub mod home;
pub mod login;
pub mod not_found;
pub mod register;
pub mod settings;

pub use admin::Admin;
pub use favorites::Favorites;
pub use home::Home;
pub use login::Login;
pub use not_found::NotFound;
pub use register::Register;
pub use settings::Settings;
