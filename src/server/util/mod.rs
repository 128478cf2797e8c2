pub mod request;
pub mod validate;
