pub mod auth;
pub mod metrics;

#[cfg(test)]
mod test;
