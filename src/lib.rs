pub mod app;
pub mod auth;
pub mod config;
pub mod responses;
pub mod state;
pub mod users;

#[cfg(test)]
mod test_support;
