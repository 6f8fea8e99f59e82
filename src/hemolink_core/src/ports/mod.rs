pub mod auth_api;
pub mod navigator;
pub mod token_store;
