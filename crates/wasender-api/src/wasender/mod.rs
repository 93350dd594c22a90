pub mod config;
pub mod error;
pub mod retry;
pub mod types;
pub mod api_client;
pub mod messaging;
pub mod contacts;
pub mod groups;
pub mod sessions;
pub mod events;
pub mod webhooks;
