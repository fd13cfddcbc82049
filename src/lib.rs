pub mod config;
pub mod content;
pub mod feed;
pub mod http_client;
