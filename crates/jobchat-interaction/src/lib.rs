//! Network adapters for the jobchat widget.

pub mod http_backend;

pub use http_backend::HttpChatBackend;
