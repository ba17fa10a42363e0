// src/services/mod.rs

//! External-facing services: feed retrieval, record parsing, delivery.

mod feed;
mod parser;
mod telegram;

pub use feed::FeedFetcher;
pub use parser::parse_feed;
pub use telegram::{PhotoSender, TelegramClient};
