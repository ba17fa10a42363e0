// src/models/mod.rs

//! Domain models for the publisher application.

mod config;
mod listing;
mod topic;

// Re-export all public types
pub use config::{
    CaptionConfig, CheckpointConfig, Config, ContactsConfig, FeedConfig, PublisherConfig,
    RoutingMode,
};
pub use listing::{Listing, RecordError, RecordOutcome, SALE_LABEL};
pub use topic::{TopicEntry, TopicTable};
